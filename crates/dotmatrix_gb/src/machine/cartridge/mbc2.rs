use super::{ram_enable_value, BankedRom};

const RAM_CELLS: usize = 0x200;

/// MBC2 with its built-in 512×4-bit RAM.
///
/// In 0x0000-0x1FFF address bit 8 chooses the register: clear for RAM
/// enable, set for the ROM bank. 0x2000-0x3FFF always selects the ROM bank.
/// RAM cells echo across 0xA000-0xBFFF and read back with the upper nibble
/// set.
pub(crate) struct Mbc2 {
    pub(super) rom: BankedRom,
    ram: [u8; RAM_CELLS],
    ram_enable: bool,
    rom_bank: u8,
}

impl Mbc2 {
    pub(super) fn new(rom: BankedRom) -> Self {
        Self {
            rom,
            ram: [0x0F; RAM_CELLS],
            ram_enable: false,
            rom_bank: 1,
        }
    }

    pub(super) fn decode_rom_address(&self, addr: u16) -> usize {
        let bank = if addr < 0x4000 { 0 } else { self.rom_bank };
        self.rom.offset(bank as usize, addr)
    }

    pub(super) fn on_control_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF if addr & 0x0100 == 0 => self.ram_enable = ram_enable_value(value),
            0x0000..=0x3FFF => {
                self.rom_bank = match value & 0x0F {
                    0 => 1,
                    bank => bank,
                };
                log::debug!("GB MBC2: ROM bank = {}", self.rom_bank);
            }
            _ => {}
        }
    }

    #[inline]
    fn cell(addr: u16) -> usize {
        addr as usize & (RAM_CELLS - 1)
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        if !self.ram_enable {
            return 0xFF;
        }
        self.ram[Self::cell(addr)] | 0xF0
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        if self.ram_enable {
            self.ram[Self::cell(addr)] = value & 0x0F;
        }
    }
}
