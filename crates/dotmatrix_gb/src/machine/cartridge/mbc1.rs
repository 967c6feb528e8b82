use super::{ram_enable_value, BankedRam, BankedRom};

/// MBC1.
///
/// BANK1 (0x2000-0x3FFF) holds the low five ROM bank bits with 0 read as 1.
/// BANK2 (0x4000-0x5FFF) holds two more bits that extend the ROM bank in
/// both modes; in mode 1 they also select the RAM bank and the bank mapped
/// at 0x0000-0x3FFF.
pub(crate) struct Mbc1 {
    pub(super) rom: BankedRom,
    ram: BankedRam,
    ram_enable: bool,
    bank1: u8,
    bank2: u8,
    advanced_mode: bool,
}

impl Mbc1 {
    pub(super) fn new(rom: BankedRom, ram_banks: usize) -> Self {
        Self {
            rom,
            ram: BankedRam::new(ram_banks),
            ram_enable: false,
            bank1: 1,
            bank2: 0,
            advanced_mode: false,
        }
    }

    pub(super) fn decode_rom_address(&self, addr: u16) -> usize {
        let high = (self.bank2 as usize) << 5;
        let bank = if addr < 0x4000 {
            if self.advanced_mode {
                high
            } else {
                0
            }
        } else {
            high | self.bank1 as usize
        };
        self.rom.offset(bank, addr)
    }

    pub(super) fn on_control_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enable = ram_enable_value(value),
            0x2000..=0x3FFF => {
                self.bank1 = match value & 0x1F {
                    0 => 1,
                    bank => bank,
                };
                log::debug!("GB MBC1: ROM bank low bits = 0x{:02X}", self.bank1);
            }
            0x4000..=0x5FFF => self.bank2 = value & 0x03,
            0x6000..=0x7FFF => self.advanced_mode = value & 0x01 != 0,
            _ => {}
        }
    }

    fn ram_bank(&self) -> usize {
        if self.advanced_mode {
            self.bank2 as usize
        } else {
            0
        }
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        if !self.ram_enable {
            return 0xFF;
        }
        self.ram.read(self.ram_bank(), addr)
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        if self.ram_enable {
            let bank = self.ram_bank();
            self.ram.write(bank, addr, value);
        }
    }
}
