use super::{ram_enable_value, BankedRam, BankedRom};

/// MBC5: 9-bit ROM bank split over two registers, 4-bit RAM bank.
///
/// Unlike the older controllers, bank 0 can be mapped at 0x4000-0x7FFF.
pub(crate) struct Mbc5 {
    pub(super) rom: BankedRom,
    ram: BankedRam,
    ram_enable: bool,
    rom_bank: u16,
    ram_bank: u8,
}

impl Mbc5 {
    pub(super) fn new(rom: BankedRom, ram_banks: usize) -> Self {
        Self {
            rom,
            ram: BankedRam::new(ram_banks),
            ram_enable: false,
            rom_bank: 1,
            ram_bank: 0,
        }
    }

    pub(super) fn decode_rom_address(&self, addr: u16) -> usize {
        let bank = if addr < 0x4000 { 0 } else { self.rom_bank };
        self.rom.offset(bank as usize, addr)
    }

    pub(super) fn on_control_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enable = ram_enable_value(value),
            0x2000..=0x2FFF => self.rom_bank = (self.rom_bank & 0x100) | value as u16,
            0x3000..=0x3FFF => {
                self.rom_bank = (self.rom_bank & 0x0FF) | (((value & 0x01) as u16) << 8)
            }
            // Bit 3 drives the rumble motor on carts that have one.
            0x4000..=0x5FFF => self.ram_bank = value & 0x0F,
            _ => {}
        }
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        if !self.ram_enable {
            return 0xFF;
        }
        self.ram.read(self.ram_bank as usize, addr)
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        if self.ram_enable {
            self.ram.write(self.ram_bank as usize, addr, value);
        }
    }
}
