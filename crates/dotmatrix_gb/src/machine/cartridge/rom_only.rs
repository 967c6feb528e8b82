use super::{BankedRam, BankedRom};

/// Cartridge without a controller: 32 KiB of ROM mapped flat.
///
/// Writes into the ROM area are ignored. Header-declared RAM has no enable
/// latch and is always accessible.
pub(crate) struct RomOnly {
    pub(super) rom: BankedRom,
    ram: BankedRam,
}

impl RomOnly {
    pub(super) fn new(rom: BankedRom, ram_banks: usize) -> Self {
        Self {
            rom,
            ram: BankedRam::new(ram_banks.min(1)),
        }
    }

    pub(super) fn decode_rom_address(&self, addr: u16) -> usize {
        let bank = usize::from(addr >= 0x4000);
        self.rom.offset(bank, addr)
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        self.ram.read(0, addr)
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        self.ram.write(0, addr, value);
    }
}
