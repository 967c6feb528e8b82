mod header;
mod mbc1;
mod mbc2;
mod mbc3;
mod mbc5;
mod rom_only;

pub use header::{header_checksum, CartridgeHeader, ControllerKind, HEADER_END};

use mbc1::Mbc1;
use mbc2::Mbc2;
use mbc3::Mbc3;
use mbc5::Mbc5;
use rom_only::RomOnly;

pub(crate) const ROM_BANK_SIZE: usize = 0x4000;
pub(crate) const RAM_BANK_SIZE: usize = 0x2000;

/// Cartridge ROM image with its declared bank count.
///
/// Bank selects are reduced modulo `banks` before use, so the effective
/// offset always lands inside the image.
pub(crate) struct BankedRom {
    data: Vec<u8>,
    banks: usize,
}

impl BankedRom {
    fn new(rom: &[u8], header: &CartridgeHeader) -> Self {
        if rom.len() > header.rom_len() {
            log::warn!(
                "GB MBC: image holds {} bytes, header declares {}; extra banks are unreachable",
                rom.len(),
                header.rom_len()
            );
        }
        Self {
            data: rom.to_vec(),
            banks: header.rom_banks.max(1),
        }
    }

    /// Physical offset of `addr` (0x0000..=0x7FFF) within `bank`.
    #[inline]
    fn offset(&self, bank: usize, addr: u16) -> usize {
        (bank % self.banks) * ROM_BANK_SIZE + (addr as usize & (ROM_BANK_SIZE - 1))
    }

    #[inline]
    fn byte(&self, offset: usize) -> u8 {
        self.data.get(offset).copied().unwrap_or(0xFF)
    }
}

/// External RAM split into 8 KiB banks.
pub(crate) struct BankedRam {
    data: Vec<u8>,
    banks: usize,
}

impl BankedRam {
    fn new(banks: usize) -> Self {
        Self {
            data: vec![0xFF; banks * RAM_BANK_SIZE],
            banks,
        }
    }

    fn is_present(&self) -> bool {
        self.banks > 0
    }

    fn offset(&self, bank: usize, addr: u16) -> Option<usize> {
        if !self.is_present() {
            return None;
        }
        let local = (addr as usize).checked_sub(0xA000)?;
        if local >= RAM_BANK_SIZE {
            return None;
        }
        Some((bank % self.banks) * RAM_BANK_SIZE + local)
    }

    fn read(&self, bank: usize, addr: u16) -> u8 {
        self.offset(bank, addr)
            .and_then(|i| self.data.get(i).copied())
            .unwrap_or(0xFF)
    }

    fn write(&mut self, bank: usize, addr: u16, value: u8) {
        if let Some(slot) = self.offset(bank, addr).and_then(|i| self.data.get_mut(i)) {
            *slot = value;
        }
    }
}

/// RAM-enable latch shared by every controller: low nibble 0x0A enables.
#[inline]
fn ram_enable_value(value: u8) -> bool {
    value & 0x0F == 0x0A
}

/// Installed cartridge, one variant per controller family.
pub(crate) enum Cartridge {
    RomOnly(RomOnly),
    Mbc1(Mbc1),
    Mbc2(Mbc2),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

impl Cartridge {
    pub(crate) fn new(rom: &[u8], header: &CartridgeHeader) -> Self {
        let image = BankedRom::new(rom, header);
        log::info!(
            "GB MBC: {:?} cartridge, {} ROM banks, {} RAM banks{}",
            header.kind,
            header.rom_banks,
            header.ram_banks,
            if header.has_rtc { ", RTC" } else { "" }
        );
        match header.kind {
            ControllerKind::RomOnly => Self::RomOnly(RomOnly::new(image, header.ram_banks)),
            ControllerKind::Mbc1 => Self::Mbc1(Mbc1::new(image, header.ram_banks)),
            ControllerKind::Mbc2 => Self::Mbc2(Mbc2::new(image)),
            ControllerKind::Mbc3 => Self::Mbc3(Mbc3::new(image, header.ram_banks, header.has_rtc)),
            ControllerKind::Mbc5 => Self::Mbc5(Mbc5::new(image, header.ram_banks)),
        }
    }

    /// Physical ROM offset that a CPU read at `addr` (0x0000..=0x7FFF)
    /// resolves to under the current bank selects.
    pub(crate) fn decode_rom_address(&self, addr: u16) -> usize {
        match self {
            Cartridge::RomOnly(c) => c.decode_rom_address(addr),
            Cartridge::Mbc1(c) => c.decode_rom_address(addr),
            Cartridge::Mbc2(c) => c.decode_rom_address(addr),
            Cartridge::Mbc3(c) => c.decode_rom_address(addr),
            Cartridge::Mbc5(c) => c.decode_rom_address(addr),
        }
    }

    pub(crate) fn rom_read(&self, addr: u16) -> u8 {
        let offset = self.decode_rom_address(addr);
        self.rom().byte(offset)
    }

    /// A CPU write into 0x0000..=0x7FFF: a control write, never a store.
    pub(crate) fn on_control_write(&mut self, addr: u16, value: u8) {
        match self {
            Cartridge::RomOnly(_) => {}
            Cartridge::Mbc1(c) => c.on_control_write(addr, value),
            Cartridge::Mbc2(c) => c.on_control_write(addr, value),
            Cartridge::Mbc3(c) => c.on_control_write(addr, value),
            Cartridge::Mbc5(c) => c.on_control_write(addr, value),
        }
    }

    pub(crate) fn ram_read(&self, addr: u16) -> u8 {
        match self {
            Cartridge::RomOnly(c) => c.ram_read(addr),
            Cartridge::Mbc1(c) => c.ram_read(addr),
            Cartridge::Mbc2(c) => c.ram_read(addr),
            Cartridge::Mbc3(c) => c.ram_read(addr),
            Cartridge::Mbc5(c) => c.ram_read(addr),
        }
    }

    pub(crate) fn ram_write(&mut self, addr: u16, value: u8) {
        match self {
            Cartridge::RomOnly(c) => c.ram_write(addr, value),
            Cartridge::Mbc1(c) => c.ram_write(addr, value),
            Cartridge::Mbc2(c) => c.ram_write(addr, value),
            Cartridge::Mbc3(c) => c.ram_write(addr, value),
            Cartridge::Mbc5(c) => c.ram_write(addr, value),
        }
    }

    /// Feed elapsed T-cycles to cartridge hardware that keeps time.
    pub(crate) fn advance(&mut self, cycles: u32) {
        if let Cartridge::Mbc3(c) = self {
            c.advance(cycles);
        }
    }

    fn rom(&self) -> &BankedRom {
        match self {
            Cartridge::RomOnly(c) => &c.rom,
            Cartridge::Mbc1(c) => &c.rom,
            Cartridge::Mbc2(c) => &c.rom,
            Cartridge::Mbc3(c) => &c.rom,
            Cartridge::Mbc5(c) => &c.rom,
        }
    }
}
