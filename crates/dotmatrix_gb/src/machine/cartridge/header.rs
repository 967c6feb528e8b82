use snafu::prelude::*;

use crate::error::{InvalidRom, TooShortSnafu, TruncatedSnafu, UnsupportedRomSizeSnafu};

use super::{RAM_BANK_SIZE, ROM_BANK_SIZE};

/// Smallest image that still contains the full header (0x0100..=0x014F).
pub const HEADER_END: usize = 0x0150;

const TITLE: std::ops::Range<usize> = 0x0134..0x0144;
const CARTRIDGE_TYPE: usize = 0x0147;
const ROM_SIZE: usize = 0x0148;
const RAM_SIZE: usize = 0x0149;
const DESTINATION: usize = 0x014A;
const OLD_LICENSEE: usize = 0x014B;
const MASK_ROM_VERSION: usize = 0x014C;
const HEADER_CHECKSUM: usize = 0x014D;
const GLOBAL_CHECKSUM: usize = 0x014E;

/// Bank-controller family installed on the cartridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    /// Plain 32 KiB ROM, optionally with 8 KiB of RAM.
    RomOnly,
    Mbc1,
    /// Built-in 512×4-bit RAM, 4-bit ROM bank.
    Mbc2,
    /// 7-bit ROM bank and an optional real-time clock.
    Mbc3,
    /// 9-bit ROM bank, 4-bit RAM bank.
    Mbc5,
}

impl ControllerKind {
    /// Map the cartridge-type byte at 0x0147.
    ///
    /// Returns `None` for bytes no supported controller claims; callers
    /// fall back to [`ControllerKind::RomOnly`].
    pub fn from_cartridge_type(byte: u8) -> Option<Self> {
        match byte {
            0x00 | 0x08 | 0x09 => Some(Self::RomOnly),
            0x01..=0x03 => Some(Self::Mbc1),
            0x05 | 0x06 => Some(Self::Mbc2),
            0x0F..=0x13 => Some(Self::Mbc3),
            0x19..=0x1E => Some(Self::Mbc5),
            _ => None,
        }
    }
}

/// Decoded cartridge header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub title: String,
    pub cartridge_type: u8,
    pub kind: ControllerKind,
    pub has_battery: bool,
    pub has_rtc: bool,
    pub rom_size_code: u8,
    pub rom_banks: usize,
    pub ram_size_code: u8,
    /// External RAM banks of 8 KiB. Always 0 for MBC2, whose RAM is internal.
    pub ram_banks: usize,
    /// 0x00 Japanese, 0x01 overseas.
    pub destination: u8,
    pub old_licensee: u8,
    pub mask_rom_version: u8,
    pub header_checksum: u8,
    /// Stored big-endian at 0x014E. Exposed only; never verified.
    pub global_checksum: u16,
    computed_header_checksum: u8,
}

impl CartridgeHeader {
    /// Decode the header of `rom`.
    ///
    /// Fails when the image cannot hold a header, declares an unknown ROM
    /// size, or is shorter than the size it declares. Checksum policy is
    /// left to the caller.
    pub fn parse(rom: &[u8]) -> Result<Self, InvalidRom> {
        ensure!(rom.len() >= HEADER_END, TooShortSnafu { len: rom.len() });

        let rom_size_code = rom[ROM_SIZE];
        let Some(rom_banks) = rom_banks_for_code(rom_size_code) else {
            return UnsupportedRomSizeSnafu {
                code: rom_size_code,
            }
            .fail();
        };

        let expected_len = rom_banks * ROM_BANK_SIZE;
        ensure!(
            rom.len() >= expected_len,
            TruncatedSnafu {
                declared: rom_banks,
                expected_len,
                len: rom.len(),
            }
        );

        let cartridge_type = rom[CARTRIDGE_TYPE];
        let kind = ControllerKind::from_cartridge_type(cartridge_type).unwrap_or_else(|| {
            log::warn!(
                "GB MBC: unrecognised cartridge type 0x{:02X}, treating as ROM only",
                cartridge_type
            );
            ControllerKind::RomOnly
        });

        let ram_size_code = rom[RAM_SIZE];
        let ram_banks = match kind {
            ControllerKind::Mbc2 => 0,
            _ => ram_banks_for_code(ram_size_code),
        };

        Ok(Self {
            title: decode_title(&rom[TITLE]),
            cartridge_type,
            kind,
            has_battery: matches!(
                cartridge_type,
                0x03 | 0x06 | 0x09 | 0x0F | 0x10 | 0x13 | 0x1B | 0x1E
            ),
            has_rtc: matches!(cartridge_type, 0x0F | 0x10),
            rom_size_code,
            rom_banks,
            ram_size_code,
            ram_banks,
            destination: rom[DESTINATION],
            old_licensee: rom[OLD_LICENSEE],
            mask_rom_version: rom[MASK_ROM_VERSION],
            header_checksum: rom[HEADER_CHECKSUM],
            global_checksum: u16::from_be_bytes([rom[GLOBAL_CHECKSUM], rom[GLOBAL_CHECKSUM + 1]]),
            computed_header_checksum: header_checksum(rom),
        })
    }

    pub fn computed_header_checksum(&self) -> u8 {
        self.computed_header_checksum
    }

    pub fn header_checksum_matches(&self) -> bool {
        self.header_checksum == self.computed_header_checksum
    }

    /// Image length implied by the ROM size code.
    pub fn rom_len(&self) -> usize {
        self.rom_banks * ROM_BANK_SIZE
    }

    pub fn ram_len(&self) -> usize {
        self.ram_banks * RAM_BANK_SIZE
    }
}

/// `x = x - byte - 1` over 0x0134..=0x014C, as the boot ROM computes it.
///
/// `rom` must be at least [`HEADER_END`] bytes.
pub fn header_checksum(rom: &[u8]) -> u8 {
    rom[0x0134..=0x014C]
        .iter()
        .fold(0u8, |x, &byte| x.wrapping_sub(byte).wrapping_sub(1))
}

fn rom_banks_for_code(code: u8) -> Option<usize> {
    match code {
        0x00..=0x08 => Some(2usize << code),
        0x52 => Some(72),
        0x53 => Some(80),
        0x54 => Some(96),
        _ => None,
    }
}

fn ram_banks_for_code(code: u8) -> usize {
    match code {
        // 0x01 is a 2 KiB part; it still occupies one 8 KiB bank slot.
        0x01 | 0x02 => 1,
        0x03 => 4,
        0x04 => 16,
        0x05 => 8,
        _ => 0,
    }
}

fn decode_title(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    bytes[..end]
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
        .collect::<String>()
        .trim_end()
        .to_string()
}
