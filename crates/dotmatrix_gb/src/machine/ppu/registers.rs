use bitflags::bitflags;

pub(crate) const LCDC_ADDR: u16 = 0xFF40;
pub(crate) const STAT_ADDR: u16 = 0xFF41;
pub(crate) const SCY_ADDR: u16 = 0xFF42;
pub(crate) const SCX_ADDR: u16 = 0xFF43;
pub(crate) const LY_ADDR: u16 = 0xFF44;
pub(crate) const LYC_ADDR: u16 = 0xFF45;
pub(crate) const BGP_ADDR: u16 = 0xFF47;
pub(crate) const OBP0_ADDR: u16 = 0xFF48;
pub(crate) const OBP1_ADDR: u16 = 0xFF49;
pub(crate) const WY_ADDR: u16 = 0xFF4A;
pub(crate) const WX_ADDR: u16 = 0xFF4B;

bitflags! {
    /// LCDC (0xFF40).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LcdControl: u8 {
        /// DMG: clearing this blanks both background and window.
        const BG_ENABLE       = 0b0000_0001;
        const OBJ_ENABLE      = 0b0000_0010;
        /// 8x16 sprites when set.
        const OBJ_SIZE        = 0b0000_0100;
        /// Background map at 0x9C00 when set, else 0x9800.
        const BG_TILE_MAP     = 0b0000_1000;
        /// Unsigned tile data at 0x8000 when set, else signed around 0x9000.
        const TILE_DATA       = 0b0001_0000;
        const WINDOW_ENABLE   = 0b0010_0000;
        const WINDOW_TILE_MAP = 0b0100_0000;
        const LCD_ENABLE      = 0b1000_0000;
    }
}

bitflags! {
    /// Interrupt source selects in STAT bits 3-6.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct StatInterrupts: u8 {
        const HBLANK   = 0b0000_1000;
        const VBLANK   = 0b0001_0000;
        const OAM_SCAN = 0b0010_0000;
        const LYC      = 0b0100_0000;
    }
}

bitflags! {
    /// OAM attribute byte (DMG bits only).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SpriteAttributes: u8 {
        /// OBP1 when set, else OBP0.
        const PALETTE     = 0b0001_0000;
        const X_FLIP      = 0b0010_0000;
        const Y_FLIP      = 0b0100_0000;
        /// Sprite hides behind non-zero background colours.
        const BG_PRIORITY = 0b1000_0000;
    }
}

/// PPU mode as reported in STAT bits 0-1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PpuMode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Drawing = 3,
}

impl PpuMode {
    pub fn bits(self) -> u8 {
        self as u8
    }

    fn stat_source(self) -> StatInterrupts {
        match self {
            PpuMode::HBlank => StatInterrupts::HBLANK,
            PpuMode::VBlank => StatInterrupts::VBLANK,
            PpuMode::OamScan => StatInterrupts::OAM_SCAN,
            PpuMode::Drawing => StatInterrupts::empty(),
        }
    }
}

impl StatInterrupts {
    /// Level of the combined STAT interrupt line.
    pub(crate) fn line(self, mode: PpuMode, coincidence: bool) -> bool {
        self.intersects(mode.stat_source()) || (coincidence && self.contains(StatInterrupts::LYC))
    }
}

/// Map a 2-bit colour index through a BGP/OBP palette byte.
#[inline]
pub(crate) fn apply_palette(palette: u8, index: u8) -> u8 {
    (palette >> (index * 2)) & 0x03
}
