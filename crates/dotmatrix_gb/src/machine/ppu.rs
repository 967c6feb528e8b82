//! Scanline PPU.
//!
//! Each line is 456 T-cycles: OAM scan for 80, drawing for a fixed 172,
//! then HBlank. Lines 144-153 are VBlank. A visible line is rendered in one
//! go when it enters HBlank, into a back buffer that is published as the
//! front buffer when VBlank starts.
mod registers;
mod render;

pub use registers::{LcdControl, PpuMode, SpriteAttributes, StatInterrupts};
pub use render::decode_tile_row;

use registers::*;

use crate::interrupts::InterruptFlags;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub(crate) const LINE_CYCLES: u32 = 456;
const OAM_SCAN_END: u32 = 80;
const DRAWING_END: u32 = OAM_SCAN_END + 172;
pub(crate) const VISIBLE_LINES: u8 = 144;
const LAST_LINE: u8 = 153;
/// On line 153 LY reads back 0 after this many cycles.
const LINE_153_LY_RESET: u32 = 4;
pub(crate) const FRAME_CYCLES: u32 = LINE_CYCLES * (LAST_LINE as u32 + 1);

/// One frame of DMG shades, 0 (lightest) to 3 (darkest), row-major.
///
/// Values are shades after BGP/OBP0/OBP1, not raw tile colour indices: a
/// tile pixel with index 1 under BGP=0xE4 reads back as 1, under BGP=0x1B
/// as 2. A host only has to map the four shades to colours.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: Vec<u8>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            pixels: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }
}

impl Framebuffer {
    pub fn width(&self) -> usize {
        SCREEN_WIDTH
    }

    pub fn height(&self) -> usize {
        SCREEN_HEIGHT
    }

    /// Shade at (`x`, `y`). Panics when out of bounds, like slice indexing.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.row(y)[x]
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }
}

pub(crate) struct Ppu {
    pub(crate) lcdc: LcdControl,
    stat_select: StatInterrupts,
    scy: u8,
    scx: u8,
    /// Internal line counter, 0..=153.
    line: u8,
    /// Visible LY; differs from `line` only late in line 153.
    ly: u8,
    lyc: u8,
    bgp: u8,
    obp0: u8,
    obp1: u8,
    wy: u8,
    wx: u8,
    mode: PpuMode,
    line_cycle: u32,
    /// Combined STAT interrupt line; interrupts fire on its rising edge.
    stat_line: bool,
    /// Window rows drawn so far this frame.
    window_line: u8,
    sprite_limit: usize,
    back: Framebuffer,
    front: Framebuffer,
    frame_ready: bool,
}

impl Ppu {
    /// Post-boot state: LCD on, late in line 153 so LY already reads 0.
    pub(crate) fn power_on(sprite_limit: usize) -> Self {
        let mut ppu = Self {
            lcdc: LcdControl::from_bits_truncate(0x91),
            stat_select: StatInterrupts::empty(),
            scy: 0,
            scx: 0,
            line: LAST_LINE,
            ly: 0,
            lyc: 0,
            bgp: 0xFC,
            obp0: 0xFF,
            obp1: 0xFF,
            wy: 0,
            wx: 0,
            mode: PpuMode::VBlank,
            line_cycle: LINE_153_LY_RESET,
            stat_line: false,
            window_line: 0,
            sprite_limit,
            back: Framebuffer::default(),
            front: Framebuffer::default(),
            frame_ready: false,
        };
        ppu.stat_line = ppu.current_stat_line();
        ppu
    }

    pub(crate) fn mode(&self) -> PpuMode {
        self.mode
    }

    pub(crate) fn ly(&self) -> u8 {
        self.ly
    }

    pub(crate) fn framebuffer(&self) -> &Framebuffer {
        &self.front
    }

    pub(crate) fn frame_ready(&self) -> bool {
        self.frame_ready
    }

    pub(crate) fn take_frame_ready(&mut self) -> bool {
        std::mem::take(&mut self.frame_ready)
    }

    fn lcd_on(&self) -> bool {
        self.lcdc.contains(LcdControl::LCD_ENABLE)
    }

    fn coincidence(&self) -> bool {
        self.ly == self.lyc
    }

    fn current_stat_line(&self) -> bool {
        self.lcd_on() && self.stat_select.line(self.mode, self.coincidence())
    }

    /// Recompute the STAT line and report a rising edge.
    fn update_stat(&mut self) -> InterruptFlags {
        let previous = self.stat_line;
        self.stat_line = self.current_stat_line();
        if !previous && self.stat_line {
            log::trace!(
                "GB PPU: STAT rising edge (LY={} mode={:?} select={:?})",
                self.ly,
                self.mode,
                self.stat_select
            );
            InterruptFlags::LCD_STAT
        } else {
            InterruptFlags::empty()
        }
    }

    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            LCDC_ADDR => self.lcdc.bits(),
            STAT_ADDR => {
                0x80 | self.stat_select.bits()
                    | if self.coincidence() { 0x04 } else { 0 }
                    | self.mode.bits()
            }
            SCY_ADDR => self.scy,
            SCX_ADDR => self.scx,
            LY_ADDR => self.ly,
            LYC_ADDR => self.lyc,
            BGP_ADDR => self.bgp,
            OBP0_ADDR => self.obp0,
            OBP1_ADDR => self.obp1,
            WY_ADDR => self.wy,
            WX_ADDR => self.wx,
            _ => 0xFF,
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) -> InterruptFlags {
        match addr {
            LCDC_ADDR => return self.write_lcdc(value),
            STAT_ADDR => self.stat_select = StatInterrupts::from_bits_truncate(value),
            SCY_ADDR => self.scy = value,
            SCX_ADDR => self.scx = value,
            // LY is read-only.
            LY_ADDR => return InterruptFlags::empty(),
            LYC_ADDR => self.lyc = value,
            BGP_ADDR => self.bgp = value,
            OBP0_ADDR => self.obp0 = value,
            OBP1_ADDR => self.obp1 = value,
            WY_ADDR => self.wy = value,
            WX_ADDR => self.wx = value,
            _ => return InterruptFlags::empty(),
        }
        self.update_stat()
    }

    fn write_lcdc(&mut self, value: u8) -> InterruptFlags {
        let was_on = self.lcd_on();
        self.lcdc = LcdControl::from_bits_truncate(value);

        match (was_on, self.lcd_on()) {
            (true, false) => {
                log::debug!("GB PPU: LCD off at LY={}", self.ly);
                self.line = 0;
                self.ly = 0;
                self.line_cycle = 0;
                self.mode = PpuMode::HBlank;
                self.stat_line = false;
                InterruptFlags::empty()
            }
            (false, true) => {
                log::debug!("GB PPU: LCD on");
                self.line = 0;
                self.ly = 0;
                self.line_cycle = 0;
                self.window_line = 0;
                self.mode = PpuMode::OamScan;
                self.update_stat()
            }
            _ => InterruptFlags::empty(),
        }
    }

    /// Next cycle within the current line at which something changes.
    fn next_boundary(&self) -> u32 {
        if self.line < VISIBLE_LINES {
            match self.line_cycle {
                c if c < OAM_SCAN_END => OAM_SCAN_END,
                c if c < DRAWING_END => DRAWING_END,
                _ => LINE_CYCLES,
            }
        } else if self.line == LAST_LINE && self.line_cycle < LINE_153_LY_RESET {
            LINE_153_LY_RESET
        } else {
            LINE_CYCLES
        }
    }

    /// Advance by `cycles` T-cycles. `vram` and `oam` are the raw regions
    /// (0x8000-0x9FFF and 0xFE00-0xFE9F).
    pub(crate) fn advance(&mut self, cycles: u32, vram: &[u8], oam: &[u8]) -> InterruptFlags {
        let mut raised = InterruptFlags::empty();
        if !self.lcd_on() {
            return raised;
        }

        let mut remaining = cycles;
        while remaining > 0 {
            let boundary = self.next_boundary();
            let step = remaining.min(boundary - self.line_cycle);
            self.line_cycle += step;
            remaining -= step;
            if self.line_cycle == boundary {
                raised |= self.on_boundary(vram, oam);
            }
        }
        raised
    }

    fn on_boundary(&mut self, vram: &[u8], oam: &[u8]) -> InterruptFlags {
        let mut raised = InterruptFlags::empty();

        match self.line_cycle {
            OAM_SCAN_END if self.line < VISIBLE_LINES => self.mode = PpuMode::Drawing,
            DRAWING_END if self.line < VISIBLE_LINES => {
                self.mode = PpuMode::HBlank;
                self.render_line(vram, oam);
            }
            LINE_153_LY_RESET if self.line == LAST_LINE => self.ly = 0,
            LINE_CYCLES => {
                self.line_cycle = 0;
                self.line = if self.line == LAST_LINE { 0 } else { self.line + 1 };
                self.ly = self.line;

                if self.line == VISIBLE_LINES {
                    self.mode = PpuMode::VBlank;
                    self.enter_vblank();
                    raised |= InterruptFlags::VBLANK;
                } else if self.line < VISIBLE_LINES {
                    if self.line == 0 {
                        self.window_line = 0;
                    }
                    self.mode = PpuMode::OamScan;
                }
            }
            _ => {}
        }

        raised | self.update_stat()
    }

    fn enter_vblank(&mut self) {
        self.front.clone_from(&self.back);
        self.frame_ready = true;
        log::trace!("GB PPU: frame complete");
    }
}
