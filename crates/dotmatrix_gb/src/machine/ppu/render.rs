use super::registers::{apply_palette, LcdControl, SpriteAttributes};
use super::Ppu;
use crate::SCREEN_WIDTH;

const VRAM_BASE: u16 = 0x8000;
const OAM_ENTRIES: usize = 40;

/// Decode one 8-pixel tile row from its two bit-planes into colour indices,
/// leftmost pixel first.
pub fn decode_tile_row(lo: u8, hi: u8) -> [u8; 8] {
    std::array::from_fn(|i| {
        let bit = 7 - i;
        ((lo >> bit) & 1) | (((hi >> bit) & 1) << 1)
    })
}

#[derive(Clone, Copy)]
struct Sprite {
    y: i16,
    x: i16,
    tile: u8,
    attrs: SpriteAttributes,
}

impl Sprite {
    fn from_oam(entry: &[u8]) -> Self {
        Self {
            y: entry[0] as i16 - 16,
            x: entry[1] as i16 - 8,
            tile: entry[2],
            attrs: SpriteAttributes::from_bits_truncate(entry[3]),
        }
    }
}

fn vram_byte(vram: &[u8], addr: u16) -> u8 {
    vram.get(addr.wrapping_sub(VRAM_BASE) as usize)
        .copied()
        .unwrap_or(0xFF)
}

impl Ppu {
    fn tile_data_address(&self, tile: u8) -> u16 {
        if self.lcdc.contains(LcdControl::TILE_DATA) {
            VRAM_BASE + tile as u16 * 16
        } else {
            (0x9000i32 + (tile as i8 as i32) * 16) as u16
        }
    }

    /// Colour index of the tile pixel at (`x`, `y`) in map space.
    fn map_pixel(&self, vram: &[u8], map_base: u16, x: u8, y: u8) -> u8 {
        let map_addr = map_base + (y as u16 / 8) * 32 + x as u16 / 8;
        let tile = vram_byte(vram, map_addr);
        let row_addr = self.tile_data_address(tile) + (y as u16 & 7) * 2;
        let row = decode_tile_row(vram_byte(vram, row_addr), vram_byte(vram, row_addr + 1));
        row[(x & 7) as usize]
    }

    /// Render the current line into the back buffer.
    pub(super) fn render_line(&mut self, vram: &[u8], oam: &[u8]) {
        let ly = self.line;
        let mut bg_index = [0u8; SCREEN_WIDTH];
        let mut shades = [0u8; SCREEN_WIDTH];

        if self.lcdc.contains(LcdControl::BG_ENABLE) {
            let bg_map = if self.lcdc.contains(LcdControl::BG_TILE_MAP) {
                0x9C00
            } else {
                0x9800
            };
            let bg_y = ly.wrapping_add(self.scy);
            for (x, index) in bg_index.iter_mut().enumerate() {
                let bg_x = (x as u8).wrapping_add(self.scx);
                *index = self.map_pixel(vram, bg_map, bg_x, bg_y);
            }

            let window_visible = self.lcdc.contains(LcdControl::WINDOW_ENABLE)
                && self.wy <= ly
                && self.wx <= 166;
            if window_visible {
                let window_map = if self.lcdc.contains(LcdControl::WINDOW_TILE_MAP) {
                    0x9C00
                } else {
                    0x9800
                };
                let start = self.wx as i16 - 7;
                for (x, index) in bg_index.iter_mut().enumerate() {
                    let wx = x as i16 - start;
                    if wx >= 0 {
                        *index = self.map_pixel(vram, window_map, wx as u8, self.window_line);
                    }
                }
                self.window_line = self.window_line.wrapping_add(1);
            }

            for (shade, &index) in shades.iter_mut().zip(bg_index.iter()) {
                *shade = apply_palette(self.bgp, index);
            }
        }

        if self.lcdc.contains(LcdControl::OBJ_ENABLE) {
            self.render_sprites(vram, oam, &bg_index, &mut shades);
        }

        self.back.row_mut(ly as usize).copy_from_slice(&shades);
    }

    fn render_sprites(
        &self,
        vram: &[u8],
        oam: &[u8],
        bg_index: &[u8; SCREEN_WIDTH],
        shades: &mut [u8; SCREEN_WIDTH],
    ) {
        let ly = self.line as i16;
        let height: i16 = if self.lcdc.contains(LcdControl::OBJ_SIZE) { 16 } else { 8 };

        let visible: Vec<Sprite> = oam
            .chunks_exact(4)
            .take(OAM_ENTRIES)
            .map(Sprite::from_oam)
            .filter(|s| ly >= s.y && ly < s.y + height)
            .take(self.sprite_limit)
            .collect();

        let mut drawn = [false; SCREEN_WIDTH];
        for sprite in &visible {
            let mut row = (ly - sprite.y) as u16;
            if sprite.attrs.contains(SpriteAttributes::Y_FLIP) {
                row = height as u16 - 1 - row;
            }
            let tile = if height == 16 { sprite.tile & 0xFE } else { sprite.tile };
            let row_addr = VRAM_BASE + tile as u16 * 16 + row * 2;
            let mut pixels =
                decode_tile_row(vram_byte(vram, row_addr), vram_byte(vram, row_addr + 1));
            if sprite.attrs.contains(SpriteAttributes::X_FLIP) {
                pixels.reverse();
            }
            let palette = if sprite.attrs.contains(SpriteAttributes::PALETTE) {
                self.obp1
            } else {
                self.obp0
            };

            for (col, &index) in pixels.iter().enumerate() {
                let x = sprite.x + col as i16;
                if !(0..SCREEN_WIDTH as i16).contains(&x) {
                    continue;
                }
                let x = x as usize;
                // Colour 0 is transparent; an earlier OAM entry keeps the pixel.
                if index == 0 || drawn[x] {
                    continue;
                }
                drawn[x] = true;
                if sprite.attrs.contains(SpriteAttributes::BG_PRIORITY) && bg_index[x] != 0 {
                    continue;
                }
                shades[x] = apply_palette(palette, index);
            }
        }
    }
}
