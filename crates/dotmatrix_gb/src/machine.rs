mod bus;
mod cartridge;
mod gameboy;
mod joypad;
mod ppu;
mod serial;
mod timer;

pub use bus::AddressSpace;
pub use cartridge::{header_checksum, CartridgeHeader, ControllerKind, HEADER_END};
pub use gameboy::{GameBoy, Snapshot};
pub use joypad::Button;
pub use ppu::{
    decode_tile_row, Framebuffer, LcdControl, PpuMode, SpriteAttributes, StatInterrupts,
};
