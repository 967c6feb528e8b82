pub mod config;
pub mod cpu;
pub mod error;
pub mod interrupts;
pub mod machine;

pub use config::MachineConfig;
pub use cpu::{Diagnostic, Registers};
pub use error::InvalidRom;
pub use interrupts::{Interrupt, InterruptFlags};
pub use machine::{
    Button, CartridgeHeader, ControllerKind, Framebuffer, GameBoy, PpuMode, Snapshot,
};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
/// CPU clock in T-cycles per second.
pub const CLOCK_HZ: u32 = 4_194_304;
