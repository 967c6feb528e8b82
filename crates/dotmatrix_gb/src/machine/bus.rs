//! The 64 KiB address space seen by the CPU.
//!
//! Every address resolves to exactly one owner: the cartridge (ROM and
//! external RAM through its bank controller), one of the internal RAM
//! regions, or a register of the timer, PPU, serial port, joypad or
//! interrupt controller. Unmapped addresses read 0xFF and drop writes.
mod dma;
mod init;
mod mmio;

use super::cartridge::Cartridge;
use super::joypad::Joypad;
use super::ppu::Ppu;
use super::serial::Serial;
use super::timer::Timer;
use crate::config::MachineConfig;
use crate::cpu::Bus;
use crate::interrupts::{InterruptFlags, InterruptState};

pub(crate) const VRAM_SIZE: usize = 0x2000;
pub(crate) const WRAM_SIZE: usize = 0x2000;
pub(crate) const OAM_SIZE: usize = 0xA0;
pub(crate) const IO_SIZE: usize = 0x80;
pub(crate) const HRAM_SIZE: usize = 0x7F;

pub struct AddressSpace {
    cartridge: Cartridge,
    vram: [u8; VRAM_SIZE],
    wram: [u8; WRAM_SIZE],
    oam: [u8; OAM_SIZE],
    /// Registers without a dedicated model (sound, unused slots). Stored
    /// and read back as plain bytes.
    io: [u8; IO_SIZE],
    hram: [u8; HRAM_SIZE],
    /// Last value written to 0xFF46.
    dma: u8,
    pub(crate) interrupts: InterruptState,
    pub(crate) timer: Timer,
    pub(crate) ppu: Ppu,
    pub(crate) serial: Serial,
    pub(crate) joypad: Joypad,
}

impl AddressSpace {
    pub(crate) fn new(cartridge: Cartridge, config: &MachineConfig) -> Self {
        let mut bus = Self {
            cartridge,
            vram: [0; VRAM_SIZE],
            wram: [0; WRAM_SIZE],
            oam: [0; OAM_SIZE],
            io: [0xFF; IO_SIZE],
            hram: [0; HRAM_SIZE],
            dma: 0xFF,
            interrupts: InterruptState::default(),
            timer: Timer::power_on(),
            ppu: Ppu::power_on(config.sprite_limit),
            serial: Serial::power_on(),
            joypad: Joypad::default(),
        };
        bus.apply_power_on_state(config.ram_seed);
        bus
    }

    /// Feed `cycles` T-cycles to every clocked component, timer first, and
    /// latch whatever interrupts they raised into IF.
    pub(crate) fn advance(&mut self, cycles: u32) {
        let mut raised = self.timer.advance(cycles);
        raised |= self.ppu.advance(cycles, &self.vram, &self.oam);
        self.cartridge.advance(cycles);
        self.request(raised);
    }

    pub(crate) fn request(&mut self, flags: InterruptFlags) {
        if !flags.is_empty() {
            self.interrupts.request(flags);
        }
    }

    /// The I/O block 0xFF00..=0xFF7F as the CPU would read it.
    pub fn io_registers(&self) -> [u8; IO_SIZE] {
        std::array::from_fn(|i| self.read(0xFF00 + i as u16))
    }
}

impl Bus for AddressSpace {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        self.write(addr, value)
    }
}
