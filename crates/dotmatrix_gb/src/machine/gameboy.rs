use snafu::prelude::*;

use crate::config::MachineConfig;
use crate::cpu::{Cpu, Diagnostic, Registers};
use crate::error::{HeaderChecksumSnafu, InvalidRom};

use super::bus::{AddressSpace, IO_SIZE};
use super::cartridge::{Cartridge, CartridgeHeader};
use super::joypad::Button;
use super::ppu::{Framebuffer, PpuMode, FRAME_CYCLES};

/// Read-only view of the machine for debuggers and trace tools.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub regs: Registers,
    pub ime: bool,
    pub halted: bool,
    pub ly: u8,
    pub mode: PpuMode,
    /// 0xFF00..=0xFF7F as the CPU would read it.
    pub io: [u8; IO_SIZE],
}

/// One emulation session: a CPU and the address space it runs against.
///
/// Everything is owned here and driven from [`GameBoy::step`]; there is no
/// global state, so independent sessions can coexist.
pub struct GameBoy {
    pub cpu: Cpu,
    bus: AddressSpace,
    rom: Vec<u8>,
    header: CartridgeHeader,
    config: MachineConfig,
}

impl GameBoy {
    /// Validate `rom` and power the machine on in its post-boot state.
    pub fn new(rom: &[u8], config: MachineConfig) -> Result<Self, InvalidRom> {
        let header = CartridgeHeader::parse(rom)?;

        if !header.header_checksum_matches() {
            ensure!(
                !config.strict_header_checksum,
                HeaderChecksumSnafu {
                    stored: header.header_checksum,
                    computed: header.computed_header_checksum(),
                }
            );
            log::warn!(
                "GB: header checksum mismatch (stored 0x{:02X}, computed 0x{:02X})",
                header.header_checksum,
                header.computed_header_checksum()
            );
        }

        log::info!("GB: loaded \"{}\" ({} bytes)", header.title, rom.len());

        let cartridge = Cartridge::new(rom, &header);
        Ok(Self {
            cpu: Cpu::with_diagnostic_capacity(config.diagnostic_capacity),
            bus: AddressSpace::new(cartridge, &config),
            rom: rom.to_vec(),
            header,
            config,
        })
    }

    /// Power-cycle: CPU, I/O and bank registers return to the post-boot
    /// state. Cartridge RAM is cleared too since nothing persists it.
    pub fn reset(&mut self) {
        log::debug!("GB: reset");
        self.cpu.reset();
        let cartridge = Cartridge::new(&self.rom, &self.header);
        self.bus = AddressSpace::new(cartridge, &self.config);
    }

    /// Run one CPU step and advance the timer, PPU and cartridge clock by
    /// the same number of T-cycles. Returns that count.
    pub fn step(&mut self) -> u32 {
        let cycles = self.cpu.step(&mut self.bus);
        self.bus.advance(cycles);
        cycles
    }

    /// Step until the PPU publishes a frame, or one frame's worth of cycles
    /// has elapsed (LCD off). Returns the T-cycles run.
    pub fn step_frame(&mut self) -> u32 {
        self.bus.ppu.take_frame_ready();
        let mut elapsed = 0u32;
        while !self.bus.ppu.frame_ready() && elapsed < FRAME_CYCLES {
            elapsed += self.step();
        }
        elapsed
    }

    /// True once a frame has been published and not yet taken.
    pub fn frame_ready(&self) -> bool {
        self.bus.ppu.frame_ready()
    }

    /// Consume the frame-ready signal.
    pub fn take_frame_ready(&mut self) -> bool {
        self.bus.ppu.take_frame_ready()
    }

    /// Last completed frame.
    pub fn framebuffer(&self) -> &Framebuffer {
        self.bus.ppu.framebuffer()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            regs: self.cpu.regs,
            ime: self.cpu.ime,
            halted: self.cpu.halted,
            ly: self.bus.ppu.ly(),
            mode: self.bus.ppu.mode(),
            io: self.bus.io_registers(),
        }
    }

    pub fn drain_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.cpu.drain_diagnostics().collect()
    }

    /// Bytes shifted out over the serial port so far.
    pub fn serial_output(&self) -> &[u8] {
        &self.bus.serial.output
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        let raised = self.bus.joypad.set_button(button, pressed);
        self.bus.request(raised);
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    /// Side-effect-free read of any address.
    pub fn read8(&self, addr: u16) -> u8 {
        self.bus.read(addr)
    }

    /// Write through the CPU's view of memory, bank-controller writes
    /// included.
    pub fn write8(&mut self, addr: u16, value: u8) {
        self.bus.write(addr, value);
    }

    pub fn address_space(&self) -> &AddressSpace {
        &self.bus
    }
}
