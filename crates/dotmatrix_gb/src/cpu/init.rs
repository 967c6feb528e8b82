use std::collections::VecDeque;

use super::{Cpu, Registers};

const DEFAULT_DIAGNOSTIC_CAPACITY: usize = 64;

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self::with_diagnostic_capacity(DEFAULT_DIAGNOSTIC_CAPACITY)
    }

    pub fn with_diagnostic_capacity(capacity: usize) -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            ime: false,
            halted: false,
            stopped: false,
            halt_bug: false,
            ime_enable_pending: false,
            diagnostics: VecDeque::with_capacity(capacity.min(DEFAULT_DIAGNOSTIC_CAPACITY)),
            diagnostic_capacity: capacity,
        };
        cpu.apply_dmg_boot_state();
        cpu
    }

    /// Return to the post-boot power-on state. Queued diagnostics are dropped.
    pub fn reset(&mut self) {
        self.regs = Registers::default();
        self.ime = false;
        self.halted = false;
        self.stopped = false;
        self.halt_bug = false;
        self.ime_enable_pending = false;
        self.diagnostics.clear();
        self.apply_dmg_boot_state();
    }

    /// Initialize registers to match the DMG boot ROM's state after it
    /// hands control to cartridge code at 0x0100.
    fn apply_dmg_boot_state(&mut self) {
        self.regs.a = 0x01;
        self.regs.f = 0xB0; // Z=1 N=0 H=1 C=1
        self.regs.b = 0x00;
        self.regs.c = 0x13;
        self.regs.d = 0x00;
        self.regs.e = 0xD8;
        self.regs.h = 0x01;
        self.regs.l = 0x4D;
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;

        // IME is clear when the cartridge takes over.
        self.ime = false;
    }
}
