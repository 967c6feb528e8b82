mod alu;
mod bus;
mod exec;
mod helpers;
mod init;
mod interrupts;
pub mod opcodes;
mod regs;
mod step;

use std::collections::VecDeque;

pub use bus::Bus;
pub use regs::{Flag, Registers};

/// Non-fatal events surfaced by the CPU to its caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// An opcode hole was executed. It behaved as a one-byte NOP.
    UndefinedOpcode { opcode: u8, address: u16 },
}

/// Game Boy CPU core (SM83 / LR35902).
///
/// Owns the register file and the interrupt master enable. Memory is only
/// reached through the [`Bus`] handed to [`Cpu::step`], so the core can be
/// driven by the full machine or by a flat test memory.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub ime: bool,
    pub halted: bool,
    /// STOP low-power state, left when a joypad interrupt is requested.
    stopped: bool,
    /// Set when HALT ran with IME clear and an interrupt already pending:
    /// the next opcode fetch does not advance PC.
    halt_bug: bool,
    /// EI enables interrupts only after the instruction that follows it.
    ime_enable_pending: bool,
    diagnostics: VecDeque<Diagnostic>,
    diagnostic_capacity: usize,
}

impl Cpu {
    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        self.regs.flag(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        self.regs.set_flag(flag, value);
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.f = 0;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Remove and return every diagnostic recorded since the last call.
    pub fn drain_diagnostics(&mut self) -> impl Iterator<Item = Diagnostic> + '_ {
        self.diagnostics.drain(..)
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        if self.diagnostic_capacity == 0 {
            return;
        }
        if self.diagnostics.len() == self.diagnostic_capacity {
            self.diagnostics.pop_front();
        }
        self.diagnostics.push_back(diagnostic);
    }
}

#[cfg(test)]
mod tests;
