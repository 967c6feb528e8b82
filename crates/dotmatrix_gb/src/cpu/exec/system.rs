use super::super::{Bus, Cpu};
use crate::interrupts::{IE_ADDR, IF_ADDR};

impl Cpu {
    /// HALT.
    ///
    /// With IME clear and an interrupt already pending the CPU does not
    /// halt; instead the following opcode byte is fetched twice.
    ///
    /// Right after EI the pending interrupt is dispatched with the HALT
    /// itself as the return address, so the handler's RETI lands back on it.
    pub(in crate::cpu) fn halt<B: Bus>(&mut self, bus: &mut B) {
        let pending = bus.read8(IE_ADDR) & bus.read8(IF_ADDR) & 0x1F;
        if self.ime_enable_pending && pending != 0 {
            self.regs.pc = self.regs.pc.wrapping_sub(1);
        } else if !self.ime && pending != 0 {
            log::trace!("GB CPU: HALT bug at pc=0x{:04X}", self.regs.pc);
            self.halt_bug = true;
        } else {
            self.halted = true;
        }
    }

    pub(in crate::cpu) fn stop(&mut self) {
        log::debug!("GB CPU: STOP at pc=0x{:04X}", self.regs.pc);
        self.stopped = true;
    }

    pub(in crate::cpu) fn di(&mut self) {
        self.ime = false;
        self.ime_enable_pending = false;
    }

    /// EI takes effect after the next instruction completes.
    pub(in crate::cpu) fn ei(&mut self) {
        if !self.ime {
            self.ime_enable_pending = true;
        }
    }
}
