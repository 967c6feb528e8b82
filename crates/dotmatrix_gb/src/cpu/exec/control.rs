use super::super::opcodes::Condition;
use super::super::{Bus, Cpu};

impl Cpu {
    /// JR cc,e. The displacement is relative to the address after the operand.
    pub(in crate::cpu) fn jr(&mut self, cond: Condition, offset: u8) -> bool {
        if !self.condition_met(cond) {
            return false;
        }
        self.regs.pc = self.regs.pc.wrapping_add(offset as i8 as i16 as u16);
        cond != Condition::Always
    }

    pub(in crate::cpu) fn jp(&mut self, cond: Condition, target: u16) -> bool {
        if !self.condition_met(cond) {
            return false;
        }
        self.regs.pc = target;
        cond != Condition::Always
    }

    pub(in crate::cpu) fn call<B: Bus>(&mut self, bus: &mut B, cond: Condition, target: u16) -> bool {
        if !self.condition_met(cond) {
            return false;
        }
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = target;
        cond != Condition::Always
    }

    pub(in crate::cpu) fn ret<B: Bus>(&mut self, bus: &mut B, cond: Condition) -> bool {
        if !self.condition_met(cond) {
            return false;
        }
        self.regs.pc = self.pop_u16(bus);
        cond != Condition::Always
    }

    /// RETI re-enables interrupts immediately, without the EI delay.
    pub(in crate::cpu) fn reti<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.pop_u16(bus);
        self.ime = true;
        self.ime_enable_pending = false;
    }

    pub(in crate::cpu) fn rst<B: Bus>(&mut self, bus: &mut B, vector: u8) {
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = vector as u16;
    }
}
