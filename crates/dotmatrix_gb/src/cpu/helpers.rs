use super::opcodes::{Condition, Operand8, Reg16};
use super::{Bus, Cpu, Flag};

impl Cpu {
    /// Resolve the memory address an operand refers to, applying the
    /// post-increment/decrement of `(HL+)`/`(HL-)`.
    ///
    /// Returns `None` for register and immediate operands.
    fn operand_address(&mut self, operand: Operand8, imm: u16) -> Option<u16> {
        match operand {
            Operand8::Reg(_) | Operand8::Imm8 => None,
            Operand8::Indirect(pair) => Some(self.regs.get16(pair)),
            Operand8::HlIncrement => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                Some(hl)
            }
            Operand8::HlDecrement => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                Some(hl)
            }
            Operand8::Absolute => Some(imm),
            Operand8::HighImm => Some(0xFF00 | (imm & 0x00FF)),
            Operand8::HighC => Some(0xFF00 | self.regs.c as u16),
        }
    }

    /// Read an 8-bit operand. `imm` holds the instruction's immediate bytes.
    pub(super) fn read_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand8, imm: u16) -> u8 {
        match operand {
            Operand8::Reg(reg) => self.regs.get8(reg),
            Operand8::Imm8 => imm as u8,
            _ => match self.operand_address(operand, imm) {
                Some(addr) => bus.read8(addr),
                None => 0xFF,
            },
        }
    }

    /// Write an 8-bit operand. Immediates are not writable and are ignored.
    pub(super) fn write_operand<B: Bus>(
        &mut self,
        bus: &mut B,
        operand: Operand8,
        imm: u16,
        value: u8,
    ) {
        match operand {
            Operand8::Reg(reg) => self.regs.set8(reg, value),
            Operand8::Imm8 => {}
            _ => {
                if let Some(addr) = self.operand_address(operand, imm) {
                    bus.write8(addr, value);
                }
            }
        }
    }

    pub(super) fn condition_met(&self, cond: Condition) -> bool {
        match cond {
            Condition::Always => true,
            Condition::NotZero => !self.get_flag(Flag::Z),
            Condition::Zero => self.get_flag(Flag::Z),
            Condition::NotCarry => !self.get_flag(Flag::C),
            Condition::Carry => self.get_flag(Flag::C),
        }
    }

    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        // memory[SP] = low, memory[SP+1] = high once both bytes are pushed.
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
    }

    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let value = bus.read16(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }

    pub(super) fn push_reg<B: Bus>(&mut self, bus: &mut B, pair: Reg16) {
        let value = self.regs.get16(pair);
        self.push_u16(bus, value);
    }

    /// POP rr. Popping into AF drops the low nibble of F.
    pub(super) fn pop_reg<B: Bus>(&mut self, bus: &mut B, pair: Reg16) {
        let value = self.pop_u16(bus);
        self.regs.set16(pair, value);
    }
}
