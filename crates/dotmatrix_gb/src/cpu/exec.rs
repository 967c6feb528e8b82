mod control;
mod system;

use super::opcodes::{Operand8, Operation, Reg16};
use super::{Bus, Cpu, Flag};

impl Cpu {
    /// Execute a decoded operation. PC already points past the instruction.
    ///
    /// `imm` holds the little-endian immediate bytes (0 when there are none).
    /// Returns `true` when a conditional branch was taken, so the caller can
    /// charge the longer cycle count.
    pub(super) fn execute<B: Bus>(&mut self, bus: &mut B, op: Operation, imm: u16) -> bool {
        use Operation::*;

        match op {
            Nop | Prefix | Undefined => {}
            Stop => self.stop(),
            Halt => self.halt(bus),
            Di => self.di(),
            Ei => self.ei(),

            Ld8 { dst, src } => {
                let value = self.read_operand(bus, src, imm);
                self.write_operand(bus, dst, imm, value);
            }
            Ld16Imm(pair) => self.regs.set16(pair, imm),
            LdAbsSp => bus.write16(imm, self.regs.sp),
            LdSpHl => self.regs.sp = self.regs.hl(),
            LdHlSpOffset => {
                let value = self.alu_add16_signed(self.regs.sp, imm as u8);
                self.regs.set_hl(value);
            }

            Inc8(target) => self.modify(bus, target, Cpu::alu_inc8),
            Dec8(target) => self.modify(bus, target, Cpu::alu_dec8),
            Inc16(pair) => {
                let value = self.regs.get16(pair).wrapping_add(1);
                self.regs.set16(pair, value);
            }
            Dec16(pair) => {
                let value = self.regs.get16(pair).wrapping_sub(1);
                self.regs.set16(pair, value);
            }
            AddHl(pair) => {
                let value = self.regs.get16(pair);
                self.alu_add16_hl(value);
            }
            AddSpOffset => self.regs.sp = self.alu_add16_signed(self.regs.sp, imm as u8),
            Alu(alu_op, src) => {
                let value = self.read_operand(bus, src, imm);
                self.alu(alu_op, value);
            }

            RotateA(shift_op) => {
                self.regs.a = self.alu_shift(shift_op, self.regs.a);
                self.set_flag(Flag::Z, false);
            }
            Daa => self.alu_daa(),
            Cpl => {
                self.regs.a = !self.regs.a;
                self.set_flag(Flag::N, true);
                self.set_flag(Flag::H, true);
            }
            Scf => {
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, false);
                self.set_flag(Flag::C, true);
            }
            Ccf => {
                let carry = self.get_flag(Flag::C);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, false);
                self.set_flag(Flag::C, !carry);
            }

            Jr(cond) => return self.jr(cond, imm as u8),
            Jp(cond) => return self.jp(cond, imm),
            JpHl => self.regs.pc = self.regs.hl(),
            Call(cond) => return self.call(bus, cond, imm),
            Ret(cond) => return self.ret(bus, cond),
            Reti => self.reti(bus),
            Rst(vector) => self.rst(bus, vector),
            Push(pair) => self.push_reg(bus, pair),
            Pop(pair) => self.pop_reg(bus, pair),

            Shift(shift_op, target) => {
                self.modify(bus, target, |cpu, value| cpu.alu_shift(shift_op, value))
            }
            Bit(bit, target) => {
                let value = self.read_operand(bus, target, imm);
                self.alu_bit(bit, value);
            }
            Res(bit, target) => self.modify(bus, target, |_, value| value & !(1 << bit)),
            Set(bit, target) => self.modify(bus, target, |_, value| value | (1 << bit)),
        }

        false
    }

    /// Read-modify-write of a register or `(HL)`.
    fn modify<B, F>(&mut self, bus: &mut B, target: Operand8, f: F)
    where
        B: Bus,
        F: FnOnce(&mut Cpu, u8) -> u8,
    {
        // Only registers and (HL) reach here, so the address is resolved
        // without side effects on both accesses.
        debug_assert!(matches!(
            target,
            Operand8::Reg(_) | Operand8::Indirect(Reg16::HL)
        ));
        let value = self.read_operand(bus, target, 0);
        let result = f(self, value);
        self.write_operand(bus, target, 0, result);
    }
}
