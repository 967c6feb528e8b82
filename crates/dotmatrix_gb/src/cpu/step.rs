use super::opcodes::{Instruction, Operation, CB_OPCODES, OPCODES};
use super::{Bus, Cpu, Diagnostic};
use crate::interrupts::{InterruptFlags, IF_ADDR};

/// Cost of one idle M-cycle while halted or stopped.
const IDLE_CYCLES: u32 = 4;

impl Cpu {
    /// Execute a single instruction (or interrupt dispatch, or idle cycle)
    /// and return the number of T-cycles it took.
    ///
    /// The CPU never ticks the rest of the machine itself; the caller feeds
    /// the returned count to the timer and PPU.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if self.stopped {
            let iflags = InterruptFlags::from_bits_truncate(bus.read8(IF_ADDR));
            if !iflags.contains(InterruptFlags::JOYPAD) {
                return IDLE_CYCLES;
            }
            log::debug!("GB CPU: leaving STOP on joypad request");
            self.stopped = false;
        }

        if let Some(cycles) = self.service_interrupts(bus) {
            return cycles;
        }

        if self.halted {
            return IDLE_CYCLES;
        }

        // EI only takes effect once the instruction after it has finished.
        let enable_after = self.ime_enable_pending;

        let address = self.regs.pc;
        let opcode = bus.read8(address);
        let mut cursor = if self.halt_bug {
            self.halt_bug = false;
            address
        } else {
            address.wrapping_add(1)
        };

        let instr: Instruction = if opcode == 0xCB {
            let sub = bus.read8(cursor);
            cursor = cursor.wrapping_add(1);
            CB_OPCODES[sub as usize]
        } else {
            OPCODES[opcode as usize]
        };

        let operand_len = instr.operand_len();
        let imm = match operand_len {
            0 => 0,
            1 => bus.read8(cursor) as u16,
            _ => bus.read16(cursor),
        };
        self.regs.pc = cursor.wrapping_add(operand_len as u16);

        if instr.op == Operation::Undefined {
            log::warn!(
                "GB CPU: undefined opcode 0x{:02X} at 0x{:04X}, treated as NOP",
                opcode,
                address
            );
            self.record(Diagnostic::UndefinedOpcode { opcode, address });
        }

        log::trace!("GB CPU: 0x{:04X} {}", address, instr.op);

        let taken = self.execute(bus, instr.op, imm);

        if enable_after && self.ime_enable_pending {
            self.ime = true;
            self.ime_enable_pending = false;
        }

        if taken {
            instr.branch_cycles as u32
        } else {
            instr.cycles as u32
        }
    }
}
