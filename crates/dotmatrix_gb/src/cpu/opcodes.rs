//! Opcode descriptor tables.
//!
//! Every opcode byte maps to one [`Instruction`]: its encoded length, its
//! base cost in T-cycles, the cost when a conditional branch is taken, and
//! a tagged [`Operation`] that the executor interprets. The tables are the
//! single place where decoding happens; `0xCB` selects the second table.

use std::fmt;

use lazy_static::lazy_static;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reg8 {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
}

/// Source or destination of an 8-bit transfer or ALU operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand8 {
    Reg(Reg8),
    /// `(BC)`, `(DE)` or `(HL)`.
    Indirect(Reg16),
    /// `(HL+)`: HL is incremented after the access.
    HlIncrement,
    /// `(HL-)`: HL is decremented after the access.
    HlDecrement,
    /// The byte following the opcode.
    Imm8,
    /// `(a16)`.
    Absolute,
    /// `(0xFF00 + a8)`.
    HighImm,
    /// `(0xFF00 + C)`.
    HighC,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Always,
    NotZero,
    Zero,
    NotCarry,
    Carry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

/// Rotate/shift family shared by the accumulator forms and the CB table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    /// `0xCB` in the primary table; never executed directly.
    Prefix,
    /// Opcode hole. Executed as a one-byte NOP with a diagnostic.
    Undefined,

    Ld8 { dst: Operand8, src: Operand8 },
    Ld16Imm(Reg16),
    LdAbsSp,
    LdSpHl,
    LdHlSpOffset,

    Inc8(Operand8),
    Dec8(Operand8),
    Inc16(Reg16),
    Dec16(Reg16),
    AddHl(Reg16),
    AddSpOffset,
    Alu(AluOp, Operand8),

    /// RLCA/RRCA/RLA/RRA: like the CB forms but Z is always cleared.
    RotateA(ShiftOp),
    Daa,
    Cpl,
    Scf,
    Ccf,

    Jr(Condition),
    Jp(Condition),
    JpHl,
    Call(Condition),
    Ret(Condition),
    Reti,
    Rst(u8),
    Push(Reg16),
    Pop(Reg16),

    Shift(ShiftOp, Operand8),
    Bit(u8, Operand8),
    Res(u8, Operand8),
    Set(u8, Operand8),
}

/// Decoded opcode descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub op: Operation,
    /// Encoded length in bytes, including any prefix.
    pub length: u8,
    /// T-cycles when no branch is taken (or for non-branching opcodes).
    pub cycles: u8,
    /// T-cycles when a conditional jump/call/return is taken.
    pub branch_cycles: u8,
}

impl Instruction {
    const fn new(op: Operation, length: u8, cycles: u8) -> Self {
        Self {
            op,
            length,
            cycles,
            branch_cycles: cycles,
        }
    }

    const fn branch(op: Operation, length: u8, cycles: u8, taken: u8) -> Self {
        Self {
            op,
            length,
            cycles,
            branch_cycles: taken,
        }
    }

    /// Number of immediate operand bytes following the opcode.
    pub fn operand_len(&self) -> u8 {
        match self.op {
            // CB-prefixed opcodes carry no immediates; the second byte is
            // the sub-opcode itself.
            Operation::Shift(..) | Operation::Bit(..) | Operation::Res(..) | Operation::Set(..) => 0,
            _ => self.length.saturating_sub(1),
        }
    }
}

lazy_static! {
    /// Unprefixed opcode table.
    pub static ref OPCODES: [Instruction; 256] = std::array::from_fn(|i| decode_unprefixed(i as u8));
    /// `0xCB`-prefixed opcode table.
    pub static ref CB_OPCODES: [Instruction; 256] = std::array::from_fn(|i| decode_prefixed(i as u8));
}

/// Register operand by its 3-bit encoding: B, C, D, E, H, L, (HL), A.
fn r(index: u8) -> Operand8 {
    match index & 0x07 {
        0 => Operand8::Reg(Reg8::B),
        1 => Operand8::Reg(Reg8::C),
        2 => Operand8::Reg(Reg8::D),
        3 => Operand8::Reg(Reg8::E),
        4 => Operand8::Reg(Reg8::H),
        5 => Operand8::Reg(Reg8::L),
        6 => Operand8::Indirect(Reg16::HL),
        _ => Operand8::Reg(Reg8::A),
    }
}

/// Register pair for loads and 16-bit arithmetic: BC, DE, HL, SP.
fn rp(index: u8) -> Reg16 {
    match index & 0x03 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        _ => Reg16::SP,
    }
}

/// Register pair for PUSH/POP: BC, DE, HL, AF.
fn rp2(index: u8) -> Reg16 {
    match index & 0x03 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        _ => Reg16::AF,
    }
}

fn cc(index: u8) -> Condition {
    match index & 0x03 {
        0 => Condition::NotZero,
        1 => Condition::Zero,
        2 => Condition::NotCarry,
        _ => Condition::Carry,
    }
}

fn alu(index: u8) -> AluOp {
    match index & 0x07 {
        0 => AluOp::Add,
        1 => AluOp::Adc,
        2 => AluOp::Sub,
        3 => AluOp::Sbc,
        4 => AluOp::And,
        5 => AluOp::Xor,
        6 => AluOp::Or,
        _ => AluOp::Cp,
    }
}

fn shift(index: u8) -> ShiftOp {
    match index & 0x07 {
        0 => ShiftOp::Rlc,
        1 => ShiftOp::Rrc,
        2 => ShiftOp::Rl,
        3 => ShiftOp::Rr,
        4 => ShiftOp::Sla,
        5 => ShiftOp::Sra,
        6 => ShiftOp::Swap,
        _ => ShiftOp::Srl,
    }
}

#[inline]
fn is_hl(operand: Operand8) -> bool {
    operand == Operand8::Indirect(Reg16::HL)
}

/// Decode an unprefixed opcode using the usual x/y/z/p/q field split.
fn decode_unprefixed(opcode: u8) -> Instruction {
    use Operation::*;

    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = y >> 1;
    let q = y & 0x01;

    match (x, z) {
        (0, 0) => match y {
            0 => Instruction::new(Nop, 1, 4),
            1 => Instruction::new(LdAbsSp, 3, 20),
            2 => Instruction::new(Stop, 2, 4),
            3 => Instruction::new(Jr(Condition::Always), 2, 12),
            _ => Instruction::branch(Jr(cc(y - 4)), 2, 8, 12),
        },
        (0, 1) if q == 0 => Instruction::new(Ld16Imm(rp(p)), 3, 12),
        (0, 1) => Instruction::new(AddHl(rp(p)), 1, 8),
        (0, 2) => {
            let mem = match p {
                0 => Operand8::Indirect(Reg16::BC),
                1 => Operand8::Indirect(Reg16::DE),
                2 => Operand8::HlIncrement,
                _ => Operand8::HlDecrement,
            };
            let a = Operand8::Reg(Reg8::A);
            let op = if q == 0 {
                Ld8 { dst: mem, src: a }
            } else {
                Ld8 { dst: a, src: mem }
            };
            Instruction::new(op, 1, 8)
        }
        (0, 3) if q == 0 => Instruction::new(Inc16(rp(p)), 1, 8),
        (0, 3) => Instruction::new(Dec16(rp(p)), 1, 8),
        (0, 4) => Instruction::new(Inc8(r(y)), 1, if is_hl(r(y)) { 12 } else { 4 }),
        (0, 5) => Instruction::new(Dec8(r(y)), 1, if is_hl(r(y)) { 12 } else { 4 }),
        (0, 6) => {
            let dst = r(y);
            Instruction::new(
                Ld8 {
                    dst,
                    src: Operand8::Imm8,
                },
                2,
                if is_hl(dst) { 12 } else { 8 },
            )
        }
        (0, _) => {
            let op = match y {
                0 => RotateA(ShiftOp::Rlc),
                1 => RotateA(ShiftOp::Rrc),
                2 => RotateA(ShiftOp::Rl),
                3 => RotateA(ShiftOp::Rr),
                4 => Daa,
                5 => Cpl,
                6 => Scf,
                _ => Ccf,
            };
            Instruction::new(op, 1, 4)
        }

        (1, 6) if y == 6 => Instruction::new(Halt, 1, 4),
        (1, _) => {
            let (dst, src) = (r(y), r(z));
            let cycles = if is_hl(dst) || is_hl(src) { 8 } else { 4 };
            Instruction::new(Ld8 { dst, src }, 1, cycles)
        }

        (2, _) => Instruction::new(Alu(alu(y), r(z)), 1, if is_hl(r(z)) { 8 } else { 4 }),

        (_, 0) => match y {
            0..=3 => Instruction::branch(Ret(cc(y)), 1, 8, 20),
            4 => Instruction::new(
                Ld8 {
                    dst: Operand8::HighImm,
                    src: Operand8::Reg(Reg8::A),
                },
                2,
                12,
            ),
            5 => Instruction::new(AddSpOffset, 2, 16),
            6 => Instruction::new(
                Ld8 {
                    dst: Operand8::Reg(Reg8::A),
                    src: Operand8::HighImm,
                },
                2,
                12,
            ),
            _ => Instruction::new(LdHlSpOffset, 2, 12),
        },
        (_, 1) if q == 0 => Instruction::new(Pop(rp2(p)), 1, 12),
        (_, 1) => match p {
            0 => Instruction::new(Ret(Condition::Always), 1, 16),
            1 => Instruction::new(Reti, 1, 16),
            2 => Instruction::new(JpHl, 1, 4),
            _ => Instruction::new(LdSpHl, 1, 8),
        },
        (_, 2) => match y {
            0..=3 => Instruction::branch(Jp(cc(y)), 3, 12, 16),
            4 => Instruction::new(
                Ld8 {
                    dst: Operand8::HighC,
                    src: Operand8::Reg(Reg8::A),
                },
                1,
                8,
            ),
            5 => Instruction::new(
                Ld8 {
                    dst: Operand8::Absolute,
                    src: Operand8::Reg(Reg8::A),
                },
                3,
                16,
            ),
            6 => Instruction::new(
                Ld8 {
                    dst: Operand8::Reg(Reg8::A),
                    src: Operand8::HighC,
                },
                1,
                8,
            ),
            _ => Instruction::new(
                Ld8 {
                    dst: Operand8::Reg(Reg8::A),
                    src: Operand8::Absolute,
                },
                3,
                16,
            ),
        },
        (_, 3) => match y {
            0 => Instruction::new(Jp(Condition::Always), 3, 16),
            1 => Instruction::new(Prefix, 2, 4),
            6 => Instruction::new(Di, 1, 4),
            7 => Instruction::new(Ei, 1, 4),
            _ => Instruction::new(Undefined, 1, 4),
        },
        (_, 4) if y <= 3 => Instruction::branch(Call(cc(y)), 3, 12, 24),
        (_, 4) => Instruction::new(Undefined, 1, 4),
        (_, 5) if q == 0 => Instruction::new(Push(rp2(p)), 1, 16),
        (_, 5) if p == 0 => Instruction::new(Call(Condition::Always), 3, 24),
        (_, 5) => Instruction::new(Undefined, 1, 4),
        (_, 6) => Instruction::new(Alu(alu(y), Operand8::Imm8), 2, 8),
        (_, _) => Instruction::new(Rst(y * 8), 1, 16),
    }
}

/// Decode the second byte of a `0xCB`-prefixed opcode.
///
/// Cycle counts include the prefix fetch.
fn decode_prefixed(opcode: u8) -> Instruction {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let target = r(opcode);
    let hl = is_hl(target);

    match x {
        0 => Instruction::new(Operation::Shift(shift(y), target), 2, if hl { 16 } else { 8 }),
        1 => Instruction::new(Operation::Bit(y, target), 2, if hl { 12 } else { 8 }),
        2 => Instruction::new(Operation::Res(y, target), 2, if hl { 16 } else { 8 }),
        _ => Instruction::new(Operation::Set(y, target), 2, if hl { 16 } else { 8 }),
    }
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg8::A => "A",
            Reg8::B => "B",
            Reg8::C => "C",
            Reg8::D => "D",
            Reg8::E => "E",
            Reg8::H => "H",
            Reg8::L => "L",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg16::AF => "AF",
            Reg16::BC => "BC",
            Reg16::DE => "DE",
            Reg16::HL => "HL",
            Reg16::SP => "SP",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Operand8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand8::Reg(reg) => write!(f, "{reg}"),
            Operand8::Indirect(pair) => write!(f, "({pair})"),
            Operand8::HlIncrement => f.write_str("(HL+)"),
            Operand8::HlDecrement => f.write_str("(HL-)"),
            Operand8::Imm8 => f.write_str("d8"),
            Operand8::Absolute => f.write_str("(a16)"),
            Operand8::HighImm => f.write_str("(a8)"),
            Operand8::HighC => f.write_str("(C)"),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::Always => "",
            Condition::NotZero => "NZ,",
            Condition::Zero => "Z,",
            Condition::NotCarry => "NC,",
            Condition::Carry => "C,",
        };
        f.write_str(name)
    }
}

/// Assembly-style mnemonic, used by trace logging and debugger consumers.
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Operation::*;
        match *self {
            Nop => f.write_str("NOP"),
            Stop => f.write_str("STOP"),
            Halt => f.write_str("HALT"),
            Di => f.write_str("DI"),
            Ei => f.write_str("EI"),
            Prefix => f.write_str("PREFIX CB"),
            Undefined => f.write_str("???"),
            Ld8 { dst, src } => write!(f, "LD {dst},{src}"),
            Ld16Imm(pair) => write!(f, "LD {pair},d16"),
            LdAbsSp => f.write_str("LD (a16),SP"),
            LdSpHl => f.write_str("LD SP,HL"),
            LdHlSpOffset => f.write_str("LD HL,SP+r8"),
            Inc8(target) => write!(f, "INC {target}"),
            Dec8(target) => write!(f, "DEC {target}"),
            Inc16(pair) => write!(f, "INC {pair}"),
            Dec16(pair) => write!(f, "DEC {pair}"),
            AddHl(pair) => write!(f, "ADD HL,{pair}"),
            AddSpOffset => f.write_str("ADD SP,r8"),
            Alu(op, src) => {
                let name = match op {
                    AluOp::Add => "ADD A,",
                    AluOp::Adc => "ADC A,",
                    AluOp::Sub => "SUB ",
                    AluOp::Sbc => "SBC A,",
                    AluOp::And => "AND ",
                    AluOp::Xor => "XOR ",
                    AluOp::Or => "OR ",
                    AluOp::Cp => "CP ",
                };
                write!(f, "{name}{src}")
            }
            RotateA(op) => write!(f, "{}A", shift_name(op)),
            Daa => f.write_str("DAA"),
            Cpl => f.write_str("CPL"),
            Scf => f.write_str("SCF"),
            Ccf => f.write_str("CCF"),
            Jr(cond) => write!(f, "JR {cond}r8"),
            Jp(cond) => write!(f, "JP {cond}a16"),
            JpHl => f.write_str("JP HL"),
            Call(cond) => write!(f, "CALL {cond}a16"),
            Ret(Condition::Always) => f.write_str("RET"),
            Ret(cond) => {
                let text = cond.to_string();
                write!(f, "RET {}", text.trim_end_matches(','))
            }
            Reti => f.write_str("RETI"),
            Rst(vector) => write!(f, "RST {vector:02X}H"),
            Push(pair) => write!(f, "PUSH {pair}"),
            Pop(pair) => write!(f, "POP {pair}"),
            Shift(op, target) => write!(f, "{} {target}", shift_name(op)),
            Bit(bit, target) => write!(f, "BIT {bit},{target}"),
            Res(bit, target) => write!(f, "RES {bit},{target}"),
            Set(bit, target) => write!(f, "SET {bit},{target}"),
        }
    }
}

fn shift_name(op: ShiftOp) -> &'static str {
    match op {
        ShiftOp::Rlc => "RLC",
        ShiftOp::Rrc => "RRC",
        ShiftOp::Rl => "RL",
        ShiftOp::Rr => "RR",
        ShiftOp::Sla => "SLA",
        ShiftOp::Sra => "SRA",
        ShiftOp::Swap => "SWAP",
        ShiftOp::Srl => "SRL",
    }
}
