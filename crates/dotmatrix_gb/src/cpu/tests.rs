use super::opcodes::{AluOp, Operation, CB_OPCODES, OPCODES};
use super::*;
use crate::interrupts::{IE_ADDR, IF_ADDR};

struct TestBus {
    memory: [u8; 0x10000],
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
        }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }
}

impl TestBus {
    fn with_program(at: u16, program: &[u8]) -> Self {
        let mut bus = Self::default();
        let start = at as usize;
        bus.memory[start..start + program.len()].copy_from_slice(program);
        bus
    }
}

#[test]
fn xor_a_from_boot_state() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xAF]); // XOR A

    assert_eq!(cpu.regs.a, 0x01);
    assert_eq!(cpu.regs.f, 0xB0);

    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 4);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, 0x80);
    assert_eq!(cpu.regs.pc, 0x0101);
}

#[test]
fn add_and_adc_flags_for_all_operands() {
    let mut cpu = Cpu::new();
    for a in 0..=255u8 {
        for b in 0..=255u8 {
            cpu.regs.a = a;
            cpu.regs.f = 0;
            cpu.alu(AluOp::Add, b);
            let sum = a as u16 + b as u16;
            assert_eq!(cpu.regs.a, sum as u8);
            assert_eq!(cpu.get_flag(Flag::Z), sum as u8 == 0);
            assert!(!cpu.get_flag(Flag::N));
            assert_eq!(cpu.get_flag(Flag::H), (a & 0x0F) + (b & 0x0F) > 0x0F);
            assert_eq!(cpu.get_flag(Flag::C), sum > 0xFF);

            cpu.regs.a = a;
            cpu.regs.f = 0;
            cpu.set_flag(Flag::C, true);
            cpu.alu(AluOp::Adc, b);
            let sum = a as u16 + b as u16 + 1;
            assert_eq!(cpu.regs.a, sum as u8);
            assert_eq!(cpu.get_flag(Flag::H), (a & 0x0F) + (b & 0x0F) + 1 > 0x0F);
            assert_eq!(cpu.get_flag(Flag::C), sum > 0xFF);
        }
    }
}

#[test]
fn cp_sets_sub_flags_and_keeps_a() {
    let mut cpu = Cpu::new();
    for (a, b) in [(0x3Cu8, 0x2Fu8), (0x3C, 0x3C), (0x3C, 0x40), (0x00, 0x01)] {
        cpu.regs.a = a;
        cpu.regs.f = 0;
        cpu.alu(AluOp::Sub, b);
        let sub_flags = cpu.regs.f;
        assert_eq!(cpu.regs.a, a.wrapping_sub(b));

        cpu.regs.a = a;
        cpu.regs.f = 0;
        cpu.alu(AluOp::Cp, b);
        assert_eq!(cpu.regs.f, sub_flags);
        assert_eq!(cpu.regs.a, a);
    }
}

#[test]
fn sbc_borrows_through_carry() {
    let mut cpu = Cpu::new();
    cpu.regs.a = 0x10;
    cpu.regs.f = 0;
    cpu.set_flag(Flag::C, true);
    cpu.alu(AluOp::Sbc, 0x0F);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::N));
    assert!(cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::C));
}

#[test]
fn add_hl_carries_from_bits_11_and_15() {
    let mut cpu = Cpu::new();
    // ADD HL,BC twice
    let mut bus = TestBus::with_program(0x0100, &[0x09, 0x09]);

    cpu.regs.set_hl(0x0FFF);
    cpu.regs.set_bc(0x0001);
    cpu.regs.f = 0x80;
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert!(cpu.get_flag(Flag::Z), "Z is preserved");
    assert!(cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::C));

    cpu.regs.set_hl(0xFFFF);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert!(cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn sp_offset_flags_come_from_low_byte() {
    let mut cpu = Cpu::new();
    // ADD SP,+1 ; LD HL,SP-1
    let mut bus = TestBus::with_program(0x0100, &[0xE8, 0x01, 0xF8, 0xFF]);

    cpu.regs.sp = 0x00FF;
    cpu.regs.f = 0xF0;
    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.sp, 0x0100);
    assert!(!cpu.get_flag(Flag::Z));
    assert!(!cpu.get_flag(Flag::N));
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.hl(), 0x00FF);
    assert_eq!(cpu.regs.sp, 0x0100);
    // 0x00 + 0xFF: no carry out of bit 3 or bit 7.
    assert!(!cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::C));
}

#[test]
fn inc_dec_preserve_carry() {
    let mut cpu = Cpu::new();
    // INC B ; DEC C
    let mut bus = TestBus::with_program(0x0100, &[0x04, 0x0D]);
    cpu.regs.b = 0x0F;
    cpu.regs.c = 0x01;
    cpu.regs.f = 0x10;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.b, 0x10);
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.c, 0x00);
    assert!(cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::N));
    assert!(!cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn hl_increment_and_decrement_loads() {
    let mut cpu = Cpu::new();
    // LD (HL+),A ; LD A,(HL-)
    let mut bus = TestBus::with_program(0x0100, &[0x22, 0x3A]);
    cpu.regs.set_hl(0xC000);
    cpu.regs.a = 0x5A;
    bus.memory[0xC001] = 0xA5;

    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(bus.memory[0xC000], 0x5A);
    assert_eq!(cpu.regs.hl(), 0xC001);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xA5);
    assert_eq!(cpu.regs.hl(), 0xC000);
}

#[test]
fn high_page_loads() {
    let mut cpu = Cpu::new();
    // LDH (0x80),A ; LD (C),A ; LDH A,(0x81)
    let mut bus = TestBus::with_program(0x0100, &[0xE0, 0x80, 0xE2, 0xF0, 0x81]);
    cpu.regs.a = 0x42;
    cpu.regs.c = 0x81;

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(bus.memory[0xFF80], 0x42);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(bus.memory[0xFF81], 0x42);

    cpu.regs.a = 0;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x42);
    assert_eq!(cpu.regs.pc, 0x0105);
}

#[test]
fn ld_abs_sp_stores_little_endian() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x08, 0x00, 0xC1]);
    cpu.regs.sp = 0xBEEF;
    assert_eq!(cpu.step(&mut bus), 20);
    assert_eq!(bus.memory[0xC100], 0xEF);
    assert_eq!(bus.memory[0xC101], 0xBE);
}

#[test]
fn conditional_branches_charge_taken_cycles() {
    let mut cpu = Cpu::new();
    // JR NZ,+2 (not taken, Z set)
    let mut bus = TestBus::with_program(0x0100, &[0x20, 0x02]);
    cpu.regs.f = 0x80;
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.pc, 0x0102);

    cpu.regs.pc = 0x0100;
    cpu.regs.f = 0x00;
    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x0104);

    // CALL NZ,0x2000 then RET Z at the target.
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xC4, 0x00, 0x20]);
    bus.memory[0x2000] = 0xC8;
    cpu.regs.f = 0x00;
    assert_eq!(cpu.step(&mut bus), 24);
    assert_eq!(cpu.regs.pc, 0x2000);
    assert_eq!(cpu.regs.sp, 0xFFFC);

    assert_eq!(cpu.step(&mut bus), 8, "RET Z not taken");
    assert_eq!(cpu.regs.pc, 0x2001);

    cpu.regs.pc = 0x2000;
    cpu.regs.f = 0x80;
    assert_eq!(cpu.step(&mut bus), 20);
    assert_eq!(cpu.regs.pc, 0x0103);
    assert_eq!(cpu.regs.sp, 0xFFFE);

    // JP C not taken, then taken.
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xDA, 0x00, 0x30]);
    cpu.regs.f = 0x00;
    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x0103);
    cpu.regs.pc = 0x0100;
    cpu.regs.f = 0x10;
    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x3000);
}

#[test]
fn rst_and_reti() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xEF]); // RST 28H
    bus.memory[0x0028] = 0xD9; // RETI

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0028);
    assert!(!cpu.ime);

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0101);
    assert!(cpu.ime, "RETI enables interrupts without delay");
}

#[test]
fn pop_af_masks_low_flag_bits() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xF1]); // POP AF
    cpu.regs.sp = 0xC000;
    bus.memory[0xC000] = 0xFF;
    bus.memory[0xC001] = 0x12;

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.af(), 0x12F0);
    assert_eq!(cpu.regs.sp, 0xC002);
}

#[test]
fn accumulator_rotates_clear_zero() {
    let mut cpu = Cpu::new();
    // RLCA ; RLA
    let mut bus = TestBus::with_program(0x0100, &[0x07, 0x17]);
    cpu.regs.a = 0x80;
    cpu.regs.f = 0x00;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x01);
    assert!(cpu.get_flag(Flag::C));
    assert!(!cpu.get_flag(Flag::Z));

    cpu.regs.a = 0x00;
    cpu.regs.f = 0x00;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(!cpu.get_flag(Flag::Z), "RLA never sets Z");
}

#[test]
fn daa_after_bcd_add() {
    let mut cpu = Cpu::new();
    // ADD A,0x15 ; DAA
    let mut bus = TestBus::with_program(0x0100, &[0xC6, 0x15, 0x27]);
    cpu.regs.a = 0x27;

    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.a, 0x3C);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x42);
    assert!(!cpu.get_flag(Flag::C));
    assert!(!cpu.get_flag(Flag::H));
}

#[test]
fn cb_bit_res_set_on_hl() {
    let mut cpu = Cpu::new();
    // SET 0,(HL) ; BIT 0,(HL) ; RES 0,(HL) ; SWAP A
    let mut bus =
        TestBus::with_program(0x0100, &[0xCB, 0xC6, 0xCB, 0x46, 0xCB, 0x86, 0xCB, 0x37]);
    cpu.regs.set_hl(0xC000);
    cpu.regs.f = 0x10;

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(bus.memory[0xC000], 0x01);

    assert_eq!(cpu.step(&mut bus), 12);
    assert!(!cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C), "BIT leaves C alone");

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(bus.memory[0xC000], 0x00);

    cpu.regs.a = 0xA5;
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.a, 0x5A);
    assert!(!cpu.get_flag(Flag::C));
    assert_eq!(cpu.regs.pc, 0x0108);
}

#[test]
fn undefined_opcode_runs_as_nop_with_diagnostic() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xD3, 0x00]);

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0101);

    let diagnostics: Vec<_> = cpu.drain_diagnostics().collect();
    assert_eq!(
        diagnostics,
        vec![Diagnostic::UndefinedOpcode {
            opcode: 0xD3,
            address: 0x0100
        }]
    );
    assert_eq!(cpu.drain_diagnostics().count(), 0);
}

#[test]
fn diagnostic_queue_keeps_most_recent() {
    let mut cpu = Cpu::with_diagnostic_capacity(2);
    let mut bus = TestBus::with_program(0x0100, &[0xD3, 0xDB, 0xDD]);
    for _ in 0..3 {
        cpu.step(&mut bus);
    }
    let opcodes: Vec<u8> = cpu
        .drain_diagnostics()
        .map(|d| match d {
            Diagnostic::UndefinedOpcode { opcode, .. } => opcode,
        })
        .collect();
    assert_eq!(opcodes, vec![0xDB, 0xDD]);
}

#[test]
fn halt_wakes_on_pending_interrupt_without_dispatch_when_ime_clear() {
    let mut cpu = Cpu::new();
    // HALT ; NOP
    let mut bus = TestBus::with_program(0x0100, &[0x76, 0x00]);

    assert_eq!(cpu.step(&mut bus), 4);
    assert!(cpu.halted);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0101);

    bus.memory[IE_ADDR as usize] = 0x04;
    bus.memory[IF_ADDR as usize] = 0x04;
    assert_eq!(cpu.step(&mut bus), 4);
    assert!(!cpu.halted);
    assert_eq!(cpu.regs.pc, 0x0102);
    assert_eq!(bus.memory[IF_ADDR as usize], 0x04, "not acknowledged");
}

#[test]
fn halt_bug_fetches_next_byte_twice() {
    let mut cpu = Cpu::new();
    // HALT ; INC A
    let mut bus = TestBus::with_program(0x0100, &[0x76, 0x3C, 0x00]);
    bus.memory[IE_ADDR as usize] = 0x01;
    bus.memory[IF_ADDR as usize] = 0x01;
    cpu.regs.a = 0;

    cpu.step(&mut bus);
    assert!(!cpu.halted);
    assert_eq!(cpu.regs.pc, 0x0101);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 1);
    assert_eq!(cpu.regs.pc, 0x0101);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 2);
    assert_eq!(cpu.regs.pc, 0x0102);
}

#[test]
fn ei_takes_effect_after_following_instruction() {
    let mut cpu = Cpu::new();
    // EI ; NOP ; NOP
    let mut bus = TestBus::with_program(0x0100, &[0xFB, 0x00, 0x00]);
    bus.memory[IE_ADDR as usize] = 0x01;
    bus.memory[IF_ADDR as usize] = 0x01;

    cpu.step(&mut bus);
    assert!(!cpu.ime);
    assert_eq!(cpu.regs.pc, 0x0101);

    cpu.step(&mut bus);
    assert!(cpu.ime);
    assert_eq!(cpu.regs.pc, 0x0102);

    assert_eq!(cpu.step(&mut bus), 20);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.memory[0xFFFC], 0x02);
    assert_eq!(bus.memory[0xFFFD], 0x01);
    assert_eq!(bus.memory[IF_ADDR as usize], 0x00);
    assert!(!cpu.ime);
}

#[test]
fn ei_halt_with_pending_interrupt_returns_to_halt() {
    let mut cpu = Cpu::new();
    // EI ; HALT ; NOP
    let mut bus = TestBus::with_program(0x0100, &[0xFB, 0x76, 0x00]);
    // INC A ; RETI
    bus.memory[0x0040] = 0x3C;
    bus.memory[0x0041] = 0xD9;
    bus.memory[IE_ADDR as usize] = 0x01;
    bus.memory[IF_ADDR as usize] = 0x01;
    cpu.regs.a = 0;

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert!(cpu.ime);
    assert!(!cpu.halted);

    assert_eq!(cpu.step(&mut bus), 20);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(bus.memory[0xFFFC], 0x01, "returns to the HALT");
    assert_eq!(bus.memory[0xFFFD], 0x01);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 1);
    assert_eq!(cpu.regs.pc, 0x0041);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x0101);
    assert!(cpu.ime);

    // The HALT runs again and now waits for the next request.
    cpu.step(&mut bus);
    assert!(cpu.halted);
    assert_eq!(cpu.regs.a, 1);
}

#[test]
fn dispatch_clears_halt_bug() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::default();
    // INC A ; RETI
    bus.memory[0x0040] = 0x3C;
    bus.memory[0x0041] = 0xD9;
    bus.memory[IE_ADDR as usize] = 0x01;
    bus.memory[IF_ADDR as usize] = 0x01;
    cpu.regs.a = 0;
    cpu.halt_bug = true;
    cpu.ime = true;

    assert_eq!(cpu.step(&mut bus), 20);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 1);
    assert_eq!(cpu.regs.pc, 0x0041);
}

#[test]
fn di_cancels_pending_ei() {
    let mut cpu = Cpu::new();
    // EI ; DI ; NOP
    let mut bus = TestBus::with_program(0x0100, &[0xFB, 0xF3, 0x00]);
    for _ in 0..3 {
        cpu.step(&mut bus);
    }
    assert!(!cpu.ime);
}

#[test]
fn dispatch_picks_lowest_pending_bit() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::default();
    cpu.ime = true;
    bus.memory[IE_ADDR as usize] = 0x1F;
    bus.memory[IF_ADDR as usize] = 0x14; // TIMER | JOYPAD

    assert_eq!(cpu.step(&mut bus), 20);
    assert_eq!(cpu.regs.pc, 0x0050);
    assert_eq!(bus.memory[IF_ADDR as usize], 0x10);
    assert!(!cpu.ime);
}

#[test]
fn disabled_sources_are_not_dispatched() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::default();
    cpu.ime = true;
    bus.memory[IE_ADDR as usize] = 0x01;
    bus.memory[IF_ADDR as usize] = 0x04;

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0101);
    assert!(cpu.ime);
}

#[test]
fn stop_waits_for_joypad_request() {
    let mut cpu = Cpu::new();
    // STOP 0 ; INC A
    let mut bus = TestBus::with_program(0x0100, &[0x10, 0x00, 0x3C]);
    cpu.regs.a = 0;

    assert_eq!(cpu.step(&mut bus), 4);
    assert!(cpu.is_stopped());
    assert_eq!(cpu.regs.pc, 0x0102);

    bus.memory[IF_ADDR as usize] = 0x01;
    assert_eq!(cpu.step(&mut bus), 4);
    assert!(cpu.is_stopped(), "only a joypad request leaves STOP");

    bus.memory[IF_ADDR as usize] = 0x10;
    cpu.step(&mut bus);
    assert!(!cpu.is_stopped());
    assert_eq!(cpu.regs.a, 1);
}

#[test]
fn reset_restores_boot_state() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xD3]);
    cpu.step(&mut bus);
    cpu.regs.a = 0x99;
    cpu.ime = true;

    cpu.reset();
    assert_eq!(cpu.regs.af(), 0x01B0);
    assert_eq!(cpu.regs.bc(), 0x0013);
    assert_eq!(cpu.regs.de(), 0x00D8);
    assert_eq!(cpu.regs.hl(), 0x014D);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(cpu.regs.pc, 0x0100);
    assert!(!cpu.ime);
    assert_eq!(cpu.drain_diagnostics().count(), 0);
}

#[test]
fn opcode_tables_cover_holes_and_prefix() {
    const HOLES: [u8; 11] = [
        0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
    ];
    for opcode in 0..=255u8 {
        let instr = OPCODES[opcode as usize];
        assert_eq!(
            instr.op == Operation::Undefined,
            HOLES.contains(&opcode),
            "opcode 0x{opcode:02X}"
        );
    }
    assert_eq!(OPCODES[0xCB].op, Operation::Prefix);
    assert!(CB_OPCODES.iter().all(|i| i.length == 2));

    assert_eq!(OPCODES[0x3E].op.to_string(), "LD A,d8");
    assert_eq!(OPCODES[0x7E].op.to_string(), "LD A,(HL)");
    assert_eq!(OPCODES[0xE0].op.to_string(), "LD (a8),A");
    assert_eq!(CB_OPCODES[0x7C].op.to_string(), "BIT 7,H");
}
