//! End-to-end scenarios driven through the public `GameBoy` API with ROM
//! images built in memory.

use dotmatrix_gb::cpu::Flag;
use dotmatrix_gb::machine::header_checksum;
use dotmatrix_gb::{Button, ControllerKind, Diagnostic, GameBoy, InvalidRom, MachineConfig};
use once_cell::sync::Lazy;

const BANK: usize = 0x4000;

/// `2 << rom_code` banks; every byte outside the header encodes its bank
/// and offset so misrouted reads show up. `program` lands at 0x0100.
fn image(cartridge_type: u8, rom_code: u8, ram_code: u8, program: &[u8]) -> Vec<u8> {
    let banks = 2usize << rom_code;
    let mut rom: Vec<u8> = (0..banks * BANK)
        .map(|i| ((i / BANK) as u8).wrapping_mul(0x35) ^ (i as u8))
        .collect();
    rom[0x0100..0x0150].fill(0);
    rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
    rom[0x0134..0x013C].copy_from_slice(b"SCENARIO");
    rom[0x0147] = cartridge_type;
    rom[0x0148] = rom_code;
    rom[0x0149] = ram_code;
    rom[0x014D] = header_checksum(&rom);
    rom
}

/// Type1 controller, four ROM banks, one RAM bank.
static TYPE1_ROM: Lazy<Vec<u8>> = Lazy::new(|| image(0x03, 0x01, 0x02, &[0x00]));

fn boot(rom: &[u8]) -> GameBoy {
    GameBoy::new(rom, MachineConfig::default()).expect("valid ROM")
}

fn switched_window(gb: &GameBoy) -> Vec<u8> {
    (0x4000u16..0x8000).map(|addr| gb.read8(addr)).collect()
}

#[test]
fn type1_bank_select_wraps_to_bank_one() {
    let mut gb = boot(&TYPE1_ROM);
    assert_eq!(gb.header().kind, ControllerKind::Mbc1);
    assert_eq!(gb.header().rom_banks, 4);

    gb.write8(0x2000, 0x05);
    assert_eq!(switched_window(&gb), TYPE1_ROM[BANK..2 * BANK]);
}

#[test]
fn bank_k_and_k_plus_total_read_the_same() {
    let mut gb = boot(&TYPE1_ROM);
    for k in 1..4u8 {
        gb.write8(0x2000, k);
        let direct = switched_window(&gb);
        assert_eq!(direct, TYPE1_ROM[k as usize * BANK..(k as usize + 1) * BANK]);
        gb.write8(0x2000, k + 4);
        assert_eq!(switched_window(&gb), direct, "bank {k}");
    }
}

#[test]
fn external_ram_needs_enable() {
    let mut gb = boot(&TYPE1_ROM);
    gb.write8(0xA010, 0x42);
    assert_eq!(gb.read8(0xA010), 0xFF);

    gb.write8(0x0000, 0x0A);
    gb.write8(0xA010, 0x42);
    assert_eq!(gb.read8(0xA010), 0x42);

    gb.write8(0x0000, 0x00);
    assert_eq!(gb.read8(0xA010), 0xFF);
    gb.write8(0x0000, 0x0A);
    assert_eq!(gb.read8(0xA010), 0x42);
}

#[test]
fn xor_a_from_power_on() {
    let mut gb = boot(&image(0x00, 0x00, 0x00, &[0xAF]));
    let before = gb.snapshot();
    assert_eq!(before.regs.a, 0x01);
    assert_eq!(before.regs.sp, 0xFFFE);
    assert_eq!(before.regs.pc, 0x0100);

    assert_eq!(gb.step(), 4);
    let regs = gb.snapshot().regs;
    assert_eq!(regs.a, 0x00);
    assert!(regs.flag(Flag::Z));
    assert!(!regs.flag(Flag::N));
    assert!(!regs.flag(Flag::H));
    assert!(!regs.flag(Flag::C));
    assert_eq!(regs.pc, 0x0101);
}

#[test]
fn a_frame_raises_vblank() {
    // JR -2
    let mut gb = boot(&image(0x00, 0x00, 0x00, &[0x18, 0xFE]));
    gb.write8(0xFF0F, 0x00);

    let cycles = gb.step_frame();
    assert!(cycles > 0 && cycles <= 70_224);
    assert!(gb.frame_ready());
    assert!(gb.take_frame_ready());
    assert!(!gb.frame_ready());
    assert_eq!(gb.read8(0xFF0F) & 0x01, 0x01);
    assert_eq!(gb.snapshot().ly, 144);
    assert_eq!(gb.framebuffer().pixels().len(), 160 * 144);
}

#[test]
fn vblank_handler_runs_once_per_frame() {
    let mut rom = image(
        0x00,
        0x00,
        0x00,
        &[
            0x3E, 0x01, // LD A,1
            0xE0, 0xFF, // LDH (IE),A
            0xAF, // XOR A
            0xE0, 0x0F, // LDH (IF),A
            0xFB, // EI
            0x76, // HALT
            0x18, 0xFD, // JR -3
        ],
    );
    // INC (0xC000); RETI
    rom[0x40..0x45].copy_from_slice(&[0x21, 0x00, 0xC0, 0x34, 0xD9]);
    rom[0x014D] = header_checksum(&rom);

    let config = MachineConfig::builder().ram_seed(None).build();
    let mut gb = GameBoy::new(&rom, config).unwrap();
    for _ in 0..3 {
        gb.step_frame();
    }
    assert_eq!(gb.read8(0xC000), 2);
    assert!(gb.snapshot().ime);
}

#[test]
fn serial_output_is_captured() {
    let program = [
        0x3E, b'H', // LD A,'H'
        0xE0, 0x01, // LDH (SB),A
        0x3E, 0x81, // LD A,0x81
        0xE0, 0x02, // LDH (SC),A
    ];
    let mut gb = boot(&image(0x00, 0x00, 0x00, &program));
    for _ in 0..4 {
        gb.step();
    }
    assert_eq!(gb.serial_output(), b"H");
}

#[test]
fn undefined_opcode_is_a_diagnostic() {
    let mut gb = boot(&image(0x00, 0x00, 0x00, &[0xD3, 0xAF]));
    assert_eq!(gb.step(), 4);
    assert_eq!(gb.snapshot().regs.pc, 0x0101);
    assert_eq!(
        gb.drain_diagnostics(),
        vec![Diagnostic::UndefinedOpcode {
            opcode: 0xD3,
            address: 0x0100
        }]
    );
    assert!(gb.drain_diagnostics().is_empty());
    gb.step();
    assert_eq!(gb.snapshot().regs.a, 0);
}

#[test]
fn button_press_requests_joypad_interrupt() {
    let mut gb = boot(&TYPE1_ROM);
    gb.write8(0xFF0F, 0x00);
    gb.set_button(Button::Start, true);
    assert_eq!(gb.read8(0xFF0F) & 0x10, 0x10);
    gb.write8(0xFF00, 0x10);
    assert_eq!(gb.read8(0xFF00) & 0x0F, 0x07);
}

#[test]
fn reset_restores_power_on_state() {
    let mut gb = boot(&TYPE1_ROM);
    gb.write8(0x2000, 0x02);
    gb.write8(0xFF40, 0x00);
    gb.step();
    gb.reset();

    assert_eq!(gb.snapshot().regs.pc, 0x0100);
    assert_eq!(gb.read8(0xFF40), 0x91);
    assert_eq!(switched_window(&gb), TYPE1_ROM[BANK..2 * BANK]);
}

#[test]
fn snapshot_exposes_io_block() {
    let gb = boot(&TYPE1_ROM);
    let snapshot = gb.snapshot();
    assert_eq!(snapshot.io[0x04], 0xAB);
    assert_eq!(snapshot.io[0x0F], 0xE1);
    assert_eq!(snapshot.io[0x40], 0x91);
    assert!(!snapshot.ime);
}

#[test]
fn invalid_roms_are_refused() {
    assert!(matches!(
        GameBoy::new(&[0u8; 0x14F], MachineConfig::default()),
        Err(InvalidRom::TooShort { len: 0x14F })
    ));

    let rom = image(0x01, 0x02, 0x00, &[]);
    assert!(matches!(
        GameBoy::new(&rom[..4 * BANK], MachineConfig::default()),
        Err(InvalidRom::Truncated { declared: 8, .. })
    ));

    let mut rom = image(0x00, 0x00, 0x00, &[]);
    rom[0x0148] = 0x20;
    rom[0x014D] = header_checksum(&rom);
    assert!(matches!(
        GameBoy::new(&rom, MachineConfig::default()),
        Err(InvalidRom::UnsupportedRomSize { code: 0x20 })
    ));
}

#[test]
fn header_checksum_policy() {
    let mut rom = image(0x00, 0x00, 0x00, &[]);
    let good = rom[0x014D];
    rom[0x014D] = good.wrapping_add(1);

    let gb = GameBoy::new(&rom, MachineConfig::default()).expect("lenient by default");
    assert!(!gb.header().header_checksum_matches());

    let strict = MachineConfig::builder().strict_header_checksum(true).build();
    let err = GameBoy::new(&rom, strict).err();
    assert_eq!(
        err,
        Some(InvalidRom::HeaderChecksum {
            stored: good.wrapping_add(1),
            computed: good,
        })
    );
}
