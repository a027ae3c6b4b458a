//! Unit tests for 6809 instruction behavior.

use emu_core::{FlatMemory, Memory};
use motorola_6809::flags::{C, E, F, H, I, N, V, Z};
use motorola_6809::{Config, CpuError, Mc6809, State};

const ORIGIN: u16 = 0x1000;
const STACK: u16 = 0x8000;

/// CPU reset into a program at $1000 with S at $8000.
fn setup(program: &[u8]) -> Mc6809<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.load(ORIGIN, program);
    memory.write_word(0xFFFE, ORIGIN);
    let mut cpu = Mc6809::new(memory, Config::default());
    cpu.reset();
    cpu.regs.s.set(STACK.into());
    cpu
}

/// Run until PC falls off the end of the program.
fn run(cpu: &mut Mc6809<FlatMemory>, program_len: usize) {
    let end = ORIGIN + program_len as u16;
    cpu.test_run(ORIGIN, end, 1000).expect("program should run to its end");
}

fn execute(program: &[u8]) -> Mc6809<FlatMemory> {
    let mut cpu = setup(program);
    run(&mut cpu, program.len());
    cpu
}

fn flag(cpu: &Mc6809<FlatMemory>, f: u8) -> bool {
    cpu.regs.cc.is_set(f)
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_daa_corrects_bcd_overflow() {
    // ANDCC #$00; LDA #$9A; DAA
    let cpu = execute(&[0x1C, 0x00, 0x86, 0x9A, 0x19]);
    assert_eq!(cpu.regs.a.get(), 0x00, "$9A should correct to $00");
    assert!(flag(&cpu, C), "BCD carry out");
    assert!(flag(&cpu, Z));
}

#[test]
fn test_daa_after_add_uses_half_carry() {
    // LDA #$19; ADDA #$28; DAA  (19 + 28 = 47)
    let cpu = execute(&[0x86, 0x19, 0x8B, 0x28, 0x19]);
    assert_eq!(cpu.regs.a.get(), 0x47);
    assert!(!flag(&cpu, C));
}

#[test]
fn test_adda_overflow_and_half_carry() {
    // LDA #$7F; ADDA #$01
    let cpu = execute(&[0x86, 0x7F, 0x8B, 0x01]);
    assert_eq!(cpu.regs.a.get(), 0x80);
    assert!(flag(&cpu, V), "positive + positive gave negative");
    assert!(flag(&cpu, N));
    assert!(flag(&cpu, H));
    assert!(!flag(&cpu, C));
}

#[test]
fn test_adcb_adds_carry_in() {
    // ORCC #$01; LDB #$10; ADCB #$05
    let cpu = execute(&[0x1A, 0x01, 0xC6, 0x10, 0xC9, 0x05]);
    assert_eq!(cpu.regs.b.get(), 0x16);
    assert!(!flag(&cpu, C));
}

#[test]
fn test_suba_borrow() {
    // LDA #$00; SUBA #$01
    let cpu = execute(&[0x86, 0x00, 0x80, 0x01]);
    assert_eq!(cpu.regs.a.get(), 0xFF);
    assert!(flag(&cpu, C), "borrow sets C");
    assert!(flag(&cpu, N));
    assert!(!flag(&cpu, V));
}

#[test]
fn test_sbca_subtracts_carry_in() {
    // ORCC #$01; LDA #$10; SBCA #$05
    let cpu = execute(&[0x1A, 0x01, 0x86, 0x10, 0x82, 0x05]);
    assert_eq!(cpu.regs.a.get(), 0x0A);
    assert!(!flag(&cpu, C));
}

#[test]
fn test_addd_carry_and_zero() {
    // LDD #$FFFF; ADDD #$0001
    let cpu = execute(&[0xCC, 0xFF, 0xFF, 0xC3, 0x00, 0x01]);
    assert_eq!(cpu.regs.d(), 0x0000);
    assert!(flag(&cpu, Z));
    assert!(flag(&cpu, C));
}

#[test]
fn test_subd_from_memory() {
    // LDD #$1000; SUBD $2000   with $2000 = $0001
    let mut cpu = setup(&[0xCC, 0x10, 0x00, 0xB3, 0x20, 0x00]);
    cpu.memory.write_word(0x2000, 0x0001);
    run(&mut cpu, 6);
    assert_eq!(cpu.regs.d(), 0x0FFF);
    assert!(!flag(&cpu, C));
}

#[test]
fn test_cmpa_sets_flags_without_storing() {
    // LDA #$10; CMPA #$20
    let cpu = execute(&[0x86, 0x10, 0x81, 0x20]);
    assert_eq!(cpu.regs.a.get(), 0x10, "CMP must not store");
    assert!(flag(&cpu, C), "$10 < $20 unsigned");
    assert!(flag(&cpu, N));
}

#[test]
fn test_dec_wraps_to_7f_with_overflow() {
    // ORCC #$01; LDA #$80; DECA
    let cpu = execute(&[0x1A, 0x01, 0x86, 0x80, 0x4A]);
    assert_eq!(cpu.regs.a.get(), 0x7F);
    assert!(flag(&cpu, V));
    assert!(flag(&cpu, C), "DEC leaves carry alone");
}

#[test]
fn test_inc_wraps_to_80_with_overflow() {
    // LDB #$7F; INCB
    let cpu = execute(&[0xC6, 0x7F, 0x5C]);
    assert_eq!(cpu.regs.b.get(), 0x80);
    assert!(flag(&cpu, V));
    assert!(flag(&cpu, N));
}

#[test]
fn test_inc_memory_writes_back() {
    // INC $2000
    let mut cpu = setup(&[0x7C, 0x20, 0x00]);
    cpu.memory.write_byte(0x2000, 0xFF);
    run(&mut cpu, 3);
    assert_eq!(cpu.memory.read_byte(0x2000), 0x00);
    assert!(flag(&cpu, Z));
    assert!(!flag(&cpu, V));
}

#[test]
fn test_mul() {
    // LDA #$05; LDB #$06; MUL
    let cpu = execute(&[0x86, 0x05, 0xC6, 0x06, 0x3D]);
    assert_eq!(cpu.regs.d(), 0x001E);
    assert!(!flag(&cpu, Z));
    assert!(!flag(&cpu, C));
}

#[test]
fn test_mul_carry_is_bit_7_of_product() {
    // LDA #$10; LDB #$08; MUL = $0080
    let cpu = execute(&[0x86, 0x10, 0xC6, 0x08, 0x3D]);
    assert_eq!(cpu.regs.d(), 0x0080);
    assert!(flag(&cpu, C));

    // LDA #$00; MUL = 0
    let cpu = execute(&[0x86, 0x00, 0x3D]);
    assert!(flag(&cpu, Z));
}

#[test]
fn test_neg() {
    // LDA #$01; NEGA
    let cpu = execute(&[0x86, 0x01, 0x40]);
    assert_eq!(cpu.regs.a.get(), 0xFF);
    assert!(flag(&cpu, C));
    assert!(flag(&cpu, N));

    // LDA #$80; NEGA
    let cpu = execute(&[0x86, 0x80, 0x40]);
    assert_eq!(cpu.regs.a.get(), 0x80);
    assert!(flag(&cpu, V), "-(-128) overflows");

    // CLRA; NEGA
    let cpu = execute(&[0x4F, 0x40]);
    assert!(flag(&cpu, Z));
    assert!(!flag(&cpu, C));
}

#[test]
fn test_sex() {
    // LDB #$80; SEX
    let cpu = execute(&[0xC6, 0x80, 0x1D]);
    assert_eq!(cpu.regs.d(), 0xFF80);
    assert!(flag(&cpu, N));

    // LDA #$55; LDB #$7F; SEX
    let cpu = execute(&[0x86, 0x55, 0xC6, 0x7F, 0x1D]);
    assert_eq!(cpu.regs.d(), 0x007F);
    assert!(!flag(&cpu, N));
}

// ============================================================================
// Logic
// ============================================================================

#[test]
fn test_clr_memory() {
    // ORCC #$0F; CLR $2000
    let mut cpu = setup(&[0x1A, 0x0F, 0x7F, 0x20, 0x00]);
    cpu.memory.write_byte(0x2000, 0x99);
    run(&mut cpu, 5);
    assert_eq!(cpu.memory.read_byte(0x2000), 0x00);
    assert!(!flag(&cpu, N));
    assert!(flag(&cpu, Z));
    assert!(!flag(&cpu, V));
    assert!(!flag(&cpu, C));
}

#[test]
fn test_com() {
    // LDA #$F0; COMA
    let cpu = execute(&[0x86, 0xF0, 0x43]);
    assert_eq!(cpu.regs.a.get(), 0x0F);
    assert!(flag(&cpu, C), "COM forces C");
    assert!(!flag(&cpu, V));
}

#[test]
fn test_and_or_eor() {
    // LDA #$F0; ANDA #$3C; ORA #$01; EORA #$FF
    let cpu = execute(&[0x86, 0xF0, 0x84, 0x3C, 0x8A, 0x01, 0x88, 0xFF]);
    assert_eq!(cpu.regs.a.get(), 0xCE);
}

#[test]
fn test_bit_and_tst_do_not_store() {
    // LDB #$80; BITB #$0F
    let cpu = execute(&[0xC6, 0x80, 0xC5, 0x0F]);
    assert_eq!(cpu.regs.b.get(), 0x80);
    assert!(flag(&cpu, Z));

    // TST $2000 with $2000 = $80
    let mut cpu = setup(&[0x7D, 0x20, 0x00]);
    cpu.memory.write_byte(0x2000, 0x80);
    run(&mut cpu, 3);
    assert!(flag(&cpu, N));
    assert_eq!(cpu.memory.read_byte(0x2000), 0x80);
}

#[test]
fn test_andcc_orcc() {
    // ORCC #$50; ANDCC #$AF
    let cpu = execute(&[0x1A, 0x50, 0x1C, 0xAF]);
    assert!(!flag(&cpu, I));
    assert!(!flag(&cpu, F));
    assert!(flag(&cpu, E), "E from reset survives");
}

// ============================================================================
// Shifts and rotates
// ============================================================================

#[test]
fn test_asr_keeps_sign() {
    // LDA #$81; ASRA
    let cpu = execute(&[0x86, 0x81, 0x47]);
    assert_eq!(cpu.regs.a.get(), 0xC0);
    assert!(flag(&cpu, C));
    assert!(flag(&cpu, N));
}

#[test]
fn test_lsr_clears_n() {
    // LDA #$81; LSRA
    let cpu = execute(&[0x86, 0x81, 0x44]);
    assert_eq!(cpu.regs.a.get(), 0x40);
    assert!(flag(&cpu, C));
    assert!(!flag(&cpu, N));
}

#[test]
fn test_lsl_overflow() {
    // LDB #$40; LSLB
    let cpu = execute(&[0xC6, 0x40, 0x58]);
    assert_eq!(cpu.regs.b.get(), 0x80);
    assert!(flag(&cpu, V), "bit 7 changed");
    assert!(!flag(&cpu, C));
}

#[test]
fn test_rotates_go_through_carry() {
    // ORCC #$01; LDA #$80; ROLA
    let cpu = execute(&[0x1A, 0x01, 0x86, 0x80, 0x49]);
    assert_eq!(cpu.regs.a.get(), 0x01);
    assert!(flag(&cpu, C));

    // ORCC #$01; LDA #$01; RORA
    let cpu = execute(&[0x1A, 0x01, 0x86, 0x01, 0x46]);
    assert_eq!(cpu.regs.a.get(), 0x80);
    assert!(flag(&cpu, C));
    assert!(flag(&cpu, N));
}

#[test]
fn test_rol_memory_indexed() {
    // LDX #$2000; ROL 1,X
    let mut cpu = setup(&[0x8E, 0x20, 0x00, 0x69, 0x01]);
    cpu.memory.write_byte(0x2001, 0x81);
    run(&mut cpu, 5);
    assert_eq!(cpu.memory.read_byte(0x2001), 0x02);
    assert!(flag(&cpu, C));
}

// ============================================================================
// Loads, stores and transfers
// ============================================================================

#[test]
fn test_load_store_big_endian() {
    // LDX #$1234; STX $2000; LDA $2001
    let cpu = execute(&[0x8E, 0x12, 0x34, 0xBF, 0x20, 0x00, 0xB6, 0x20, 0x01]);
    assert_eq!(cpu.memory.peek(0x2000), 0x12);
    assert_eq!(cpu.memory.peek(0x2001), 0x34);
    assert_eq!(cpu.regs.a.get(), 0x34);
}

#[test]
fn test_load_clears_v() {
    // ORCC #$02; LDA #$00
    let cpu = execute(&[0x1A, 0x02, 0x86, 0x00]);
    assert!(!flag(&cpu, V));
    assert!(flag(&cpu, Z));
}

#[test]
fn test_direct_page() {
    // LDA #$20; TFR A,DP; LDA <$10
    let mut cpu = setup(&[0x86, 0x20, 0x1F, 0x8B, 0x96, 0x10]);
    cpu.memory.write_byte(0x2010, 0x77);
    run(&mut cpu, 6);
    assert_eq!(cpu.regs.dp.get(), 0x20);
    assert_eq!(cpu.regs.a.get(), 0x77);
}

#[test]
fn test_indexed_post_increment_walks_memory() {
    // LDX #$2000; LDA ,X+; LDB ,X+
    let mut cpu = setup(&[0x8E, 0x20, 0x00, 0xA6, 0x80, 0xE6, 0x80]);
    cpu.memory.load(0x2000, &[0xAA, 0xBB]);
    run(&mut cpu, 7);
    assert_eq!(cpu.regs.d(), 0xAABB);
    assert_eq!(cpu.regs.x.get(), 0x2002);
}

#[test]
fn test_tfr_byte_to_word_pads_with_ff() {
    // LDA #$CD; TFR A,X
    let cpu = execute(&[0x86, 0xCD, 0x1F, 0x81]);
    assert_eq!(cpu.regs.x.get(), 0xFFCD);
}

#[test]
fn test_tfr_word_to_byte_keeps_low_byte() {
    // LDX #$1234; TFR X,B
    let cpu = execute(&[0x8E, 0x12, 0x34, 0x1F, 0x19]);
    assert_eq!(cpu.regs.b.get(), 0x34);
}

#[test]
fn test_exg() {
    // LDD #$1234; EXG A,B
    let cpu = execute(&[0xCC, 0x12, 0x34, 0x1E, 0x89]);
    assert_eq!(cpu.regs.d(), 0x3412);

    // LDX #$1111; LDY #$2222; EXG X,Y
    let cpu = execute(&[0x8E, 0x11, 0x11, 0x10, 0x8E, 0x22, 0x22, 0x1E, 0x12]);
    assert_eq!(cpu.regs.x.get(), 0x2222);
    assert_eq!(cpu.regs.y.get(), 0x1111);
}

#[test]
fn test_tfr_undefined_register() {
    // LDX #$1234; TFR X,6 (no such register)
    let cpu = execute(&[0x8E, 0x12, 0x34, 0x1F, 0x16]);
    assert_eq!(cpu.regs.x.get(), 0x1234);

    // LDX #$1234; TFR 6,X reads zero
    let cpu = execute(&[0x8E, 0x12, 0x34, 0x1F, 0x61]);
    assert_eq!(cpu.regs.x.get(), 0x0000);
}

#[test]
fn test_lea_flag_split() {
    // LDX #$0001; LEAX -1,X
    let cpu = execute(&[0x8E, 0x00, 0x01, 0x30, 0x1F]);
    assert_eq!(cpu.regs.x.get(), 0x0000);
    assert!(flag(&cpu, Z), "LEAX sets Z");

    // LDA #$01; LEAS -1,S with S = 1
    let mut cpu = setup(&[0x86, 0x01, 0x32, 0x7F]);
    cpu.step().unwrap();
    cpu.regs.s.set(1);
    cpu.step().unwrap();
    assert_eq!(cpu.regs.s.get(), 0x0000);
    assert!(!flag(&cpu, Z), "LEAS leaves Z alone");
}

#[test]
fn test_abx_is_unsigned() {
    // LDX #$1000; LDB #$FF; ABX
    let cpu = execute(&[0x8E, 0x10, 0x00, 0xC6, 0xFF, 0x3A]);
    assert_eq!(cpu.regs.x.get(), 0x10FF);
}

// ============================================================================
// Paged opcodes
// ============================================================================

#[test]
fn test_paged_dispatch_consumes_prefix_then_operands() {
    // LDD #$1234; CMPD #$1234
    let mut cpu = setup(&[0xCC, 0x12, 0x34, 0x10, 0x83, 0x12, 0x34]);
    cpu.step().unwrap();
    let before = cpu.cycles();
    let cycles = cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), ORIGIN + 7, "prefix, opcode and a word operand");
    assert!(flag(&cpu, Z), "CMPD compared against $1234");
    assert_eq!(cpu.last_op_address(), ORIGIN + 3, "attributed to the prefix");
    assert_eq!(cycles, 5 + 1, "CMPD # plus the prefix");
    assert_eq!(cpu.cycles() - before, 6);
}

#[test]
fn test_page_3_compare() {
    // LDU #$4000; CMPU #$4001
    let cpu = execute(&[0xCE, 0x40, 0x00, 0x11, 0x83, 0x40, 0x01]);
    assert!(flag(&cpu, C));
    assert!(flag(&cpu, N));
}

#[test]
fn test_ldy_sty_lds() {
    // LDY #$BEEF; STY $2000; LDS #$7000
    let cpu = execute(&[0x10, 0x8E, 0xBE, 0xEF, 0x10, 0xBF, 0x20, 0x00, 0x10, 0xCE, 0x70, 0x00]);
    assert_eq!(cpu.regs.y.get(), 0xBEEF);
    assert_eq!(cpu.memory.peek(0x2000), 0xBE);
    assert_eq!(cpu.regs.s.get(), 0x7000);
}

#[test]
fn test_unknown_opcode_is_fatal() {
    let mut cpu = setup(&[0x01]);
    match cpu.step() {
        Err(CpuError::UnknownOpcode { address, opcode }) => {
            assert_eq!(address, ORIGIN);
            assert_eq!(opcode, 0x01);
        }
        other => panic!("expected unknown opcode, got {other:?}"),
    }

    let mut cpu = setup(&[0x10, 0x00]);
    let err = cpu.step().unwrap_err();
    assert_eq!(err.to_string(), "unknown opcode $1000 at $1000");
}

// ============================================================================
// Branches and subroutines
// ============================================================================

#[test]
fn test_branch_conditions() {
    let mut cpu = setup(&[]);
    let cases = [
        (0x00, 0x27, false), // BEQ
        (Z, 0x27, true),
        (0x00, 0x22, true), // BHI
        (C, 0x22, false),
        (N, 0x2C, false), // BGE
        (N | V, 0x2C, true),
        (Z, 0x2E, false), // BGT
        (N, 0x2D, true),  // BLT
        (Z, 0x2F, true),  // BLE
        (0x00, 0x21, false), // BRN
        (0xFF, 0x20, true),  // BRA
        (C, 0x1025, true),   // LBCS
    ];
    for (cc, opcode, taken) in cases {
        cpu.regs.cc = motorola_6809::ConditionCodes::from_byte(cc);
        assert_eq!(cpu.condition(opcode), taken, "opcode ${opcode:04X} with cc=${cc:02X}");
    }
}

#[test]
fn test_countdown_loop() {
    // LDB #$05; loop: DECB; BNE loop
    let cpu = execute(&[0xC6, 0x05, 0x5A, 0x26, 0xFD]);
    assert_eq!(cpu.regs.b.get(), 0);
    assert_eq!(cpu.cycles(), 2 + 5 * (2 + 3));
}

#[test]
fn test_long_branch() {
    // LBEQ +$0100 with Z set; target at $1104
    let mut cpu = setup(&[0x4F, 0x10, 0x27, 0x01, 0x00]);
    cpu.step().unwrap();
    cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), ORIGIN + 5 + 0x100);
}

#[test]
fn test_jsr_rts() {
    // JSR $1010; ...; $1010: LDA #$42; RTS
    let mut cpu = setup(&[0xBD, 0x10, 0x10]);
    cpu.memory.load(0x1010, &[0x86, 0x42, 0x39]);
    run(&mut cpu, 3);
    assert_eq!(cpu.regs.a.get(), 0x42);
    assert_eq!(cpu.regs.s.get(), STACK);
    assert_eq!(cpu.memory.read_word(STACK - 2), ORIGIN + 3, "return address stacked");
    assert_eq!(cpu.cycles(), 8 + 2 + 5);
}

#[test]
fn test_bsr() {
    // BSR +2; NOP; NOP; RTS  -> returns to the first NOP
    let mut cpu = setup(&[0x8D, 0x02, 0x12, 0x12, 0x39]);
    cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), ORIGIN + 4);
    cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), ORIGIN + 2);
}

#[test]
fn test_jmp_indexed_indirect() {
    // JMP [$2000]
    let mut cpu = setup(&[0x6E, 0x9F, 0x20, 0x00]);
    cpu.memory.write_word(0x2000, 0x3456);
    cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), 0x3456);
}

// ============================================================================
// Stack
// ============================================================================

#[test]
fn test_pshs_puls_order() {
    // LDD #$0102; LDX #$0304; PSHS X,B,A; CLRA; CLRB; LDX #$0000; PULS A,B,X
    let program = [
        0xCC, 0x01, 0x02, 0x8E, 0x03, 0x04, 0x34, 0x16, 0x4F, 0x5F, 0x8E, 0x00, 0x00, 0x35,
        0x16,
    ];
    let mut cpu = setup(&program);
    cpu.test_run(ORIGIN, ORIGIN + 8, 10).unwrap();
    assert_eq!(cpu.regs.s.get(), STACK - 4);
    assert_eq!(cpu.memory.peek(STACK - 4), 0x01, "A pushed last, lowest");
    assert_eq!(cpu.memory.peek(STACK - 3), 0x02, "B");
    assert_eq!(cpu.memory.read_word(STACK - 2), 0x0304, "X pushed first");

    cpu.test_run(ORIGIN + 8, ORIGIN + program.len() as u16, 10).unwrap();
    assert_eq!(cpu.regs.d(), 0x0102);
    assert_eq!(cpu.regs.x.get(), 0x0304);
    assert_eq!(cpu.regs.s.get(), STACK);
}

#[test]
fn test_pshu_pushes_s() {
    // LDU #$6000; PSHU S
    let cpu = execute(&[0xCE, 0x60, 0x00, 0x36, 0x40]);
    assert_eq!(cpu.regs.u.get(), 0x5FFE);
    assert_eq!(cpu.memory.peek(0x5FFE), 0x80);
    assert_eq!(cpu.memory.peek(0x5FFF), 0x00);
}

// ============================================================================
// Interrupts
// ============================================================================

fn with_vector(program: &[u8], vector: u16, handler: &[u8]) -> Mc6809<FlatMemory> {
    let mut cpu = setup(program);
    cpu.memory.write_word(vector, 0x3000);
    cpu.memory.load(0x3000, handler);
    cpu
}

#[test]
fn test_swi_and_rti_round_trip() {
    // SWI; handler: LDA #$99; RTI
    let mut cpu = with_vector(&[0x3F], 0xFFFA, &[0x86, 0x99, 0x3B]);
    cpu.regs.set_d(0x1234);
    cpu.regs.x.set(0x5555);

    cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), 0x3000);
    assert_eq!(cpu.regs.s.get(), STACK - 12, "entire state stacked");
    assert!(flag(&cpu, E) && flag(&cpu, I) && flag(&cpu, F));

    cpu.step().unwrap();
    assert_eq!(cpu.regs.a.get(), 0x99);
    cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), ORIGIN + 1);
    assert_eq!(cpu.regs.d(), 0x1234, "RTI restored A and B");
    assert_eq!(cpu.regs.x.get(), 0x5555);
    assert_eq!(cpu.regs.s.get(), STACK);
    assert!(!flag(&cpu, I), "pre-SWI mask restored");
}

#[test]
fn test_swi2_does_not_mask() {
    let mut cpu = with_vector(&[0x10, 0x3F], 0xFFF4, &[0x3B]);
    cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), 0x3000);
    assert!(!flag(&cpu, I));
    assert!(!flag(&cpu, F));
}

#[test]
fn test_irq_masked_until_cleared() {
    // ORCC #$10; NOP; ANDCC #$EF; NOP
    let mut cpu = with_vector(&[0x1A, 0x10, 0x12, 0x1C, 0xEF, 0x12], 0xFFF8, &[0x3B]);
    cpu.step().unwrap();
    cpu.irq();
    cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), ORIGIN + 3, "masked IRQ is held");
    cpu.step().unwrap();
    assert_eq!(cpu.step().unwrap(), 19, "IRQ entry");
    assert_eq!(cpu.regs.pc.get(), 0x3000);
    assert!(flag(&cpu, I));
    cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), ORIGIN + 5, "RTI back to the NOP");
}

#[test]
fn test_firq_stacks_pc_and_cc_only() {
    // ANDCC #$BF; NOP
    let mut cpu = with_vector(&[0x1C, 0xBF, 0x12], 0xFFF6, &[0x3B]);
    cpu.step().unwrap();
    cpu.firq();
    cpu.step().unwrap();
    assert_eq!(cpu.regs.s.get(), STACK - 3);
    assert!(!flag(&cpu, E));
    assert!(flag(&cpu, F) && flag(&cpu, I));
    cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), ORIGIN + 2);
    assert_eq!(cpu.regs.s.get(), STACK);
}

#[test]
fn test_nmi_ignores_masks() {
    let mut cpu = with_vector(&[0x1A, 0xFF, 0x12], 0xFFFC, &[0x3B]);
    cpu.step().unwrap();
    cpu.nmi();
    cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), 0x3000);
    assert_eq!(cpu.regs.s.get(), STACK - 12);
}

#[test]
fn test_cwai_waits_then_vectors_without_restacking() {
    // CWAI #$EF (clear I)
    let mut cpu = with_vector(&[0x3C, 0xEF, 0x12], 0xFFF8, &[0x3B]);
    cpu.step().unwrap();
    assert_eq!(cpu.state(), State::Waiting);
    assert_eq!(cpu.regs.s.get(), STACK - 12);
    assert_eq!(cpu.step().unwrap(), 1, "idle cycle");
    assert_eq!(cpu.regs.pc.get(), ORIGIN + 2);

    cpu.irq();
    cpu.step().unwrap();
    assert_eq!(cpu.state(), State::Running);
    assert_eq!(cpu.regs.s.get(), STACK - 12, "no second push");
    assert_eq!(cpu.regs.pc.get(), 0x3000);
    cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), ORIGIN + 2);
    assert_eq!(cpu.regs.s.get(), STACK);
}

#[test]
fn test_sync_released_by_masked_interrupt() {
    // ORCC #$10; SYNC; NOP; SYNC; NOP
    let mut cpu = with_vector(&[0x1A, 0x10, 0x13, 0x12, 0x13, 0x12], 0xFFF8, &[0x3B]);
    cpu.step().unwrap();
    cpu.step().unwrap();
    assert_eq!(cpu.state(), State::Syncing);
    cpu.step().unwrap();
    assert_eq!(cpu.regs.pc.get(), ORIGIN + 3, "still waiting");

    cpu.irq();
    assert_eq!(cpu.step().unwrap(), 2, "released straight into the NOP");
    assert_eq!(cpu.state(), State::Running);
    assert_eq!(cpu.regs.pc.get(), ORIGIN + 4, "masked IRQ not taken");

    cpu.step().unwrap();
    assert_eq!(cpu.state(), State::Syncing);
    assert_eq!(cpu.step().unwrap(), 1, "the consumed request does not release it again");
    assert_eq!(cpu.state(), State::Syncing);
    assert_eq!(cpu.regs.pc.get(), ORIGIN + 5);
}
