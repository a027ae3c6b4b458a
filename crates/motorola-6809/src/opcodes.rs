//! Opcode table.
//!
//! Built once per CPU by explicit registration. Each entry carries the
//! fixed cycle cost, how the dispatcher resolves the operand before the
//! handler runs, and the handler itself. One handler usually serves every
//! addressing-mode variant of an instruction, and often both accumulators.

use emu_core::Memory;

use crate::Mc6809;
use crate::registers::{RegisterId, Width};

/// Where an instruction's operand comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Inherent,
    /// Operand bytes follow the opcode.
    Immediate,
    /// DP supplies the high byte of the address, the next byte the low.
    Direct,
    /// Post-byte driven: register plus offset, optional indirection.
    Indexed,
    /// 16-bit absolute address.
    Extended,
    /// 8-bit signed branch offset.
    Relative,
    /// 16-bit branch offset.
    LongRelative,
}

/// What the dispatcher hands the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Nothing beyond the register, if any.
    Inherent,
    /// The operand value (immediate, or read at the effective address).
    Read(Width),
    /// Only the effective address.
    Address,
    /// Effective address and the byte stored there; the handler returns the
    /// new byte for write-back.
    Modify,
}

/// Operands resolved by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operands {
    /// The (possibly paged) opcode being executed.
    pub opcode: u16,
    /// Effective address, 0 when the mode has none.
    pub ea: u16,
    /// Operand value, 0 when not read.
    pub m: u16,
    /// Register the entry operates on. `None` for memory-only forms and
    /// instructions that name no register.
    pub register: Option<RegisterId>,
}

/// Memory update a handler asks the dispatcher to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteBack {
    Byte(u16, u8),
    Word(u16, u16),
}

pub type ExecFn<M> = fn(&mut Mc6809<M>, Operands) -> Option<WriteBack>;

/// How an opcode is executed.
pub enum Handler<M: Memory> {
    /// Page prefix: fetch another byte and dispatch the combined opcode.
    Page,
    Exec(ExecFn<M>),
}

impl<M: Memory> Clone for Handler<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Memory> Copy for Handler<M> {}

/// One row of the table.
pub struct OpcodeEntry<M: Memory> {
    pub mnemonic: &'static str,
    pub cycles: u8,
    pub mode: AddressingMode,
    pub access: Access,
    pub register: Option<RegisterId>,
    pub(crate) handler: Handler<M>,
}

impl<M: Memory> Clone for OpcodeEntry<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Memory> Copy for OpcodeEntry<M> {}

impl<M: Memory> OpcodeEntry<M> {
    /// True for the 0x10/0x11 page prefixes.
    #[must_use]
    pub fn is_page_prefix(&self) -> bool {
        matches!(self.handler, Handler::Page)
    }
}

const INH: AddressingMode = AddressingMode::Inherent;
const IMM: AddressingMode = AddressingMode::Immediate;
const DIR: AddressingMode = AddressingMode::Direct;
const IDX: AddressingMode = AddressingMode::Indexed;
const EXT: AddressingMode = AddressingMode::Extended;
const REL: AddressingMode = AddressingMode::Relative;
const LREL: AddressingMode = AddressingMode::LongRelative;

const NONE: Access = Access::Inherent;
const BYTE: Access = Access::Read(Width::Byte);
const WORD: Access = Access::Read(Width::Word);
const ADDR: Access = Access::Address;
const MODIFY: Access = Access::Modify;

use RegisterId::{A, B, Cc, D, S, U, X, Y};

/// Entry that operates on memory, or on no register at all.
const NO_REGISTER: Option<RegisterId> = None;

const SHORT_BRANCHES: [&str; 16] = [
    "BRA", "BRN", "BHI", "BLS", "BCC", "BCS", "BNE", "BEQ", "BVC", "BVS", "BPL", "BMI", "BGE",
    "BLT", "BGT", "BLE",
];

const LONG_BRANCHES: [&str; 16] = [
    "LBRA", "LBRN", "LBHI", "LBLS", "LBCC", "LBCS", "LBNE", "LBEQ", "LBVC", "LBVS", "LBPL", "LBMI",
    "LBGE", "LBLT", "LBGT", "LBLE",
];

/// Page 0, page 2 (0x10xx) and page 3 (0x11xx).
const PAGES: [u16; 3] = [0x00, 0x10, 0x11];

/// Opcode number to entry.
pub struct OpcodeTable<M: Memory> {
    pages: [Vec<Option<OpcodeEntry<M>>>; 3],
}

impl<M: Memory> Default for OpcodeTable<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Memory> OpcodeTable<M> {
    /// Look up a page-0 byte or a paged `prefix << 8 | byte` opcode.
    #[must_use]
    pub fn lookup(&self, opcode: u16) -> Option<&OpcodeEntry<M>> {
        let (page, index) = Self::slot(opcode)?;
        self.pages[page][index].as_ref()
    }

    /// Number of registered opcodes, prefixes included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.iter().flatten().filter(|e| e.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registered opcode numbers in ascending order.
    pub fn opcodes(&self) -> impl Iterator<Item = u16> + '_ {
        PAGES.iter().zip(&self.pages).flat_map(|(&prefix, page)| {
            page.iter()
                .enumerate()
                .filter(|(_, e)| e.is_some())
                .map(move |(i, _)| (prefix << 8) | i as u16)
        })
    }

    fn slot(opcode: u16) -> Option<(usize, usize)> {
        let page = PAGES.iter().position(|&p| p == opcode >> 8)?;
        Some((page, usize::from(opcode & 0xFF)))
    }

    fn insert(&mut self, opcode: u16, entry: OpcodeEntry<M>) {
        if let Some((page, index)) = Self::slot(opcode) {
            debug_assert!(
                self.pages[page][index].is_none(),
                "opcode ${opcode:04X} registered twice"
            );
            self.pages[page][index] = Some(entry);
        }
    }

    /// Register one instruction in several addressing modes.
    fn add(
        &mut self,
        mnemonic: &'static str,
        register: impl Into<Option<RegisterId>>,
        access: Access,
        exec: ExecFn<M>,
        variants: &[(u16, AddressingMode, u8)],
    ) {
        let register = register.into();
        for &(opcode, mode, cycles) in variants {
            self.insert(
                opcode,
                OpcodeEntry {
                    mnemonic,
                    cycles,
                    mode,
                    access,
                    register,
                    handler: Handler::Exec(exec),
                },
            );
        }
    }

    /// Register a read-modify-write unary op: memory forms plus the A and B
    /// inherent forms at `base + 0x40` and `base + 0x50`.
    fn add_unary(&mut self, mnemonic: &'static str, base: u16, exec: ExecFn<M>) {
        self.add(
            mnemonic,
            NO_REGISTER,
            MODIFY,
            exec,
            &[(base, DIR, 6), (base + 0x60, IDX, 6), (base + 0x70, EXT, 7)],
        );
        self.add(mnemonic, A, NONE, exec, &[(base + 0x40, INH, 2)]);
        self.add(mnemonic, B, NONE, exec, &[(base + 0x50, INH, 2)]);
    }

    /// Register an 8-bit accumulator op on A (`0x80 + low`) and B
    /// (`0xC0 + low`) in all four modes.
    fn add_accumulator(&mut self, mnemonic: &'static str, low: u16, exec: ExecFn<M>) {
        for (base, register) in [(0x80, A), (0xC0, B)] {
            let op = base + low;
            self.add(
                mnemonic,
                register,
                BYTE,
                exec,
                &[(op, IMM, 2), (op + 0x10, DIR, 4), (op + 0x20, IDX, 4), (op + 0x30, EXT, 5)],
            );
        }
    }

    /// Register a 16-bit op whose immediate form costs `imm` cycles; the
    /// direct, indexed and extended forms cost `imm + 2`, `+ 2`, `+ 3`.
    fn add_word(
        &mut self,
        mnemonic: &'static str,
        register: RegisterId,
        access: Access,
        exec: ExecFn<M>,
        op: u16,
        imm: u8,
    ) {
        let mut variants = vec![
            (op + 0x10, DIR, imm + 2),
            (op + 0x20, IDX, imm + 2),
            (op + 0x30, EXT, imm + 3),
        ];
        if access != ADDR {
            variants.push((op, IMM, imm));
        }
        self.add(mnemonic, register, access, exec, &variants);
    }

    fn add_page(&mut self, prefix: u16) {
        self.insert(
            prefix,
            OpcodeEntry {
                mnemonic: "PAGE",
                cycles: 1,
                mode: INH,
                access: NONE,
                register: NO_REGISTER,
                handler: Handler::Page,
            },
        );
    }

    /// Build the complete 6809 table.
    #[must_use]
    pub fn new() -> Self {
        let mut t = Self {
            pages: std::array::from_fn(|_| (0..256).map(|_| None).collect()),
        };

        t.add_page(0x10);
        t.add_page(0x11);

        // Read-modify-write unary ops
        t.add_unary("NEG", 0x00, Mc6809::op_neg);
        t.add_unary("COM", 0x03, Mc6809::op_com);
        t.add_unary("LSR", 0x04, Mc6809::op_lsr);
        t.add_unary("ROR", 0x06, Mc6809::op_ror);
        t.add_unary("ASR", 0x07, Mc6809::op_asr);
        t.add_unary("LSL", 0x08, Mc6809::op_lsl);
        t.add_unary("ROL", 0x09, Mc6809::op_rol);
        t.add_unary("DEC", 0x0A, Mc6809::op_dec);
        t.add_unary("INC", 0x0C, Mc6809::op_inc);
        t.add_unary("CLR", 0x0F, Mc6809::op_clr);
        // TST only reads memory.
        t.add("TST", NO_REGISTER, BYTE, Mc6809::op_tst, &[(0x0D, DIR, 6), (0x6D, IDX, 6), (0x7D, EXT, 7)]);
        t.add("TST", A, NONE, Mc6809::op_tst, &[(0x4D, INH, 2)]);
        t.add("TST", B, NONE, Mc6809::op_tst, &[(0x5D, INH, 2)]);

        t.add("JMP", NO_REGISTER, ADDR, Mc6809::op_jmp, &[(0x0E, DIR, 3), (0x6E, IDX, 3), (0x7E, EXT, 3)]);
        t.add("JSR", NO_REGISTER, ADDR, Mc6809::op_jsr, &[(0x9D, DIR, 7), (0xAD, IDX, 7), (0xBD, EXT, 8)]);
        t.add("BSR", NO_REGISTER, ADDR, Mc6809::op_jsr, &[(0x8D, REL, 7)]);
        t.add("LBSR", NO_REGISTER, ADDR, Mc6809::op_jsr, &[(0x17, LREL, 9)]);
        t.add("LBRA", NO_REGISTER, ADDR, Mc6809::op_jmp, &[(0x16, LREL, 5)]);
        t.add("RTS", NO_REGISTER, NONE, Mc6809::op_rts, &[(0x39, INH, 5)]);

        // Inherent misc
        t.add("NOP", NO_REGISTER, NONE, Mc6809::op_nop, &[(0x12, INH, 2)]);
        t.add("SYNC", NO_REGISTER, NONE, Mc6809::op_sync, &[(0x13, INH, 2)]);
        t.add("DAA", A, NONE, Mc6809::op_daa, &[(0x19, INH, 2)]);
        t.add("ORCC", Cc, BYTE, Mc6809::op_orcc, &[(0x1A, IMM, 3)]);
        t.add("ANDCC", Cc, BYTE, Mc6809::op_andcc, &[(0x1C, IMM, 3)]);
        t.add("SEX", D, NONE, Mc6809::op_sex, &[(0x1D, INH, 2)]);
        t.add("EXG", NO_REGISTER, BYTE, Mc6809::op_exg, &[(0x1E, IMM, 8)]);
        t.add("TFR", NO_REGISTER, BYTE, Mc6809::op_tfr, &[(0x1F, IMM, 7)]);
        t.add("ABX", X, NONE, Mc6809::op_abx, &[(0x3A, INH, 3)]);
        t.add("MUL", D, NONE, Mc6809::op_mul, &[(0x3D, INH, 11)]);

        // Branches: the condition comes from the opcode's low nibble.
        for (low, (short, long)) in (0..).zip(SHORT_BRANCHES.into_iter().zip(LONG_BRANCHES)) {
            t.add(short, NO_REGISTER, ADDR, Mc6809::op_branch, &[(0x20 + low, REL, 3)]);
            if low != 0 {
                t.add(long, NO_REGISTER, ADDR, Mc6809::op_branch, &[(0x1020 + low, LREL, 5)]);
            }
        }

        // Effective address
        t.add("LEAX", X, ADDR, Mc6809::op_lea_xy, &[(0x30, IDX, 4)]);
        t.add("LEAY", Y, ADDR, Mc6809::op_lea_xy, &[(0x31, IDX, 4)]);
        t.add("LEAS", S, ADDR, Mc6809::op_lea_su, &[(0x32, IDX, 4)]);
        t.add("LEAU", U, ADDR, Mc6809::op_lea_su, &[(0x33, IDX, 4)]);

        // Stack
        t.add("PSHS", S, BYTE, Mc6809::op_push, &[(0x34, IMM, 5)]);
        t.add("PULS", S, BYTE, Mc6809::op_pull, &[(0x35, IMM, 5)]);
        t.add("PSHU", U, BYTE, Mc6809::op_push, &[(0x36, IMM, 5)]);
        t.add("PULU", U, BYTE, Mc6809::op_pull, &[(0x37, IMM, 5)]);

        // Interrupts
        t.add("RTI", NO_REGISTER, NONE, Mc6809::op_rti, &[(0x3B, INH, 6)]);
        t.add("CWAI", Cc, BYTE, Mc6809::op_cwai, &[(0x3C, IMM, 21)]);
        t.add("SWI", NO_REGISTER, NONE, Mc6809::op_swi, &[(0x3F, INH, 19)]);
        t.add("SWI2", NO_REGISTER, NONE, Mc6809::op_swi, &[(0x103F, INH, 20)]);
        t.add("SWI3", NO_REGISTER, NONE, Mc6809::op_swi, &[(0x113F, INH, 20)]);

        // 8-bit accumulator ops
        t.add_accumulator("SUB", 0x0, Mc6809::op_sub8);
        t.add_accumulator("CMP", 0x1, Mc6809::op_cmp8);
        t.add_accumulator("SBC", 0x2, Mc6809::op_sbc8);
        t.add_accumulator("AND", 0x4, Mc6809::op_and);
        t.add_accumulator("BIT", 0x5, Mc6809::op_bit);
        t.add_accumulator("LD", 0x6, Mc6809::op_ld8);
        t.add_accumulator("EOR", 0x8, Mc6809::op_eor);
        t.add_accumulator("ADC", 0x9, Mc6809::op_adc8);
        t.add_accumulator("OR", 0xA, Mc6809::op_or);
        t.add_accumulator("ADD", 0xB, Mc6809::op_add8);
        t.add("STA", A, ADDR, Mc6809::op_st8, &[(0x97, DIR, 4), (0xA7, IDX, 4), (0xB7, EXT, 5)]);
        t.add("STB", B, ADDR, Mc6809::op_st8, &[(0xD7, DIR, 4), (0xE7, IDX, 4), (0xF7, EXT, 5)]);

        // 16-bit ops
        t.add_word("SUBD", D, WORD, Mc6809::op_sub16, 0x83, 4);
        t.add_word("ADDD", D, WORD, Mc6809::op_add16, 0xC3, 4);
        t.add_word("CMPX", X, WORD, Mc6809::op_cmp16, 0x8C, 4);
        t.add_word("CMPD", D, WORD, Mc6809::op_cmp16, 0x1083, 5);
        t.add_word("CMPY", Y, WORD, Mc6809::op_cmp16, 0x108C, 5);
        t.add_word("CMPU", U, WORD, Mc6809::op_cmp16, 0x1183, 5);
        t.add_word("CMPS", S, WORD, Mc6809::op_cmp16, 0x118C, 5);
        t.add_word("LDX", X, WORD, Mc6809::op_ld16, 0x8E, 3);
        t.add_word("LDD", D, WORD, Mc6809::op_ld16, 0xCC, 3);
        t.add_word("LDU", U, WORD, Mc6809::op_ld16, 0xCE, 3);
        t.add_word("LDY", Y, WORD, Mc6809::op_ld16, 0x108E, 4);
        t.add_word("LDS", S, WORD, Mc6809::op_ld16, 0x10CE, 4);
        t.add_word("STX", X, ADDR, Mc6809::op_st16, 0x8F, 3);
        t.add_word("STD", D, ADDR, Mc6809::op_st16, 0xCD, 3);
        t.add_word("STU", U, ADDR, Mc6809::op_st16, 0xCF, 3);
        t.add_word("STY", Y, ADDR, Mc6809::op_st16, 0x108F, 4);
        t.add_word("STS", S, ADDR, Mc6809::op_st16, 0x10CF, 4);

        t
    }
}
