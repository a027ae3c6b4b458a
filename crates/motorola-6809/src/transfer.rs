//! Loads, stores and register-to-register transfers.

use emu_core::Memory;

use crate::Mc6809;
use crate::flags::Z;
use crate::opcodes::{Operands, WriteBack};
use crate::registers::{RegisterId, convert_width};

impl<M: Memory> Mc6809<M> {
    // ====================================================================
    // Loads and stores
    // ====================================================================

    /// LDA, LDB
    pub(crate) fn op_ld8(&mut self, ops: Operands) -> Option<WriteBack> {
        self.regs.cc.update_nz0_8(i32::from(ops.m));
        self.target_write(ops, ops.m.into());
        None
    }

    /// LDD, LDX, LDY, LDU, LDS
    pub(crate) fn op_ld16(&mut self, ops: Operands) -> Option<WriteBack> {
        self.regs.cc.update_nz0_16(i32::from(ops.m));
        self.target_write(ops, ops.m.into());
        None
    }

    /// STA, STB
    pub(crate) fn op_st8(&mut self, ops: Operands) -> Option<WriteBack> {
        let value = self.target_read(ops);
        self.regs.cc.update_nz0_8(i32::from(value));
        Some(WriteBack::Byte(ops.ea, value as u8))
    }

    /// STD, STX, STY, STU, STS
    pub(crate) fn op_st16(&mut self, ops: Operands) -> Option<WriteBack> {
        let value = self.target_read(ops);
        self.regs.cc.update_nz0_16(i32::from(value));
        Some(WriteBack::Word(ops.ea, value))
    }

    // ====================================================================
    // Address arithmetic
    // ====================================================================

    /// LEAX, LEAY: Z reflects the new address.
    pub(crate) fn op_lea_xy(&mut self, ops: Operands) -> Option<WriteBack> {
        self.target_write(ops, ops.ea.into());
        self.regs.cc.set_if(Z, ops.ea == 0);
        None
    }

    /// LEAS, LEAU: no flags.
    pub(crate) fn op_lea_su(&mut self, ops: Operands) -> Option<WriteBack> {
        self.target_write(ops, ops.ea.into());
        None
    }

    /// ABX: X += B, unsigned, no flags.
    pub(crate) fn op_abx(&mut self, _ops: Operands) -> Option<WriteBack> {
        let b = self.regs.b.get();
        self.regs.x.increment(b.into());
        None
    }

    pub(crate) fn op_nop(&mut self, _ops: Operands) -> Option<WriteBack> {
        None
    }

    // ====================================================================
    // TFR / EXG
    // ====================================================================

    /// TFR r1,r2 with the post-byte split into source and destination nibbles.
    pub(crate) fn op_tfr(&mut self, ops: Operands) -> Option<WriteBack> {
        let src = RegisterId::from_selector((ops.m >> 4) as u8);
        let dst = RegisterId::from_selector(ops.m as u8);
        let value = convert_width(self.regs.read(src), src.width(), dst.width());
        self.regs.write(dst, value);
        None
    }

    /// EXG r1,r2
    pub(crate) fn op_exg(&mut self, ops: Operands) -> Option<WriteBack> {
        let r1 = RegisterId::from_selector((ops.m >> 4) as u8);
        let r2 = RegisterId::from_selector(ops.m as u8);
        let (v1, v2) = (self.regs.read(r1), self.regs.read(r2));
        self.regs.write(r1, convert_width(v2, r2.width(), r1.width()));
        self.regs.write(r2, convert_width(v1, r1.width(), r2.width()));
        None
    }
}
