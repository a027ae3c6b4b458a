//! Arithmetic instructions.

use emu_core::Memory;

use crate::Mc6809;
use crate::flags::{C, H, V, Z};
use crate::opcodes::{Operands, WriteBack};

impl<M: Memory> Mc6809<M> {
    fn accumulator(&self, ops: Operands) -> i32 {
        i32::from(self.target_read(ops))
    }

    // ====================================================================
    // Add / subtract
    // ====================================================================

    /// ADDA, ADDB
    pub(crate) fn op_add8(&mut self, ops: Operands) -> Option<WriteBack> {
        let (a, m) = (self.accumulator(ops), i32::from(ops.m));
        let r = a + m;
        self.regs.cc.update_hnzvc_8(a, m, r);
        self.target_write(ops, r as u32);
        None
    }

    /// ADCA, ADCB
    pub(crate) fn op_adc8(&mut self, ops: Operands) -> Option<WriteBack> {
        let (a, m) = (self.accumulator(ops), i32::from(ops.m));
        let r = a + m + self.regs.cc.carry();
        self.regs.cc.update_hnzvc_8(a, m, r);
        self.target_write(ops, r as u32);
        None
    }

    /// ADDD
    pub(crate) fn op_add16(&mut self, ops: Operands) -> Option<WriteBack> {
        let (a, m) = (self.accumulator(ops), i32::from(ops.m));
        let r = a + m;
        self.regs.cc.update_nzvc_16(a, m, r);
        self.target_write(ops, r as u32);
        None
    }

    /// SUBA, SUBB
    pub(crate) fn op_sub8(&mut self, ops: Operands) -> Option<WriteBack> {
        let (a, m) = (self.accumulator(ops), i32::from(ops.m));
        let r = a - m;
        self.regs.cc.update_nzvc_8(a, m, r);
        self.target_write(ops, r as u32);
        None
    }

    /// SBCA, SBCB
    pub(crate) fn op_sbc8(&mut self, ops: Operands) -> Option<WriteBack> {
        let (a, m) = (self.accumulator(ops), i32::from(ops.m));
        let r = a - m - self.regs.cc.carry();
        self.regs.cc.update_nzvc_8(a, m, r);
        self.target_write(ops, r as u32);
        None
    }

    /// SUBD
    pub(crate) fn op_sub16(&mut self, ops: Operands) -> Option<WriteBack> {
        let (a, m) = (self.accumulator(ops), i32::from(ops.m));
        let r = a - m;
        self.regs.cc.update_nzvc_16(a, m, r);
        self.target_write(ops, r as u32);
        None
    }

    /// CMPA, CMPB
    pub(crate) fn op_cmp8(&mut self, ops: Operands) -> Option<WriteBack> {
        let (a, m) = (self.accumulator(ops), i32::from(ops.m));
        self.regs.cc.update_nzvc_8(a, m, a - m);
        None
    }

    /// CMPD, CMPX, CMPY, CMPU, CMPS
    pub(crate) fn op_cmp16(&mut self, ops: Operands) -> Option<WriteBack> {
        let (a, m) = (self.accumulator(ops), i32::from(ops.m));
        self.regs.cc.update_nzvc_16(a, m, a - m);
        None
    }

    // ====================================================================
    // Unary
    // ====================================================================

    /// NEG: `0 - x`, flagged like a subtraction.
    pub(crate) fn op_neg(&mut self, ops: Operands) -> Option<WriteBack> {
        let x = self.unary_operand(ops);
        let r = -x;
        self.regs.cc.update_nzvc_8(0, x, r);
        self.unary_result(ops, r)
    }

    /// DEC: C untouched, V only on $80 -> $7F.
    pub(crate) fn op_dec(&mut self, ops: Operands) -> Option<WriteBack> {
        let r = self.unary_operand(ops) - 1;
        self.regs.cc.update_nz0_8(r);
        self.regs.cc.set_if(V, r == 0x7F);
        self.unary_result(ops, r)
    }

    /// INC: C untouched, V only on $7F -> $80.
    pub(crate) fn op_inc(&mut self, ops: Operands) -> Option<WriteBack> {
        let r = self.unary_operand(ops) + 1;
        self.regs.cc.update_nz0_8(r);
        self.regs.cc.set_if(V, r == 0x80);
        self.unary_result(ops, r)
    }

    // ====================================================================
    // Accumulator specials
    // ====================================================================

    /// DAA: BCD-correct A after an addition. V is left alone.
    pub(crate) fn op_daa(&mut self, _ops: Operands) -> Option<WriteBack> {
        let a = i32::from(self.regs.a.get());
        let cc = self.regs.cc;
        let low = a & 0x0F;
        let high = a & 0xF0;

        let mut correction = 0;
        if low > 9 || cc.is_set(H) {
            correction |= 0x06;
        }
        if (high > 0x80 && low > 9) || high > 0x90 || cc.is_set(C) {
            correction |= 0x60;
        }

        let r = a + correction;
        self.regs.a.set(r as u32);
        self.regs.cc.update_nzc_8(r);
        None
    }

    /// MUL: D = A * B unsigned. C mirrors bit 7 of the product.
    pub(crate) fn op_mul(&mut self, _ops: Operands) -> Option<WriteBack> {
        let r = u32::from(self.regs.a.get()) * u32::from(self.regs.b.get());
        self.regs.set_d(r);
        self.regs.cc.set_if(Z, r == 0);
        self.regs.cc.set_if(C, r & 0x80 != 0);
        None
    }

    /// SEX: sign-extend B into A.
    pub(crate) fn op_sex(&mut self, _ops: Operands) -> Option<WriteBack> {
        let high = if self.regs.b.get() & 0x80 != 0 { 0xFF } else { 0x00 };
        self.regs.a.set(high);
        self.regs.cc.update_nz_16(i32::from(self.regs.d()));
        None
    }
}
