//! Shifts and rotates. All are 8-bit and work on A, B or memory.

use emu_core::Memory;

use crate::Mc6809;
use crate::flags::{C, N, Z};
use crate::opcodes::{Operands, WriteBack};

impl<M: Memory> Mc6809<M> {
    /// LSL/ASL: V is N xor C of the result.
    pub(crate) fn op_lsl(&mut self, ops: Operands) -> Option<WriteBack> {
        let x = self.unary_operand(ops);
        let r = x << 1;
        self.regs.cc.update_nzvc_8(x, x, r);
        self.unary_result(ops, r)
    }

    /// LSR: N always clears.
    pub(crate) fn op_lsr(&mut self, ops: Operands) -> Option<WriteBack> {
        let x = self.unary_operand(ops);
        let r = x >> 1;
        let cc = &mut self.regs.cc;
        cc.clear(N);
        cc.set_if(Z, r == 0);
        cc.set_if(C, x & 1 != 0);
        self.unary_result(ops, r)
    }

    /// ASR: bit 7 is kept.
    pub(crate) fn op_asr(&mut self, ops: Operands) -> Option<WriteBack> {
        let x = self.unary_operand(ops);
        let r = (x >> 1) | (x & 0x80);
        self.regs.cc.update_nz_8(r);
        self.regs.cc.set_if(C, x & 1 != 0);
        self.unary_result(ops, r)
    }

    /// ROL through carry.
    pub(crate) fn op_rol(&mut self, ops: Operands) -> Option<WriteBack> {
        let x = self.unary_operand(ops);
        let r = (x << 1) | self.regs.cc.carry();
        self.regs.cc.update_nzvc_8(x, x, r);
        self.unary_result(ops, r)
    }

    /// ROR through carry.
    pub(crate) fn op_ror(&mut self, ops: Operands) -> Option<WriteBack> {
        let x = self.unary_operand(ops);
        let r = (x >> 1) | (self.regs.cc.carry() << 7);
        self.regs.cc.update_nz_8(r);
        self.regs.cc.set_if(C, x & 1 != 0);
        self.unary_result(ops, r)
    }
}
