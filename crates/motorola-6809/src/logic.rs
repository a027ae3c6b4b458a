//! Logical and flag-register instructions.

use emu_core::Memory;

use crate::Mc6809;
use crate::flags::ConditionCodes;
use crate::opcodes::{Operands, WriteBack};

impl<M: Memory> Mc6809<M> {
    fn logic(&mut self, ops: Operands, f: fn(u16, u16) -> u16, store: bool) {
        let r = f(self.target_read(ops), ops.m);
        self.regs.cc.update_nz0_8(i32::from(r));
        if store {
            self.target_write(ops, u32::from(r));
        }
    }

    /// ANDA, ANDB
    pub(crate) fn op_and(&mut self, ops: Operands) -> Option<WriteBack> {
        self.logic(ops, |a, m| a & m, true);
        None
    }

    /// ORA, ORB
    pub(crate) fn op_or(&mut self, ops: Operands) -> Option<WriteBack> {
        self.logic(ops, |a, m| a | m, true);
        None
    }

    /// EORA, EORB
    pub(crate) fn op_eor(&mut self, ops: Operands) -> Option<WriteBack> {
        self.logic(ops, |a, m| a ^ m, true);
        None
    }

    /// BITA, BITB: AND for flags only.
    pub(crate) fn op_bit(&mut self, ops: Operands) -> Option<WriteBack> {
        self.logic(ops, |a, m| a & m, false);
        None
    }

    pub(crate) fn op_andcc(&mut self, ops: Operands) -> Option<WriteBack> {
        self.regs.cc = ConditionCodes::from_byte(self.regs.cc.to_byte() & ops.m as u8);
        None
    }

    pub(crate) fn op_orcc(&mut self, ops: Operands) -> Option<WriteBack> {
        self.regs.cc = ConditionCodes::from_byte(self.regs.cc.to_byte() | ops.m as u8);
        None
    }

    /// COM: one's complement, V=0, C=1.
    pub(crate) fn op_com(&mut self, ops: Operands) -> Option<WriteBack> {
        let r = !self.unary_operand(ops) & 0xFF;
        self.regs.cc.update_nz01_8(r);
        self.unary_result(ops, r)
    }

    /// CLR: always N=0 Z=1 V=0 C=0.
    pub(crate) fn op_clr(&mut self, ops: Operands) -> Option<WriteBack> {
        self.regs.cc.update_0100();
        self.unary_result(ops, 0)
    }

    /// TST: N and Z from the operand, V cleared, nothing written.
    pub(crate) fn op_tst(&mut self, ops: Operands) -> Option<WriteBack> {
        let x = self.unary_operand(ops);
        self.regs.cc.update_nz0_8(x);
        None
    }
}
