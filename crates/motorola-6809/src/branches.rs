//! Branches, jumps and subroutine calls.

use emu_core::Memory;

use crate::Mc6809;
use crate::flags::{C, N, V, Z};
use crate::opcodes::{Operands, WriteBack};
use crate::registers::RegisterId;

impl<M: Memory> Mc6809<M> {
    /// Evaluate the branch condition encoded in an opcode's low nibble.
    ///
    /// Short branches (0x20-0x2F) and long ones (0x1020-0x102F) share the
    /// encoding.
    #[must_use]
    pub fn condition(&self, opcode: u16) -> bool {
        let cc = self.regs.cc;
        let (n, z, v, c) = (cc.is_set(N), cc.is_set(Z), cc.is_set(V), cc.is_set(C));
        match opcode & 0x0F {
            0x0 => true,             // BRA
            0x1 => false,            // BRN
            0x2 => !c && !z,         // BHI
            0x3 => c || z,           // BLS
            0x4 => !c,               // BCC/BHS
            0x5 => c,                // BCS/BLO
            0x6 => !z,               // BNE
            0x7 => z,                // BEQ
            0x8 => !v,               // BVC
            0x9 => v,                // BVS
            0xA => !n,               // BPL
            0xB => n,                // BMI
            0xC => n == v,           // BGE
            0xD => n != v,           // BLT
            0xE => !z && n == v,     // BGT
            _ => z || n != v,        // BLE
        }
    }

    pub(crate) fn op_branch(&mut self, ops: Operands) -> Option<WriteBack> {
        if self.condition(ops.opcode) {
            self.regs.pc.set(ops.ea.into());
        }
        None
    }

    /// JMP, LBRA
    pub(crate) fn op_jmp(&mut self, ops: Operands) -> Option<WriteBack> {
        self.regs.pc.set(ops.ea.into());
        None
    }

    /// JSR, BSR, LBSR
    pub(crate) fn op_jsr(&mut self, ops: Operands) -> Option<WriteBack> {
        self.push_word(RegisterId::S, self.regs.pc.get());
        self.regs.pc.set(ops.ea.into());
        None
    }

    pub(crate) fn op_rts(&mut self, _ops: Operands) -> Option<WriteBack> {
        let pc = self.pull_word(RegisterId::S);
        self.regs.pc.set(pc.into());
        None
    }
}
