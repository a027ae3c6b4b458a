//! Hardware stacks (S and U) and the PSH/PUL instructions.

use emu_core::Memory;

use crate::Mc6809;
use crate::opcodes::{Operands, WriteBack};
use crate::registers::{Register, RegisterId};

/// Post-byte bits, pushed from the top bit down and pulled from the bottom up.
pub(crate) const PUSH_PC: u8 = 0x80;
pub(crate) const PUSH_OTHER_STACK: u8 = 0x40;
pub(crate) const PUSH_Y: u8 = 0x20;
pub(crate) const PUSH_X: u8 = 0x10;
pub(crate) const PUSH_DP: u8 = 0x08;
pub(crate) const PUSH_B: u8 = 0x04;
pub(crate) const PUSH_A: u8 = 0x02;
pub(crate) const PUSH_CC: u8 = 0x01;

/// The stack pointer that is not `stack`.
const fn other_stack(stack: RegisterId) -> RegisterId {
    match stack {
        RegisterId::U => RegisterId::S,
        _ => RegisterId::U,
    }
}

impl<M: Memory> Mc6809<M> {
    fn stack_pointer(&mut self, stack: RegisterId) -> &mut Register {
        match stack {
            RegisterId::U => &mut self.regs.u,
            _ => &mut self.regs.s,
        }
    }

    // ====================================================================
    // Stack primitives: pre-decrement on push, post-increment on pull
    // ====================================================================

    pub(crate) fn push_byte(&mut self, stack: RegisterId, value: u8) {
        let sp = self.stack_pointer(stack);
        sp.decrement(1);
        let address = sp.get();
        self.memory.write_byte(address, value);
    }

    pub(crate) fn push_word(&mut self, stack: RegisterId, value: u16) {
        let sp = self.stack_pointer(stack);
        sp.decrement(2);
        let address = sp.get();
        self.memory.write_word(address, value);
    }

    pub(crate) fn pull_byte(&mut self, stack: RegisterId) -> u8 {
        let address = self.stack_pointer(stack).get();
        let value = self.memory.read_byte(address);
        self.stack_pointer(stack).increment(1);
        value
    }

    pub(crate) fn pull_word(&mut self, stack: RegisterId) -> u16 {
        let address = self.stack_pointer(stack).get();
        let value = self.memory.read_word(address);
        self.stack_pointer(stack).increment(2);
        value
    }

    /// Push the registers selected by `mask` onto `stack`.
    pub(crate) fn push_registers(&mut self, stack: RegisterId, mask: u8) {
        if mask & PUSH_PC != 0 {
            self.push_word(stack, self.regs.pc.get());
        }
        if mask & PUSH_OTHER_STACK != 0 {
            self.push_word(stack, self.regs.read(other_stack(stack)));
        }
        if mask & PUSH_Y != 0 {
            self.push_word(stack, self.regs.y.get());
        }
        if mask & PUSH_X != 0 {
            self.push_word(stack, self.regs.x.get());
        }
        if mask & PUSH_DP != 0 {
            self.push_byte(stack, self.regs.dp.get() as u8);
        }
        if mask & PUSH_B != 0 {
            self.push_byte(stack, self.regs.b.get() as u8);
        }
        if mask & PUSH_A != 0 {
            self.push_byte(stack, self.regs.a.get() as u8);
        }
        if mask & PUSH_CC != 0 {
            self.push_byte(stack, self.regs.cc.to_byte());
        }
    }

    /// Pull the registers selected by `mask` from `stack`.
    pub(crate) fn pull_registers(&mut self, stack: RegisterId, mask: u8) {
        if mask & PUSH_CC != 0 {
            let cc = self.pull_byte(stack);
            self.regs.write(RegisterId::Cc, cc.into());
        }
        if mask & PUSH_A != 0 {
            let a = self.pull_byte(stack);
            self.regs.a.set(a.into());
        }
        if mask & PUSH_B != 0 {
            let b = self.pull_byte(stack);
            self.regs.b.set(b.into());
        }
        if mask & PUSH_DP != 0 {
            let dp = self.pull_byte(stack);
            self.regs.dp.set(dp.into());
        }
        if mask & PUSH_X != 0 {
            let x = self.pull_word(stack);
            self.regs.x.set(x.into());
        }
        if mask & PUSH_Y != 0 {
            let y = self.pull_word(stack);
            self.regs.y.set(y.into());
        }
        if mask & PUSH_OTHER_STACK != 0 {
            let other = self.pull_word(stack);
            self.regs.write(other_stack(stack), other.into());
        }
        if mask & PUSH_PC != 0 {
            let pc = self.pull_word(stack);
            self.regs.pc.set(pc.into());
        }
    }

    /// PSHS, PSHU
    pub(crate) fn op_push(&mut self, ops: Operands) -> Option<WriteBack> {
        if let Some(stack) = ops.register {
            self.push_registers(stack, ops.m as u8);
        }
        None
    }

    /// PULS, PULU
    pub(crate) fn op_pull(&mut self, ops: Operands) -> Option<WriteBack> {
        if let Some(stack) = ops.register {
            self.pull_registers(stack, ops.m as u8);
        }
        None
    }
}
