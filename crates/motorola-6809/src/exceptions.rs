//! Software interrupts, hardware interrupt delivery, RTI, CWAI and SYNC.

use emu_core::{Memory, Ticks};

use crate::Mc6809;
use crate::cpu::{Pending, State};
use crate::flags::{ConditionCodes, E, F, I};
use crate::opcodes::{Operands, WriteBack};
use crate::registers::RegisterId;
use crate::stack::{PUSH_CC, PUSH_PC};

/// Every register, PC down to CC.
const ENTIRE_STATE: u8 = 0xFF;

/// What FIRQ stacks.
const FAST_STATE: u8 = PUSH_PC | PUSH_CC;

/// Entire state minus CC, which RTI pulls first on its own.
const RTI_REST: u8 = ENTIRE_STATE & !PUSH_CC;

const NMI_CYCLES: u64 = 19;
const IRQ_CYCLES: u64 = 19;
const FIRQ_CYCLES: u64 = 10;

impl<M: Memory> Mc6809<M> {
    // ====================================================================
    // Interrupt lines
    // ====================================================================

    /// Latch a non-maskable interrupt.
    pub fn nmi(&mut self) {
        self.pending.nmi = true;
    }

    /// Latch a fast interrupt request. Held until F is clear.
    pub fn firq(&mut self) {
        self.pending.firq = true;
    }

    /// Latch an interrupt request. Held until I is clear.
    pub fn irq(&mut self) {
        self.pending.irq = true;
    }

    fn vector_to(&mut self, vector: u16) {
        let pc = self.memory.read_word(vector);
        self.regs.pc.set(pc.into());
    }

    fn push_entire_state(&mut self) {
        self.regs.cc.set(E);
        self.push_registers(RegisterId::S, ENTIRE_STATE);
    }

    /// Act on latched interrupts at an instruction boundary.
    ///
    /// Priority is NMI, FIRQ, IRQ. Returns true if one was taken. Any
    /// asserted line releases SYNC, even a masked one; in that case
    /// execution simply continues with the next instruction and the masked
    /// request is consumed, so a later SYNC waits for a new one.
    pub(crate) fn service_interrupts(&mut self) -> bool {
        let pending = self.pending;
        if !pending.any() {
            return false;
        }
        let released_sync = self.state == State::Syncing;
        if released_sync {
            self.state = State::Running;
        }

        let cc = self.regs.cc;
        let vectors = self.config.vectors;
        if pending.nmi {
            self.pending.nmi = false;
            self.enter_interrupt(vectors.nmi, true, I | F, NMI_CYCLES);
        } else if pending.firq && !cc.is_set(F) {
            self.pending.firq = false;
            self.enter_interrupt(vectors.firq, false, I | F, FIRQ_CYCLES);
        } else if pending.irq && !cc.is_set(I) {
            self.pending.irq = false;
            self.enter_interrupt(vectors.irq, true, I, IRQ_CYCLES);
        } else {
            if released_sync {
                log::debug!("SYNC released by a masked interrupt at ${:04X}", self.regs.pc.get());
                self.pending = Pending::default();
            }
            return false;
        }
        true
    }

    fn enter_interrupt(&mut self, vector: u16, entire: bool, mask: u8, cycles: u64) {
        if self.state == State::Waiting {
            // CWAI stacked everything already.
            self.state = State::Running;
        } else if entire {
            self.push_entire_state();
        } else {
            self.regs.cc.clear(E);
            self.push_registers(RegisterId::S, FAST_STATE);
        }
        log::debug!("interrupt via ${vector:04X} from ${:04X}", self.regs.pc.get());
        self.regs.cc.set(mask);
        self.vector_to(vector);
        self.cycles += Ticks::new(cycles);
    }

    // ====================================================================
    // Instructions
    // ====================================================================

    /// SWI, SWI2, SWI3. Only SWI masks interrupts.
    pub(crate) fn op_swi(&mut self, ops: Operands) -> Option<WriteBack> {
        self.push_entire_state();
        let vectors = self.config.vectors;
        let vector = match ops.opcode {
            0x103F => vectors.swi2,
            0x113F => vectors.swi3,
            _ => {
                self.regs.cc.set(I | F);
                vectors.swi
            }
        };
        self.vector_to(vector);
        None
    }

    pub(crate) fn op_rti(&mut self, _ops: Operands) -> Option<WriteBack> {
        let cc = ConditionCodes::from_byte(self.pull_byte(RegisterId::S));
        self.regs.cc = cc;
        let rest = if cc.is_set(E) { RTI_REST } else { PUSH_PC };
        self.pull_registers(RegisterId::S, rest);
        None
    }

    /// CWAI: clear CC bits, stack everything and wait for an interrupt.
    pub(crate) fn op_cwai(&mut self, ops: Operands) -> Option<WriteBack> {
        self.regs.cc = ConditionCodes::from_byte(self.regs.cc.to_byte() & ops.m as u8);
        self.push_entire_state();
        self.state = State::Waiting;
        None
    }

    pub(crate) fn op_sync(&mut self, _ops: Operands) -> Option<WriteBack> {
        self.state = State::Syncing;
        None
    }
}
