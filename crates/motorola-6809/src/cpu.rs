//! The 6809 CPU: state, reset, fetch and dispatch.

use std::fmt;

use emu_core::bus::QuitHandle;
use emu_core::{Cpu, Memory, Observable, Ticks, Value};

use crate::config::{Config, Platform};
use crate::error::{CpuError, Result};
use crate::flags::{self, ConditionCodes};
use crate::opcodes::{Handler, OpcodeTable, Operands, WriteBack};
use crate::pacing::{BurstControl, Clock, SystemClock};
use crate::registers::Registers;
use crate::sync::SyncScheduler;

/// Execution state between instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Fetching and executing instructions.
    Running,
    /// Stopped by CWAI with the entire state stacked, until an unmasked
    /// interrupt arrives.
    Waiting,
    /// Stopped by SYNC until any interrupt line is asserted.
    Syncing,
}

/// Latched interrupt requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Pending {
    pub nmi: bool,
    pub firq: bool,
    pub irq: bool,
}

impl Pending {
    pub(crate) const fn any(self) -> bool {
        self.nmi || self.firq || self.irq
    }
}

/// The Motorola 6809.
///
/// Owns its memory collaborator. Instructions run to completion one at a
/// time; interrupts, sync callbacks and pacing only ever happen between
/// them.
pub struct Mc6809<M: Memory> {
    /// CPU registers.
    pub regs: Registers,

    /// Memory and peripherals.
    pub memory: M,

    pub(crate) config: Config,
    table: OpcodeTable<M>,

    /// Running cycle counter.
    pub(crate) cycles: Ticks,

    pub(crate) state: State,
    pub(crate) pending: Pending,

    /// Address of the instruction being executed (the prefix for paged ones).
    last_op_address: u16,

    pub(crate) burst: BurstControl,
    pub(crate) sync: SyncScheduler,
    pub(crate) clock: Box<dyn Clock + Send>,
    running: QuitHandle,
}

impl<M: Memory> fmt::Debug for Mc6809<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mc6809")
            .field("regs", &self.regs)
            .field("cycles", &self.cycles)
            .field("state", &self.state)
            .field("burst", &self.burst)
            .finish_non_exhaustive()
    }
}

impl<M: Memory> Mc6809<M> {
    /// Create a CPU around `memory`. Call [`Mc6809::reset`] before running.
    pub fn new(memory: M, config: Config) -> Self {
        let burst = BurstControl::from_config(&config);
        Self {
            regs: Registers::new(),
            memory,
            config,
            table: OpcodeTable::new(),
            cycles: Ticks::ZERO,
            state: State::Running,
            pending: Pending::default(),
            last_op_address: 0,
            burst,
            sync: SyncScheduler::default(),
            clock: Box::new(SystemClock::new()),
            running: QuitHandle::default(),
        }
    }

    /// Replace the wall clock used for pacing.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn opcode_table(&self) -> &OpcodeTable<M> {
        &self.table
    }

    /// Total cycles executed.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles.get()
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub fn last_op_address(&self) -> u16 {
        self.last_op_address
    }

    #[must_use]
    pub fn burst_control(&self) -> &BurstControl {
        &self.burst
    }

    pub fn burst_control_mut(&mut self) -> &mut BurstControl {
        &mut self.burst
    }

    /// Handle another thread can use to stop the CPU.
    #[must_use]
    pub fn quit_handle(&self) -> QuitHandle {
        self.running.clone()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.running.is_set()
    }

    /// Stop execution. Bursts end at their next inner-burst boundary.
    pub fn quit(&mut self) {
        log::info!("CPU quit at ${:04X}", self.regs.pc.get());
        self.running.quit();
    }

    /// The debug status line.
    #[must_use]
    pub fn info(&self) -> String {
        self.regs.to_string()
    }

    /// Load the initial CC for the platform and PC from the RESET vector.
    pub fn reset(&mut self) {
        log::info!("${:04X}| CPU reset ({:?})", self.regs.pc.get(), self.config.platform);
        self.last_op_address = 0;
        self.state = State::Running;
        self.pending = Pending::default();

        match self.config.platform {
            Platform::Sbc09 => self.regs.cc = ConditionCodes::new(),
            Platform::Generic => self.regs.cc.set(flags::E),
        }

        let vector = self.config.vectors.reset;
        let pc = self.memory.read_word(vector);
        if pc == 0 {
            log::error!("reset vector at ${vector:04X} is $0000; is the ROM loaded?");
        }
        log::info!("PC set to ${pc:04X}");
        self.regs.pc.set(pc.into());
    }

    /// Run one instruction, or one idle cycle while waiting for an interrupt.
    ///
    /// Returns the cycles consumed.
    pub fn step(&mut self) -> Result<u32> {
        if !self.is_running() {
            return Err(CpuError::Halted);
        }
        let start = self.cycles;
        if !self.service_interrupts() {
            match self.state {
                State::Running => {
                    let (address, opcode) = self.read_pc_byte();
                    self.call_instruction(address, u16::from(opcode))?;
                }
                State::Waiting | State::Syncing => self.cycles += Ticks::new(1),
            }
        }
        Ok((self.cycles - start).get() as u32)
    }

    /// Dispatch `opcode`, fetched from `op_address`.
    pub(crate) fn call_instruction(&mut self, op_address: u16, opcode: u16) -> Result<()> {
        let Some(entry) = self.table.lookup(opcode).copied() else {
            log::error!("unknown opcode ${opcode:02X} at ${op_address:04X}");
            return Err(CpuError::UnknownOpcode {
                address: op_address,
                opcode,
            });
        };
        self.last_op_address = op_address;

        match entry.handler {
            Handler::Page => {
                let (address, low) = self.read_pc_byte();
                let paged = (opcode << 8) | u16::from(low);
                self.call_instruction(address.wrapping_sub(1), paged)?;
            }
            Handler::Exec(exec) => {
                log::trace!("${op_address:04X} {:<5} {}", entry.mnemonic, self.regs);
                let operands = self.resolve(&entry, opcode);
                if let Some(write_back) = exec(self, operands) {
                    self.write_back(write_back);
                }
            }
        }

        self.cycles += Ticks::new(u64::from(entry.cycles));
        Ok(())
    }

    fn write_back(&mut self, write_back: WriteBack) {
        match write_back {
            WriteBack::Byte(ea, value) => self.memory.write_byte(ea, value),
            WriteBack::Word(ea, value) => self.memory.write_word(ea, value),
        }
    }

    // ====================================================================
    // Operand register access
    // ====================================================================

    /// Value of the entry's register. Entries without one read 0.
    pub(crate) fn target_read(&self, ops: Operands) -> u16 {
        ops.register.map_or(0, |reg| self.regs.read(reg))
    }

    pub(crate) fn target_write(&mut self, ops: Operands, value: u32) {
        if let Some(reg) = ops.register {
            self.regs.write(reg, value);
        }
    }

    /// Operand of a unary op: the register, or the byte read from memory.
    pub(crate) fn unary_operand(&self, ops: Operands) -> i32 {
        match ops.register {
            Some(reg) => i32::from(self.regs.read(reg)),
            None => i32::from(ops.m),
        }
    }

    /// Store a unary op's result in its register, or hand it back for
    /// write-back to memory.
    pub(crate) fn unary_result(&mut self, ops: Operands, r: i32) -> Option<WriteBack> {
        match ops.register {
            Some(reg) => {
                self.regs.write(reg, r as u32);
                None
            }
            None => Some(WriteBack::Byte(ops.ea, r as u8)),
        }
    }
}

impl<M: Memory> Cpu for Mc6809<M> {
    type Registers = Registers;
    type Error = CpuError;

    fn step(&mut self) -> Result<u32> {
        Mc6809::step(self)
    }

    fn pc(&self) -> u32 {
        u32::from(self.regs.pc.get())
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        !self.is_running()
    }

    fn interrupt(&mut self) -> bool {
        self.irq();
        !self.regs.cc.is_set(flags::I)
    }

    fn nmi(&mut self) {
        Mc6809::nmi(self);
    }

    fn reset(&mut self) {
        Mc6809::reset(self);
    }
}

impl<M: Memory> Observable for Mc6809<M> {
    fn query(&self, path: &str) -> Option<Value> {
        let cc = self.regs.cc;
        match path {
            "pc" => Some(self.regs.pc.get().into()),
            "a" => Some((self.regs.a.get() as u8).into()),
            "b" => Some((self.regs.b.get() as u8).into()),
            "d" => Some(self.regs.d().into()),
            "x" => Some(self.regs.x.get().into()),
            "y" => Some(self.regs.y.get().into()),
            "u" => Some(self.regs.u.get().into()),
            "s" => Some(self.regs.s.get().into()),
            "dp" => Some((self.regs.dp.get() as u8).into()),
            "cc" => Some(cc.to_byte().into()),
            "flags" => Some(cc.to_string().into()),
            "flags.e" => Some(cc.is_set(flags::E).into()),
            "flags.f" => Some(cc.is_set(flags::F).into()),
            "flags.h" => Some(cc.is_set(flags::H).into()),
            "flags.i" => Some(cc.is_set(flags::I).into()),
            "flags.n" => Some(cc.is_set(flags::N).into()),
            "flags.z" => Some(cc.is_set(flags::Z).into()),
            "flags.v" => Some(cc.is_set(flags::V).into()),
            "flags.c" => Some(cc.is_set(flags::C).into()),
            "cycles" => Some(self.cycles.get().into()),
            "halted" => Some((!self.is_running()).into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc", "a", "b", "d", "x", "y", "u", "s", "dp", "cc", "flags", "flags.e", "flags.f",
            "flags.h", "flags.i", "flags.n", "flags.z", "flags.v", "flags.c", "cycles", "halted",
        ]
    }
}
