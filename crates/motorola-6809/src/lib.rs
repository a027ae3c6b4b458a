//! Cycle-counted Motorola 6809 CPU emulator.
//!
//! Each call to [`Mc6809::step`] executes one whole instruction and adds
//! its fixed cycle cost. [`Mc6809::run`] executes adaptive bursts, paced
//! against the wall clock when a target speed is given.
//!
//! ```
//! use emu_core::{FlatMemory, Memory};
//! use motorola_6809::{Config, Mc6809};
//!
//! let mut memory = FlatMemory::new();
//! // LDA #$05; LDB #$06; MUL
//! memory.load(0x4000, &[0x86, 0x05, 0xC6, 0x06, 0x3D]);
//! memory.write_word(0xFFFE, 0x4000);
//!
//! let mut cpu = Mc6809::new(memory, Config::default());
//! cpu.reset();
//! cpu.test_run(0x4000, 0x4005, 100)?;
//! assert_eq!(cpu.regs.d(), 30);
//! assert_eq!(cpu.info(), "cc=80 a=00 b=1e dp=00 x=0000 y=0000 u=0000 s=0000");
//! # Ok::<(), motorola_6809::CpuError>(())
//! ```

mod addressing;
mod arith;
mod branches;
mod config;
mod cpu;
mod engine;
mod error;
mod exceptions;
pub mod flags;
mod logic;
pub mod opcodes;
pub mod pacing;
mod registers;
mod shifts;
mod snapshot;
mod stack;
pub mod sync;
mod transfer;

pub use config::{Config, Platform, Vectors};
pub use cpu::{Mc6809, State};
pub use engine::DEFAULT_MAX_OPS;
pub use error::{ConfigError, CpuError, Result, SnapshotError};
pub use flags::ConditionCodes;
pub use opcodes::{AddressingMode, OpcodeTable};
pub use pacing::{BurstControl, Clock, ManualClock, SystemClock};
pub use registers::{Register, RegisterId, Registers, Width, convert_width};
pub use snapshot::Snapshot;
