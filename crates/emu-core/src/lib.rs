//! Core traits and types for cycle-counted CPU emulation.
//!
//! A CPU core sees the outside world only through [`Memory`]. Whether that
//! memory is a flat array in the same thread or a peripheral service on the
//! far side of a [`bus`] channel is invisible to the core.

pub mod bus;
mod cpu;
mod memory;
mod observable;
mod ticks;

pub use cpu::Cpu;
pub use memory::{FlatMemory, MEMORY_SIZE, Memory};
pub use observable::{Observable, Value};
pub use ticks::Ticks;
