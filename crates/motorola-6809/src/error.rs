//! Error types.

use thiserror::Error;

/// Fatal conditions raised by the execution engine.
#[derive(Debug, Error)]
pub enum CpuError {
    /// The byte (or paged pair) at `address` is not a 6809 instruction.
    #[error("unknown opcode ${opcode:02X} at ${address:04X}")]
    UnknownOpcode { address: u16, opcode: u16 },

    /// A bounded test run did not reach its end address.
    #[error("runaway execution: {max_ops} instructions without reaching the end address (pc=${pc:04X})")]
    RunawayExecution { max_ops: u64, pc: u16 },

    /// The engine was stepped after `quit()`.
    #[error("CPU is halted")]
    Halted,
}

/// Configuration could not be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// A state snapshot could not be encoded, decoded or applied.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot RAM is {actual} bytes, expected at most {max}")]
    RamSize { actual: usize, max: usize },
}

pub type Result<T, E = CpuError> = std::result::Result<T, E>;
