//! CPU core trait.

/// A CPU core that owns its memory collaborator.
///
/// Execution is instruction-granular: [`Cpu::step`] runs one complete
/// instruction (or one idle cycle while the core waits for an interrupt)
/// and reports the cycles it consumed. Interrupt requests are latched and
/// only acted on at the next instruction boundary.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// The error raised when an instruction cannot be executed.
    type Error;

    /// Execute one instruction and return its cycle cost.
    ///
    /// # Errors
    ///
    /// Fails when the instruction stream cannot be decoded or the core has
    /// been halted.
    fn step(&mut self) -> Result<u32, Self::Error>;

    /// Returns the current program counter.
    ///
    /// Returns `u32` so 16-bit cores and wider ones share the signature.
    /// Narrower CPUs zero-extend.
    fn pc(&self) -> u32;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU is halted.
    fn is_halted(&self) -> bool;

    /// Request a maskable interrupt. Returns true if it is currently unmasked.
    fn interrupt(&mut self) -> bool;

    /// Request a non-maskable interrupt.
    fn nmi(&mut self);

    /// Reset the CPU to its initial state.
    fn reset(&mut self);
}
