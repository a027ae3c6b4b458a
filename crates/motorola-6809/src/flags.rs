//! 6809 condition code register (CC).
//!
//! Bit layout, high to low: E F H I N Z V C.
//!
//! The `update_*` helpers are named after the flags they touch. Each one
//! clears exactly those flags and recomputes them from the operands and the
//! unmasked result; every other flag keeps its value. Results are passed as
//! `i32` so carries and borrows past the operand width are still visible.

use std::fmt;

/// Carry - carry out of (or borrow into) the top bit.
pub const C: u8 = 0x01;

/// Overflow - signed result out of range.
pub const V: u8 = 0x02;

/// Zero - width-masked result is zero.
pub const Z: u8 = 0x04;

/// Negative - top bit of the width-masked result.
pub const N: u8 = 0x08;

/// IRQ mask.
pub const I: u8 = 0x10;

/// Half carry - carry out of bit 3, 8-bit additions only.
pub const H: u8 = 0x20;

/// FIRQ mask.
pub const F: u8 = 0x40;

/// Entire - set when the whole register set was stacked.
pub const E: u8 = 0x80;

const NAMES: [(u8, char); 8] = [
    (E, 'E'),
    (F, 'F'),
    (H, 'H'),
    (I, 'I'),
    (N, 'N'),
    (Z, 'Z'),
    (V, 'V'),
    (C, 'C'),
];

/// Condition code register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionCodes(pub u8);

impl ConditionCodes {
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn to_byte(self) -> u8 {
        self.0
    }

    /// Check if a flag is set.
    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    /// Set or clear a flag based on a condition.
    pub fn set_if(&mut self, flag: u8, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Carry-in as an arithmetic operand.
    #[must_use]
    pub const fn carry(self) -> i32 {
        (self.0 & C) as i32
    }

    // ====================================================================
    // Per-width flag formulas
    // ====================================================================

    fn half_carry(a: i32, b: i32, r: i32) -> bool {
        (a ^ b ^ r) & 0x10 != 0
    }

    fn overflow(a: i32, b: i32, r: i32, sign: i32) -> bool {
        (a ^ b ^ r ^ (r >> 1)) & sign != 0
    }

    // ====================================================================
    // Composite updates
    // ====================================================================

    /// N and Z from an 8-bit result.
    pub fn update_nz_8(&mut self, r: i32) {
        self.clear(N | Z);
        self.set_if(N, r & 0x80 != 0);
        self.set_if(Z, r & 0xFF == 0);
    }

    /// N and Z from a 16-bit result.
    pub fn update_nz_16(&mut self, r: i32) {
        self.clear(N | Z);
        self.set_if(N, r & 0x8000 != 0);
        self.set_if(Z, r & 0xFFFF == 0);
    }

    /// N and Z from an 8-bit result, V cleared. Loads, stores and logic ops.
    pub fn update_nz0_8(&mut self, r: i32) {
        self.clear(V);
        self.update_nz_8(r);
    }

    /// N and Z from a 16-bit result, V cleared.
    pub fn update_nz0_16(&mut self, r: i32) {
        self.clear(V);
        self.update_nz_16(r);
    }

    /// N, Z and C from an 8-bit result.
    ///
    /// C is only ever raised here, so a carry that was already set survives.
    /// DAA relies on that.
    pub fn update_nzc_8(&mut self, r: i32) {
        self.update_nz_8(r);
        if r & 0x100 != 0 {
            self.set(C);
        }
    }

    /// N, Z, V and C for an 8-bit add or subtract of `a` and `b`.
    pub fn update_nzvc_8(&mut self, a: i32, b: i32, r: i32) {
        self.update_nz_8(r);
        self.set_if(V, Self::overflow(a, b, r, 0x80));
        self.set_if(C, r & 0x100 != 0);
    }

    /// N, Z, V and C for a 16-bit add or subtract.
    pub fn update_nzvc_16(&mut self, a: i32, b: i32, r: i32) {
        self.update_nz_16(r);
        self.set_if(V, Self::overflow(a, b, r, 0x8000));
        self.set_if(C, r & 0x1_0000 != 0);
    }

    /// H, N, Z, V and C for an 8-bit add.
    pub fn update_hnzvc_8(&mut self, a: i32, b: i32, r: i32) {
        self.set_if(H, Self::half_carry(a, b, r));
        self.update_nzvc_8(a, b, r);
    }

    /// COM: N and Z from the result, V=0, C=1.
    pub fn update_nz01_8(&mut self, r: i32) {
        self.update_nz0_8(r);
        self.set(C);
    }

    /// CLR: N=0, Z=1, V=0, C=0 whatever the operand was.
    pub fn update_0100(&mut self) {
        self.clear(N | V | C);
        self.set(Z);
    }
}

impl fmt::Display for ConditionCodes {
    /// Flag letters, with `.` for each clear flag (`E.H....C`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in NAMES {
            let c = if self.is_set(flag) { name } else { '.' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
