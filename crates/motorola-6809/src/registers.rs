//! 6809 register bank.
//!
//! Every register is a width-aware cell: writes and increments truncate to
//! 8 or 16 bits, so no mutation can leave a value out of range. D is not
//! stored; it is the A:B pair viewed as one word.

use std::fmt;

use crate::flags::ConditionCodes;

/// Register width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte,
    Word,
}

impl Width {
    #[must_use]
    pub const fn mask(self) -> u32 {
        match self {
            Width::Byte => 0xFF,
            Width::Word => 0xFFFF,
        }
    }
}

/// A single truncating register cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register {
    name: &'static str,
    width: Width,
    value: u16,
}

impl Register {
    #[must_use]
    pub const fn byte(name: &'static str) -> Self {
        Self {
            name,
            width: Width::Byte,
            value: 0,
        }
    }

    #[must_use]
    pub const fn word(name: &'static str) -> Self {
        Self {
            name,
            width: Width::Word,
            value: 0,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn width(&self) -> Width {
        self.width
    }

    #[must_use]
    pub const fn get(&self) -> u16 {
        self.value
    }

    /// Store `value` modulo 2^width.
    ///
    /// Arithmetic results computed in `i32` may be passed through `as u32`;
    /// negative values land on their two's-complement bit pattern.
    pub fn set(&mut self, value: u32) {
        self.value = (value & self.width.mask()) as u16;
    }

    pub fn increment(&mut self, n: u32) {
        self.set(u32::from(self.value).wrapping_add(n));
    }

    pub fn decrement(&mut self, n: u32) {
        self.set(u32::from(self.value).wrapping_sub(n));
    }
}

/// Register selector as used by TFR, EXG and the opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterId {
    D,
    X,
    Y,
    U,
    S,
    Pc,
    A,
    B,
    Cc,
    Dp,
    /// Target of an invalid selector nibble. Reads 0, ignores writes.
    Undefined,
}

impl RegisterId {
    /// Decode a TFR/EXG nibble.
    #[must_use]
    pub const fn from_selector(nibble: u8) -> Self {
        match nibble & 0x0F {
            0x0 => Self::D,
            0x1 => Self::X,
            0x2 => Self::Y,
            0x3 => Self::U,
            0x4 => Self::S,
            0x5 => Self::Pc,
            0x8 => Self::A,
            0x9 => Self::B,
            0xA => Self::Cc,
            0xB => Self::Dp,
            _ => Self::Undefined,
        }
    }

    #[must_use]
    pub const fn width(self) -> Width {
        match self {
            Self::A | Self::B | Self::Cc | Self::Dp => Width::Byte,
            Self::D | Self::X | Self::Y | Self::U | Self::S | Self::Pc | Self::Undefined => {
                Width::Word
            }
        }
    }
}

/// Convert a value crossing register widths in TFR/EXG.
///
/// Byte to word puts 0xFF in the high byte ($CD becomes $FFCD). Word to
/// byte ORs in 0xFF00 and keeps the low byte. Neither is sign extension.
#[must_use]
pub fn convert_width(value: u16, from: Width, to: Width) -> u32 {
    let value = u32::from(value);
    match (from, to) {
        (Width::Byte, Width::Word) => value + 0xFF00,
        (Width::Word, Width::Byte) => value | 0xFF00,
        _ => value,
    }
}

/// All architectural registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: Register,
    pub b: Register,
    pub dp: Register,
    pub x: Register,
    pub y: Register,
    pub u: Register,
    pub s: Register,
    pub pc: Register,
    pub cc: ConditionCodes,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: Register::byte("A"),
            b: Register::byte("B"),
            dp: Register::byte("DP"),
            x: Register::word("X"),
            y: Register::word("Y"),
            u: Register::word("U"),
            s: Register::word("S"),
            pc: Register::word("PC"),
            cc: ConditionCodes::new(),
        }
    }

    /// The D accumulator (A high, B low).
    #[must_use]
    pub const fn d(&self) -> u16 {
        (self.a.get() << 8) | self.b.get()
    }

    pub fn set_d(&mut self, value: u32) {
        self.a.set(value >> 8);
        self.b.set(value);
    }

    /// Read any register by selector.
    #[must_use]
    pub fn read(&self, id: RegisterId) -> u16 {
        match id {
            RegisterId::D => self.d(),
            RegisterId::X => self.x.get(),
            RegisterId::Y => self.y.get(),
            RegisterId::U => self.u.get(),
            RegisterId::S => self.s.get(),
            RegisterId::Pc => self.pc.get(),
            RegisterId::A => self.a.get(),
            RegisterId::B => self.b.get(),
            RegisterId::Cc => u16::from(self.cc.to_byte()),
            RegisterId::Dp => self.dp.get(),
            RegisterId::Undefined => 0,
        }
    }

    /// Write any register by selector, truncating to its width.
    pub fn write(&mut self, id: RegisterId, value: u32) {
        match id {
            RegisterId::D => self.set_d(value),
            RegisterId::Cc => self.cc = ConditionCodes::from_byte(value as u8),
            RegisterId::Undefined => {
                log::warn!("write ${value:04X} to undefined register ignored");
            }
            _ => {
                if let Some(reg) = self.cell_mut(id) {
                    reg.set(value);
                }
            }
        }
    }

    /// The backing cell of a stored register. D, CC and undefined have none.
    pub fn cell_mut(&mut self, id: RegisterId) -> Option<&mut Register> {
        match id {
            RegisterId::X => Some(&mut self.x),
            RegisterId::Y => Some(&mut self.y),
            RegisterId::U => Some(&mut self.u),
            RegisterId::S => Some(&mut self.s),
            RegisterId::Pc => Some(&mut self.pc),
            RegisterId::A => Some(&mut self.a),
            RegisterId::B => Some(&mut self.b),
            RegisterId::Dp => Some(&mut self.dp),
            RegisterId::D | RegisterId::Cc | RegisterId::Undefined => None,
        }
    }
}

impl fmt::Display for Registers {
    /// The fixed-order debug status line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cc={:02x} a={:02x} b={:02x} dp={:02x} x={:04x} y={:04x} u={:04x} s={:04x}",
            self.cc.to_byte(),
            self.a.get(),
            self.b.get(),
            self.dp.get(),
            self.x.get(),
            self.y.get(),
            self.u.get(),
            self.s.get(),
        )
    }
}
