//! The memory contract and a flat RAM implementation.

use std::ops::RangeInclusive;

/// Size of the 16-bit address space.
pub const MEMORY_SIZE: usize = 0x1_0000;

/// Memory and I/O as seen by a CPU core.
///
/// All multi-byte values are big-endian: the byte at `address` is the most
/// significant one. Addresses wrap at the top of the 64 KiB space.
pub trait Memory {
    /// Read a byte from the given address.
    fn read_byte(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write_byte(&mut self, address: u16, value: u8);

    /// Read a big-endian word.
    fn read_word(&mut self, address: u16) -> u16 {
        let hi = self.read_byte(address);
        let lo = self.read_byte(address.wrapping_add(1));
        u16::from_be_bytes([hi, lo])
    }

    /// Write a big-endian word.
    fn write_word(&mut self, address: u16, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.write_byte(address, hi);
        self.write_byte(address.wrapping_add(1), lo);
    }

    /// Bulk-store `data` starting at `address`.
    ///
    /// Used for program loading and snapshot restore.
    fn load(&mut self, address: u16, data: &[u8]) {
        let mut addr = address;
        for &byte in data {
            self.write_byte(addr, byte);
            addr = addr.wrapping_add(1);
        }
    }

    /// Read the whole address space.
    fn dump(&mut self) -> Vec<u8> {
        (0..=u16::MAX).map(|addr| self.read_byte(addr)).collect()
    }
}

/// Flat 64 KiB RAM, optionally with write-protected ranges.
///
/// Writes into a protected range are dropped, which is how ROM behaves on
/// most 6809 boards. [`FlatMemory::load`] bypasses the protection so a ROM
/// image can be installed.
#[derive(Debug, Clone)]
pub struct FlatMemory {
    ram: Box<[u8]>,
    rom: Vec<RangeInclusive<u16>>,
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl FlatMemory {
    /// Create zero-filled memory with no protected ranges.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: vec![0; MEMORY_SIZE].into_boxed_slice(),
            rom: Vec::new(),
        }
    }

    /// Mark `range` as read-only.
    #[must_use]
    pub fn with_rom(mut self, range: RangeInclusive<u16>) -> Self {
        self.rom.push(range);
        self
    }

    /// Read without going through the trait (no side effects either way).
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.ram[usize::from(address)]
    }

    fn is_rom(&self, address: u16) -> bool {
        self.rom.iter().any(|r| r.contains(&address))
    }
}

impl Memory for FlatMemory {
    fn read_byte(&mut self, address: u16) -> u8 {
        self.ram[usize::from(address)]
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        if self.is_rom(address) {
            log::warn!("write ${value:02X} to ROM at ${address:04X} ignored");
            return;
        }
        self.ram[usize::from(address)] = value;
    }

    fn load(&mut self, address: u16, data: &[u8]) {
        let mut addr = address;
        for &byte in data {
            self.ram[usize::from(addr)] = byte;
            addr = addr.wrapping_add(1);
        }
    }

    fn dump(&mut self) -> Vec<u8> {
        self.ram.to_vec()
    }
}
