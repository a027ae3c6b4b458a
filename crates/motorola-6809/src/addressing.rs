//! Operand fetch and effective-address calculation.

use emu_core::Memory;

use crate::Mc6809;
use crate::opcodes::{Access, AddressingMode, OpcodeEntry, Operands};
use crate::registers::{RegisterId, Width};

/// Index registers selected by post-byte bits 6-5.
const INDEX_REGISTERS: [RegisterId; 4] = [RegisterId::X, RegisterId::Y, RegisterId::U, RegisterId::S];

fn signed5(value: u8) -> i32 {
    let v = i32::from(value & 0x1F);
    if v & 0x10 != 0 { v - 0x20 } else { v }
}

fn signed8(value: u8) -> i32 {
    i32::from(value as i8)
}

fn signed16(value: u16) -> i32 {
    i32::from(value as i16)
}

fn wrap(ea: i32) -> u16 {
    (ea & 0xFFFF) as u16
}

impl<M: Memory> Mc6809<M> {
    // ====================================================================
    // Instruction stream
    // ====================================================================

    /// Read the byte at PC and advance PC. Returns (address, byte).
    pub(crate) fn read_pc_byte(&mut self) -> (u16, u8) {
        let address = self.regs.pc.get();
        let value = self.memory.read_byte(address);
        self.regs.pc.increment(1);
        (address, value)
    }

    /// Read the big-endian word at PC and advance PC by 2.
    pub(crate) fn read_pc_word(&mut self) -> (u16, u16) {
        let address = self.regs.pc.get();
        let value = self.memory.read_word(address);
        self.regs.pc.increment(2);
        (address, value)
    }

    // ====================================================================
    // Effective addresses
    // ====================================================================

    pub(crate) fn ea_direct(&mut self) -> u16 {
        let (_, low) = self.read_pc_byte();
        (self.regs.dp.get() << 8) | u16::from(low)
    }

    pub(crate) fn ea_extended(&mut self) -> u16 {
        self.read_pc_word().1
    }

    /// Branch target: PC after the offset byte plus the signed offset.
    pub(crate) fn ea_relative(&mut self) -> u16 {
        let (_, offset) = self.read_pc_byte();
        wrap(i32::from(self.regs.pc.get()) + signed8(offset))
    }

    pub(crate) fn ea_relative_word(&mut self) -> u16 {
        let (_, offset) = self.read_pc_word();
        self.regs.pc.get().wrapping_add(offset)
    }

    /// Decode an indexed post-byte and any offset bytes after it.
    ///
    /// Auto increment and decrement update the base register as a side
    /// effect. Bit 4 of the post-byte (in the long forms) adds one level of
    /// indirection through memory.
    pub(crate) fn ea_indexed(&mut self) -> u16 {
        let (_, post) = self.read_pc_byte();
        let reg = INDEX_REGISTERS[usize::from((post >> 5) & 3)];
        let base = i32::from(self.regs.read(reg));

        if post & 0x80 == 0 {
            return wrap(base + signed5(post));
        }

        let ea = match post & 0x0F {
            0x0 => {
                self.regs.write(reg, (base + 1) as u32);
                base
            }
            0x1 => {
                self.regs.write(reg, (base + 2) as u32);
                base
            }
            0x2 => {
                self.regs.write(reg, (base - 1) as u32);
                base - 1
            }
            0x3 => {
                self.regs.write(reg, (base - 2) as u32);
                base - 2
            }
            0x4 => base,
            0x5 => base + signed8(self.regs.b.get() as u8),
            0x6 => base + signed8(self.regs.a.get() as u8),
            0x8 => {
                let (_, offset) = self.read_pc_byte();
                base + signed8(offset)
            }
            0x9 => {
                let (_, offset) = self.read_pc_word();
                base + signed16(offset)
            }
            0xB => base + signed16(self.regs.d()),
            0xC => {
                let (_, offset) = self.read_pc_byte();
                i32::from(self.regs.pc.get()) + signed8(offset)
            }
            0xD => {
                let (_, offset) = self.read_pc_word();
                i32::from(self.regs.pc.get()) + signed16(offset)
            }
            0xF => i32::from(self.read_pc_word().1),
            mode => {
                log::warn!(
                    "undefined indexed post-byte ${post:02X} at ${:04X}",
                    self.last_op_address()
                );
                if mode == 0xA { 0 } else { 0xFFFF }
            }
        };

        let ea = wrap(ea);
        if post & 0x10 != 0 {
            self.memory.read_word(ea)
        } else {
            ea
        }
    }

    // ====================================================================
    // Dispatch-time resolution
    // ====================================================================

    /// Fetch whatever `entry` declares its handler needs.
    pub(crate) fn resolve(&mut self, entry: &OpcodeEntry<M>, opcode: u16) -> Operands {
        let ea = match entry.mode {
            AddressingMode::Inherent | AddressingMode::Immediate => None,
            AddressingMode::Direct => Some(self.ea_direct()),
            AddressingMode::Indexed => Some(self.ea_indexed()),
            AddressingMode::Extended => Some(self.ea_extended()),
            AddressingMode::Relative => Some(self.ea_relative()),
            AddressingMode::LongRelative => Some(self.ea_relative_word()),
        };

        let m = match (entry.access, ea) {
            (Access::Read(Width::Byte), None) => u16::from(self.read_pc_byte().1),
            (Access::Read(Width::Word), None) => self.read_pc_word().1,
            (Access::Read(Width::Byte) | Access::Modify, Some(ea)) => {
                u16::from(self.memory.read_byte(ea))
            }
            (Access::Read(Width::Word), Some(ea)) => self.memory.read_word(ea),
            _ => 0,
        };

        Operands {
            opcode,
            ea: ea.unwrap_or(0),
            m,
            register: entry.register,
        }
    }
}
