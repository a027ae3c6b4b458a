//! Save and restore of the complete machine state.

use emu_core::{MEMORY_SIZE, Memory, Ticks};
use serde::{Deserialize, Serialize};

use crate::Mc6809;
use crate::error::SnapshotError;
use crate::flags::ConditionCodes;

/// Registers, cycle counter and memory image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "X")]
    pub x: u16,
    #[serde(rename = "Y")]
    pub y: u16,
    #[serde(rename = "U")]
    pub u: u16,
    #[serde(rename = "S")]
    pub s: u16,
    #[serde(rename = "PC")]
    pub pc: u16,
    #[serde(rename = "A")]
    pub a: u8,
    #[serde(rename = "B")]
    pub b: u8,
    #[serde(rename = "DP")]
    pub dp: u8,
    #[serde(rename = "CC")]
    pub cc: u8,
    pub cycles: u64,
    #[serde(rename = "RAM")]
    pub ram: Vec<u8>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<M: Memory> Mc6809<M> {
    /// Capture registers, cycle count and the whole address space.
    pub fn snapshot(&mut self) -> Snapshot {
        let regs = self.regs;
        Snapshot {
            x: regs.x.get(),
            y: regs.y.get(),
            u: regs.u.get(),
            s: regs.s.get(),
            pc: regs.pc.get(),
            a: regs.a.get() as u8,
            b: regs.b.get() as u8,
            dp: regs.dp.get() as u8,
            cc: regs.cc.to_byte(),
            cycles: self.cycles.get(),
            ram: self.memory.dump(),
        }
    }

    /// Put a snapshot back. The RAM image is loaded from address 0.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        if snapshot.ram.len() > MEMORY_SIZE {
            return Err(SnapshotError::RamSize {
                actual: snapshot.ram.len(),
                max: MEMORY_SIZE,
            });
        }
        self.regs.x.set(snapshot.x.into());
        self.regs.y.set(snapshot.y.into());
        self.regs.u.set(snapshot.u.into());
        self.regs.s.set(snapshot.s.into());
        self.regs.pc.set(snapshot.pc.into());
        self.regs.a.set(snapshot.a.into());
        self.regs.b.set(snapshot.b.into());
        self.regs.dp.set(snapshot.dp.into());
        self.regs.cc = ConditionCodes::from_byte(snapshot.cc);
        self.cycles = Ticks::new(snapshot.cycles);
        self.memory.load(0, &snapshot.ram);
        Ok(())
    }
}
