// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Interface register blocks
//!
//! Each interface (MI, VI, AI, PI) is a small file of 32-bit registers
//! mapped at a fixed base. Accesses are plain storage: no side effects are
//! modelled.
//!
//! Narrow accesses address the big-endian lanes of the containing register,
//! so a byte written at offset 0 lands in bits 24-31 and reads back the same
//! way through a word access.

use super::region::DeviceId;

/// Trait for memory-mapped interface devices
///
/// Devices implement the 32-bit methods; the 8-bit and 16-bit methods have
/// default implementations performing a read-modify-write on the containing
/// register.
pub trait IODevice {
    /// Read a 32-bit register at a byte offset from the device base
    fn read_register(&self, offset: u32) -> u32;

    /// Write a 32-bit register at a byte offset from the device base
    fn write_register(&mut self, offset: u32, value: u32);

    /// Read a 16-bit lane
    fn read_register16(&self, offset: u32) -> u16 {
        let value = self.read_register(offset & !0x03);
        let shift = (2 - (offset & 0x02)) * 8;
        (value >> shift) as u16
    }

    /// Write a 16-bit lane
    fn write_register16(&mut self, offset: u32, value: u16) {
        let aligned = offset & !0x03;
        let shift = (2 - (offset & 0x02)) * 8;
        let mask = !(0xFFFFu32 << shift);
        let current = self.read_register(aligned);
        self.write_register(aligned, (current & mask) | ((value as u32) << shift));
    }

    /// Read an 8-bit lane
    fn read_register8(&self, offset: u32) -> u8 {
        let value = self.read_register(offset & !0x03);
        let shift = (3 - (offset & 0x03)) * 8;
        (value >> shift) as u8
    }

    /// Write an 8-bit lane
    fn write_register8(&mut self, offset: u32, value: u8) {
        let aligned = offset & !0x03;
        let shift = (3 - (offset & 0x03)) * 8;
        let mask = !(0xFFu32 << shift);
        let current = self.read_register(aligned);
        self.write_register(aligned, (current & mask) | ((value as u32) << shift));
    }
}

/// Storage-only register file backing one interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    id: DeviceId,
    registers: Vec<u32>,
}

impl RegisterFile {
    /// Create a zeroed register file sized for `id`
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            registers: vec![0; id.register_count()],
        }
    }

    /// Which interface this file backs
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Raw register contents
    pub fn registers(&self) -> &[u32] {
        &self.registers
    }

    /// Zero every register
    pub fn reset(&mut self) {
        self.registers.fill(0);
    }

    #[inline(always)]
    fn index(&self, offset: u32) -> usize {
        ((offset >> 2) as usize) & (self.registers.len() - 1)
    }
}

impl IODevice for RegisterFile {
    fn read_register(&self, offset: u32) -> u32 {
        self.registers[self.index(offset)]
    }

    fn write_register(&mut self, offset: u32, value: u32) {
        let index = self.index(offset);
        self.registers[index] = value;
    }
}
