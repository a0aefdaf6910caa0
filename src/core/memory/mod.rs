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

//! Memory bus implementation
//!
//! The Bus owns every backing store the CPU can reach and routes each access
//! to the region containing its address.
//!
//! # Memory Map
//!
//! | Primary window            | Mirror window             | Region     | Access |
//! |---------------------------|---------------------------|------------|--------|
//! | 0x00000000-0x007FFFFF     | 0xA0000000-0xA07FFFFF     | RAM (8MB)  | R/W    |
//! | 0x04300000-0x0460003F     | -                         | MI/VI/AI/PI| R/W    |
//! | 0x08000000-0x08007FFF     | 0xA8000000-0xA8007FFF     | SRAM (32KB)| R/W    |
//! | 0x10000000-0x1FBFFFFF     | 0xB0000000-0xBFFFFFFF     | ROM        | R only |
//!
//! All data is big-endian. Accesses outside every window read as zero and
//! writes there are dropped; the bus never faults.
//!
//! # Example
//!
//! ```
//! use mipsemu::core::memory::Bus;
//!
//! let mut bus = Bus::new();
//!
//! bus.write32(0x0000_1000, 0x1234_5678);
//! assert_eq!(bus.read32(0xA000_1000), 0x1234_5678);
//! assert_eq!(bus.read8(0xA000_1000), 0x12);
//! ```

mod io_device;
mod region;
mod save_type;

pub use io_device::{IODevice, RegisterFile};
pub use region::{DeviceId, MemoryRegion};
pub use save_type::SaveType;

use crate::core::save_state::{MemoryState, StateSave};

/// Memory bus managing all memory accesses
pub struct Bus {
    /// Main RAM (8MB)
    ram: Vec<u8>,

    /// Cartridge image in big-endian order, empty when no cartridge is loaded
    rom: Vec<u8>,

    /// EEPROM backing (2KB), not mapped
    eeprom: Vec<u8>,

    /// SRAM backing (32KB), always mapped
    sram: Vec<u8>,

    /// FlashRAM backing (128KB), not mapped
    flashram: Vec<u8>,

    /// Interface register files, indexed by [`DeviceId::index`]
    devices: [RegisterFile; 4],

    /// Advisory classification of the loaded cartridge
    save_type: SaveType,
}

impl Bus {
    /// RAM size (8MB)
    pub const RAM_SIZE: usize = 8 * 1024 * 1024;

    /// EEPROM size (2KB)
    pub const EEPROM_SIZE: usize = 2 * 1024;

    /// SRAM size (32KB)
    pub const SRAM_SIZE: usize = 32 * 1024;

    /// FlashRAM size (128KB)
    pub const FLASHRAM_SIZE: usize = 128 * 1024;

    /// Create a new Bus instance with zeroed memory and no cartridge
    pub fn new() -> Self {
        Self {
            ram: vec![0u8; Self::RAM_SIZE],
            rom: Vec::new(),
            eeprom: vec![0u8; Self::EEPROM_SIZE],
            sram: vec![0u8; Self::SRAM_SIZE],
            flashram: vec![0u8; Self::FLASHRAM_SIZE],
            devices: DeviceId::ALL.map(RegisterFile::new),
            save_type: SaveType::None,
        }
    }

    /// Reset the bus to its power-on state
    ///
    /// Clears RAM and the interface registers. The cartridge image and the
    /// save RAM backings survive a reset.
    ///
    /// # Example
    ///
    /// ```
    /// use mipsemu::core::memory::Bus;
    ///
    /// let mut bus = Bus::new();
    /// bus.write32(0x0000_0000, 0x1234_5678);
    /// bus.reset();
    /// assert_eq!(bus.read32(0x0000_0000), 0);
    /// ```
    pub fn reset(&mut self) {
        self.ram.fill(0);
        for device in &mut self.devices {
            device.reset();
        }
    }

    /// Install a cartridge image
    ///
    /// `image` must already be in big-endian order (see
    /// [`Cartridge::load`](crate::core::cartridge::Cartridge::load)).
    /// Save-type detection runs over the new image.
    pub fn load_rom(&mut self, image: Vec<u8>) {
        self.save_type = SaveType::detect(&image);
        log::info!(
            "ROM mapped: {} bytes, save type {}",
            image.len(),
            self.save_type
        );
        self.rom = image;
    }

    /// Whether a cartridge image is mapped
    pub fn has_rom(&self) -> bool {
        !self.rom.is_empty()
    }

    /// Detected save type of the mapped cartridge
    pub fn save_type(&self) -> SaveType {
        self.save_type
    }

    /// Main RAM contents
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// Mutable main RAM contents
    pub fn ram_mut(&mut self) -> &mut [u8] {
        &mut self.ram
    }

    /// Cartridge image
    pub fn rom(&self) -> &[u8] {
        &self.rom
    }

    /// EEPROM backing
    pub fn eeprom(&self) -> &[u8] {
        &self.eeprom
    }

    /// SRAM backing
    pub fn sram(&self) -> &[u8] {
        &self.sram
    }

    /// FlashRAM backing
    pub fn flashram(&self) -> &[u8] {
        &self.flashram
    }

    /// Register file backing an interface
    pub fn device(&self, id: DeviceId) -> &RegisterFile {
        &self.devices[id.index()]
    }

    /// Read 8-bit value from memory
    ///
    /// # Example
    ///
    /// ```
    /// use mipsemu::core::memory::Bus;
    ///
    /// let mut bus = Bus::new();
    /// bus.write8(0x0000_0010, 0x42);
    /// assert_eq!(bus.read8(0x0000_0010), 0x42);
    /// assert_eq!(bus.read8(0x7000_0000), 0);
    /// ```
    pub fn read8(&self, addr: u32) -> u8 {
        match self.identify_region(addr) {
            MemoryRegion::Ram(offset) => self.ram[offset],
            MemoryRegion::Rom(offset) => self.rom.get(offset).copied().unwrap_or(0),
            MemoryRegion::Sram(offset) => self.sram[offset],
            MemoryRegion::Device(id, offset) => {
                let value = self.devices[id.index()].read_register8(offset);
                log::trace!("{:?} read8 at 0x{:08X} -> 0x{:02X}", id, addr, value);
                value
            }
            MemoryRegion::DeviceUnmapped | MemoryRegion::Unmapped => {
                log::trace!("Unmapped read8 at 0x{:08X}", addr);
                0
            }
        }
    }

    /// Read 16-bit big-endian value from memory
    ///
    /// Composed from two byte reads, so unaligned addresses are allowed.
    pub fn read16(&self, addr: u32) -> u16 {
        if let MemoryRegion::Device(id, offset) = self.identify_region(addr) {
            if addr & 0x1 == 0 {
                return self.devices[id.index()].read_register16(offset);
            }
        }

        u16::from_be_bytes([self.read8(addr), self.read8(addr.wrapping_add(1))])
    }

    /// Read 32-bit big-endian value from memory
    ///
    /// Aligned RAM/ROM words take a direct 4-byte path; everything else is
    /// composed from byte reads. Both agree for aligned addresses.
    pub fn read32(&self, addr: u32) -> u32 {
        if addr & 0x3 == 0 {
            match self.identify_region(addr) {
                MemoryRegion::Ram(offset) => return Self::load_word(&self.ram, offset),
                MemoryRegion::Rom(offset) if offset + 4 <= self.rom.len() => {
                    return Self::load_word(&self.rom, offset)
                }
                MemoryRegion::Device(id, offset) => {
                    let value = self.devices[id.index()].read_register(offset);
                    log::trace!("{:?} read32 at 0x{:08X} -> 0x{:08X}", id, addr, value);
                    return value;
                }
                _ => {}
            }
        }

        u32::from_be_bytes([
            self.read8(addr),
            self.read8(addr.wrapping_add(1)),
            self.read8(addr.wrapping_add(2)),
            self.read8(addr.wrapping_add(3)),
        ])
    }

    /// Write 8-bit value to memory
    pub fn write8(&mut self, addr: u32, value: u8) {
        match self.identify_region(addr) {
            MemoryRegion::Ram(offset) => self.ram[offset] = value,
            MemoryRegion::Sram(offset) => self.sram[offset] = value,
            MemoryRegion::Device(id, offset) => {
                log::trace!("{:?} write8 at 0x{:08X} <- 0x{:02X}", id, addr, value);
                self.devices[id.index()].write_register8(offset, value);
            }
            MemoryRegion::Rom(_) => {
                log::trace!("Ignoring write to ROM at 0x{:08X}", addr);
            }
            MemoryRegion::DeviceUnmapped | MemoryRegion::Unmapped => {
                log::trace!("Unmapped write8 at 0x{:08X} <- 0x{:02X}", addr, value);
            }
        }
    }

    /// Write 16-bit big-endian value to memory
    pub fn write16(&mut self, addr: u32, value: u16) {
        if let MemoryRegion::Device(id, offset) = self.identify_region(addr) {
            if addr & 0x1 == 0 {
                self.devices[id.index()].write_register16(offset, value);
                return;
            }
        }

        let [hi, lo] = value.to_be_bytes();
        self.write8(addr, hi);
        self.write8(addr.wrapping_add(1), lo);
    }

    /// Write 32-bit big-endian value to memory
    pub fn write32(&mut self, addr: u32, value: u32) {
        if addr & 0x3 == 0 {
            match self.identify_region(addr) {
                MemoryRegion::Ram(offset) => {
                    self.ram[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
                    return;
                }
                MemoryRegion::Device(id, offset) => {
                    log::trace!("{:?} write32 at 0x{:08X} <- 0x{:08X}", id, addr, value);
                    self.devices[id.index()].write_register(offset, value);
                    return;
                }
                _ => {}
            }
        }

        for (i, byte) in value.to_be_bytes().into_iter().enumerate() {
            self.write8(addr.wrapping_add(i as u32), byte);
        }
    }

    #[inline(always)]
    fn load_word(data: &[u8], offset: usize) -> u32 {
        u32::from_be_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ])
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSave for Bus {
    type State = MemoryState;

    fn to_state(&self) -> MemoryState {
        MemoryState {
            ram: self.ram.clone(),
        }
    }

    /// The RAM image length must already have been validated
    fn restore_from_state(&mut self, state: &MemoryState) {
        let len = state.ram.len().min(self.ram.len());
        self.ram[..len].copy_from_slice(&state.ram[..len]);
    }
}

#[cfg(test)]
mod tests;
