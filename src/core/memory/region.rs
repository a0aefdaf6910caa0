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

//! Memory region identification
//!
//! Addresses are matched directly against fixed windows. There is no
//! segment translation: the uncached alias of RAM, ROM and SRAM is listed
//! as a second window over the same backing store.

use super::Bus;

/// Memory region identification
///
/// The offset carried by each variant is the index into the backing store
/// (or into the device window for [`MemoryRegion::Device`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRegion {
    /// Main RAM (8MB)
    Ram(usize),
    /// Cartridge ROM (read-only)
    Rom(usize),
    /// Battery-backed SRAM (32KB)
    Sram(usize),
    /// Interface register block, offset relative to the block base
    Device(DeviceId, u32),
    /// Inside the interface window but not backed by a register
    DeviceUnmapped,
    /// Unmapped region
    Unmapped,
}

/// Interface register blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceId {
    /// MIPS Interface
    Mi,
    /// Video Interface
    Vi,
    /// Audio Interface
    Ai,
    /// Peripheral Interface
    Pi,
}

impl DeviceId {
    /// All devices in bus order
    pub const ALL: [DeviceId; 4] = [DeviceId::Mi, DeviceId::Vi, DeviceId::Ai, DeviceId::Pi];

    /// Base address of the register block
    pub const fn base(self) -> u32 {
        match self {
            DeviceId::Mi => 0x0430_0000,
            DeviceId::Vi => 0x0440_0000,
            DeviceId::Ai => 0x0450_0000,
            DeviceId::Pi => 0x0460_0000,
        }
    }

    /// Number of 32-bit registers in the block
    pub const fn register_count(self) -> usize {
        match self {
            DeviceId::Mi => 8,
            DeviceId::Vi => 16,
            DeviceId::Ai => 8,
            DeviceId::Pi => 16,
        }
    }

    /// Position in [`ALL`](Self::ALL)
    pub(super) const fn index(self) -> usize {
        match self {
            DeviceId::Mi => 0,
            DeviceId::Vi => 1,
            DeviceId::Ai => 2,
            DeviceId::Pi => 3,
        }
    }

    /// Select the device from address bits 20-23 of an interface address
    fn from_address(addr: u32) -> Option<Self> {
        match (addr >> 20) & 0xF {
            0x3 => Some(DeviceId::Mi),
            0x4 => Some(DeviceId::Vi),
            0x5 => Some(DeviceId::Ai),
            0x6 => Some(DeviceId::Pi),
            _ => None,
        }
    }
}

impl Bus {
    /// RAM primary window
    pub(super) const RAM_START: u32 = 0x0000_0000;
    pub(super) const RAM_END: u32 = 0x0080_0000;
    /// RAM uncached mirror
    pub(super) const RAM_MIRROR_START: u32 = 0xA000_0000;
    pub(super) const RAM_MIRROR_END: u32 = 0xA080_0000;

    /// Cartridge ROM primary window
    pub(super) const ROM_START: u32 = 0x1000_0000;
    pub(super) const ROM_END: u32 = 0x1FC0_0000;
    /// Cartridge ROM uncached mirror
    pub(super) const ROM_MIRROR_START: u32 = 0xB000_0000;
    pub(super) const ROM_MIRROR_END: u32 = 0xC000_0000;

    /// SRAM primary window
    pub(super) const SRAM_START: u32 = 0x0800_0000;
    pub(super) const SRAM_END: u32 = 0x0800_8000;
    /// SRAM uncached mirror
    pub(super) const SRAM_MIRROR_START: u32 = 0xA800_0000;
    pub(super) const SRAM_MIRROR_END: u32 = 0xA800_8000;

    /// Interface register window
    pub(super) const DEVICE_START: u32 = 0x0400_0000;
    pub(super) const DEVICE_END: u32 = 0x0500_0000;

    /// Identify memory region for an address
    ///
    /// # Example
    ///
    /// ```
    /// use mipsemu::core::memory::{Bus, DeviceId, MemoryRegion};
    ///
    /// let bus = Bus::new();
    ///
    /// assert_eq!(bus.identify_region(0x0000_1000), MemoryRegion::Ram(0x1000));
    /// assert_eq!(bus.identify_region(0xA000_1000), MemoryRegion::Ram(0x1000));
    /// assert_eq!(bus.identify_region(0xB000_0040), MemoryRegion::Rom(0x40));
    /// assert_eq!(bus.identify_region(0x0440_0004), MemoryRegion::Device(DeviceId::Vi, 4));
    /// assert_eq!(bus.identify_region(0x8000_0000), MemoryRegion::Unmapped);
    /// ```
    pub fn identify_region(&self, addr: u32) -> MemoryRegion {
        if (Self::RAM_START..Self::RAM_END).contains(&addr) {
            MemoryRegion::Ram((addr - Self::RAM_START) as usize)
        } else if (Self::RAM_MIRROR_START..Self::RAM_MIRROR_END).contains(&addr) {
            MemoryRegion::Ram((addr - Self::RAM_MIRROR_START) as usize)
        } else if (Self::ROM_START..Self::ROM_END).contains(&addr) {
            MemoryRegion::Rom((addr - Self::ROM_START) as usize)
        } else if (Self::ROM_MIRROR_START..Self::ROM_MIRROR_END).contains(&addr) {
            MemoryRegion::Rom((addr - Self::ROM_MIRROR_START) as usize)
        } else if (Self::SRAM_START..Self::SRAM_END).contains(&addr) {
            MemoryRegion::Sram((addr - Self::SRAM_START) as usize)
        } else if (Self::SRAM_MIRROR_START..Self::SRAM_MIRROR_END).contains(&addr) {
            MemoryRegion::Sram((addr - Self::SRAM_MIRROR_START) as usize)
        } else if (Self::DEVICE_START..Self::DEVICE_END).contains(&addr) {
            Self::identify_device(addr)
        } else {
            MemoryRegion::Unmapped
        }
    }

    fn identify_device(addr: u32) -> MemoryRegion {
        match DeviceId::from_address(addr) {
            Some(id) => {
                let offset = addr - id.base();
                if (offset as usize) < id.register_count() * 4 {
                    MemoryRegion::Device(id, offset)
                } else {
                    MemoryRegion::DeviceUnmapped
                }
            }
            None => MemoryRegion::DeviceUnmapped,
        }
    }
}
