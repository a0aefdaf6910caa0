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

//! Cartridge save-type detection
//!
//! A rough heuristic: the ROM is searched for library marker strings. The
//! result is informational only and never changes address decoding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Save hardware a cartridge appears to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveType {
    /// Battery-backed SRAM
    Sram,
    /// Serial EEPROM
    Eeprom,
    /// FlashRAM
    FlashRam,
    /// No marker found (or no ROM)
    #[default]
    None,
}

impl SaveType {
    /// Images smaller than this are not classified
    pub const MIN_ROM_SIZE: usize = 0x1000;
    /// Only this many leading bytes are scanned
    pub const SCAN_LIMIT: usize = 0x10_0000;

    /// Classify a normalized ROM image
    ///
    /// Markers are matched case-insensitively in priority order SRAM,
    /// EEPROM, FlashRAM.
    ///
    /// # Example
    ///
    /// ```
    /// use mipsemu::core::memory::SaveType;
    ///
    /// let mut rom = vec![0u8; 0x2000];
    /// rom[0x1800..0x1806].copy_from_slice(b"EEPROM");
    /// assert_eq!(SaveType::detect(&rom), SaveType::Eeprom);
    /// ```
    pub fn detect(rom: &[u8]) -> Self {
        if rom.len() < Self::MIN_ROM_SIZE {
            return SaveType::None;
        }

        let scan = &rom[..rom.len().min(Self::SCAN_LIMIT)];
        let markers: [(&[u8], SaveType); 3] = [
            (b"sram", SaveType::Sram),
            (b"eeprom", SaveType::Eeprom),
            (b"flash", SaveType::FlashRam),
        ];

        markers
            .iter()
            .find(|(marker, _)| contains_ignore_case(scan, marker))
            .map(|&(_, save_type)| save_type)
            .unwrap_or(SaveType::None)
    }
}

impl fmt::Display for SaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SaveType::Sram => "SRAM",
            SaveType::Eeprom => "EEPROM",
            SaveType::FlashRam => "FlashRAM",
            SaveType::None => "None",
        };
        f.write_str(name)
    }
}

/// `needle` must already be lower case
fn contains_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_with(marker: &[u8], at: usize) -> Vec<u8> {
        let mut rom = vec![0u8; 0x4000];
        rom[at..at + marker.len()].copy_from_slice(marker);
        rom
    }

    #[test]
    fn test_detect_each_marker() {
        assert_eq!(SaveType::detect(&rom_with(b"SRAM", 0x100)), SaveType::Sram);
        assert_eq!(SaveType::detect(&rom_with(b"eeprom", 0x100)), SaveType::Eeprom);
        assert_eq!(SaveType::detect(&rom_with(b"FlashRAM", 0x100)), SaveType::FlashRam);
        assert_eq!(SaveType::detect(&vec![0u8; 0x4000]), SaveType::None);
    }

    #[test]
    fn test_priority_order() {
        let mut rom = rom_with(b"flash", 0x100);
        rom[0x200..0x206].copy_from_slice(b"EEPROM");
        assert_eq!(SaveType::detect(&rom), SaveType::Eeprom);

        rom[0x300..0x304].copy_from_slice(b"sRaM");
        assert_eq!(SaveType::detect(&rom), SaveType::Sram);
    }

    #[test]
    fn test_small_image_not_classified() {
        let mut rom = vec![0u8; 0x800];
        rom[0x10..0x14].copy_from_slice(b"SRAM");
        assert_eq!(SaveType::detect(&rom), SaveType::None);
    }

    #[test]
    fn test_marker_beyond_scan_limit_ignored() {
        let mut rom = vec![0u8; SaveType::SCAN_LIMIT + 0x100];
        rom[SaveType::SCAN_LIMIT + 0x10..SaveType::SCAN_LIMIT + 0x14].copy_from_slice(b"SRAM");
        assert_eq!(SaveType::detect(&rom), SaveType::None);
    }

    #[test]
    fn test_display() {
        assert_eq!(SaveType::FlashRam.to_string(), "FlashRAM");
        assert_eq!(SaveType::default().to_string(), "None");
    }
}
