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

//! System module tests
//!
//! Tests are categorized by functionality:
//! - `basic`: construction, cartridge loading, reset/start
//! - `execution`: stepping, fault handling, snapshots
//! - `state`: save state capture and restore
//! - `runner`: threaded runner control

use super::*;

mod basic;
mod execution;

/// Boot address of the test cartridge (ROM, uncached mirror)
pub(super) const BOOT: u32 = 0xB000_1000;

/// Build a big-endian cartridge image named "TESTROM" whose code at
/// [`BOOT`] is `program`
pub(super) fn test_rom(program: &[u32]) -> Vec<u8> {
    let mut image = vec![0u8; 0x2000];
    image[0..4].copy_from_slice(&0x8037_1240u32.to_be_bytes());
    image[0x08..0x0C].copy_from_slice(&BOOT.to_be_bytes());
    image[0x20..0x27].copy_from_slice(b"TESTROM");

    let base = (BOOT - 0xB000_0000) as usize;
    for (i, word) in program.iter().enumerate() {
        let offset = base + i * 4;
        image[offset..offset + 4].copy_from_slice(&word.to_be_bytes());
    }
    image
}

/// System with [`test_rom`] loaded
pub(super) fn system_with(program: &[u32]) -> System {
    let mut system = System::new(EmulatorConfig::default());
    system.load_rom(test_rom(program)).unwrap();
    system
}

/// `j BOOT` followed by its delay slot
pub(super) const SPIN: [u32; 2] = [0x0800_0400, 0x0000_0000];
