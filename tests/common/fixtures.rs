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

//! Test fixtures for common test scenarios

use mipsemu::core::config::EmulatorConfig;
use mipsemu::core::system::System;

/// Boot address used by [`rom_image`] programs (ROM, uncached mirror)
#[allow(dead_code)]
pub const ROM_BOOT: u32 = 0xB000_1000;

/// ROM offset the program is placed at
const PROGRAM_OFFSET: usize = 0x1000;

/// Build a big-endian cartridge image
///
/// The header carries the z64 magic, `boot` at 0x08 and `name` at 0x20.
/// `program` is stored at ROM offset 0x1000, which is where [`ROM_BOOT`]
/// points.
#[allow(dead_code)]
pub fn rom_image(boot: u32, name: &str, program: &[u32]) -> Vec<u8> {
    let mut image = vec![0u8; 0x2000];
    image[0..4].copy_from_slice(&0x8037_1240u32.to_be_bytes());
    image[0x08..0x0C].copy_from_slice(&boot.to_be_bytes());

    let name = name.as_bytes();
    let len = name.len().min(20);
    image[0x20..0x20 + len].copy_from_slice(&name[..len]);
    image[0x3E] = b'E';

    for (i, word) in program.iter().enumerate() {
        let offset = PROGRAM_OFFSET + i * 4;
        image[offset..offset + 4].copy_from_slice(&word.to_be_bytes());
    }
    image
}

/// Re-order a big-endian image the way an .n64 dump stores it
#[allow(dead_code)]
pub fn to_little_endian(image: &[u8]) -> Vec<u8> {
    image
        .chunks(4)
        .flat_map(|c| c.iter().rev().copied().collect::<Vec<_>>())
        .collect()
}

/// Re-order a big-endian image the way a .v64 dump stores it
#[allow(dead_code)]
pub fn to_byte_swapped(image: &[u8]) -> Vec<u8> {
    image
        .chunks(2)
        .flat_map(|c| c.iter().rev().copied().collect::<Vec<_>>())
        .collect()
}

/// Create a started System executing `program` from [`ROM_BOOT`]
#[allow(dead_code)]
pub fn system_with_program(program: &[u32]) -> System {
    let mut system = System::new(EmulatorConfig::default());
    system
        .load_rom(rom_image(ROM_BOOT, "TESTROM", program))
        .expect("test image is valid");
    system.start();
    system
}
