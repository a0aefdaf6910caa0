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

//! Basic system functionality tests

use super::*;

#[test]
fn test_system_initialization() {
    let system = System::new(EmulatorConfig::default());
    assert_eq!(system.pc(), CPU::BOOT_VECTOR);
    assert_eq!(system.cycles(), 0);
    assert!(!system.is_running());
    assert!(system.header().is_none());
    assert!(!system.bus().has_rom());
}

#[test]
fn test_load_rom_boots_at_header_address() {
    let mut system = System::new(EmulatorConfig::default());

    let header = system.load_rom(test_rom(&[])).unwrap();

    assert_eq!(header.name, "TESTROM");
    assert_eq!(header.boot_address, BOOT);
    assert_eq!(system.pc(), BOOT);
    assert_eq!(system.boot_address(), BOOT);
    assert_eq!(system.header().map(|h| h.name.as_str()), Some("TESTROM"));
}

#[test]
fn test_start_uses_boot_address() {
    let mut image = test_rom(&[]);
    image[0x08..0x0C].copy_from_slice(&0x8000_1000u32.to_be_bytes());

    let mut system = System::new(EmulatorConfig::default());
    let header = system.load_rom(image).unwrap();
    system.start();

    assert_eq!(header.boot_address, 0x8000_1000);
    assert_eq!(system.pc(), 0x8000_1000);
    assert!(system.is_running());
}

#[test]
fn test_invalid_rom_leaves_system_untouched() {
    let mut system = system_with(&SPIN);
    system.step_n(3).unwrap();
    let pc = system.pc();

    let result = system.load_rom(vec![0xFFu8; 0x1000]);

    assert!(matches!(
        result,
        Err(EmulatorError::InvalidRomMagic { magic: 0xFFFF_FFFF })
    ));
    assert_eq!(system.pc(), pc);
    assert_eq!(system.cycles(), 3);
    assert_eq!(system.header().map(|h| h.name.as_str()), Some("TESTROM"));
}

#[test]
fn test_short_rom_rejected() {
    let mut system = System::new(EmulatorConfig::default());
    let result = system.load_rom(vec![0x80, 0x37, 0x12, 0x40]);
    assert!(matches!(result, Err(EmulatorError::RomTooSmall { .. })));
    assert!(!system.bus().has_rom());
}

#[test]
fn test_little_endian_rom_is_normalized() {
    let big = test_rom(&[0x2401_0005]);
    let little: Vec<u8> = big
        .chunks(4)
        .flat_map(|c| [c[3], c[2], c[1], c[0]])
        .collect();

    let mut system = System::new(EmulatorConfig::default());
    let header = system.load_rom(little).unwrap();

    assert_eq!(header.name, "TESTROM");
    assert_eq!(system.bus().rom(), &big[..]);

    system.step().unwrap();
    assert_eq!(system.cpu().reg(1), 5);
}

#[test]
fn test_reset_clears_ram_keeps_rom() {
    let mut system = system_with(&SPIN);
    system.bus_mut().write32(0x0000_0100, 0xDEAD_BEEF);
    system.step_n(5).unwrap();

    system.reset();

    assert_eq!(system.bus().read32(0x0000_0100), 0);
    assert_eq!(system.bus().read32(BOOT), SPIN[0]);
    assert_eq!(system.pc(), BOOT);
    assert_eq!(system.cycles(), 0);
    assert!(!system.is_running());
}

#[test]
fn test_pause_resume_keep_state() {
    let mut system = system_with(&SPIN);
    system.start();
    system.step_n(3).unwrap();

    system.pause();
    assert!(!system.is_running());
    assert_eq!(system.cycles(), 3);

    system.resume();
    assert!(system.is_running());
    assert_eq!(system.cycles(), 3);
}

#[test]
fn test_config_enables_overflow_trap() {
    let mut config = EmulatorConfig::default();
    config.cpu.trap_on_overflow = true;

    let mut system = System::new(config);
    system
        .load_rom(test_rom(&[
            0x3C01_7FFF, // lui r1, 0x7FFF
            0x3421_FFFF, // ori r1, r1, 0xFFFF
            0x2022_0001, // addi r2, r1, 1
        ]))
        .unwrap();
    assert!(system.config().cpu.trap_on_overflow);

    system.step_n(3).unwrap();

    assert_eq!(system.pc(), CPU::EXCEPTION_VECTOR);
    assert_eq!(system.cpu().reg(2), 0);
    assert_eq!(
        system.cpu().cop0().read(crate::core::cpu::COP0::EPC),
        BOOT + 8
    );
}
