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

mod common;

use common::fixtures::{
    rom_image, system_with_program, to_byte_swapped, to_little_endian, ROM_BOOT,
};
use common::test_roms::*;
use mipsemu::core::config::EmulatorConfig;
use mipsemu::core::cpu::{ExceptionCause, CPU, COP0};
use mipsemu::core::error::{EmulatorError, Result};
use mipsemu::core::memory::{DeviceId, SaveType};
use mipsemu::core::save_state::SaveState;
use mipsemu::core::system::System;
use mipsemu::core::Endianness;

#[test]
fn test_basic_initialization() -> Result<()> {
    let system = System::new(EmulatorConfig::default());
    assert_eq!(system.cycles(), 0);
    assert_eq!(system.cpu().pc(), CPU::BOOT_VECTOR);
    Ok(())
}

#[test]
fn test_testrom_boot() -> Result<()> {
    let image = rom_image(0x8000_1000, "TESTROM", &[]);
    let mut system = System::new(EmulatorConfig::default());

    let header = system.load_rom(image)?;
    system.start();

    assert_eq!(header.name, "TESTROM");
    assert_eq!(header.boot_address, 0x8000_1000);
    assert_eq!(header.endianness, Endianness::Big);
    assert_eq!(header.country, "USA");
    assert_eq!(system.pc(), 0x8000_1000);
    Ok(())
}

#[test]
fn test_all_dump_formats_agree() -> Result<()> {
    let big = rom_image(ROM_BOOT, "TESTROM", &test_program_basic_arithmetic());

    let mut headers = Vec::new();
    for (image, format) in [
        (big.clone(), Endianness::Big),
        (to_little_endian(&big), Endianness::Little),
        (to_byte_swapped(&big), Endianness::ByteSwapped),
    ] {
        let mut system = System::new(EmulatorConfig::default());
        let header = system.load_rom(image)?;
        assert_eq!(header.endianness, format);
        assert_eq!(system.bus().rom(), &big[..]);

        system.start();
        system.step_n(3)?;
        assert_eq!(system.cpu().reg(3), 3);
        headers.push(header);
    }

    assert!(headers.iter().all(|h| h.name == "TESTROM"));
    assert!(headers.iter().all(|h| h.fingerprint == headers[0].fingerprint));
    Ok(())
}

#[test]
fn test_invalid_image_rejected() {
    let mut system = System::new(EmulatorConfig::default());
    let result = system.load_rom(vec![0u8; 0x100]);
    assert!(matches!(result, Err(EmulatorError::InvalidRomMagic { magic: 0 })));
}

#[test]
fn test_arithmetic_program() -> Result<()> {
    let mut system = system_with_program(&test_program_basic_arithmetic());
    system.step_n(4)?;

    assert_eq!(system.cpu().reg(1), 1);
    assert_eq!(system.cpu().reg(2), 2);
    assert_eq!(system.cpu().reg(3), 3);
    assert_eq!(system.pc(), ROM_BOOT + 16);
    Ok(())
}

#[test]
fn test_load_store_program() -> Result<()> {
    let mut system = system_with_program(&test_program_load_store());
    system.step_n(5)?;

    assert_eq!(system.cpu().reg(3), 0xAA);
    // Cached and uncached views share RAM
    assert_eq!(system.bus().read32(0x0000_0100), 0xAA);
    Ok(())
}

#[test]
fn test_branch_program() -> Result<()> {
    let mut system = system_with_program(&test_program_branch());
    system.step_n(5)?;

    assert_eq!(system.cpu().reg(4), 1);
    assert_eq!(system.cpu().reg(3), 0);
    assert_eq!(system.cpu().reg(5), 0x55);
    Ok(())
}

#[test]
fn test_mmio_program() -> Result<()> {
    let mut system = system_with_program(&test_program_mmio());
    system.step_n(5)?;

    assert_eq!(system.cpu().reg(3), 0x1234);
    assert_eq!(system.bus().device(DeviceId::Mi).registers()[1], 0x1234);
    Ok(())
}

#[test]
fn test_syscall_vectors() -> Result<()> {
    let mut system = system_with_program(&test_program_syscall());
    system.step_n(3)?;

    let cpu = system.cpu();
    assert_eq!(cpu.reg(1), 10);
    assert_eq!(cpu.pending_exception(), Some(ExceptionCause::Syscall));
    assert_eq!(cpu.cop0().read(COP0::EPC), ROM_BOOT + 4);
    assert_eq!(cpu.pc(), CPU::EXCEPTION_VECTOR + 4);
    assert!(system.is_running());
    Ok(())
}

#[test]
fn test_save_type_detection() -> Result<()> {
    let mut image = rom_image(ROM_BOOT, "TESTROM", &[]);
    image[0x1800..0x1806].copy_from_slice(b"EEPROM");

    let mut system = System::new(EmulatorConfig::default());
    system.load_rom(image)?;

    assert_eq!(system.bus().save_type(), SaveType::Eeprom);
    Ok(())
}

#[test]
fn test_save_state_file_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("testrom.state");

    let mut system = system_with_program(&test_program_load_store());
    system.step_n(3)?;
    system.save_state().save_to_file(&path)?;

    let mut restored = system_with_program(&test_program_load_store());
    restored.load_state(&SaveState::load_from_file(&path)?)?;
    restored.step_n(2)?;

    assert_eq!(restored.cpu().reg(3), 0xAA);
    assert_eq!(restored.pc(), ROM_BOOT + 20);
    Ok(())
}

#[test]
fn test_config_file_enables_trap() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mipsemu.toml");
    std::fs::write(&path, "[cpu]\ntrap_on_overflow = true\n")?;

    let config = EmulatorConfig::load(&path)?;
    let mut system = System::new(config);
    system.load_rom(rom_image(
        ROM_BOOT,
        "TESTROM",
        &[
            0x3C017FFF, // LUI   $1, 0x7FFF
            0x3421FFFF, // ORI   $1, $1, 0xFFFF
            0x00211020, // ADD   $2, $1, $1
        ],
    ))?;
    system.start();
    system.step_n(3)?;

    assert_eq!(system.cpu().pending_exception(), Some(ExceptionCause::Overflow));
    assert_eq!(system.cpu().reg(2), 0);
    Ok(())
}
