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

//! CPU execution tests

use super::*;

#[test]
fn test_system_step() {
    let mut system = system_with(&[0x2401_0005]); // addiu r1, r0, 5

    assert_eq!(system.step().unwrap(), 1);

    assert_eq!(system.cpu().reg(1), 5);
    assert_eq!(system.pc(), BOOT + 4);
    assert_eq!(system.cycles(), 1);
}

#[test]
fn test_system_step_n() {
    let mut system = system_with(&[]);

    system.step_n(10).unwrap();

    assert_eq!(system.cycles(), 10);
    assert_eq!(system.pc(), BOOT + 40);
}

#[test]
fn test_spin_loop_stays_put() {
    let mut system = system_with(&SPIN);

    system.step_n(2).unwrap();
    assert_eq!(system.pc(), BOOT);

    system.step_n(100).unwrap();
    assert_eq!(system.pc(), BOOT);
}

#[test]
fn test_runs_without_cartridge() {
    // The boot vector is unmapped, so it reads as a stream of NOPs
    let mut system = System::default();
    system.start();

    system.step_n(4).unwrap();

    assert_eq!(system.pc(), CPU::BOOT_VECTOR + 16);
    assert!(system.is_running());
}

#[test]
fn test_snapshot() {
    let mut system = system_with(&[
        0x2401_0005, // addiu r1, r0, 5
        0x240F_0007, // addiu r15, r0, 7
        0x0021_0019, // multu r1, r1
    ]);
    system.step_n(3).unwrap();

    let snapshot = system.snapshot();

    assert_eq!(snapshot.pc, BOOT + 12);
    assert_eq!(snapshot.regs[1], 5);
    assert_eq!(snapshot.regs[15], 7);
    assert_eq!(snapshot.lo, 25);
    assert_eq!(snapshot.hi, 0);
    assert_eq!(snapshot.cycles, 3);
    assert_eq!(snapshot.instructions, 3);
}

#[test]
fn test_snapshot_serializes() {
    let system = system_with(&[]);
    let snapshot = system.snapshot();

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: CpuSnapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(back, snapshot);
}

#[test]
fn test_trace_does_not_change_execution() {
    let mut traced = system_with(&[0x2401_0005, 0x0000_0000]);
    traced.set_trace(true);
    let mut plain = system_with(&[0x2401_0005, 0x0000_0000]);

    traced.step_n(2).unwrap();
    plain.step_n(2).unwrap();

    assert_eq!(traced.snapshot(), plain.snapshot());
}

#[test]
fn test_guarded_reports_fault() {
    let result: Result<u32> = guarded(0x8000_1234, || panic!("decoder exploded"));

    match result {
        Err(EmulatorError::ExecutionFault { pc, message }) => {
            assert_eq!(pc, 0x8000_1234);
            assert_eq!(message, "decoder exploded");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_guarded_formatted_message() {
    let index = 40;
    let result: Result<u32> = guarded(0, || panic!("register {} out of range", index));

    assert!(matches!(
        result,
        Err(EmulatorError::ExecutionFault { ref message, .. }) if message == "register 40 out of range"
    ));
}

#[test]
fn test_guarded_passes_value() {
    assert_eq!(guarded(0, || 7u32).unwrap(), 7);
}

#[test]
fn test_paused_system_single_steps() {
    let mut system = system_with(&[0x2401_0005, 0x2402_0006]);
    system.start();
    system.step().unwrap();
    system.pause();

    system.step().unwrap();

    assert_eq!(system.cpu().reg(2), 6);
    assert_eq!(system.pc(), BOOT + 8);
    assert!(!system.is_running());
}

#[test]
fn test_dump_carries_header_and_snapshot() {
    let mut system = system_with(&[0x2401_0005]);
    system.step().unwrap();

    let value = serde_json::to_value(system.dump()).unwrap();

    assert_eq!(value["header"]["name"], "TESTROM");
    assert_eq!(value["header"]["boot_address"], BOOT);
    assert_eq!(value["snapshot"]["pc"], BOOT + 4);
    assert_eq!(value["snapshot"]["regs"][1], 5);
}

#[test]
fn test_dump_without_cartridge() {
    let system = System::default();

    let value = serde_json::to_value(system.dump()).unwrap();

    assert!(value["header"].is_null());
    assert_eq!(value["snapshot"]["pc"], CPU::BOOT_VECTOR);
}
