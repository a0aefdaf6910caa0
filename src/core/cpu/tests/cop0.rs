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

use super::*;

#[test]
fn test_reset_values() {
    let cop0 = COP0::new();
    assert_eq!(cop0.read(COP0::STATUS), COP0::STATUS_RESET);
    assert_eq!(cop0.read(COP0::PRID), 0x0000_0B00);
    assert_eq!(cop0.read(COP0::COUNT), 0);
    assert_eq!(cop0.read(COP0::CAUSE), 0);
}

#[test]
fn test_write_policy() {
    let mut cop0 = COP0::new();

    cop0.write(COP0::INDEX, 0xFFFF_FFFF);
    assert_eq!(cop0.read(COP0::INDEX), 0x3F);

    cop0.write(COP0::RANDOM, 5);
    assert_eq!(cop0.read(COP0::RANDOM), 0);

    cop0.write(COP0::EPC, 0x8000_1234);
    assert_eq!(cop0.read(COP0::EPC), 0x8000_1234);

    cop0.write(COP0::TAG_LO, 0xABCD);
    assert_eq!(cop0.read(COP0::TAG_LO), 0xABCD);
}

#[test]
fn test_register_index_wraps() {
    let mut cop0 = COP0::new();
    cop0.write(32 + COP0::EPC, 0x1111);
    assert_eq!(cop0.read(COP0::EPC), 0x1111);
    assert_eq!(cop0.read(32 + COP0::PRID), COP0::PRID_VALUE);
}

#[test]
fn test_compare_write_acknowledges_timer() {
    let mut cop0 = COP0::new();
    cop0.check_timer();
    assert!(cop0.cause().contains(CauseFlags::TIMER));

    cop0.write(COP0::COMPARE, 1000);

    assert!(!cop0.cause().contains(CauseFlags::TIMER));
    assert_eq!(cop0.read(COP0::COMPARE), 1000);
}

#[test]
fn test_restore_bypasses_policy() {
    let mut cop0 = COP0::new();
    let mut regs = [0u32; 32];
    regs[COP0::RANDOM] = 31;
    regs[COP0::INDEX] = 0xFFFF;

    cop0.restore(&regs);

    assert_eq!(cop0.regs(), &regs);
}

#[test]
fn test_mfc0_is_delayed() {
    let (mut cpu, mut bus) = setup(&[
        0x4001_7800, // mfc0 r1, PRId
        NOP,
    ]);

    cpu.step(&mut bus);
    assert_eq!(cpu.reg(1), 0);

    cpu.step(&mut bus);
    assert_eq!(cpu.reg(1), COP0::PRID_VALUE);
}

#[test]
fn test_mtc0_writes_register() {
    let (mut cpu, mut bus) = setup(&[
        0x4081_6000, // mtc0 r1, Status
        0x4082_0000, // mtc0 r2, Index
    ]);
    cpu.set_reg(1, 0x1234_0001);
    cpu.set_reg(2, 0x1FF);

    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.cop0().read(COP0::STATUS), 0x1234_0001);
    assert!(cpu.cop0().status().contains(StatusFlags::IE));
    assert_eq!(cpu.cop0().read(COP0::INDEX), 0x3F);
}
