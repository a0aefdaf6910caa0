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

//! CPU test modules
//!
//! Tests are organized into the following categories:
//! - `basic`: CPU initialization, reset, register access, PC handling
//! - `load_delay`: Load delay behavior and load instructions
//! - `delay_slot`: Branch delay slot and jump targets
//! - `exceptions`: SYSCALL, BREAK, overflow traps, ERET
//! - `cop0`: COP0 register policy and moves
//! - `decode`: Instruction decoding and disassembly
//! - `instructions`: ALU, multiply/divide, stores, LL/SC
//! - `timer`: Count/Compare timer

use super::*;
use crate::core::memory::Bus;

mod cop0;

/// Where test programs are placed (RAM)
pub(super) const BASE: u32 = 0x0000_1000;

pub(super) const NOP: u32 = 0x0000_0000;

pub(super) fn r_type(rs: u8, rt: u8, rd: u8, sa: u8, funct: u8) -> u32 {
    ((rs as u32) << 21)
        | ((rt as u32) << 16)
        | ((rd as u32) << 11)
        | ((sa as u32) << 6)
        | funct as u32
}

pub(super) fn i_type(op: u8, rs: u8, rt: u8, imm: u16) -> u32 {
    ((op as u32) << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | imm as u32
}

pub(super) fn j_type(op: u8, target: u32) -> u32 {
    ((op as u32) << 26) | (target & 0x03FF_FFFF)
}

/// Load `program` at [`BASE`] and point the CPU at it
pub(super) fn setup(program: &[u32]) -> (CPU, Bus) {
    let mut cpu = CPU::new();
    let mut bus = Bus::new();
    for (i, word) in program.iter().enumerate() {
        bus.write32(BASE + (i as u32) * 4, *word);
    }
    cpu.reset_to(BASE);
    (cpu, bus)
}

pub(super) fn run(cpu: &mut CPU, bus: &mut Bus, steps: usize) {
    for _ in 0..steps {
        cpu.step(bus);
    }
}
