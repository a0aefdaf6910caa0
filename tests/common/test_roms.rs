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

//! Small test programs
//!
//! All programs run from ROM; data goes to RAM through the uncached mirror.

/// Register arithmetic
#[allow(dead_code)]
pub fn test_program_basic_arithmetic() -> Vec<u32> {
    vec![
        0x24010001, // ADDIU $1, $0, 1      ; $1 = 1
        0x24020002, // ADDIU $2, $0, 2      ; $2 = 2
        0x00221820, // ADD   $3, $1, $2     ; $3 = $1 + $2 = 3
        0x00000000, // NOP
    ]
}

/// Load/Store through the uncached RAM mirror
#[allow(dead_code)]
pub fn test_program_load_store() -> Vec<u32> {
    vec![
        0x3C01A000, // LUI   $1, 0xA000     ; $1 = 0xA0000000
        0x240200AA, // ADDIU $2, $0, 0xAA   ; $2 = 0xAA
        0xAC220100, // SW    $2, 0x100($1)  ; Store to 0xA0000100
        0x8C230100, // LW    $3, 0x100($1)  ; Load from 0xA0000100
        0x00000000, // NOP (load commits)
    ]
}

/// Taken branch with a delay slot
#[allow(dead_code)]
pub fn test_program_branch() -> Vec<u32> {
    vec![
        0x24010001, // ADDIU $1, $0, 1      ; $1 = 1
        0x24020001, // ADDIU $2, $0, 1      ; $2 = 1
        0x10220002, // BEQ   $1, $2, +2     ; Branch if equal
        0x24040001, // ADDIU $4, $0, 1      ; Delay slot, executed
        0x24030042, // ADDIU $3, $0, 0x42   ; Skipped
        0x24050055, // ADDIU $5, $0, 0x55   ; Branch target
    ]
}

/// Interface register access (MI register 1)
#[allow(dead_code)]
pub fn test_program_mmio() -> Vec<u32> {
    vec![
        0x3C010430, // LUI   $1, 0x0430     ; MI base
        0x24021234, // ADDIU $2, $0, 0x1234
        0xAC220004, // SW    $2, 4($1)
        0x8C230004, // LW    $3, 4($1)
        0x00000000, // NOP (load commits)
    ]
}

/// SYSCALL followed by work that must not run
#[allow(dead_code)]
pub fn test_program_syscall() -> Vec<u32> {
    vec![
        0x2401000A, // ADDIU $1, $0, 10
        0x0000000C, // SYSCALL
        0x24010063, // ADDIU $1, $0, 99     ; Not reached
    ]
}
