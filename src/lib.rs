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

//! MIPS R4300i interpreter core
//!
//! This library provides a cycle-stepped interpreter for a 32-bit MIPS-family
//! instruction set together with the N64-style address space it executes
//! against: CPU, COP0, memory bus, cartridge inspection and save states.
//!
//! # Example
//!
//! ```
//! use mipsemu::core::cpu::CPU;
//! use mipsemu::core::memory::Bus;
//!
//! let mut cpu = CPU::new();
//! let mut bus = Bus::new();
//!
//! // ADDIU r1, r0, 5 at the boot vector
//! cpu.reset_to(0x0000_1000);
//! bus.write32(0x0000_1000, 0x2401_0005);
//! cpu.step(&mut bus);
//! assert_eq!(cpu.reg(1), 5);
//! ```

pub mod core;
