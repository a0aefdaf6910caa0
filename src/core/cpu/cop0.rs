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

use bitflags::bitflags;

bitflags! {
    /// Status register bits the interpreter acts on
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u32 {
        /// Interrupt enable
        const IE = 1 << 0;
        /// Exception level
        const EXL = 1 << 1;
        /// Error level
        const ERL = 1 << 2;
    }
}

bitflags! {
    /// Cause register bits outside the exception code field
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CauseFlags: u32 {
        /// Timer interrupt pending (IP7)
        const TIMER = 1 << 15;
    }
}

/// Coprocessor 0 (System Control)
///
/// Holds the 32-entry system control register file. TLB registers are
/// plain storage; address translation is not modelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct COP0 {
    /// COP0 registers (32 registers)
    pub(super) regs: [u32; 32],
}

impl COP0 {
    pub const INDEX: usize = 0;
    pub const RANDOM: usize = 1;
    pub const ENTRY_LO0: usize = 2;
    pub const ENTRY_LO1: usize = 3;
    pub const CONTEXT: usize = 4;
    pub const PAGE_MASK: usize = 5;
    pub const WIRED: usize = 6;
    pub const BAD_VADDR: usize = 8;
    /// Timer counter, advanced every other cycle
    pub const COUNT: usize = 9;
    pub const ENTRY_HI: usize = 10;
    /// Timer compare value
    pub const COMPARE: usize = 11;
    /// Status Register
    pub const STATUS: usize = 12;
    /// Cause Register
    pub const CAUSE: usize = 13;
    /// Exception PC
    pub const EPC: usize = 14;
    /// Processor ID
    pub const PRID: usize = 15;
    pub const CONFIG: usize = 16;
    pub const LL_ADDR: usize = 17;
    pub const WATCH_LO: usize = 18;
    pub const WATCH_HI: usize = 19;
    pub const XCONTEXT: usize = 20;
    pub const PERR: usize = 26;
    pub const CACHE_ERR: usize = 27;
    pub const TAG_LO: usize = 28;
    pub const TAG_HI: usize = 29;
    pub const ERROR_EPC: usize = 30;

    /// Status value after reset (CU0, CU1, FR)
    pub const STATUS_RESET: u32 = 0x3400_0000;

    /// R4300i processor identifier
    pub const PRID_VALUE: u32 = 0x0000_0B00;

    /// Mask of the exception code field (Cause bits 2-6)
    const EXC_CODE_MASK: u32 = 0x7C;

    /// Create a new COP0 instance with reset values
    pub fn new() -> Self {
        let mut cop0 = Self { regs: [0u32; 32] };
        cop0.reset();
        cop0
    }

    /// Reset COP0 registers to initial state
    pub fn reset(&mut self) {
        self.regs = [0u32; 32];
        self.regs[Self::STATUS] = Self::STATUS_RESET;
        self.regs[Self::PRID] = Self::PRID_VALUE;
    }

    /// Read a register, index taken modulo 32
    #[inline(always)]
    pub fn read(&self, reg: usize) -> u32 {
        self.regs[reg & 0x1F]
    }

    /// Write a register, applying the per-register policy
    ///
    /// - Index keeps its low 6 bits
    /// - Random ignores writes
    /// - Compare also acknowledges the timer interrupt
    pub fn write(&mut self, reg: usize, value: u32) {
        match reg & 0x1F {
            Self::INDEX => self.regs[Self::INDEX] = value & 0x3F,
            Self::RANDOM => {}
            Self::COMPARE => {
                self.regs[Self::COMPARE] = value;
                self.regs[Self::CAUSE] &= !CauseFlags::TIMER.bits();
            }
            index => self.regs[index] = value,
        }
    }

    /// Raw register file
    pub fn regs(&self) -> &[u32; 32] {
        &self.regs
    }

    /// Overwrite the whole register file, bypassing the write policy
    pub fn restore(&mut self, regs: &[u32; 32]) {
        self.regs = *regs;
    }

    pub fn status(&self) -> StatusFlags {
        StatusFlags::from_bits_retain(self.regs[Self::STATUS])
    }

    pub fn set_status(&mut self, flags: StatusFlags) {
        self.regs[Self::STATUS] = flags.bits();
    }

    pub fn cause(&self) -> CauseFlags {
        CauseFlags::from_bits_retain(self.regs[Self::CAUSE])
    }

    /// Exception code currently recorded in Cause
    pub fn exception_code(&self) -> u32 {
        (self.regs[Self::CAUSE] & Self::EXC_CODE_MASK) >> 2
    }

    /// Record an exception: EPC, Cause code, and the exception level bit
    pub(super) fn enter_exception(&mut self, code: u32, epc: u32) {
        self.regs[Self::EPC] = epc;
        let cause = self.regs[Self::CAUSE];
        self.regs[Self::CAUSE] = (cause & !Self::EXC_CODE_MASK) | ((code & 0x1F) << 2);
        self.regs[Self::STATUS] |= StatusFlags::EXL.bits();
    }

    /// Leave exception level, returning the address to resume at
    pub(super) fn return_from_exception(&mut self) -> u32 {
        self.regs[Self::STATUS] &= !StatusFlags::EXL.bits();
        self.regs[Self::EPC]
    }

    /// Advance Count by one tick
    pub(super) fn tick_count(&mut self) {
        self.regs[Self::COUNT] = self.regs[Self::COUNT].wrapping_add(1);
    }

    /// Latch the timer interrupt when Count matches Compare
    pub(super) fn check_timer(&mut self) {
        if self.regs[Self::COUNT] == self.regs[Self::COMPARE] {
            self.regs[Self::CAUSE] |= CauseFlags::TIMER.bits();
        }
    }
}

impl Default for COP0 {
    fn default() -> Self {
        Self::new()
    }
}

/// Exception cause codes
///
/// These correspond to the exception codes stored in Cause bits 2-6
/// when a CPU exception occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ExceptionCause {
    /// Syscall instruction executed
    Syscall = 8,
    /// Breakpoint instruction executed
    Breakpoint = 9,
    /// Arithmetic overflow
    Overflow = 12,
}

impl ExceptionCause {
    /// Code written into Cause
    pub fn code(self) -> u32 {
        self as u32
    }
}
