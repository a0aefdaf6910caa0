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

use super::super::CPU;
use crate::core::memory::Bus;

impl CPU {
    // === Load Instructions ===
    //
    // All loads go through the load delay: the value is committed at the
    // start of the next step, so the very next instruction reads it.

    /// LB: Load Byte (sign-extended)
    ///
    /// Format: lb rt, offset(base)
    pub(crate) fn op_lb(&mut self, rt: u8, base: u8, offset: u16, bus: &mut Bus) {
        let addr = self.effective_address(base, offset);
        let value = bus.read8(addr) as i8 as i32 as u32;
        self.set_reg_delayed(rt, value);
    }

    /// LBU: Load Byte Unsigned
    pub(crate) fn op_lbu(&mut self, rt: u8, base: u8, offset: u16, bus: &mut Bus) {
        let addr = self.effective_address(base, offset);
        let value = bus.read8(addr) as u32;
        self.set_reg_delayed(rt, value);
    }

    /// LH: Load Halfword (sign-extended)
    pub(crate) fn op_lh(&mut self, rt: u8, base: u8, offset: u16, bus: &mut Bus) {
        let addr = self.effective_address(base, offset);
        let value = bus.read16(addr) as i16 as i32 as u32;
        self.set_reg_delayed(rt, value);
    }

    /// LHU: Load Halfword Unsigned
    pub(crate) fn op_lhu(&mut self, rt: u8, base: u8, offset: u16, bus: &mut Bus) {
        let addr = self.effective_address(base, offset);
        let value = bus.read16(addr) as u32;
        self.set_reg_delayed(rt, value);
    }

    /// LW: Load Word (LWU shares this)
    ///
    /// Format: lw rt, offset(base)
    /// Operation: rt = memory[base + sign_extend(offset)]
    pub(crate) fn op_lw(&mut self, rt: u8, base: u8, offset: u16, bus: &mut Bus) {
        let addr = self.effective_address(base, offset);
        let value = bus.read32(addr);
        self.set_reg_delayed(rt, value);
    }

    /// LWR: Load Word Right
    ///
    /// Reads the aligned word containing the address and merges its low
    /// `(addr & 3) * 8` bits into rt, keeping the remaining high bits of rt.
    pub(crate) fn op_lwr(&mut self, rt: u8, base: u8, offset: u16, bus: &mut Bus) {
        let addr = self.effective_address(base, offset);
        let word = bus.read32(addr & !0x3);

        let shift = (addr & 0x3) * 8;
        let mask = (1u32 << shift).wrapping_sub(1);
        let value = (self.reg(rt) & !mask) | (word & mask);
        self.set_reg_delayed(rt, value);
    }
}
