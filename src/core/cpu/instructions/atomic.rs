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
    // === Atomic Instructions ===

    /// LL: Load Linked
    ///
    /// Loads like LW and records the address for a following SC.
    pub(crate) fn op_ll(&mut self, rt: u8, base: u8, offset: u16, bus: &mut Bus) {
        let addr = self.effective_address(base, offset);
        let value = bus.read32(addr);

        self.ll_bit = true;
        self.ll_addr = addr;
        self.set_reg_delayed(rt, value);
    }

    /// SC: Store Conditional
    ///
    /// Stores rt and sets it to 1 if the link is still valid for this
    /// address; otherwise leaves memory alone and sets rt to 0. The link is
    /// cleared either way.
    pub(crate) fn op_sc(&mut self, rt: u8, base: u8, offset: u16, bus: &mut Bus) {
        let addr = self.effective_address(base, offset);
        let success = self.ll_bit && self.ll_addr == addr;

        if success {
            bus.write32(addr, self.reg(rt));
        }
        self.set_reg(rt, success as u32);
        self.ll_bit = false;
    }
}
