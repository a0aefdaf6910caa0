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
    // === Store Instructions ===

    /// SB: Store Byte
    ///
    /// Format: sb rt, offset(base)
    pub(crate) fn op_sb(&mut self, rt: u8, base: u8, offset: u16, bus: &mut Bus) {
        let addr = self.effective_address(base, offset);
        bus.write8(addr, self.reg(rt) as u8);
    }

    /// SH: Store Halfword
    pub(crate) fn op_sh(&mut self, rt: u8, base: u8, offset: u16, bus: &mut Bus) {
        let addr = self.effective_address(base, offset);
        bus.write16(addr, self.reg(rt) as u16);
    }

    /// SW: Store Word
    pub(crate) fn op_sw(&mut self, rt: u8, base: u8, offset: u16, bus: &mut Bus) {
        let addr = self.effective_address(base, offset);
        bus.write32(addr, self.reg(rt));
    }
}
