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

impl CPU {
    // === Jump Instructions ===

    /// J: Jump
    ///
    /// Format: j target
    /// Operation: PC = (PC & 0xF0000000) | (target << 2), after the delay slot
    pub(crate) fn op_j(&mut self, target: u32) {
        let target = (self.pc & 0xF000_0000) | (target << 2);
        self.branch_to(target);
    }

    /// JAL: Jump And Link
    ///
    /// r31 receives the address after the delay slot.
    pub(crate) fn op_jal(&mut self, target: u32) {
        self.set_reg(31, self.next_pc.wrapping_add(4));
        self.op_j(target);
    }

    /// JR: Jump Register
    pub(crate) fn op_jr(&mut self, rs: u8) {
        let target = self.reg(rs);
        self.branch_to(target);
    }

    /// JALR: Jump And Link Register
    ///
    /// The target is read before rd is written, so `jalr r1, r1` jumps to
    /// the old value of r1.
    pub(crate) fn op_jalr(&mut self, rs: u8, rd: u8) {
        let target = self.reg(rs);
        self.set_reg(rd, self.next_pc.wrapping_add(4));
        self.branch_to(target);
    }
}
