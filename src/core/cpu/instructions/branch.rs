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
use super::sign_extend;

impl CPU {
    // === Branch Instructions ===
    //
    // Branch targets are relative to the delay slot:
    // target = next_pc + (sign_extend(offset) << 2)

    /// Arm a branch to `next_pc + (sign_extend(offset) << 2)`
    pub(in crate::core::cpu) fn branch(&mut self, offset: u16) {
        let target = self.next_pc.wrapping_add(sign_extend(offset) << 2);
        self.branch_to(target);
    }

    /// BEQ: Branch on Equal
    ///
    /// Format: beq rs, rt, offset
    pub(crate) fn op_beq(&mut self, rs: u8, rt: u8, offset: u16) {
        if self.reg(rs) == self.reg(rt) {
            self.branch(offset);
        }
    }

    /// BNE: Branch on Not Equal
    pub(crate) fn op_bne(&mut self, rs: u8, rt: u8, offset: u16) {
        if self.reg(rs) != self.reg(rt) {
            self.branch(offset);
        }
    }

    /// BLEZ: Branch on Less Than or Equal to Zero (signed)
    pub(crate) fn op_blez(&mut self, rs: u8, offset: u16) {
        if (self.reg(rs) as i32) <= 0 {
            self.branch(offset);
        }
    }

    /// BGTZ: Branch on Greater Than Zero (signed)
    pub(crate) fn op_bgtz(&mut self, rs: u8, offset: u16) {
        if (self.reg(rs) as i32) > 0 {
            self.branch(offset);
        }
    }

    /// BLTZ / BLTZAL: Branch on Less Than Zero
    ///
    /// The linking form writes the return address (the instruction after
    /// the delay slot) to r31 only when the branch is taken.
    pub(crate) fn op_bltz(&mut self, rs: u8, offset: u16, link: bool) {
        if (self.reg(rs) as i32) < 0 {
            if link {
                self.set_reg(31, self.next_pc.wrapping_add(4));
            }
            self.branch(offset);
        }
    }

    /// BGEZ / BGEZAL: Branch on Greater Than or Equal to Zero
    pub(crate) fn op_bgez(&mut self, rs: u8, offset: u16, link: bool) {
        if (self.reg(rs) as i32) >= 0 {
            if link {
                self.set_reg(31, self.next_pc.wrapping_add(4));
            }
            self.branch(offset);
        }
    }
}
