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
    // === Multiply/Divide Instructions ===

    /// MULT: Multiply (signed), DMULT shares this
    ///
    /// Format: mult rs, rt
    /// Operation: (HI, LO) = rs * rt
    pub(crate) fn op_mult(&mut self, rs: u8, rt: u8) {
        let a = self.reg(rs) as i32 as i64;
        let b = self.reg(rt) as i32 as i64;
        let result = (a * b) as u64;

        self.hi = (result >> 32) as u32;
        self.lo = result as u32;
    }

    /// MULTU: Multiply Unsigned, DMULTU shares this
    pub(crate) fn op_multu(&mut self, rs: u8, rt: u8) {
        let a = self.reg(rs) as u64;
        let b = self.reg(rt) as u64;
        let result = a * b;

        self.hi = (result >> 32) as u32;
        self.lo = result as u32;
    }

    /// DIV: Divide (signed), DDIV shares this
    ///
    /// Format: div rs, rt
    /// Operation: LO = rs / rt, HI = rs % rt
    ///
    /// The quotient truncates toward zero and the remainder takes the sign of
    /// the dividend, as the R4300i divider does (-7 / 2 is -3 rem -1, not a
    /// floored -4 rem 1). Division by zero leaves HI and LO unchanged.
    pub(crate) fn op_div(&mut self, rs: u8, rt: u8) {
        let numerator = self.reg(rs) as i32;
        let denominator = self.reg(rt) as i32;

        if denominator == 0 {
            return;
        }

        // i32::MIN / -1 wraps to i32::MIN with remainder 0
        self.lo = numerator.wrapping_div(denominator) as u32;
        self.hi = numerator.wrapping_rem(denominator) as u32;
    }

    /// DIVU: Divide Unsigned, DDIVU shares this
    ///
    /// Division by zero leaves HI and LO unchanged.
    pub(crate) fn op_divu(&mut self, rs: u8, rt: u8) {
        let numerator = self.reg(rs);
        let denominator = self.reg(rt);

        if denominator == 0 {
            return;
        }

        self.lo = numerator / denominator;
        self.hi = numerator % denominator;
    }

    /// MFHI: Move From HI
    pub(crate) fn op_mfhi(&mut self, rd: u8) {
        self.set_reg(rd, self.hi);
    }

    /// MTHI: Move To HI
    pub(crate) fn op_mthi(&mut self, rs: u8) {
        self.hi = self.reg(rs);
    }

    /// MFLO: Move From LO
    pub(crate) fn op_mflo(&mut self, rd: u8) {
        self.set_reg(rd, self.lo);
    }

    /// MTLO: Move To LO
    pub(crate) fn op_mtlo(&mut self, rs: u8) {
        self.lo = self.reg(rs);
    }
}
