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
    // === Shift Instructions ===

    /// SLL: Shift Left Logical
    ///
    /// `sll r0, r0, 0` (0x00000000) is the canonical NOP.
    pub(crate) fn op_sll(&mut self, rt: u8, rd: u8, shamt: u8) {
        self.set_reg(rd, self.reg(rt) << shamt);
    }

    /// SRL: Shift Right Logical
    pub(crate) fn op_srl(&mut self, rt: u8, rd: u8, shamt: u8) {
        self.set_reg(rd, self.reg(rt) >> shamt);
    }

    /// SRA: Shift Right Arithmetic
    pub(crate) fn op_sra(&mut self, rt: u8, rd: u8, shamt: u8) {
        self.set_reg(rd, ((self.reg(rt) as i32) >> shamt) as u32);
    }

    /// SLLV: Shift Left Logical Variable (low 5 bits of rs)
    pub(crate) fn op_sllv(&mut self, rs: u8, rt: u8, rd: u8) {
        let shift = self.reg(rs) & 0x1F;
        self.set_reg(rd, self.reg(rt) << shift);
    }

    /// SRLV: Shift Right Logical Variable
    pub(crate) fn op_srlv(&mut self, rs: u8, rt: u8, rd: u8) {
        let shift = self.reg(rs) & 0x1F;
        self.set_reg(rd, self.reg(rt) >> shift);
    }

    /// SRAV: Shift Right Arithmetic Variable
    pub(crate) fn op_srav(&mut self, rs: u8, rt: u8, rd: u8) {
        let shift = self.reg(rs) & 0x1F;
        self.set_reg(rd, ((self.reg(rt) as i32) >> shift) as u32);
    }

    // The 64-bit shifts treat rt as a 64-bit value (zero-extended for logical
    // shifts, sign-extended for arithmetic ones) and keep the low 32 bits of
    // the result. Shift amounts are 0-63.

    /// DSLL / DSLL32
    pub(crate) fn op_dsll(&mut self, rt: u8, rd: u8, shift: u32) {
        let value = (self.reg(rt) as u64) << (shift & 0x3F);
        self.set_reg(rd, value as u32);
    }

    /// DSRL / DSRL32
    pub(crate) fn op_dsrl(&mut self, rt: u8, rd: u8, shift: u32) {
        let value = (self.reg(rt) as u64) >> (shift & 0x3F);
        self.set_reg(rd, value as u32);
    }

    /// DSRA / DSRA32
    pub(crate) fn op_dsra(&mut self, rt: u8, rd: u8, shift: u32) {
        let value = (self.reg(rt) as i32 as i64) >> (shift & 0x3F);
        self.set_reg(rd, value as u32);
    }

    /// DSLLV: shift amount is the low 6 bits of rs
    pub(crate) fn op_dsllv(&mut self, rs: u8, rt: u8, rd: u8) {
        self.op_dsll(rt, rd, self.reg(rs));
    }

    /// DSRLV
    pub(crate) fn op_dsrlv(&mut self, rs: u8, rt: u8, rd: u8) {
        self.op_dsrl(rt, rd, self.reg(rs));
    }

    /// DSRAV
    pub(crate) fn op_dsrav(&mut self, rs: u8, rt: u8, rd: u8) {
        self.op_dsra(rt, rd, self.reg(rs));
    }
}
