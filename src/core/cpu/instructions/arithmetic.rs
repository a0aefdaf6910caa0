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

use super::super::{ExceptionCause, CPU};
use super::sign_extend;

impl CPU {
    // === Arithmetic Instructions ===

    /// Store a signed sum/difference, or trap when it overflowed and traps
    /// are enabled
    fn write_checked(&mut self, rd: u8, result: Option<i32>, wrapped: u32) {
        match result {
            Some(value) => self.set_reg(rd, value as u32),
            None if self.trap_on_overflow => self.exception(ExceptionCause::Overflow),
            None => self.set_reg(rd, wrapped),
        }
    }

    /// ADD: Add (DADD shares this)
    ///
    /// Format: add rd, rs, rt
    /// Operation: rd = rs + rt
    ///
    /// Signed overflow wraps unless overflow traps are enabled, in which
    /// case rd is left untouched and an Overflow exception is raised.
    pub(crate) fn op_add(&mut self, rs: u8, rt: u8, rd: u8) {
        let a = self.reg(rs);
        let b = self.reg(rt);
        self.write_checked(rd, (a as i32).checked_add(b as i32), a.wrapping_add(b));
    }

    /// ADDU: Add Unsigned (DADDU shares this)
    ///
    /// Format: addu rd, rs, rt
    pub(crate) fn op_addu(&mut self, rs: u8, rt: u8, rd: u8) {
        let result = self.reg(rs).wrapping_add(self.reg(rt));
        self.set_reg(rd, result);
    }

    /// SUB: Subtract (DSUB shares this)
    ///
    /// Format: sub rd, rs, rt
    /// Operation: rd = rs - rt
    pub(crate) fn op_sub(&mut self, rs: u8, rt: u8, rd: u8) {
        let a = self.reg(rs);
        let b = self.reg(rt);
        self.write_checked(rd, (a as i32).checked_sub(b as i32), a.wrapping_sub(b));
    }

    /// SUBU: Subtract Unsigned (DSUBU shares this)
    pub(crate) fn op_subu(&mut self, rs: u8, rt: u8, rd: u8) {
        let result = self.reg(rs).wrapping_sub(self.reg(rt));
        self.set_reg(rd, result);
    }

    /// ADDI: Add Immediate (DADDI shares this)
    ///
    /// Format: addi rt, rs, imm
    /// Operation: rt = rs + sign_extend(imm)
    pub(crate) fn op_addi(&mut self, rs: u8, rt: u8, imm: u16) {
        let a = self.reg(rs);
        let b = sign_extend(imm);
        self.write_checked(rt, (a as i32).checked_add(b as i32), a.wrapping_add(b));
    }

    /// ADDIU: Add Immediate Unsigned (DADDIU shares this)
    ///
    /// Despite the name the immediate is sign-extended.
    ///
    /// Format: addiu rt, rs, imm
    /// Operation: rt = rs + sign_extend(imm)
    pub(crate) fn op_addiu(&mut self, rs: u8, rt: u8, imm: u16) {
        let result = self.reg(rs).wrapping_add(sign_extend(imm));
        self.set_reg(rt, result);
    }

    /// SLT: Set on Less Than (signed)
    pub(crate) fn op_slt(&mut self, rs: u8, rt: u8, rd: u8) {
        let result = (self.reg(rs) as i32) < (self.reg(rt) as i32);
        self.set_reg(rd, result as u32);
    }

    /// SLTU: Set on Less Than Unsigned
    pub(crate) fn op_sltu(&mut self, rs: u8, rt: u8, rd: u8) {
        let result = self.reg(rs) < self.reg(rt);
        self.set_reg(rd, result as u32);
    }

    /// SLTI: Set on Less Than Immediate (signed)
    pub(crate) fn op_slti(&mut self, rs: u8, rt: u8, imm: u16) {
        let result = (self.reg(rs) as i32) < (sign_extend(imm) as i32);
        self.set_reg(rt, result as u32);
    }

    /// SLTIU: Set on Less Than Immediate Unsigned
    ///
    /// The immediate is sign-extended, then compared unsigned.
    pub(crate) fn op_sltiu(&mut self, rs: u8, rt: u8, imm: u16) {
        let result = self.reg(rs) < sign_extend(imm);
        self.set_reg(rt, result as u32);
    }
}
