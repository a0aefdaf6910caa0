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
    // === Logical Instructions ===

    /// AND: Bitwise AND
    pub(crate) fn op_and(&mut self, rs: u8, rt: u8, rd: u8) {
        self.set_reg(rd, self.reg(rs) & self.reg(rt));
    }

    /// OR: Bitwise OR
    pub(crate) fn op_or(&mut self, rs: u8, rt: u8, rd: u8) {
        self.set_reg(rd, self.reg(rs) | self.reg(rt));
    }

    /// XOR: Bitwise XOR
    pub(crate) fn op_xor(&mut self, rs: u8, rt: u8, rd: u8) {
        self.set_reg(rd, self.reg(rs) ^ self.reg(rt));
    }

    /// NOR: Bitwise NOR
    pub(crate) fn op_nor(&mut self, rs: u8, rt: u8, rd: u8) {
        self.set_reg(rd, !(self.reg(rs) | self.reg(rt)));
    }

    /// ANDI: AND Immediate (zero-extended)
    pub(crate) fn op_andi(&mut self, rs: u8, rt: u8, imm: u16) {
        self.set_reg(rt, self.reg(rs) & imm as u32);
    }

    /// ORI: OR Immediate (zero-extended)
    pub(crate) fn op_ori(&mut self, rs: u8, rt: u8, imm: u16) {
        self.set_reg(rt, self.reg(rs) | imm as u32);
    }

    /// XORI: XOR Immediate (zero-extended)
    pub(crate) fn op_xori(&mut self, rs: u8, rt: u8, imm: u16) {
        self.set_reg(rt, self.reg(rs) ^ imm as u32);
    }

    /// LUI: Load Upper Immediate
    ///
    /// Format: lui rt, imm
    /// Operation: rt = imm << 16
    pub(crate) fn op_lui(&mut self, rt: u8, imm: u16) {
        self.set_reg(rt, (imm as u32) << 16);
    }
}
