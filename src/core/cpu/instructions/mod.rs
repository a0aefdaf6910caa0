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

//! CPU instruction implementations
//!
//! Handlers are grouped by instruction type. Every handler is a plain method
//! on [`CPU`] so it can be unit-tested without going through `step`.

use super::decode::Instruction;
use super::CPU;
use crate::core::memory::Bus;

// Instruction modules organized by type
mod arithmetic;
mod atomic;
mod branch;
mod cop0;
mod exception;
mod jump;
mod load;
mod logical;
mod multiply;
mod shift;
mod store;

/// Sign-extend a 16-bit immediate
#[inline(always)]
pub(super) fn sign_extend(imm: u16) -> u32 {
    (imm as i16) as i32 as u32
}

impl CPU {
    /// Execute a decoded instruction
    pub(super) fn execute(&mut self, instruction: Instruction, bus: &mut Bus) {
        use Instruction::*;

        match instruction {
            Sll { rd, rt, sa } => self.op_sll(rt, rd, sa),
            Srl { rd, rt, sa } => self.op_srl(rt, rd, sa),
            Sra { rd, rt, sa } => self.op_sra(rt, rd, sa),
            Sllv { rd, rt, rs } => self.op_sllv(rs, rt, rd),
            Srlv { rd, rt, rs } => self.op_srlv(rs, rt, rd),
            Srav { rd, rt, rs } => self.op_srav(rs, rt, rd),
            Dsllv { rd, rt, rs } => self.op_dsllv(rs, rt, rd),
            Dsrlv { rd, rt, rs } => self.op_dsrlv(rs, rt, rd),
            Dsrav { rd, rt, rs } => self.op_dsrav(rs, rt, rd),
            Dsll { rd, rt, sa } => self.op_dsll(rt, rd, sa as u32),
            Dsrl { rd, rt, sa } => self.op_dsrl(rt, rd, sa as u32),
            Dsra { rd, rt, sa } => self.op_dsra(rt, rd, sa as u32),
            Dsll32 { rd, rt, sa } => self.op_dsll(rt, rd, sa as u32 + 32),
            Dsrl32 { rd, rt, sa } => self.op_dsrl(rt, rd, sa as u32 + 32),
            Dsra32 { rd, rt, sa } => self.op_dsra(rt, rd, sa as u32 + 32),

            Jr { rs } => self.op_jr(rs),
            Jalr { rd, rs } => self.op_jalr(rs, rd),
            Syscall { .. } => self.op_syscall(),
            Break { .. } => self.op_break(),
            Sync => {}

            Mfhi { rd } => self.op_mfhi(rd),
            Mthi { rs } => self.op_mthi(rs),
            Mflo { rd } => self.op_mflo(rd),
            Mtlo { rs } => self.op_mtlo(rs),
            Mult { rs, rt } | Dmult { rs, rt } => self.op_mult(rs, rt),
            Multu { rs, rt } | Dmultu { rs, rt } => self.op_multu(rs, rt),
            Div { rs, rt } | Ddiv { rs, rt } => self.op_div(rs, rt),
            Divu { rs, rt } | Ddivu { rs, rt } => self.op_divu(rs, rt),

            Add { rd, rs, rt } | Dadd { rd, rs, rt } => self.op_add(rs, rt, rd),
            Addu { rd, rs, rt } | Daddu { rd, rs, rt } => self.op_addu(rs, rt, rd),
            Sub { rd, rs, rt } | Dsub { rd, rs, rt } => self.op_sub(rs, rt, rd),
            Subu { rd, rs, rt } | Dsubu { rd, rs, rt } => self.op_subu(rs, rt, rd),
            And { rd, rs, rt } => self.op_and(rs, rt, rd),
            Or { rd, rs, rt } => self.op_or(rs, rt, rd),
            Xor { rd, rs, rt } => self.op_xor(rs, rt, rd),
            Nor { rd, rs, rt } => self.op_nor(rs, rt, rd),
            Slt { rd, rs, rt } => self.op_slt(rs, rt, rd),
            Sltu { rd, rs, rt } => self.op_sltu(rs, rt, rd),

            Bltz { rs, offset } => self.op_bltz(rs, offset, false),
            Bgez { rs, offset } => self.op_bgez(rs, offset, false),
            Bltzal { rs, offset } => self.op_bltz(rs, offset, true),
            Bgezal { rs, offset } => self.op_bgez(rs, offset, true),

            J { target } => self.op_j(target),
            Jal { target } => self.op_jal(target),
            Beq { rs, rt, offset } => self.op_beq(rs, rt, offset),
            Bne { rs, rt, offset } => self.op_bne(rs, rt, offset),
            Blez { rs, offset } => self.op_blez(rs, offset),
            Bgtz { rs, offset } => self.op_bgtz(rs, offset),

            Addi { rt, rs, imm } | Daddi { rt, rs, imm } => self.op_addi(rs, rt, imm),
            Addiu { rt, rs, imm } | Daddiu { rt, rs, imm } => self.op_addiu(rs, rt, imm),
            Slti { rt, rs, imm } => self.op_slti(rs, rt, imm),
            Sltiu { rt, rs, imm } => self.op_sltiu(rs, rt, imm),
            Andi { rt, rs, imm } => self.op_andi(rs, rt, imm),
            Ori { rt, rs, imm } => self.op_ori(rs, rt, imm),
            Xori { rt, rs, imm } => self.op_xori(rs, rt, imm),
            Lui { rt, imm } => self.op_lui(rt, imm),

            Mfc0 { rt, rd } => self.op_mfc0(rt, rd),
            Mtc0 { rt, rd } => self.op_mtc0(rt, rd),
            Tlbr | Tlbwi | Tlbwr | Tlbp => {
                log::debug!("Ignoring {} at PC=0x{:08X}", instruction, self.pc);
            }
            Eret => self.op_eret(),
            Cop1(_) => {
                log::debug!("Ignoring COP1 operation at PC=0x{:08X}", self.pc);
            }

            Lb { rt, base, offset } => self.op_lb(rt, base, offset, bus),
            Lh { rt, base, offset } => self.op_lh(rt, base, offset, bus),
            Lw { rt, base, offset } | Lwu { rt, base, offset } => {
                self.op_lw(rt, base, offset, bus)
            }
            Lbu { rt, base, offset } => self.op_lbu(rt, base, offset, bus),
            Lhu { rt, base, offset } => self.op_lhu(rt, base, offset, bus),
            Lwr { rt, base, offset } => self.op_lwr(rt, base, offset, bus),

            Sb { rt, base, offset } => self.op_sb(rt, base, offset, bus),
            Sh { rt, base, offset } => self.op_sh(rt, base, offset, bus),
            Sw { rt, base, offset } => self.op_sw(rt, base, offset, bus),

            Ll { rt, base, offset } => self.op_ll(rt, base, offset, bus),
            Sc { rt, base, offset } => self.op_sc(rt, base, offset, bus),

            Cache => {
                log::debug!("Ignoring CACHE at PC=0x{:08X}", self.pc);
            }

            Unknown(word) => {
                log::warn!(
                    "Unimplemented instruction 0x{:08X} at PC=0x{:08X}",
                    word,
                    self.pc
                );
            }
        }
    }

    /// Effective address `base + sign_extend(offset)`
    #[inline(always)]
    pub(super) fn effective_address(&self, base: u8, offset: u16) -> u32 {
        self.reg(base).wrapping_add(sign_extend(offset))
    }
}
