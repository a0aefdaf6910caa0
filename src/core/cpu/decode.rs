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

//! Instruction decoding
//!
//! A raw word is decoded once into an [`Instruction`] which the execute
//! stage consumes with an exhaustive match.

/// Decode R-type instruction
///
/// Format: | op (6) | rs (5) | rt (5) | rd (5) | shamt (5) | funct (6) |
///
/// Returns `(rs, rt, rd, shamt, funct)`.
#[inline(always)]
pub(super) fn decode_r_type(instr: u32) -> (u8, u8, u8, u8, u8) {
    let rs = ((instr >> 21) & 0x1F) as u8;
    let rt = ((instr >> 16) & 0x1F) as u8;
    let rd = ((instr >> 11) & 0x1F) as u8;
    let shamt = ((instr >> 6) & 0x1F) as u8;
    let funct = (instr & 0x3F) as u8;
    (rs, rt, rd, shamt, funct)
}

/// Decode I-type instruction
///
/// Format: | op (6) | rs (5) | rt (5) | immediate (16) |
///
/// Returns `(op, rs, rt, imm)`.
#[inline(always)]
pub(super) fn decode_i_type(instr: u32) -> (u8, u8, u8, u16) {
    let op = ((instr >> 26) & 0x3F) as u8;
    let rs = ((instr >> 21) & 0x1F) as u8;
    let rt = ((instr >> 16) & 0x1F) as u8;
    let imm = (instr & 0xFFFF) as u16;
    (op, rs, rt, imm)
}

/// Decode J-type instruction
///
/// Format: | op (6) | target (26) |
///
/// Returns `(op, target)`.
#[inline(always)]
pub(super) fn decode_j_type(instr: u32) -> (u8, u32) {
    let op = ((instr >> 26) & 0x3F) as u8;
    let target = instr & 0x03FF_FFFF;
    (op, target)
}

/// A decoded instruction
///
/// Register fields are 5-bit indices. Immediates are kept raw; handlers
/// decide between sign and zero extension. The 64-bit forms are separate
/// variants even where they currently share an implementation with the
/// 32-bit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // SPECIAL shifts
    Sll { rd: u8, rt: u8, sa: u8 },
    Srl { rd: u8, rt: u8, sa: u8 },
    Sra { rd: u8, rt: u8, sa: u8 },
    Sllv { rd: u8, rt: u8, rs: u8 },
    Srlv { rd: u8, rt: u8, rs: u8 },
    Srav { rd: u8, rt: u8, rs: u8 },
    Dsllv { rd: u8, rt: u8, rs: u8 },
    Dsrlv { rd: u8, rt: u8, rs: u8 },
    Dsrav { rd: u8, rt: u8, rs: u8 },
    Dsll { rd: u8, rt: u8, sa: u8 },
    Dsrl { rd: u8, rt: u8, sa: u8 },
    Dsra { rd: u8, rt: u8, sa: u8 },
    Dsll32 { rd: u8, rt: u8, sa: u8 },
    Dsrl32 { rd: u8, rt: u8, sa: u8 },
    Dsra32 { rd: u8, rt: u8, sa: u8 },

    // SPECIAL jumps and traps
    Jr { rs: u8 },
    Jalr { rd: u8, rs: u8 },
    Syscall { code: u32 },
    Break { code: u32 },
    Sync,

    // HI/LO
    Mfhi { rd: u8 },
    Mthi { rs: u8 },
    Mflo { rd: u8 },
    Mtlo { rs: u8 },
    Mult { rs: u8, rt: u8 },
    Multu { rs: u8, rt: u8 },
    Div { rs: u8, rt: u8 },
    Divu { rs: u8, rt: u8 },
    Dmult { rs: u8, rt: u8 },
    Dmultu { rs: u8, rt: u8 },
    Ddiv { rs: u8, rt: u8 },
    Ddivu { rs: u8, rt: u8 },

    // SPECIAL ALU
    Add { rd: u8, rs: u8, rt: u8 },
    Addu { rd: u8, rs: u8, rt: u8 },
    Sub { rd: u8, rs: u8, rt: u8 },
    Subu { rd: u8, rs: u8, rt: u8 },
    And { rd: u8, rs: u8, rt: u8 },
    Or { rd: u8, rs: u8, rt: u8 },
    Xor { rd: u8, rs: u8, rt: u8 },
    Nor { rd: u8, rs: u8, rt: u8 },
    Slt { rd: u8, rs: u8, rt: u8 },
    Sltu { rd: u8, rs: u8, rt: u8 },
    Dadd { rd: u8, rs: u8, rt: u8 },
    Daddu { rd: u8, rs: u8, rt: u8 },
    Dsub { rd: u8, rs: u8, rt: u8 },
    Dsubu { rd: u8, rs: u8, rt: u8 },

    // REGIMM
    Bltz { rs: u8, offset: u16 },
    Bgez { rs: u8, offset: u16 },
    Bltzal { rs: u8, offset: u16 },
    Bgezal { rs: u8, offset: u16 },

    // Jumps and branches
    J { target: u32 },
    Jal { target: u32 },
    Beq { rs: u8, rt: u8, offset: u16 },
    Bne { rs: u8, rt: u8, offset: u16 },
    Blez { rs: u8, offset: u16 },
    Bgtz { rs: u8, offset: u16 },

    // Immediate ALU
    Addi { rt: u8, rs: u8, imm: u16 },
    Addiu { rt: u8, rs: u8, imm: u16 },
    Slti { rt: u8, rs: u8, imm: u16 },
    Sltiu { rt: u8, rs: u8, imm: u16 },
    Andi { rt: u8, rs: u8, imm: u16 },
    Ori { rt: u8, rs: u8, imm: u16 },
    Xori { rt: u8, rs: u8, imm: u16 },
    Lui { rt: u8, imm: u16 },
    Daddi { rt: u8, rs: u8, imm: u16 },
    Daddiu { rt: u8, rs: u8, imm: u16 },

    // COP0
    Mfc0 { rt: u8, rd: u8 },
    Mtc0 { rt: u8, rd: u8 },
    Tlbr,
    Tlbwi,
    Tlbwr,
    Tlbp,
    Eret,

    /// Any COP1 operation (no FPU is modelled)
    Cop1(u32),

    // Loads
    Lb { rt: u8, base: u8, offset: u16 },
    Lh { rt: u8, base: u8, offset: u16 },
    Lw { rt: u8, base: u8, offset: u16 },
    Lbu { rt: u8, base: u8, offset: u16 },
    Lhu { rt: u8, base: u8, offset: u16 },
    Lwr { rt: u8, base: u8, offset: u16 },
    Lwu { rt: u8, base: u8, offset: u16 },

    // Stores
    Sb { rt: u8, base: u8, offset: u16 },
    Sh { rt: u8, base: u8, offset: u16 },
    Sw { rt: u8, base: u8, offset: u16 },

    // Atomics
    Ll { rt: u8, base: u8, offset: u16 },
    Sc { rt: u8, base: u8, offset: u16 },

    Cache,

    /// Encoding with no handler
    Unknown(u32),
}

use Instruction::*;

impl Instruction {
    /// Decode a raw instruction word
    ///
    /// # Example
    ///
    /// ```
    /// use mipsemu::core::cpu::Instruction;
    ///
    /// assert_eq!(
    ///     Instruction::decode(0x2401_0005),
    ///     Instruction::Addiu { rt: 1, rs: 0, imm: 5 }
    /// );
    /// assert_eq!(Instruction::decode(0xFC00_0000), Instruction::Unknown(0xFC00_0000));
    /// ```
    pub fn decode(word: u32) -> Self {
        let (op, rs, rt, imm) = decode_i_type(word);

        match op {
            0x00 => Self::decode_special(word),
            0x01 => Self::decode_regimm(word),
            0x02 => J {
                target: decode_j_type(word).1,
            },
            0x03 => Jal {
                target: decode_j_type(word).1,
            },
            0x04 => Beq { rs, rt, offset: imm },
            0x05 => Bne { rs, rt, offset: imm },
            0x06 => Blez { rs, offset: imm },
            0x07 => Bgtz { rs, offset: imm },
            0x08 => Addi { rt, rs, imm },
            0x09 => Addiu { rt, rs, imm },
            0x0A => Slti { rt, rs, imm },
            0x0B => Sltiu { rt, rs, imm },
            0x0C => Andi { rt, rs, imm },
            0x0D => Ori { rt, rs, imm },
            0x0E => Xori { rt, rs, imm },
            0x0F => Lui { rt, imm },
            0x10 => Self::decode_cop0(word),
            0x11 => Cop1(word),
            0x18 => Daddi { rt, rs, imm },
            0x19 => Daddiu { rt, rs, imm },
            0x20 => Lb { rt, base: rs, offset: imm },
            0x21 => Lh { rt, base: rs, offset: imm },
            0x23 => Lw { rt, base: rs, offset: imm },
            0x24 => Lbu { rt, base: rs, offset: imm },
            0x25 => Lhu { rt, base: rs, offset: imm },
            0x26 => Lwr { rt, base: rs, offset: imm },
            0x27 => Lwu { rt, base: rs, offset: imm },
            0x28 => Sb { rt, base: rs, offset: imm },
            0x29 => Sh { rt, base: rs, offset: imm },
            0x2B => Sw { rt, base: rs, offset: imm },
            0x2F => Cache,
            0x30 => Ll { rt, base: rs, offset: imm },
            0x38 => Sc { rt, base: rs, offset: imm },
            _ => Unknown(word),
        }
    }

    fn decode_special(word: u32) -> Self {
        let (rs, rt, rd, sa, funct) = decode_r_type(word);

        match funct {
            0x00 => Sll { rd, rt, sa },
            0x02 => Srl { rd, rt, sa },
            0x03 => Sra { rd, rt, sa },
            0x04 => Sllv { rd, rt, rs },
            0x06 => Srlv { rd, rt, rs },
            0x07 => Srav { rd, rt, rs },
            0x08 => Jr { rs },
            0x09 => Jalr { rd, rs },
            0x0C => Syscall {
                code: (word >> 6) & 0xF_FFFF,
            },
            0x0D => Break {
                code: (word >> 6) & 0xF_FFFF,
            },
            0x0F => Sync,
            0x10 => Mfhi { rd },
            0x11 => Mthi { rs },
            0x12 => Mflo { rd },
            0x13 => Mtlo { rs },
            0x14 => Dsllv { rd, rt, rs },
            0x16 => Dsrlv { rd, rt, rs },
            0x17 => Dsrav { rd, rt, rs },
            0x18 => Mult { rs, rt },
            0x19 => Multu { rs, rt },
            0x1A => Div { rs, rt },
            0x1B => Divu { rs, rt },
            0x1C => Dmult { rs, rt },
            0x1D => Dmultu { rs, rt },
            0x1E => Ddiv { rs, rt },
            0x1F => Ddivu { rs, rt },
            0x20 => Add { rd, rs, rt },
            0x21 => Addu { rd, rs, rt },
            0x22 => Sub { rd, rs, rt },
            0x23 => Subu { rd, rs, rt },
            0x24 => And { rd, rs, rt },
            0x25 => Or { rd, rs, rt },
            0x26 => Xor { rd, rs, rt },
            0x27 => Nor { rd, rs, rt },
            0x2A => Slt { rd, rs, rt },
            0x2B => Sltu { rd, rs, rt },
            0x2C => Dadd { rd, rs, rt },
            0x2D => Daddu { rd, rs, rt },
            0x2E => Dsub { rd, rs, rt },
            0x2F => Dsubu { rd, rs, rt },
            0x38 => Dsll { rd, rt, sa },
            0x3A => Dsrl { rd, rt, sa },
            0x3B => Dsra { rd, rt, sa },
            0x3C => Dsll32 { rd, rt, sa },
            0x3E => Dsrl32 { rd, rt, sa },
            0x3F => Dsra32 { rd, rt, sa },
            _ => Unknown(word),
        }
    }

    fn decode_regimm(word: u32) -> Self {
        let (_, rs, rt, offset) = decode_i_type(word);

        match rt {
            0x00 => Bltz { rs, offset },
            0x01 => Bgez { rs, offset },
            0x10 => Bltzal { rs, offset },
            0x11 => Bgezal { rs, offset },
            _ => Unknown(word),
        }
    }

    fn decode_cop0(word: u32) -> Self {
        let (rs, rt, rd, _, funct) = decode_r_type(word);

        match rs {
            0x00 => Mfc0 { rt, rd },
            0x04 => Mtc0 { rt, rd },
            0x10..=0x1F => match funct {
                0x01 => Tlbr,
                0x02 => Tlbwi,
                0x06 => Tlbwr,
                0x08 => Tlbp,
                0x18 => Eret,
                _ => Unknown(word),
            },
            _ => Unknown(word),
        }
    }
}
