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

//! MIPS instruction disassembler for debugging
//!
//! `Display` on [`Instruction`] prints position-independent assembly
//! (branch offsets in instructions, jump targets as the raw field shifted
//! left by 2). [`Disassembler::disassemble`] resolves both against a PC.

use super::decode::Instruction;
use std::fmt;

/// Instruction disassembler
///
/// # Example
/// ```
/// use mipsemu::core::cpu::Disassembler;
///
/// assert_eq!(Disassembler::disassemble(0x0000_0000, 0xA400_0040), "nop");
/// assert_eq!(Disassembler::disassemble(0x3C01_1234, 0xA400_0040), "lui r1, 0x1234");
/// assert_eq!(Disassembler::disassemble(0x0810_0400, 0xA400_0040), "j 0xA0401000");
/// ```
pub struct Disassembler;

impl Disassembler {
    /// Disassemble a single instruction word fetched from `pc`
    pub fn disassemble(word: u32, pc: u32) -> String {
        let instruction = Instruction::decode(word);
        let delay_slot = pc.wrapping_add(4);
        let branch = |offset: u16| {
            delay_slot.wrapping_add((((offset as i16) as i32) << 2) as u32)
        };

        match instruction {
            Instruction::J { target } => format!("j 0x{:08X}", jump_target(pc, target)),
            Instruction::Jal { target } => format!("jal 0x{:08X}", jump_target(pc, target)),
            Instruction::Beq { rs, rt, offset } => {
                format!("beq r{}, r{}, 0x{:08X}", rs, rt, branch(offset))
            }
            Instruction::Bne { rs, rt, offset } => {
                format!("bne r{}, r{}, 0x{:08X}", rs, rt, branch(offset))
            }
            Instruction::Blez { rs, offset } => format!("blez r{}, 0x{:08X}", rs, branch(offset)),
            Instruction::Bgtz { rs, offset } => format!("bgtz r{}, 0x{:08X}", rs, branch(offset)),
            Instruction::Bltz { rs, offset } => format!("bltz r{}, 0x{:08X}", rs, branch(offset)),
            Instruction::Bgez { rs, offset } => format!("bgez r{}, 0x{:08X}", rs, branch(offset)),
            Instruction::Bltzal { rs, offset } => {
                format!("bltzal r{}, 0x{:08X}", rs, branch(offset))
            }
            Instruction::Bgezal { rs, offset } => {
                format!("bgezal r{}, 0x{:08X}", rs, branch(offset))
            }
            other => other.to_string(),
        }
    }
}

fn jump_target(pc: u32, target: u32) -> u32 {
    (pc & 0xF000_0000) | (target << 2)
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sll { rd: 0, rt: 0, sa: 0 } => write!(f, "nop"),
            Sll { rd, rt, sa } => write!(f, "sll r{}, r{}, {}", rd, rt, sa),
            Srl { rd, rt, sa } => write!(f, "srl r{}, r{}, {}", rd, rt, sa),
            Sra { rd, rt, sa } => write!(f, "sra r{}, r{}, {}", rd, rt, sa),
            Sllv { rd, rt, rs } => write!(f, "sllv r{}, r{}, r{}", rd, rt, rs),
            Srlv { rd, rt, rs } => write!(f, "srlv r{}, r{}, r{}", rd, rt, rs),
            Srav { rd, rt, rs } => write!(f, "srav r{}, r{}, r{}", rd, rt, rs),
            Dsllv { rd, rt, rs } => write!(f, "dsllv r{}, r{}, r{}", rd, rt, rs),
            Dsrlv { rd, rt, rs } => write!(f, "dsrlv r{}, r{}, r{}", rd, rt, rs),
            Dsrav { rd, rt, rs } => write!(f, "dsrav r{}, r{}, r{}", rd, rt, rs),
            Dsll { rd, rt, sa } => write!(f, "dsll r{}, r{}, {}", rd, rt, sa),
            Dsrl { rd, rt, sa } => write!(f, "dsrl r{}, r{}, {}", rd, rt, sa),
            Dsra { rd, rt, sa } => write!(f, "dsra r{}, r{}, {}", rd, rt, sa),
            Dsll32 { rd, rt, sa } => write!(f, "dsll32 r{}, r{}, {}", rd, rt, sa),
            Dsrl32 { rd, rt, sa } => write!(f, "dsrl32 r{}, r{}, {}", rd, rt, sa),
            Dsra32 { rd, rt, sa } => write!(f, "dsra32 r{}, r{}, {}", rd, rt, sa),

            Jr { rs } => write!(f, "jr r{}", rs),
            Jalr { rd, rs } => write!(f, "jalr r{}, r{}", rd, rs),
            Syscall { code } => write!(f, "syscall 0x{:05X}", code),
            Break { code } => write!(f, "break 0x{:05X}", code),
            Sync => write!(f, "sync"),

            Mfhi { rd } => write!(f, "mfhi r{}", rd),
            Mthi { rs } => write!(f, "mthi r{}", rs),
            Mflo { rd } => write!(f, "mflo r{}", rd),
            Mtlo { rs } => write!(f, "mtlo r{}", rs),
            Mult { rs, rt } => write!(f, "mult r{}, r{}", rs, rt),
            Multu { rs, rt } => write!(f, "multu r{}, r{}", rs, rt),
            Div { rs, rt } => write!(f, "div r{}, r{}", rs, rt),
            Divu { rs, rt } => write!(f, "divu r{}, r{}", rs, rt),
            Dmult { rs, rt } => write!(f, "dmult r{}, r{}", rs, rt),
            Dmultu { rs, rt } => write!(f, "dmultu r{}, r{}", rs, rt),
            Ddiv { rs, rt } => write!(f, "ddiv r{}, r{}", rs, rt),
            Ddivu { rs, rt } => write!(f, "ddivu r{}, r{}", rs, rt),

            Add { rd, rs, rt } => write!(f, "add r{}, r{}, r{}", rd, rs, rt),
            Addu { rd, rs, rt } => write!(f, "addu r{}, r{}, r{}", rd, rs, rt),
            Sub { rd, rs, rt } => write!(f, "sub r{}, r{}, r{}", rd, rs, rt),
            Subu { rd, rs, rt } => write!(f, "subu r{}, r{}, r{}", rd, rs, rt),
            And { rd, rs, rt } => write!(f, "and r{}, r{}, r{}", rd, rs, rt),
            Or { rd, rs, rt } => write!(f, "or r{}, r{}, r{}", rd, rs, rt),
            Xor { rd, rs, rt } => write!(f, "xor r{}, r{}, r{}", rd, rs, rt),
            Nor { rd, rs, rt } => write!(f, "nor r{}, r{}, r{}", rd, rs, rt),
            Slt { rd, rs, rt } => write!(f, "slt r{}, r{}, r{}", rd, rs, rt),
            Sltu { rd, rs, rt } => write!(f, "sltu r{}, r{}, r{}", rd, rs, rt),
            Dadd { rd, rs, rt } => write!(f, "dadd r{}, r{}, r{}", rd, rs, rt),
            Daddu { rd, rs, rt } => write!(f, "daddu r{}, r{}, r{}", rd, rs, rt),
            Dsub { rd, rs, rt } => write!(f, "dsub r{}, r{}, r{}", rd, rs, rt),
            Dsubu { rd, rs, rt } => write!(f, "dsubu r{}, r{}, r{}", rd, rs, rt),

            Bltz { rs, offset } => write!(f, "bltz r{}, {}", rs, offset as i16),
            Bgez { rs, offset } => write!(f, "bgez r{}, {}", rs, offset as i16),
            Bltzal { rs, offset } => write!(f, "bltzal r{}, {}", rs, offset as i16),
            Bgezal { rs, offset } => write!(f, "bgezal r{}, {}", rs, offset as i16),

            J { target } => write!(f, "j 0x{:07X}", target << 2),
            Jal { target } => write!(f, "jal 0x{:07X}", target << 2),
            Beq { rs, rt, offset } => write!(f, "beq r{}, r{}, {}", rs, rt, offset as i16),
            Bne { rs, rt, offset } => write!(f, "bne r{}, r{}, {}", rs, rt, offset as i16),
            Blez { rs, offset } => write!(f, "blez r{}, {}", rs, offset as i16),
            Bgtz { rs, offset } => write!(f, "bgtz r{}, {}", rs, offset as i16),

            Addi { rt, rs, imm } => write!(f, "addi r{}, r{}, {}", rt, rs, imm as i16),
            Addiu { rt, rs, imm } => write!(f, "addiu r{}, r{}, {}", rt, rs, imm as i16),
            Slti { rt, rs, imm } => write!(f, "slti r{}, r{}, {}", rt, rs, imm as i16),
            Sltiu { rt, rs, imm } => write!(f, "sltiu r{}, r{}, {}", rt, rs, imm as i16),
            Andi { rt, rs, imm } => write!(f, "andi r{}, r{}, 0x{:04X}", rt, rs, imm),
            Ori { rt, rs, imm } => write!(f, "ori r{}, r{}, 0x{:04X}", rt, rs, imm),
            Xori { rt, rs, imm } => write!(f, "xori r{}, r{}, 0x{:04X}", rt, rs, imm),
            Lui { rt, imm } => write!(f, "lui r{}, 0x{:04X}", rt, imm),
            Daddi { rt, rs, imm } => write!(f, "daddi r{}, r{}, {}", rt, rs, imm as i16),
            Daddiu { rt, rs, imm } => write!(f, "daddiu r{}, r{}, {}", rt, rs, imm as i16),

            Mfc0 { rt, rd } => write!(f, "mfc0 r{}, cop0r{}", rt, rd),
            Mtc0 { rt, rd } => write!(f, "mtc0 r{}, cop0r{}", rt, rd),
            Tlbr => write!(f, "tlbr"),
            Tlbwi => write!(f, "tlbwi"),
            Tlbwr => write!(f, "tlbwr"),
            Tlbp => write!(f, "tlbp"),
            Eret => write!(f, "eret"),
            Cop1(word) => write!(f, "cop1 0x{:08X}", word),

            Lb { rt, base, offset } => write!(f, "lb r{}, {}(r{})", rt, offset as i16, base),
            Lh { rt, base, offset } => write!(f, "lh r{}, {}(r{})", rt, offset as i16, base),
            Lw { rt, base, offset } => write!(f, "lw r{}, {}(r{})", rt, offset as i16, base),
            Lbu { rt, base, offset } => write!(f, "lbu r{}, {}(r{})", rt, offset as i16, base),
            Lhu { rt, base, offset } => write!(f, "lhu r{}, {}(r{})", rt, offset as i16, base),
            Lwr { rt, base, offset } => write!(f, "lwr r{}, {}(r{})", rt, offset as i16, base),
            Lwu { rt, base, offset } => write!(f, "lwu r{}, {}(r{})", rt, offset as i16, base),
            Sb { rt, base, offset } => write!(f, "sb r{}, {}(r{})", rt, offset as i16, base),
            Sh { rt, base, offset } => write!(f, "sh r{}, {}(r{})", rt, offset as i16, base),
            Sw { rt, base, offset } => write!(f, "sw r{}, {}(r{})", rt, offset as i16, base),
            Ll { rt, base, offset } => write!(f, "ll r{}, {}(r{})", rt, offset as i16, base),
            Sc { rt, base, offset } => write!(f, "sc r{}, {}(r{})", rt, offset as i16, base),

            Cache => write!(f, "cache"),
            Unknown(word) => write!(f, "unknown 0x{:08X}", word),
        }
    }
}
