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

use crate::core::memory::Bus;
use crate::core::save_state::{CpuState, StateSave};

/// CPU (MIPS R4300i) emulation implementation
///
/// # Specifications
/// - Architecture: MIPS III subset, executed with 32-bit registers
/// - 64-bit opcodes run with 32-bit truncation
/// - Branch delay slot and one-instruction load delay
///
/// # Example
/// ```
/// use mipsemu::core::cpu::CPU;
///
/// let mut cpu = CPU::new();
/// cpu.reset();
/// assert_eq!(cpu.reg(0), 0); // r0 is always 0
/// assert_eq!(cpu.pc(), CPU::BOOT_VECTOR);
/// ```
pub struct CPU {
    /// General purpose registers (r0-r31)
    ///
    /// r0 is hardwired to always return 0
    regs: [u32; 32],

    /// Program counter
    pc: u32,

    /// Next PC (address of the instruction after the one at `pc`)
    next_pc: u32,

    /// HI register (multiplication/division result upper 32 bits)
    hi: u32,

    /// LO register (multiplication/division result lower 32 bits)
    lo: u32,

    /// Coprocessor 0 (System Control)
    cop0: COP0,

    /// Effect deferred to the start of the next step
    pending: Option<PendingAction>,

    /// Control transfer that takes effect at the end of the current step,
    /// bypassing the delay slot (exception entry and ERET)
    redirect: Option<u32>,

    /// LL/SC link bit
    ll_bit: bool,

    /// Address recorded by the last LL
    ll_addr: u32,

    /// Most recently raised exception, cleared by ERET
    exception: Option<ExceptionCause>,

    /// Raise Overflow from ADD/ADDI/SUB and their 64-bit-tagged forms
    trap_on_overflow: bool,

    /// Executed instruction count
    instructions: u64,

    /// Elapsed cycle count
    cycles: u64,

    /// Current instruction (for debugging)
    current_instruction: u32,
}

/// Effect armed by one instruction and consumed by the next step
///
/// Only one can be outstanding: the next step takes it before executing,
/// and an instruction arms at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// Register write from a load, visible one instruction later
    Load { reg: u8, value: u32 },
    /// Taken branch; the delay slot runs first, then PC becomes `target`
    Branch { target: u32 },
}

// Module declarations
mod cop0;
mod decode;
mod disassembler;
mod instructions;
#[cfg(test)]
mod tests;

// Re-exports
pub use cop0::{CauseFlags, ExceptionCause, StatusFlags, COP0};
pub use decode::Instruction;
pub use disassembler::Disassembler;

impl CPU {
    /// Reset vector used when no cartridge supplies a boot address
    pub const BOOT_VECTOR: u32 = 0xA400_0040;

    /// General exception vector
    pub const EXCEPTION_VECTOR: u32 = 0x8000_0180;

    /// Create a new CPU instance at the reset vector
    ///
    /// # Example
    /// ```
    /// use mipsemu::core::cpu::CPU;
    ///
    /// let cpu = CPU::new();
    /// assert_eq!(cpu.reg(0), 0);
    /// assert_eq!(cpu.next_pc(), CPU::BOOT_VECTOR + 4);
    /// ```
    pub fn new() -> Self {
        Self {
            regs: [0u32; 32],
            pc: Self::BOOT_VECTOR,
            next_pc: Self::BOOT_VECTOR.wrapping_add(4),
            hi: 0,
            lo: 0,
            cop0: COP0::new(),
            pending: None,
            redirect: None,
            ll_bit: false,
            ll_addr: 0,
            exception: None,
            trap_on_overflow: false,
            instructions: 0,
            cycles: 0,
            current_instruction: 0,
        }
    }

    /// Reset CPU to its power-on state at the reset vector
    pub fn reset(&mut self) {
        self.reset_to(Self::BOOT_VECTOR);
    }

    /// Reset CPU and start execution at `boot_address`
    ///
    /// The overflow-trap setting survives a reset.
    pub fn reset_to(&mut self, boot_address: u32) {
        self.regs = [0u32; 32];
        self.pc = boot_address;
        self.next_pc = boot_address.wrapping_add(4);
        self.hi = 0;
        self.lo = 0;
        self.cop0.reset();
        self.pending = None;
        self.redirect = None;
        self.ll_bit = false;
        self.ll_addr = 0;
        self.exception = None;
        self.instructions = 0;
        self.cycles = 0;
        self.current_instruction = 0;
    }

    /// Enable or disable overflow traps
    pub fn set_trap_on_overflow(&mut self, enabled: bool) {
        self.trap_on_overflow = enabled;
    }

    /// Read from general purpose register
    ///
    /// r0 always returns 0.
    #[inline(always)]
    pub fn reg(&self, index: u8) -> u32 {
        if index == 0 {
            0
        } else {
            self.regs[index as usize]
        }
    }

    /// Write to general purpose register
    ///
    /// Writes to r0 are ignored.
    ///
    /// # Example
    /// ```
    /// use mipsemu::core::cpu::CPU;
    ///
    /// let mut cpu = CPU::new();
    /// cpu.set_reg(1, 0x12345678);
    /// assert_eq!(cpu.reg(1), 0x12345678);
    ///
    /// cpu.set_reg(0, 0xDEADBEEF);
    /// assert_eq!(cpu.reg(0), 0);
    /// ```
    #[inline(always)]
    pub fn set_reg(&mut self, index: u8, value: u32) {
        if index != 0 {
            self.regs[index as usize] = value;
        }
    }

    /// Write to register with load delay
    ///
    /// A load already waiting is committed first, then the new one is armed.
    ///
    /// # Example
    /// ```
    /// use mipsemu::core::cpu::CPU;
    ///
    /// let mut cpu = CPU::new();
    /// cpu.set_reg_delayed(3, 100);
    /// assert_eq!(cpu.reg(3), 0);
    ///
    /// cpu.set_reg_delayed(4, 200);
    /// assert_eq!(cpu.reg(3), 100);
    /// ```
    pub fn set_reg_delayed(&mut self, index: u8, value: u32) {
        if let Some(PendingAction::Load { reg, value }) = self.pending {
            self.set_reg(reg, value);
            self.pending = None;
        }

        if index != 0 {
            self.pending = Some(PendingAction::Load { reg: index, value });
        }
    }

    /// Execute one instruction
    ///
    /// 1. Consume the pending action (commit a load, or take a branch
    ///    target for after this instruction)
    /// 2. Fetch and decode the word at PC
    /// 3. Execute it
    /// 4. Advance PC
    /// 5. Update counters and the COP0 timer
    ///
    /// Returns the number of cycles consumed (always 1).
    ///
    /// # Example
    ///
    /// ```
    /// use mipsemu::core::cpu::CPU;
    /// use mipsemu::core::memory::Bus;
    ///
    /// let mut cpu = CPU::new();
    /// let mut bus = Bus::new();
    ///
    /// cpu.reset_to(0x0000_0000);
    /// assert_eq!(cpu.step(&mut bus), 1);
    /// assert_eq!(cpu.pc(), 0x0000_0004);
    /// ```
    pub fn step(&mut self, bus: &mut Bus) -> u32 {
        let branch_target = match self.pending.take() {
            Some(PendingAction::Load { reg, value }) => {
                self.set_reg(reg, value);
                None
            }
            Some(PendingAction::Branch { target }) => Some(target),
            None => None,
        };

        self.current_instruction = bus.read32(self.pc);
        let instruction = Instruction::decode(self.current_instruction);
        self.execute(instruction, bus);

        self.pc = match (self.redirect.take(), branch_target) {
            (Some(target), _) | (None, Some(target)) => target,
            (None, None) => self.next_pc,
        };
        self.next_pc = self.pc.wrapping_add(4);

        self.instructions += 1;
        self.cycles += 1;
        if self.cycles % 2 == 0 {
            self.cop0.tick_count();
        }
        self.cop0.check_timer();

        self.regs[0] = 0;
        1
    }

    /// Arm a delayed control transfer to `target`
    #[inline(always)]
    pub(super) fn branch_to(&mut self, target: u32) {
        self.pending = Some(PendingAction::Branch { target });
    }

    /// Raise an exception
    ///
    /// EPC receives the address of the current instruction, Cause the
    /// exception code, and execution continues at the exception vector.
    /// Anything armed by the faulting instruction is discarded. A second
    /// exception before ERET overwrites EPC and Cause.
    pub fn exception(&mut self, cause: ExceptionCause) {
        let epc = self.pc;

        if let Some(previous) = self.exception {
            log::warn!(
                "EXCEPTION {:?} while {:?} pending, EPC/Cause overwritten",
                cause,
                previous
            );
        }
        log::warn!(
            "EXCEPTION: cause={:?}, EPC=0x{:08X}, instruction=0x{:08X}",
            cause,
            epc,
            self.current_instruction
        );

        self.cop0.enter_exception(cause.code(), epc);
        self.exception = Some(cause);
        self.pending = None;
        self.jump_now(Self::EXCEPTION_VECTOR);
    }

    /// Return from exception (ERET)
    pub(super) fn return_from_exception(&mut self) {
        let epc = self.cop0.return_from_exception();
        self.exception = None;
        self.pending = None;
        self.jump_now(epc);
    }

    /// Move PC to `target` without a delay slot
    fn jump_now(&mut self, target: u32) {
        self.pc = target;
        self.next_pc = target.wrapping_add(4);
        self.redirect = Some(target);
    }

    /// Get current PC value
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Get next PC value
    pub fn next_pc(&self) -> u32 {
        self.next_pc
    }

    pub fn hi(&self) -> u32 {
        self.hi
    }

    pub fn lo(&self) -> u32 {
        self.lo
    }

    /// All general purpose registers
    pub fn regs(&self) -> &[u32; 32] {
        &self.regs
    }

    /// Coprocessor 0
    pub fn cop0(&self) -> &COP0 {
        &self.cop0
    }

    /// Mutable access to Coprocessor 0 (writes go through the register policy)
    pub fn cop0_mut(&mut self) -> &mut COP0 {
        &mut self.cop0
    }

    /// Action armed for the next step, if any
    pub fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    /// Whether the next step executes a branch delay slot
    pub fn in_delay_slot(&self) -> bool {
        matches!(self.pending, Some(PendingAction::Branch { .. }))
    }

    /// Exception raised and not yet returned from
    pub fn pending_exception(&self) -> Option<ExceptionCause> {
        self.exception
    }

    /// LL/SC link state `(bit, address)`
    pub fn link(&self) -> (bool, u32) {
        (self.ll_bit, self.ll_addr)
    }

    /// Executed instruction count
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Elapsed cycle count
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Last fetched instruction word
    pub fn current_instruction(&self) -> u32 {
        self.current_instruction
    }

    /// Log all CPU registers at debug level
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mipsemu::core::cpu::CPU;
    ///
    /// let cpu = CPU::new();
    /// cpu.dump_registers();
    /// ```
    pub fn dump_registers(&self) {
        log::debug!("CPU Registers:");
        log::debug!("PC: 0x{:08X}  Next PC: 0x{:08X}", self.pc, self.next_pc);
        log::debug!("HI: 0x{:08X}  LO: 0x{:08X}", self.hi, self.lo);

        for row in 0..8u8 {
            let line: Vec<String> = (0..4u8)
                .map(|col| {
                    let i = row * 4 + col;
                    format!("r{:2}: 0x{:08X}", i, self.reg(i))
                })
                .collect();
            log::debug!("{}", line.join("  "));
        }

        log::debug!("COP0 Registers:");
        for row in 0..8usize {
            let line: Vec<String> = (0..4usize)
                .map(|col| {
                    let i = row * 4 + col;
                    format!("c{:2}: 0x{:08X}", i, self.cop0.read(i))
                })
                .collect();
            log::debug!("{}", line.join("  "));
        }
    }
}

impl Default for CPU {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSave for CPU {
    type State = CpuState;

    /// A pending load is folded into `regs`, since the next step would
    /// commit it before anything reads it. An armed branch is stored as
    /// `next_pc`.
    fn to_state(&self) -> CpuState {
        let mut regs = self.regs;
        let mut next_pc = self.next_pc;

        match self.pending {
            Some(PendingAction::Load { reg, value }) if reg != 0 => regs[reg as usize] = value,
            Some(PendingAction::Branch { target }) => next_pc = target,
            _ => {}
        }

        CpuState {
            pc: self.pc,
            next_pc,
            regs,
            hi: self.hi,
            lo: self.lo,
            cop0_regs: *self.cop0.regs(),
            cycles: self.cycles,
        }
    }

    /// A `next_pc` other than `pc + 4` re-arms the branch whose delay slot
    /// is at `pc`. The link bit and pending exception are cleared.
    fn restore_from_state(&mut self, state: &CpuState) {
        self.pc = state.pc;
        self.next_pc = state.pc.wrapping_add(4);
        self.pending = if state.next_pc != self.next_pc {
            Some(PendingAction::Branch {
                target: state.next_pc,
            })
        } else {
            None
        };
        self.regs = state.regs;
        self.regs[0] = 0;
        self.hi = state.hi;
        self.lo = state.lo;
        self.cop0.restore(&state.cop0_regs);
        self.cycles = state.cycles;
        self.redirect = None;
        self.ll_bit = false;
        self.exception = None;
    }
}
