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

//! System integration module
//!
//! This module ties the CPU, the memory bus and the loaded cartridge together
//! and provides the stepping entry points used by the binary and the
//! threaded [`Runner`].

mod runner;

pub use runner::{CpuSnapshot, Runner, RunnerCommand};

use super::cartridge::{Cartridge, RomHeader};
use super::config::EmulatorConfig;
use super::cpu::{Disassembler, CPU};
use super::error::{EmulatorError, Result};
use super::memory::Bus;
use super::save_state::{SaveState, StateSave};
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};

/// Emulated machine
///
/// Owns the CPU, the memory bus and the header of the mapped cartridge.
///
/// # Example
/// ```
/// use mipsemu::core::config::EmulatorConfig;
/// use mipsemu::core::system::System;
///
/// let mut system = System::new(EmulatorConfig::default());
/// system.start();
/// system.step_n(4).unwrap();
/// assert_eq!(system.cpu().instructions(), 4);
/// ```
pub struct System {
    /// CPU instance
    cpu: CPU,
    /// Memory bus
    bus: Bus,
    /// Active configuration
    config: EmulatorConfig,
    /// Header of the mapped cartridge
    header: Option<RomHeader>,
    /// Running state, cleared by a fault
    running: bool,
    /// Log every executed instruction at trace level
    trace: bool,
}

/// Cartridge header and register snapshot, as printed by `mipsemu --dump`
#[derive(Debug, Serialize)]
pub struct MachineDump<'a> {
    pub header: Option<&'a RomHeader>,
    pub snapshot: CpuSnapshot,
}

impl System {
    /// Create a new System instance
    ///
    /// The CPU starts at the fixed boot vector with no cartridge mapped.
    pub fn new(config: EmulatorConfig) -> Self {
        let mut cpu = CPU::new();
        cpu.set_trap_on_overflow(config.cpu.trap_on_overflow);

        log::info!(
            "System: initialized (trap_on_overflow={})",
            config.cpu.trap_on_overflow
        );

        Self {
            cpu,
            bus: Bus::new(),
            config,
            header: None,
            running: false,
            trace: false,
        }
    }

    /// Validate, normalize and map a cartridge image, then reset
    ///
    /// On error nothing is touched: the previous cartridge (if any) stays
    /// mapped and the CPU keeps its state.
    pub fn load_rom(&mut self, bytes: Vec<u8>) -> Result<RomHeader> {
        let cartridge = Cartridge::load(bytes)?;
        let header = cartridge.header.clone();

        self.bus.load_rom(cartridge.image);
        self.header = Some(cartridge.header);
        self.reset();

        Ok(header)
    }

    /// Reset to the boot condition
    ///
    /// RAM and device registers are cleared, ROM and save RAM kept. PC is
    /// the cartridge boot address, or [`CPU::BOOT_VECTOR`] without one.
    pub fn reset(&mut self) {
        let boot_address = self.boot_address();
        self.bus.reset();
        self.cpu.reset_to(boot_address);
        self.running = false;
        log::info!("System reset (PC=0x{:08X})", boot_address);
    }

    /// Reset and mark the machine as running
    pub fn start(&mut self) {
        self.reset();
        self.running = true;
        log::info!("System started");
    }

    /// Stop without touching any state
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Continue after [`pause`](Self::pause)
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Execute one instruction
    ///
    /// A fault inside the interpreter is reported as
    /// [`EmulatorError::ExecutionFault`]; the machine stops running but its
    /// state stays inspectable.
    ///
    /// `running` is not consulted here. It is the flag the run loops
    /// ([`Runner`] and the CLI) stop on, and a halted or paused machine can
    /// still be single-stepped for inspection. Stepping never sets it.
    pub fn step(&mut self) -> Result<u32> {
        let pc = self.cpu.pc();

        if self.trace {
            let word = self.bus.read32(pc);
            log::trace!("{:08X}: {:08X}  {}", pc, word, Disassembler::disassemble(word, pc));
        }

        let cpu = &mut self.cpu;
        let bus = &mut self.bus;
        let result = guarded(pc, || cpu.step(bus));

        if let Err(ref e) = result {
            log::error!("{}", e);
            self.running = false;
            self.cpu.dump_registers();
        }

        result
    }

    /// Execute multiple instructions, stopping at the first fault
    pub fn step_n(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Copy of the presentation-facing CPU state
    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot::capture(&self.cpu)
    }

    /// Header and snapshot for diagnostics output
    pub fn dump(&self) -> MachineDump<'_> {
        MachineDump {
            header: self.header.as_ref(),
            snapshot: self.snapshot(),
        }
    }

    /// Capture a save state
    ///
    /// Must only be called between instructions; `&self` access already
    /// guarantees no step is in progress.
    pub fn save_state(&self) -> SaveState {
        let (name, fingerprint) = match &self.header {
            Some(header) => (header.name.clone(), header.fingerprint.clone()),
            None => (String::new(), String::new()),
        };

        log::info!("Capturing save state at PC=0x{:08X}", self.cpu.pc());
        SaveState::new(name, fingerprint, self.cpu.to_state(), self.bus.to_state())
    }

    /// Restore a save state
    ///
    /// The state is validated before anything is modified, so a rejected
    /// state leaves the machine as it was.
    pub fn load_state(&mut self, state: &SaveState) -> Result<()> {
        state.validate()?;

        if let Some(header) = &self.header {
            if !state.metadata.rom_fingerprint.is_empty()
                && state.metadata.rom_fingerprint != header.fingerprint
            {
                log::warn!(
                    "Save state was created for \"{}\", loaded cartridge is \"{}\"",
                    state.metadata.rom_name,
                    header.name
                );
            }
        }

        self.cpu.restore_from_state(&state.cpu);
        self.bus.restore_from_state(&state.memory);
        log::info!(
            "Save state restored (PC=0x{:08X}, saved {})",
            self.cpu.pc(),
            state.metadata.timestamp
        );
        Ok(())
    }

    /// Enable or disable per-instruction trace logging
    pub fn set_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    /// Boot address for the next reset
    pub fn boot_address(&self) -> u32 {
        self.header
            .as_ref()
            .map_or(CPU::BOOT_VECTOR, |header| header.boot_address)
    }

    /// Get current PC value
    pub fn pc(&self) -> u32 {
        self.cpu.pc()
    }

    /// Total cycles executed
    pub fn cycles(&self) -> u64 {
        self.cpu.cycles()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn header(&self) -> Option<&RomHeader> {
        self.header.as_ref()
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn cpu(&self) -> &CPU {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new(EmulatorConfig::default())
    }
}

/// Run `f`, turning a panic into [`EmulatorError::ExecutionFault`] at `pc`
fn guarded<T>(pc: u32, f: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown fault".to_string()
        };
        EmulatorError::ExecutionFault { pc, message }
    })
}

#[cfg(test)]
mod tests;
