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

//! Threaded execution
//!
//! The [`Runner`] moves a [`System`] onto a worker thread. Control flows in
//! through a command channel; state flows out through a single-slot mailbox
//! holding the latest [`CpuSnapshot`]. Commands are only served between
//! batches, so save states are never captured mid-instruction.

use super::System;
use crate::core::cpu::CPU;
use crate::core::error::{EmulatorError, Result};
use crate::core::save_state::SaveState;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// Presentation-facing copy of the CPU state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSnapshot {
    pub pc: u32,
    pub hi: u32,
    pub lo: u32,
    pub cycles: u64,
    pub instructions: u64,
    /// r0-r15
    pub regs: [u32; 16],
}

impl CpuSnapshot {
    /// Copy the visible state out of `cpu`
    pub fn capture(cpu: &CPU) -> Self {
        let mut regs = [0u32; 16];
        regs.copy_from_slice(&cpu.regs()[..16]);

        Self {
            pc: cpu.pc(),
            hi: cpu.hi(),
            lo: cpu.lo(),
            cycles: cpu.cycles(),
            instructions: cpu.instructions(),
            regs,
        }
    }
}

/// Commands accepted by the worker thread
pub enum RunnerCommand {
    /// Stop executing, keep all state
    Pause,
    /// Continue executing
    Resume,
    /// Reset to the boot condition, keeping the paused/running mode
    Reset,
    /// Terminate the worker
    Stop,
    /// Capture a save state and send it back
    SaveState(Sender<SaveState>),
    /// Restore a save state and report the outcome
    LoadState(Box<SaveState>, Sender<Result<()>>),
}

impl RunnerCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reset => "reset",
            Self::Stop => "stop",
            Self::SaveState(_) => "save-state",
            Self::LoadState(..) => "load-state",
        }
    }
}

type Mailbox = Arc<Mutex<Option<CpuSnapshot>>>;

/// Handle to a [`System`] executing on a worker thread
///
/// # Example
/// ```no_run
/// use mipsemu::core::config::EmulatorConfig;
/// use mipsemu::core::system::{Runner, System};
///
/// let mut system = System::new(EmulatorConfig::default());
/// system.start();
///
/// let runner = Runner::spawn(system, 10_000).unwrap();
/// if let Some(snapshot) = runner.latest_snapshot() {
///     println!("PC=0x{:08X}", snapshot.pc);
/// }
/// let system = runner.stop().unwrap();
/// ```
pub struct Runner {
    commands: Sender<RunnerCommand>,
    mailbox: Mailbox,
    /// Mirrors `System::is_running` as of the last batch or command
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<System>>,
}

impl Runner {
    /// Move `system` onto a new worker thread
    ///
    /// A system that is not running waits for [`resume`](Self::resume).
    /// `batch_size` instructions run between two command checks.
    pub fn spawn(system: System, batch_size: usize) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let mailbox: Mailbox = Arc::new(Mutex::new(None));
        let worker_mailbox = Arc::clone(&mailbox);
        let running = Arc::new(AtomicBool::new(system.is_running()));
        let worker_running = Arc::clone(&running);
        let batch_size = batch_size.max(1);

        let worker = thread::Builder::new()
            .name("mipsemu-cpu".to_string())
            .spawn(move || {
                let shared = Shared {
                    mailbox: worker_mailbox,
                    running: worker_running,
                };
                worker_loop(system, rx, shared, batch_size)
            })?;

        log::info!("Runner started (batch size {})", batch_size);

        Ok(Self {
            commands: tx,
            mailbox,
            running,
            worker: Some(worker),
        })
    }

    pub fn pause(&self) -> Result<()> {
        self.send(RunnerCommand::Pause)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(RunnerCommand::Resume)
    }

    pub fn reset(&self) -> Result<()> {
        self.send(RunnerCommand::Reset)
    }

    /// Capture a save state between two batches
    pub fn save_state(&self) -> Result<SaveState> {
        let (tx, rx) = mpsc::channel();
        self.send(RunnerCommand::SaveState(tx))?;
        rx.recv()
            .map_err(|_| EmulatorError::RunnerUnavailable("no save state reply".to_string()))
    }

    /// Restore a save state between two batches
    pub fn load_state(&self, state: SaveState) -> Result<()> {
        let (tx, rx) = mpsc::channel();
        self.send(RunnerCommand::LoadState(Box::new(state), tx))?;
        rx.recv()
            .map_err(|_| EmulatorError::RunnerUnavailable("no load state reply".to_string()))?
    }

    /// Most recently published snapshot
    ///
    /// Polling never blocks the worker for longer than a copy.
    pub fn latest_snapshot(&self) -> Option<CpuSnapshot> {
        *self.mailbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the worker is executing (false once paused or halted by a fault)
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the worker and take the system back
    pub fn stop(mut self) -> Result<System> {
        let worker = self
            .worker
            .take()
            .ok_or_else(|| EmulatorError::RunnerUnavailable("already stopped".to_string()))?;

        // The worker may already be gone after a panic; join reports that
        let _ = self.commands.send(RunnerCommand::Stop);
        worker
            .join()
            .map_err(|_| EmulatorError::RunnerUnavailable("worker thread panicked".to_string()))
    }

    fn send(&self, command: RunnerCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| EmulatorError::RunnerUnavailable("worker thread has exited".to_string()))
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.commands.send(RunnerCommand::Stop);
            let _ = worker.join();
        }
    }
}

/// State the worker shares with the handle
struct Shared {
    mailbox: Mailbox,
    running: Arc<AtomicBool>,
}

impl Shared {
    fn publish(&self, system: &System) {
        *self.mailbox.lock().unwrap_or_else(PoisonError::into_inner) = Some(system.snapshot());
        self.running.store(system.is_running(), Ordering::Release);
    }
}

fn worker_loop(
    mut system: System,
    commands: Receiver<RunnerCommand>,
    shared: Shared,
    batch_size: usize,
) -> System {
    shared.publish(&system);

    loop {
        let command = if system.is_running() {
            match commands.try_recv() {
                Ok(command) => Some(command),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => break,
            }
        } else {
            // Paused: block until told otherwise
            match commands.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            }
        };

        if let Some(command) = command {
            log::debug!("Runner command: {}", command.name());
            match command {
                RunnerCommand::Pause => system.pause(),
                RunnerCommand::Resume => system.resume(),
                RunnerCommand::Reset => {
                    let was_running = system.is_running();
                    system.reset();
                    if was_running {
                        system.resume();
                    }
                }
                RunnerCommand::Stop => break,
                RunnerCommand::SaveState(reply) => {
                    let _ = reply.send(system.save_state());
                }
                RunnerCommand::LoadState(state, reply) => {
                    let _ = reply.send(system.load_state(&state));
                }
            }
            shared.publish(&system);
            continue;
        }

        for _ in 0..batch_size {
            if let Err(e) = system.step() {
                log::error!("Runner halted: {}", e);
                break;
            }
        }
        shared.publish(&system);
    }

    shared.running.store(false, Ordering::Release);
    log::info!(
        "Runner stopped after {} instructions",
        system.cpu().instructions()
    );
    system
}
