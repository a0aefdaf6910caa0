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

/// Emulator error types
use thiserror::Error;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Main error type for the emulator
///
/// Architecturally-normal conditions (division by zero, failed SC,
/// unmapped accesses, SYSCALL/BREAK) are handled inside the CPU and never
/// show up here.
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("Invalid cartridge image: unknown magic 0x{magic:08X}")]
    InvalidRomMagic { magic: u32 },

    #[error("Cartridge image too small: {got} bytes (need at least {expected})")]
    RomTooSmall { expected: usize, got: usize },

    #[error("No cartridge loaded")]
    NoRom,

    #[error("Execution fault at PC=0x{pc:08X}: {message}")]
    ExecutionFault { pc: u32, message: String },

    #[error("Save state error: {0}")]
    SaveState(#[from] SaveStateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Emulation runner is not available: {0}")]
    RunnerUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Save-state specific error types
///
/// All of these are recoverable: a failed restore leaves the running
/// machine untouched.
#[derive(Error, Debug)]
pub enum SaveStateError {
    #[error("Failed to encode save state: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Failed to decode save state: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("Incompatible save state version: expected {expected}, got {got}")]
    Version { expected: u32, got: u32 },

    #[error("Invalid RAM image size: {got} bytes (expected {expected})")]
    RamSize { expected: usize, got: usize },

    #[error("Trailing data after save state: {0} bytes")]
    TrailingData(usize),
}
