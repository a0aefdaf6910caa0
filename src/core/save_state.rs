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

//! Save state serialization
//!
//! A save state captures everything needed to resume execution: the CPU
//! register files and main RAM. Cartridge ROM and save RAM are not part of
//! it; the metadata records which cartridge the state belongs to.
//!
//! # Save State Format
//!
//! Save states are serialized using bincode for efficient binary encoding.
//! The state includes:
//! - Metadata (timestamp, cartridge name and fingerprint)
//! - CPU state (registers, PC, HI/LO, COP0, cycle count)
//! - Memory state (RAM)
//!
//! # Version Compatibility
//!
//! Save states include a version number to ensure compatibility.
//! Loading a save state with a different version will fail with an error.
//!
//! # Example
//!
//! ```no_run
//! use mipsemu::core::save_state::SaveState;
//! use mipsemu::core::System;
//! use mipsemu::core::config::EmulatorConfig;
//!
//! let mut system = System::new(EmulatorConfig::default());
//! system.step_n(1000).unwrap();
//!
//! let state = system.save_state();
//! state.save_to_file("save.state").unwrap();
//!
//! let loaded = SaveState::load_from_file("save.state").unwrap();
//! system.load_state(&loaded).unwrap();
//! ```

use crate::core::error::{Result, SaveStateError};
use crate::core::memory::Bus;
use bincode::{config, Decode, Encode};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Save state version for compatibility checking
///
/// This version number should be incremented whenever the save state format changes
/// in a way that breaks backward compatibility.
pub const SAVE_STATE_VERSION: u32 = 1;

/// Complete emulator save state
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct SaveState {
    /// Version number for compatibility checking
    pub version: u32,

    /// Save state metadata
    pub metadata: SaveStateMetadata,

    /// CPU state
    pub cpu: CpuState,

    /// Memory state (RAM)
    pub memory: MemoryState,
}

/// Save state metadata
///
/// Contains information about when and for which cartridge the save state
/// was created.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
#[bincode(encode_bounds = "", decode_bounds = "")]
pub struct SaveStateMetadata {
    /// Timestamp when the save state was created
    #[bincode(with_serde)]
    pub timestamp: DateTime<Utc>,

    /// Cartridge name from the header (empty without a cartridge)
    pub rom_name: String,

    /// Cartridge header fingerprint (empty without a cartridge)
    pub rom_fingerprint: String,
}

/// CPU state for save states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct CpuState {
    /// Program counter
    pub pc: u32,

    /// Next program counter
    pub next_pc: u32,

    /// General purpose registers (r0-r31)
    pub regs: [u32; 32],

    /// HI register
    pub hi: u32,

    /// LO register
    pub lo: u32,

    /// COP0 registers
    pub cop0_regs: [u32; 32],

    /// Elapsed cycles
    pub cycles: u64,
}

/// Memory state for save states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct MemoryState {
    /// Main RAM
    pub ram: Vec<u8>,
}

impl SaveState {
    /// Assemble a save state stamped with the current time
    pub fn new(
        rom_name: impl Into<String>,
        rom_fingerprint: impl Into<String>,
        cpu: CpuState,
        memory: MemoryState,
    ) -> Self {
        Self {
            version: SAVE_STATE_VERSION,
            metadata: SaveStateMetadata {
                timestamp: Utc::now(),
                rom_name: rom_name.into(),
                rom_fingerprint: rom_fingerprint.into(),
            },
            cpu,
            memory,
        }
    }

    /// Check that this state can be applied to a machine
    ///
    /// # Errors
    ///
    /// Returns error if the version differs from [`SAVE_STATE_VERSION`] or
    /// the RAM image does not match the machine's RAM size.
    pub fn validate(&self) -> Result<()> {
        if self.version != SAVE_STATE_VERSION {
            return Err(SaveStateError::Version {
                expected: SAVE_STATE_VERSION,
                got: self.version,
            }
            .into());
        }

        if self.memory.ram.len() != Bus::RAM_SIZE {
            return Err(SaveStateError::RamSize {
                expected: Bus::RAM_SIZE,
                got: self.memory.ram.len(),
            }
            .into());
        }

        Ok(())
    }

    /// Encode to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let encoded =
            bincode::encode_to_vec(self, config::standard()).map_err(SaveStateError::from)?;
        Ok(encoded)
    }

    /// Decode from bytes and verify version compatibility
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Deserialization fails
    /// - Bytes remain after the encoded state
    /// - Version is incompatible
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (state, consumed): (SaveState, usize) =
            bincode::decode_from_slice(bytes, config::standard())
                .map_err(SaveStateError::from)?;

        if consumed != bytes.len() {
            return Err(SaveStateError::TrailingData(bytes.len() - consumed).into());
        }

        if state.version != SAVE_STATE_VERSION {
            return Err(SaveStateError::Version {
                expected: SAVE_STATE_VERSION,
                got: state.version,
            }
            .into());
        }

        Ok(state)
    }

    /// Save state to file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be created
    /// - Serialization fails
    /// - Write operation fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use mipsemu::core::save_state::SaveState;
    /// # let state = SaveState::default();
    /// state.save_to_file("save.state").unwrap();
    /// ```
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let encoded = self.to_bytes()?;
        let mut file = File::create(path.as_ref())?;
        file.write_all(&encoded)?;
        log::info!(
            "Save state written to {} ({} bytes)",
            path.as_ref().display(),
            encoded.len()
        );
        Ok(())
    }

    /// Load state from file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or [`SaveState::from_bytes`]
    /// rejects its contents.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path.as_ref())?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;

        let state = Self::from_bytes(&buffer)?;
        log::info!("Save state loaded from {}", path.as_ref().display());
        Ok(state)
    }
}

impl Default for SaveState {
    fn default() -> Self {
        Self::new(
            String::new(),
            String::new(),
            CpuState {
                pc: 0,
                next_pc: 4,
                regs: [0; 32],
                hi: 0,
                lo: 0,
                cop0_regs: [0; 32],
                cycles: 0,
            },
            MemoryState {
                ram: vec![0; Bus::RAM_SIZE],
            },
        )
    }
}

/// Trait for components that can be saved and restored
///
/// # Example
///
/// ```
/// use mipsemu::core::save_state::{MemoryState, StateSave};
///
/// struct Scratch {
///     bytes: Vec<u8>,
/// }
///
/// impl StateSave for Scratch {
///     type State = MemoryState;
///
///     fn to_state(&self) -> MemoryState {
///         MemoryState { ram: self.bytes.clone() }
///     }
///
///     fn restore_from_state(&mut self, state: &MemoryState) {
///         self.bytes.clone_from(&state.ram);
///     }
/// }
///
/// let scratch = Scratch { bytes: vec![1, 2, 3] };
/// assert_eq!(scratch.to_state().ram, vec![1, 2, 3]);
/// ```
pub trait StateSave {
    /// The state type for this component
    type State: Serialize + DeserializeOwned;

    /// Convert this component to a saveable state
    fn to_state(&self) -> Self::State;

    /// Restore this component from a saved state
    fn restore_from_state(&mut self, state: &Self::State);
}
