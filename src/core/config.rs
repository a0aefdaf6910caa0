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

//! Emulator configuration
//!
//! Configuration is stored as TOML. Every field has a default, so a partial
//! file (or no file at all) is valid:
//!
//! ```toml
//! [cpu]
//! trap_on_overflow = false
//!
//! [runner]
//! batch_size = 10000
//! snapshot_interval_ms = 16
//! ```
//!
//! A few settings can also be overridden from the environment (or a `.env`
//! file loaded by the binary):
//! - `MIPSEMU_TRAP_OVERFLOW` (`1`/`true`/`0`/`false`)
//! - `MIPSEMU_BATCH_SIZE` (instruction count)

use super::error::{EmulatorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// CPU behaviour switches
    pub cpu: CpuConfig,
    /// Threaded runner settings
    pub runner: RunnerConfig,
}

/// CPU behaviour switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    /// Raise an Overflow exception from ADD/ADDI/SUB (and their 64-bit-tagged
    /// forms) on signed overflow instead of wrapping silently
    pub trap_on_overflow: bool,
}

/// Threaded runner settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Instructions executed between two cancellation checks
    pub batch_size: usize,
    /// Cadence at which the presentation side polls snapshots
    pub snapshot_interval_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10_000,
            snapshot_interval_ms: 16,
        }
    }
}

impl EmulatorConfig {
    /// Environment variable overriding `cpu.trap_on_overflow`
    pub const ENV_TRAP_OVERFLOW: &'static str = "MIPSEMU_TRAP_OVERFLOW";
    /// Environment variable overriding `runner.batch_size`
    pub const ENV_BATCH_SIZE: &'static str = "MIPSEMU_BATCH_SIZE";

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use mipsemu::core::config::EmulatorConfig;
    ///
    /// let config = EmulatorConfig::from_toml_str("[cpu]\ntrap_on_overflow = true").unwrap();
    /// assert!(config.cpu.trap_on_overflow);
    /// assert_eq!(config.runner.batch_size, 10_000);
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| EmulatorError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| EmulatorError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Split out from [`apply_env_overrides`](Self::apply_env_overrides) so
    /// the parsing can be tested without touching the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(Self::ENV_TRAP_OVERFLOW) {
            self.cpu.trap_on_overflow = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(EmulatorError::Config(format!(
                        "Invalid {} value: {}",
                        Self::ENV_TRAP_OVERFLOW,
                        other
                    )))
                }
            };
        }

        if let Some(value) = lookup(Self::ENV_BATCH_SIZE) {
            let batch_size: usize = value.trim().parse().map_err(|e| {
                EmulatorError::Config(format!("Invalid {} value: {}", Self::ENV_BATCH_SIZE, e))
            })?;
            if batch_size == 0 {
                return Err(EmulatorError::Config(format!(
                    "{} must be greater than zero",
                    Self::ENV_BATCH_SIZE
                )));
            }
            self.runner.batch_size = batch_size;
        }

        Ok(())
    }
}
