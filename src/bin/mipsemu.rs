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

use clap::Parser;
use log::{error, info, warn};
use mipsemu::core::config::EmulatorConfig;
use mipsemu::core::error::{EmulatorError, Result};
use mipsemu::core::save_state::SaveState;
use mipsemu::core::system::{Runner, System};
use std::path::PathBuf;
use std::time::Duration;

/// MIPS R4300i interpreter
#[derive(Parser)]
#[command(name = "mipsemu")]
#[command(about = "MIPS R4300i interpreter with an N64-style address space", long_about = None)]
struct Args {
    /// Path to cartridge image (.z64, .n64 or .v64)
    rom_file: PathBuf,

    /// Number of instructions to execute
    #[arg(short = 'n', long, default_value = "100000")]
    instructions: u64,

    /// Configuration file (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write a save state here when execution ends
    #[arg(long)]
    save_state: Option<PathBuf>,

    /// Restore this save state before executing
    #[arg(long)]
    load_state: Option<PathBuf>,

    /// Execute on a worker thread and poll snapshots
    #[arg(long)]
    threaded: bool,

    /// Print the final CPU snapshot as JSON
    #[arg(long)]
    dump: bool,

    /// Log every executed instruction (trace level)
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    // Pick up RUST_LOG and MIPSEMU_* from a local .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_filter = if args.trace { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    info!("mipsemu v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            EmulatorConfig::load(path)?
        }
        None => EmulatorConfig::default(),
    };
    config.apply_env_overrides()?;

    let mut system = System::new(config.clone());
    system.set_trace(args.trace);

    info!("Loading cartridge from: {}", args.rom_file.display());
    let image = std::fs::read(&args.rom_file)?;
    let header = match system.load_rom(image) {
        Ok(header) => header,
        Err(e) => {
            error!("Failed to load cartridge: {}", e);
            return Err(e);
        }
    };

    info!("Name:         {}", header.name);
    info!("Game ID:      {}", header.game_id);
    info!("Format:       {}", header.endianness);
    info!("Boot address: 0x{:08X}", header.boot_address);
    info!("Country:      {} ({})", header.country, header.country_code);
    info!("CRC:          0x{:08X} 0x{:08X}", header.crc1, header.crc2);
    info!("Save type:    {}", system.bus().save_type());
    info!("Fingerprint:  {}", header.fingerprint);

    system.start();

    if let Some(path) = &args.load_state {
        let state = SaveState::load_from_file(path)?;
        system.load_state(&state)?;
    }

    let system = if args.threaded {
        run_threaded(system, &config, args.instructions)?
    } else {
        run_inline(system, args.instructions)?
    };

    info!("Emulation completed");
    info!("Total instructions: {}", system.cpu().instructions());
    info!("Total cycles: {}", system.cycles());
    info!("Final PC: 0x{:08X}", system.pc());

    if let Some(path) = &args.save_state {
        system.save_state().save_to_file(path)?;
    }

    if args.dump {
        let json = serde_json::to_string_pretty(&system.dump())
            .map_err(|e| EmulatorError::Io(e.into()))?;
        println!("{}", json);
    }

    Ok(())
}

/// Step on the calling thread
fn run_inline(mut system: System, total: u64) -> Result<System> {
    let log_interval = (total / 10).max(1);

    for i in 0..total {
        if i % log_interval == 0 && i > 0 {
            info!(
                "Progress: {}/{} instructions | PC: 0x{:08X} | Cycles: {}",
                i,
                total,
                system.pc(),
                system.cycles()
            );
        }

        if let Err(e) = system.step() {
            error!("Instruction count: {}", i);
            return Err(e);
        }
    }

    Ok(system)
}

/// Step on a worker thread while this thread polls snapshots
fn run_threaded(system: System, config: &EmulatorConfig, total: u64) -> Result<System> {
    let start = system.cpu().instructions();
    let runner = Runner::spawn(system, config.runner.batch_size)?;
    let interval = Duration::from_millis(config.runner.snapshot_interval_ms.max(1));

    loop {
        std::thread::sleep(interval);

        let Some(snapshot) = runner.latest_snapshot() else {
            continue;
        };
        let done = snapshot.instructions.saturating_sub(start);

        info!(
            "Progress: {}/{} instructions | PC: 0x{:08X} | Cycles: {}",
            done.min(total),
            total,
            snapshot.pc,
            snapshot.cycles
        );

        if done >= total {
            break;
        }
        if !runner.is_running() {
            warn!("Runner halted before reaching {} instructions", total);
            break;
        }
    }

    runner.pause()?;
    runner.stop()
}
