#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Horde Survival session.

mod config;
mod console;
mod simulation;
mod store;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use horde_system_session::{BestWaveStore, Outcome, Session};
use horde_world::World;

use crate::{
    config::{seconds, GameConfig},
    console::ConsoleHud,
    simulation::{Behaviour, RunLimits},
    store::JsonFileStore,
};

/// Headless Horde Survival simulation.
#[derive(Debug, Parser)]
#[command(name = "horde", version, about)]
struct CliArgs {
    /// TOML game configuration; built-in tuning is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON file holding the best wave reached.
    #[arg(long, default_value = "best_wave.json")]
    best_wave_file: PathBuf,
    /// Run without reading or writing the best-wave file.
    #[arg(long)]
    no_save: bool,
    /// Seed of the spawn placement generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Length of a simulated frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Stop after this many seconds of real time.
    #[arg(long, default_value_t = 600.0)]
    max_seconds: f64,
    /// Seconds between two trigger pulls; bullet damage comes from `[weapons]`.
    #[arg(long, default_value_t = 0.3)]
    shot_interval: f64,
    /// Damage dealt by a zombie bite.
    #[arg(long, default_value_t = 10.0)]
    bite_damage: f32,
    /// Seconds between two bites.
    #[arg(long, default_value_t = 1.2)]
    bite_interval: f64,
    /// Print the HUD every this many frames; zero prints only the final frame.
    #[arg(long, default_value_t = 30)]
    hud_every: u32,
}

/// Entry point for the Horde Survival command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let game_config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let session_config = game_config.into_session_config(args.seed)?;

    let store: Option<Box<dyn BestWaveStore>> = if args.no_save {
        None
    } else {
        let store = JsonFileStore::new(&args.best_wave_file);
        log::debug!("best wave record at {}", store.path().display());
        Some(Box::new(store))
    };

    let behaviour = Behaviour {
        shot_interval: seconds(args.shot_interval, "--shot-interval")?,
        bite_damage: args.bite_damage,
        bite_interval: seconds(args.bite_interval, "--bite-interval")?,
    };
    let limits = RunLimits {
        frame: Duration::from_millis(args.frame_ms.max(1)),
        max_duration: seconds(args.max_seconds, "--max-seconds")?,
        hud_every: args.hud_every,
    };

    let mut session = Session::new(World::new(), session_config, store);
    session.boot();

    let mut hud = ConsoleHud::new(io::stdout());
    let outcome = simulation::run(&mut session, behaviour, limits, &mut hud)
        .context("headless simulation failed")?;

    match outcome {
        Outcome::Defeated { wave, best } => {
            println!("Game over on wave {}. Best Wave: {best}", wave.get());
        }
        Outcome::InProgress => {
            let wave = session.waves().current_wave().map_or(0, |wave| wave.get());
            println!("Survived until the time limit on wave {wave}.");
        }
    }

    Ok(())
}
