#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Rune Strike experience.

mod config;
mod headless;
mod listener;
mod windowed;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rune_strike_core::{Difficulty, WELCOME_BANNER};

use crate::{config::GameSettings, headless::Autopilot, windowed::WindowOptions};

const DEFAULT_HEADLESS_FRAMES: u64 = 60 * 120;

/// Type the words before they reach you to strike the enemy.
#[derive(Debug, Parser)]
#[command(name = "rune-strike", version, about)]
struct Args {
    /// TOML file providing default game settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Speed preset: easy, mid or crazy.
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// Seed for word selection, speed jitter and healing rolls.
    #[arg(long)]
    seed: Option<u64>,
    /// Milliseconds between two spawned words.
    #[arg(long, value_name = "MILLIS")]
    spawn_interval_ms: Option<u64>,
    /// Wait for a confirmation before the first level-up and switch to the challenge words.
    #[arg(long)]
    require_level_up_confirmation: bool,
    /// Word list used from the first level, one word per line.
    #[arg(long, value_name = "FILE")]
    vocabulary: Option<PathBuf>,
    /// Word list used once the challenge was accepted.
    #[arg(long, value_name = "FILE")]
    challenge_vocabulary: Option<PathBuf>,
    /// Play without a window, letting a simulated typist type.
    #[arg(long)]
    headless: bool,
    /// Number of 1/60 s frames simulated in headless mode.
    #[arg(long, default_value_t = DEFAULT_HEADLESS_FRAMES)]
    frames: u64,
    /// Characters per second typed by the simulated typist.
    #[arg(long, default_value_t = 5.0)]
    typing_speed: f32,
    /// Probability that the simulated typist presses a wrong key.
    #[arg(long, default_value_t = 0.05)]
    mistake_rate: f64,
    /// Print the headless summary as JSON.
    #[arg(long)]
    json: bool,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
}

impl Args {
    fn settings(&self) -> Result<GameSettings> {
        let file = match &self.config {
            Some(path) => GameSettings::load(path)?,
            None => GameSettings::default(),
        };

        Ok(file.overridden_by(GameSettings {
            difficulty: self.difficulty,
            seed: self.seed,
            spawn_interval_ms: self.spawn_interval_ms,
            require_level_up_confirmation: self.require_level_up_confirmation.then_some(true),
            vocabulary: self.vocabulary.clone(),
            challenge_vocabulary: self.challenge_vocabulary.clone(),
        }))
    }
}

/// Entry point for the Rune Strike command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.settings()?.into_session_config()?;
    if !args.json {
        println!("{WELCOME_BANNER}");
    }

    if !args.headless {
        return windowed::run(
            config,
            WindowOptions {
                vsync: args.vsync,
                show_fps: args.show_fps,
            },
        );
    }

    let autopilot = Autopilot::new(args.typing_speed, args.mistake_rate, config.seed)?;
    let summary = headless::run(config, autopilot, args.frames)?;
    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("failed to encode summary")?;
        println!("{json}");
    } else {
        println!("{summary}");
    }
    Ok(())
}
