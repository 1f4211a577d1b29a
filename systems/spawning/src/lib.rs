#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting word spawn commands.

mod vocabulary;

use std::time::Duration;

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rune_strike_core::{Command, Event, SessionStatus, MAX_SPEED_JITTER};

pub use vocabulary::{Vocabulary, VocabularyError};

/// Simulated time between two spawns unless configured otherwise.
pub const DEFAULT_SPAWN_INTERVAL: Duration = Duration::from_millis(2_000);

/// Probability that a spawned word heals the player.
pub const HEALING_PROBABILITY: f64 = 0.2;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            rng_seed,
        }
    }
}

/// Pure system that deterministically emits spawn commands while the session runs.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    accumulator: Duration,
    rng: ChaCha8Rng,
    vocabulary: Vocabulary,
}

impl Spawning {
    /// Creates a new spawning system drawing words from `vocabulary`.
    #[must_use]
    pub fn new(config: Config, vocabulary: Vocabulary) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            vocabulary,
        }
    }

    /// Replaces the vocabulary used by subsequent spawns.
    pub fn set_vocabulary(&mut self, vocabulary: Vocabulary) {
        log::debug!("spawner switched to a vocabulary of {} words", vocabulary.len());
        self.vocabulary = vocabulary;
    }

    /// Vocabulary currently used for spawns.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Consumes events and the session status to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], status: SessionStatus, out: &mut Vec<Command>) {
        if !status.is_running() {
            self.accumulator = Duration::ZERO;
            return;
        }

        if self.spawn_interval.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let spawn_attempts = self.resolve_spawn_attempts();

        for _ in 0..spawn_attempts {
            if let Some(command) = self.next_spawn() {
                out.push(command);
            }
        }
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        if self.spawn_interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        attempts
    }

    fn next_spawn(&mut self) -> Option<Command> {
        let text = self.vocabulary.words().choose(&mut self.rng)?.clone();
        let jitter = self.rng.gen_range(0.0..=MAX_SPEED_JITTER);
        let healing = self.rng.gen_bool(HEALING_PROBABILITY);
        log::debug!("spawning '{text}' (jitter {jitter:.2}, healing {healing})");
        Some(Command::SpawnWord {
            text,
            jitter,
            healing,
        })
    }
}
