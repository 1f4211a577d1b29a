#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic metrics system that tracks the scoreboard reported to hosts.

mod publish;
mod wpm;

use std::time::Duration;

use rune_strike_core::{Event, Scoreboard};

pub use publish::{Publication, PublishCadence, Publisher};
pub use wpm::words_per_minute;

/// Pure metrics system that folds world events into scoreboard values.
#[derive(Clone, Debug)]
pub struct Metrics {
    elapsed: Duration,
    characters_typed: u32,
    words_typed: u32,
    score: u32,
    level: u32,
    combo: u32,
}

impl Metrics {
    /// Creates a new metrics tracker for a session that has not started yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            characters_typed: 0,
            words_typed: 0,
            score: 0,
            level: 1,
            combo: 0,
        }
    }

    /// Consumes world events emitted during the latest update.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => self.elapsed = self.elapsed.saturating_add(*dt),
                Event::CharacterAccepted { .. } => {
                    self.characters_typed = self.characters_typed.saturating_add(1);
                }
                Event::WordCompleted { .. } => {
                    self.words_typed = self.words_typed.saturating_add(1);
                }
                Event::ScoreChanged { score } => self.score = *score,
                Event::ComboChanged { combo } => self.combo = *combo,
                Event::LevelAdvanced { level, .. } => self.level = *level,
                _ => {}
            }
        }
    }

    /// Words per minute derived from the accepted characters and elapsed time.
    #[must_use]
    pub fn wpm(&self) -> u32 {
        words_per_minute(self.characters_typed, self.elapsed)
    }

    /// Current scoreboard values.
    #[must_use]
    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard {
            score: self.score,
            level: self.level,
            wpm: self.wpm(),
            combo: self.combo,
        }
    }

    /// Simulated time observed since the session started.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of accepted characters.
    #[must_use]
    pub const fn characters_typed(&self) -> u32 {
        self.characters_typed
    }

    /// Number of completed words.
    #[must_use]
    pub const fn words_typed(&self) -> u32 {
        self.words_typed
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
