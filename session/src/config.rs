//! Settings fixed when a session is created.

use std::time::Duration;

use rune_strike_core::{Difficulty, PlayField};
use rune_strike_system_metrics::PublishCadence;
use rune_strike_system_spawning::{Vocabulary, DEFAULT_SPAWN_INTERVAL};
use thiserror::Error;

/// Seed used when the host does not supply one.
pub const DEFAULT_SEED: u64 = 0x5275_6e65_5374_726b;

/// Errors raised while validating a [`SessionConfig`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SessionError {
    /// The field leaves no room between the player and the enemy.
    #[error("play field {width}x{height} is too small to play on")]
    UnplayableField {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
    /// Words would spawn continuously.
    #[error("spawn interval must be greater than zero")]
    ZeroSpawnInterval,
    /// Scoreboard publications would never be throttled.
    #[error("publish cadence intervals must be greater than zero")]
    ZeroPublishCadence,
}

/// Configuration used to construct a [`crate::Session`].
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Speed preset, fixed for the whole session.
    pub difficulty: Difficulty,
    /// Initial play field dimensions.
    pub field: PlayField,
    /// Simulated time between two spawned words.
    pub spawn_interval: Duration,
    /// Seed for word selection, speed jitter and healing rolls.
    pub seed: u64,
    /// Holds the first level-up until [`crate::Session::confirm_level_up`] is called.
    pub require_level_up_confirmation: bool,
    /// Words spawned from the first level.
    pub vocabulary: Vocabulary,
    /// Words spawned once the gated level-up was confirmed.
    pub challenge_vocabulary: Vocabulary,
    /// Throttle applied to listener notifications.
    pub cadence: PublishCadence,
}

impl SessionConfig {
    /// Checks the configuration for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), SessionError> {
        if !self.field.is_playable() {
            return Err(SessionError::UnplayableField {
                width: self.field.width(),
                height: self.field.height(),
            });
        }

        if self.spawn_interval.is_zero() {
            return Err(SessionError::ZeroSpawnInterval);
        }

        if !self.cadence.is_valid() {
            return Err(SessionError::ZeroPublishCadence);
        }

        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            field: PlayField::default(),
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            seed: DEFAULT_SEED,
            require_level_up_confirmation: false,
            vocabulary: Vocabulary::standard(),
            challenge_vocabulary: Vocabulary::challenge(),
            cadence: PublishCadence::default(),
        }
    }
}
