//! Game settings assembled from an optional TOML file and command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use rune_strike_core::Difficulty;
use rune_strike_session::SessionConfig;
use rune_strike_system_spawning::Vocabulary;
use serde::Deserialize;

/// Settings that may appear in a game configuration file or on the command line.
///
/// Every field is optional; missing values fall back to [`SessionConfig::default`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameSettings {
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) seed: Option<u64>,
    pub(crate) spawn_interval_ms: Option<u64>,
    pub(crate) require_level_up_confirmation: Option<bool>,
    pub(crate) vocabulary: Option<PathBuf>,
    pub(crate) challenge_vocabulary: Option<PathBuf>,
}

impl GameSettings {
    /// Parses settings from TOML source.
    pub(crate) fn parse(source: &str) -> Result<Self> {
        toml::from_str(source).context("game configuration is not valid TOML")
    }

    /// Reads settings from `path`.
    ///
    /// Relative vocabulary paths are resolved against the file's directory.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read game configuration {}", path.display()))?;
        let mut settings = Self::parse(&source)
            .with_context(|| format!("failed to load game configuration {}", path.display()))?;

        if let Some(base) = path.parent() {
            settings.vocabulary = settings.vocabulary.map(|file| base.join(file));
            settings.challenge_vocabulary = settings.challenge_vocabulary.map(|file| base.join(file));
        }
        Ok(settings)
    }

    /// Replaces every value that `overrides` sets.
    #[must_use]
    pub(crate) fn overridden_by(self, overrides: Self) -> Self {
        Self {
            difficulty: overrides.difficulty.or(self.difficulty),
            seed: overrides.seed.or(self.seed),
            spawn_interval_ms: overrides.spawn_interval_ms.or(self.spawn_interval_ms),
            require_level_up_confirmation: overrides
                .require_level_up_confirmation
                .or(self.require_level_up_confirmation),
            vocabulary: overrides.vocabulary.or(self.vocabulary),
            challenge_vocabulary: overrides.challenge_vocabulary.or(self.challenge_vocabulary),
        }
    }

    /// Resolves the settings into a validated session configuration.
    pub(crate) fn into_session_config(self) -> Result<SessionConfig> {
        let mut config = SessionConfig::default();

        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(millis) = self.spawn_interval_ms {
            config.spawn_interval = Duration::from_millis(millis);
        }
        if let Some(required) = self.require_level_up_confirmation {
            config.require_level_up_confirmation = required;
        }
        if let Some(path) = self.vocabulary {
            config.vocabulary = load_vocabulary(&path)?;
        }
        if let Some(path) = self.challenge_vocabulary {
            config.challenge_vocabulary = load_vocabulary(&path)?;
        }

        config
            .validate()
            .context("game configuration cannot be played")?;
        Ok(config)
    }
}

fn load_vocabulary(path: &Path) -> Result<Vocabulary> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read vocabulary {}", path.display()))?;
    Vocabulary::parse_lines(&source)
        .with_context(|| format!("vocabulary {} is not usable", path.display()))
}
