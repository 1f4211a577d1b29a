//! Windowless sessions driven by a simulated typist.

use std::{fmt, time::Duration};

use anyhow::{ensure, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rune_strike_core::{
    chars_match, Difficulty, KeyInput, SessionStatus, WordView, REFERENCE_FRAME,
};
use rune_strike_session::{Lifecycle, Session, SessionConfig, SessionListener};
use serde::Serialize;

use crate::listener::ConsoleListener;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Simulated typist that plays a session without a keyboard.
#[derive(Debug)]
pub(crate) struct Autopilot {
    characters_per_second: f32,
    mistake_rate: f64,
    budget: f32,
    rng: ChaCha8Rng,
}

impl Autopilot {
    /// Creates a typist with the provided speed and error ratio.
    pub(crate) fn new(characters_per_second: f32, mistake_rate: f64, seed: u64) -> Result<Self> {
        ensure!(
            characters_per_second.is_finite() && characters_per_second >= 0.0,
            "typing speed must be a non-negative number (received {characters_per_second})"
        );
        ensure!(
            (0.0..=1.0).contains(&mistake_rate),
            "mistake rate must lie between 0 and 1 (received {mistake_rate})"
        );

        Ok(Self {
            characters_per_second,
            mistake_rate,
            budget: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Types as many characters as the elapsed `dt` allows.
    ///
    /// A pending level-up is accepted before anything is typed.
    pub(crate) fn drive<L>(&mut self, session: &mut Session<L>, dt: Duration)
    where
        L: SessionListener,
    {
        match session.status() {
            SessionStatus::AwaitingLevelUp => {
                session.confirm_level_up();
                return;
            }
            SessionStatus::Running => {}
            SessionStatus::Paused | SessionStatus::GameOver => return,
        }

        self.budget += self.characters_per_second * dt.as_secs_f32();
        while self.budget >= 1.0 && session.status() == SessionStatus::Running {
            let Some(expected) = next_character(&session.words()) else {
                self.budget = 1.0;
                return;
            };
            self.budget -= 1.0;

            let character = if self.rng.gen_bool(self.mistake_rate) {
                self.mistype(expected)
            } else {
                expected
            };
            let _ = session.key_down(KeyInput::from_char(character));
        }
    }

    fn mistype(&mut self, expected: char) -> char {
        let index = self.rng.gen_range(0..ALPHABET.len());
        let candidate = char::from(ALPHABET[index]);
        if chars_match(candidate, expected) {
            char::from(ALPHABET[(index + 1) % ALPHABET.len()])
        } else {
            candidate
        }
    }
}

/// Character that continues the locked word, or starts the most urgent one.
fn next_character(words: &WordView) -> Option<char> {
    if let Some(locked) = words.locked() {
        return locked.expected_char();
    }

    words
        .iter()
        .min_by(|left, right| left.position.total_cmp(&right.position))
        .and_then(|word| word.first_char())
}

/// Outcome of a headless run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct SessionSummary {
    pub(crate) difficulty: Difficulty,
    pub(crate) status: SessionStatus,
    pub(crate) frames: u64,
    pub(crate) elapsed_seconds: f64,
    pub(crate) score: u32,
    pub(crate) level: u32,
    pub(crate) wpm: u32,
    pub(crate) combo: u32,
    pub(crate) words_typed: u32,
    pub(crate) characters_typed: u32,
    pub(crate) keystrokes: u32,
    pub(crate) misses: u32,
    pub(crate) player_hp: i32,
    pub(crate) enemy_hp: i32,
    pub(crate) game_over_reported: bool,
}

impl SessionSummary {
    fn collect(session: &Session<ConsoleListener>, difficulty: Difficulty, frames: u64) -> Self {
        let combat = session.combat();
        let scoreboard = session.scoreboard();

        Self {
            difficulty,
            status: session.status(),
            frames,
            elapsed_seconds: session.metrics().elapsed().as_secs_f64(),
            score: scoreboard.score,
            level: scoreboard.level,
            wpm: scoreboard.wpm,
            combo: scoreboard.combo,
            words_typed: session.metrics().words_typed(),
            characters_typed: session.metrics().characters_typed(),
            keystrokes: session.typing().keystrokes(),
            misses: session.typing().misses(),
            player_hp: combat.player_hp,
            enemy_hp: combat.enemy_hp,
            game_over_reported: session.listener().game_over_reported(),
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "status: {:?} after {} frames ({:.1}s, {} difficulty)",
            self.status, self.frames, self.elapsed_seconds, self.difficulty
        )?;
        writeln!(
            f,
            "score: {}  level: {}  wpm: {}  combo: {}",
            self.score, self.level, self.wpm, self.combo
        )?;
        writeln!(
            f,
            "words: {}  characters: {}  keystrokes: {}  misses: {}",
            self.words_typed, self.characters_typed, self.keystrokes, self.misses
        )?;
        write!(
            f,
            "player hp: {}  enemy hp: {}  game over reported: {}",
            self.player_hp, self.enemy_hp, self.game_over_reported
        )
    }
}

/// Plays a session for at most `frames` reference frames.
pub(crate) fn run(
    config: SessionConfig,
    mut autopilot: Autopilot,
    frames: u64,
) -> Result<SessionSummary> {
    let difficulty = config.difficulty;
    let mut session = Session::new(config, ConsoleListener::default())?;
    session.start();

    let mut played = 0;
    while played < frames && session.lifecycle() == Lifecycle::Running {
        session.frame(REFERENCE_FRAME);
        autopilot.drive(&mut session, REFERENCE_FRAME);
        played += 1;
    }

    if session.lifecycle() == Lifecycle::Running {
        log::info!("frame budget of {frames} exhausted");
        session.stop();
    }

    Ok(SessionSummary::collect(&session, difficulty, played))
}
