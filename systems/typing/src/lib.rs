#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input matcher that turns keystrokes into typing commands.
//!
//! The matcher never stores which word is locked. It derives its state from
//! the world's [`WordView`] on every keystroke, so the world remains the only
//! owner of match progress.

use rune_strike_core::{
    chars_match, Command, KeyInput, SessionStatus, WordId, WordSnapshot, WordView,
};

/// State of the matcher as derived from the active words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchState {
    /// No word is locked; the next character selects a target.
    Idle,
    /// A word is locked and partially typed.
    Locked {
        /// Identifier of the locked word.
        word: WordId,
        /// Characters matched so far.
        progress: u32,
    },
}

impl MatchState {
    /// Derives the matcher state from a snapshot of the active words.
    #[must_use]
    pub fn from_view(words: &WordView) -> Self {
        match words.locked() {
            Some(word) => Self::Locked {
                word: word.id,
                progress: word.match_progress,
            },
            None => Self::Idle,
        }
    }
}

/// Classification of a keystroke reported back to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    /// The key was not a character or the session does not accept input.
    Ignored,
    /// No active word starts with the typed character.
    Unmatched,
    /// The character selected a new target word.
    Locked(WordId),
    /// The character extended the match of the locked word.
    Advanced(WordId),
    /// The character finished the locked word.
    Completed(WordId),
    /// The character did not match the locked word and released it.
    Missed(WordId),
}

impl Keystroke {
    /// Reports whether the keystroke produced a world command.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(
            self,
            Self::Locked(_) | Self::Advanced(_) | Self::Completed(_)
        )
    }
}

/// Typing system that classifies keystrokes and keeps accuracy counters.
#[derive(Debug, Default)]
pub struct Typing {
    keystrokes: u32,
    misses: u32,
}

impl Typing {
    /// Creates a new typing system with cleared counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a single keystroke against the current word snapshot.
    ///
    /// At most one command is pushed to `out`. Held-key repeats are ignored
    /// while a word is locked.
    pub fn handle(
        &mut self,
        key: KeyInput,
        status: SessionStatus,
        words: &WordView,
        out: &mut Vec<Command>,
    ) -> Keystroke {
        if !status.is_running() {
            return Keystroke::Ignored;
        }

        let Some(character) = key.character() else {
            return Keystroke::Ignored;
        };
        let state = MatchState::from_view(words);
        if key.is_repeat() && matches!(state, MatchState::Locked { .. }) {
            return Keystroke::Ignored;
        }
        self.keystrokes = self.keystrokes.saturating_add(1);

        let keystroke = match state {
            MatchState::Idle => Self::select_target(character, words, out),
            MatchState::Locked { word, progress } => match words.get(word) {
                Some(snapshot) => Self::continue_match(character, snapshot, progress, out),
                None => Keystroke::Ignored,
            },
        };

        if let Keystroke::Missed(word) = keystroke {
            self.misses = self.misses.saturating_add(1);
            log::debug!("'{character}' missed word {}", word.get());
        }
        keystroke
    }

    fn select_target(character: char, words: &WordView, out: &mut Vec<Command>) -> Keystroke {
        let candidate = words.iter().find(|word| {
            word.first_char()
                .is_some_and(|first| chars_match(first, character))
        });

        match candidate {
            Some(word) => {
                out.push(Command::LockWord { word: word.id });
                if word.char_count() <= 1 {
                    Keystroke::Completed(word.id)
                } else {
                    Keystroke::Locked(word.id)
                }
            }
            None => Keystroke::Unmatched,
        }
    }

    fn continue_match(
        character: char,
        word: &WordSnapshot,
        progress: u32,
        out: &mut Vec<Command>,
    ) -> Keystroke {
        let expected = word.expected_char();
        if expected.is_some_and(|expected| chars_match(expected, character)) {
            out.push(Command::AdvanceMatch { word: word.id });
            if progress.saturating_add(1) >= word.char_count() {
                Keystroke::Completed(word.id)
            } else {
                Keystroke::Advanced(word.id)
            }
        } else {
            out.push(Command::BreakLock { word: word.id });
            Keystroke::Missed(word.id)
        }
    }

    /// Number of character keystrokes handled while running.
    #[must_use]
    pub const fn keystrokes(&self) -> u32 {
        self.keystrokes
    }

    /// Number of keystrokes that broke a lock.
    #[must_use]
    pub const fn misses(&self) -> u32 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUNNING: SessionStatus = SessionStatus::Running;

    fn word(id: u32, text: &str, match_progress: u32) -> WordSnapshot {
        WordSnapshot {
            id: WordId::new(id),
            text: text.to_owned(),
            position: 600.0,
            speed: 2.0,
            healing: false,
            match_progress,
        }
    }

    #[test]
    fn state_follows_locked_word() {
        let idle = WordView::from_snapshots(vec![word(0, "fire", 0)]);
        assert_eq!(MatchState::from_view(&idle), MatchState::Idle);

        let locked = WordView::from_snapshots(vec![word(0, "fire", 0), word(1, "ice", 2)]);
        assert_eq!(
            MatchState::from_view(&locked),
            MatchState::Locked {
                word: WordId::new(1),
                progress: 2
            }
        );
    }

    #[test]
    fn first_spawned_match_wins() {
        let words = WordView::from_snapshots(vec![word(3, "fire", 0), word(1, "Frost", 0)]);
        let mut typing = Typing::new();
        let mut out = Vec::new();

        let keystroke = typing.handle(KeyInput::Character('F'), RUNNING, &words, &mut out);

        assert_eq!(keystroke, Keystroke::Locked(WordId::new(1)));
        assert_eq!(out, vec![Command::LockWord {
            word: WordId::new(1)
        }]);
    }

    #[test]
    fn input_is_ignored_unless_running() {
        let words = WordView::from_snapshots(vec![word(0, "fire", 0)]);
        let mut typing = Typing::new();
        let mut out = Vec::new();

        for status in [
            SessionStatus::Paused,
            SessionStatus::AwaitingLevelUp,
            SessionStatus::GameOver,
        ] {
            let keystroke = typing.handle(KeyInput::Character('f'), status, &words, &mut out);
            assert_eq!(keystroke, Keystroke::Ignored);
        }
        let keystroke = typing.handle(KeyInput::Control, RUNNING, &words, &mut out);
        assert_eq!(keystroke, Keystroke::Ignored);
        assert!(out.is_empty());
        assert_eq!(typing.keystrokes(), 0);
    }

    #[test]
    fn wrong_character_breaks_lock() {
        let words = WordView::from_snapshots(vec![word(0, "storm", 2)]);
        let mut typing = Typing::new();
        let mut out = Vec::new();

        let keystroke = typing.handle(KeyInput::Character('x'), RUNNING, &words, &mut out);

        assert_eq!(keystroke, Keystroke::Missed(WordId::new(0)));
        assert_eq!(out, vec![Command::BreakLock {
            word: WordId::new(0)
        }]);
        assert_eq!(typing.misses(), 1);
        assert!(!keystroke.is_accepted());
    }

    #[test]
    fn repeat_is_ignored_only_while_locked() {
        let locked = WordView::from_snapshots(vec![word(0, "storm", 1)]);
        let mut typing = Typing::new();
        let mut out = Vec::new();

        let keystroke = typing.handle(KeyInput::Repeat('s'), RUNNING, &locked, &mut out);
        assert_eq!(keystroke, Keystroke::Ignored);
        assert!(out.is_empty());
        assert_eq!(typing.keystrokes(), 0);
        assert_eq!(typing.misses(), 0);

        let idle = WordView::from_snapshots(vec![word(0, "storm", 0)]);
        let keystroke = typing.handle(KeyInput::Repeat('s'), RUNNING, &idle, &mut out);
        assert_eq!(keystroke, Keystroke::Locked(WordId::new(0)));
    }

    #[test]
    fn last_character_reports_completion() {
        let words = WordView::from_snapshots(vec![word(0, "zap", 2)]);
        let mut typing = Typing::new();
        let mut out = Vec::new();

        let keystroke = typing.handle(KeyInput::Character('P'), RUNNING, &words, &mut out);

        assert_eq!(keystroke, Keystroke::Completed(WordId::new(0)));
        assert!(keystroke.is_accepted());
    }
}
