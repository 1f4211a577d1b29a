//! Authoritative word state and identifier allocation.

use rune_strike_core::{WordId, WordSnapshot};

/// Word in flight stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Word {
    /// Identifier allocated by the world for the word.
    pub(crate) id: WordId,
    /// Text the player must type.
    pub(crate) text: String,
    /// Number of characters in `text`.
    pub(crate) length: u32,
    /// Horizontal position measured in world units.
    pub(crate) position: f32,
    /// Speed in world units per reference frame.
    pub(crate) speed: f32,
    /// Whether completing the word heals the player.
    pub(crate) healing: bool,
    /// Characters matched while locked.
    pub(crate) match_progress: u32,
}

impl Word {
    pub(crate) fn is_complete(&self) -> bool {
        self.match_progress >= self.length
    }

    pub(crate) fn snapshot(&self) -> WordSnapshot {
        WordSnapshot {
            id: self.id,
            text: self.text.clone(),
            position: self.position,
            speed: self.speed,
            healing: self.healing,
            match_progress: self.match_progress,
        }
    }
}

/// Registry that stores words in spawn order and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct WordRegistry {
    entries: Vec<Word>,
    next_word_id: WordId,
}

impl WordRegistry {
    /// Creates an empty word registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_word_id: WordId::new(0),
        }
    }

    /// Inserts a new word at the provided position and returns its identifier.
    pub(crate) fn spawn(&mut self, text: String, position: f32, speed: f32, healing: bool) -> WordId {
        let id = self.next_word_id;
        self.next_word_id = WordId::new(id.get().wrapping_add(1));
        let length = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        self.entries.push(Word {
            id,
            text,
            length,
            position,
            speed,
            healing,
            match_progress: 0,
        });
        id
    }

    pub(crate) fn get_mut(&mut self, word: WordId) -> Option<&mut Word> {
        self.entries.iter_mut().find(|entry| entry.id == word)
    }

    pub(crate) fn remove(&mut self, word: WordId) -> Option<Word> {
        let index = self.entries.iter().position(|entry| entry.id == word)?;
        Some(self.entries.remove(index))
    }

    /// Moves every word toward the player and removes the ones that reached `boundary`.
    ///
    /// Expired words are returned in spawn order.
    pub(crate) fn advance(&mut self, frames: f32, boundary: f32) -> Vec<Word> {
        let mut expired = Vec::new();
        let mut retained = Vec::with_capacity(self.entries.len());
        for mut word in self.entries.drain(..) {
            word.position -= word.speed * frames;
            if word.position <= boundary {
                expired.push(word);
            } else {
                retained.push(word);
            }
        }
        self.entries = retained;
        expired
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Word> {
        self.entries.iter()
    }
}
