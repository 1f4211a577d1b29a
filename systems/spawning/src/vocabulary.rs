//! Word lists the spawner draws from.

use thiserror::Error;

const STANDARD_WORDS: [&str; 14] = [
    "fire", "ice", "storm", "rune", "portal", "spell", "magic", "dark", "light", "burn", "time",
    "zap", "chaos", "nova",
];

const CHALLENGE_WORDS: [&str; 14] = [
    "inferno",
    "blizzard",
    "tempest",
    "runestone",
    "vortex",
    "incantation",
    "arcane",
    "eclipse",
    "radiance",
    "combustion",
    "chronomancy",
    "lightning",
    "maelstrom",
    "supernova",
];

/// Errors raised while validating a vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VocabularyError {
    /// The vocabulary contained no words.
    #[error("vocabulary must contain at least one word")]
    Empty,
    /// A word consisted only of whitespace.
    #[error("word #{index} is blank")]
    BlankWord {
        /// Zero-based position of the blank word.
        index: usize,
    },
    /// A word contained whitespace between its characters.
    #[error("word '{word}' contains whitespace")]
    Whitespace {
        /// Offending word after trimming.
        word: String,
    },
}

/// Validated, lowercase list of words that can be spawned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    /// Validates the provided words and normalises them to lowercase.
    pub fn new<I, S>(words: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalised = Vec::new();
        for (index, word) in words.into_iter().enumerate() {
            let trimmed = word.as_ref().trim();
            if trimmed.is_empty() {
                return Err(VocabularyError::BlankWord { index });
            }
            if trimmed.chars().any(char::is_whitespace) {
                return Err(VocabularyError::Whitespace {
                    word: trimmed.to_owned(),
                });
            }
            normalised.push(trimmed.to_lowercase());
        }

        if normalised.is_empty() {
            return Err(VocabularyError::Empty);
        }

        Ok(Self { words: normalised })
    }

    /// Parses a word list with one word per line.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn parse_lines(source: &str) -> Result<Self, VocabularyError> {
        Self::new(
            source
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Built-in list used from the first level.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_static(&STANDARD_WORDS)
    }

    /// Harder built-in list used once the challenge was accepted.
    #[must_use]
    pub fn challenge() -> Self {
        Self::from_static(&CHALLENGE_WORDS)
    }

    fn from_static(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|word| (*word).to_owned()).collect(),
        }
    }

    /// Words contained in the vocabulary.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words in the vocabulary.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// A validated vocabulary is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Reports whether the vocabulary contains the provided word.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|candidate| candidate == word)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::standard()
    }
}
