use std::time::Duration;

const CHARACTERS_PER_WORD: f64 = 5.0;

/// Standard words-per-minute figure: five characters count as one word.
///
/// Returns zero before any time elapsed.
#[must_use]
pub fn words_per_minute(characters: u32, elapsed: Duration) -> u32 {
    if elapsed.is_zero() {
        return 0;
    }

    let minutes = elapsed.as_secs_f64() / 60.0;
    let words = f64::from(characters) / CHARACTERS_PER_WORD;
    (words / minutes).round() as u32
}
