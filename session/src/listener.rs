use rune_strike_system_metrics::Publication;

/// Host callbacks notified by a running session.
///
/// Scoreboard callbacks are throttled by the session's publish cadence and
/// flushed before [`SessionListener::on_game_over`], which fires at most once.
pub trait SessionListener {
    /// The score changed.
    fn on_score_change(&mut self, score: u32);

    /// A new level started.
    fn on_level_change(&mut self, level: u32);

    /// The words-per-minute figure changed.
    fn on_wpm_change(&mut self, wpm: u32);

    /// The combo streak changed.
    fn on_combo_change(&mut self, combo: u32);

    /// The session ended because the player fell or conceded.
    fn on_game_over(&mut self);

    /// The enemy of `level` fell and the session waits for a confirmation.
    fn on_level_up_ready(&mut self, level: u32) {
        let _ = level;
    }
}

pub(crate) fn deliver<L>(listener: &mut L, publications: &[Publication])
where
    L: SessionListener + ?Sized,
{
    for publication in publications {
        match *publication {
            Publication::Score(score) => listener.on_score_change(score),
            Publication::Level(level) => listener.on_level_change(level),
            Publication::Wpm(wpm) => listener.on_wpm_change(wpm),
            Publication::Combo(combo) => listener.on_combo_change(combo),
        }
    }
}
