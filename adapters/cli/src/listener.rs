//! Session listener used by both run modes.

use rune_strike_session::SessionListener;

/// Logs scoreboard notifications and remembers whether the game ended.
#[derive(Debug, Default)]
pub(crate) struct ConsoleListener {
    game_over_reported: bool,
}

impl ConsoleListener {
    /// Reports whether the session delivered its game over notification.
    #[must_use]
    pub(crate) const fn game_over_reported(&self) -> bool {
        self.game_over_reported
    }
}

impl SessionListener for ConsoleListener {
    fn on_score_change(&mut self, score: u32) {
        log::debug!("score: {score}");
    }

    fn on_level_change(&mut self, level: u32) {
        log::info!("level {level}");
    }

    fn on_wpm_change(&mut self, wpm: u32) {
        log::debug!("wpm: {wpm}");
    }

    fn on_combo_change(&mut self, combo: u32) {
        log::debug!("combo: {combo}");
    }

    fn on_game_over(&mut self) {
        self.game_over_reported = true;
        log::info!("game over");
    }

    fn on_level_up_ready(&mut self, level: u32) {
        log::info!("enemy of level {level} defeated; the challenge awaits");
    }
}
