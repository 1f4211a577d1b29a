//! Throttled delivery of scoreboard changes to the host.

use std::time::Duration;

use rune_strike_core::Scoreboard;

/// Minimum spacing between two publications of the same scoreboard group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublishCadence {
    stats: Duration,
    wpm: Duration,
}

impl PublishCadence {
    /// Creates a cadence with separate intervals for score, level and combo and for WPM.
    #[must_use]
    pub const fn new(stats: Duration, wpm: Duration) -> Self {
        Self { stats, wpm }
    }

    /// Interval applied to score, level and combo publications.
    #[must_use]
    pub const fn stats(&self) -> Duration {
        self.stats
    }

    /// Interval applied to WPM publications.
    #[must_use]
    pub const fn wpm(&self) -> Duration {
        self.wpm
    }

    /// Reports whether both intervals are non-zero.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !self.stats.is_zero() && !self.wpm.is_zero()
    }
}

impl Default for PublishCadence {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), Duration::from_millis(200))
    }
}

/// Single scoreboard value delivered to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Publication {
    /// Score changed.
    Score(u32),
    /// Level changed.
    Level(u32),
    /// Combo changed.
    Combo(u32),
    /// Words per minute changed.
    Wpm(u32),
}

/// Explicit publish step that throttles scoreboard deliveries.
#[derive(Clone, Debug)]
pub struct Publisher {
    cadence: PublishCadence,
    published: Scoreboard,
    since_stats: Duration,
    since_wpm: Duration,
}

impl Publisher {
    /// Creates a publisher whose first change is delivered immediately.
    #[must_use]
    pub fn new(cadence: PublishCadence) -> Self {
        Self {
            cadence,
            published: Scoreboard::initial(),
            since_stats: cadence.stats,
            since_wpm: cadence.wpm,
        }
    }

    /// Advances the throttle clocks by the provided frame time.
    pub fn advance(&mut self, dt: Duration) {
        self.since_stats = self.since_stats.saturating_add(dt);
        self.since_wpm = self.since_wpm.saturating_add(dt);
    }

    /// Publishes the fields of `current` whose cadence elapsed and whose value changed.
    pub fn publish(&mut self, current: Scoreboard, out: &mut Vec<Publication>) {
        if self.since_stats >= self.cadence.stats && self.publish_stats(current, out) {
            self.since_stats = Duration::ZERO;
        }

        if self.since_wpm >= self.cadence.wpm && self.publish_wpm(current, out) {
            self.since_wpm = Duration::ZERO;
        }
    }

    /// Publishes every pending difference regardless of cadence.
    pub fn flush(&mut self, current: Scoreboard, out: &mut Vec<Publication>) {
        let _ = self.publish_stats(current, out);
        let _ = self.publish_wpm(current, out);
    }

    /// Values most recently delivered to the host.
    #[must_use]
    pub const fn published(&self) -> Scoreboard {
        self.published
    }

    fn publish_stats(&mut self, current: Scoreboard, out: &mut Vec<Publication>) -> bool {
        let before = out.len();
        if current.score != self.published.score {
            self.published.score = current.score;
            out.push(Publication::Score(current.score));
        }
        if current.level != self.published.level {
            self.published.level = current.level;
            out.push(Publication::Level(current.level));
        }
        if current.combo != self.published.combo {
            self.published.combo = current.combo;
            out.push(Publication::Combo(current.combo));
        }
        out.len() > before
    }

    fn publish_wpm(&mut self, current: Scoreboard, out: &mut Vec<Publication>) -> bool {
        if current.wpm == self.published.wpm {
            return false;
        }
        self.published.wpm = current.wpm;
        out.push(Publication::Wpm(current.wpm));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(score: u32, wpm: u32) -> Scoreboard {
        Scoreboard {
            score,
            level: 1,
            wpm,
            combo: score,
        }
    }

    #[test]
    fn first_change_is_published_immediately() {
        let mut publisher = Publisher::new(PublishCadence::default());
        let mut out = Vec::new();

        publisher.publish(board(1, 30), &mut out);

        assert_eq!(
            out,
            vec![
                Publication::Score(1),
                Publication::Combo(1),
                Publication::Wpm(30)
            ]
        );
    }

    #[test]
    fn changes_inside_the_window_are_held_back() {
        let mut publisher = Publisher::new(PublishCadence::default());
        let mut out = Vec::new();
        publisher.publish(board(1, 30), &mut out);
        out.clear();

        publisher.advance(Duration::from_millis(50));
        publisher.publish(board(2, 31), &mut out);
        assert!(out.is_empty());

        publisher.advance(Duration::from_millis(50));
        publisher.publish(board(3, 32), &mut out);
        assert_eq!(out, vec![Publication::Score(3), Publication::Combo(3)]);
        out.clear();

        publisher.advance(Duration::from_millis(100));
        publisher.publish(board(3, 33), &mut out);
        assert_eq!(out, vec![Publication::Wpm(33)]);
    }

    #[test]
    fn unchanged_values_are_not_republished() {
        let mut publisher = Publisher::new(PublishCadence::default());
        let mut out = Vec::new();

        publisher.advance(Duration::from_secs(1));
        publisher.publish(Scoreboard::initial(), &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn flush_ignores_cadence() {
        let mut publisher = Publisher::new(PublishCadence::default());
        let mut out = Vec::new();
        publisher.publish(board(1, 10), &mut out);
        out.clear();

        publisher.flush(board(4, 12), &mut out);

        assert_eq!(
            out,
            vec![
                Publication::Score(4),
                Publication::Combo(4),
                Publication::Wpm(12)
            ]
        );
        assert_eq!(publisher.published(), board(4, 12));
    }

    #[test]
    fn zero_interval_is_invalid() {
        assert!(PublishCadence::default().is_valid());
        assert!(!PublishCadence::new(Duration::ZERO, Duration::from_millis(200)).is_valid());
    }
}
