use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Side;

/// Scores, hit counters and elapsed ticks of one match.
///
/// - A side's **score** grows when the ball leaves the arena behind the
///   opposing paddle.
/// - A side's **hits** grow each time its paddle returns the ball.
///
/// # Example
///
/// ```
/// use pongevo_engine::{MatchState, Side};
///
/// let state = MatchState::new();
/// assert_eq!(state.score(Side::Left), 0);
/// assert_eq!(state.hits(Side::Right), 0);
/// assert_eq!(state.ticks(), 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    left_score: u32,
    right_score: u32,
    left_hits: u32,
    right_hits: u32,
    ticks: u64,
}

impl MatchState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left_score: 0,
            right_score: 0,
            left_hits: 0,
            right_hits: 0,
            ticks: 0,
        }
    }

    #[must_use]
    pub const fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_score,
            Side::Right => self.right_score,
        }
    }

    #[must_use]
    pub const fn hits(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_hits,
            Side::Right => self.right_hits,
        }
    }

    #[must_use]
    pub const fn left_score(&self) -> u32 {
        self.left_score
    }

    #[must_use]
    pub const fn right_score(&self) -> u32 {
        self.right_score
    }

    #[must_use]
    pub const fn left_hits(&self) -> u32 {
        self.left_hits
    }

    #[must_use]
    pub const fn right_hits(&self) -> u32 {
        self.right_hits
    }

    /// Number of ticks simulated since the match started.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated time for `ticks` at the given fixed rate.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn elapsed(&self, ticks_per_second: u32) -> Duration {
        const NANOS_PER_SEC: u64 = 1_000_000_000;
        let rate = u64::from(ticks_per_second);
        let secs = self.ticks / rate;
        let nanos = (self.ticks % rate) * NANOS_PER_SEC / rate;
        Duration::new(secs, nanos as u32)
    }

    pub(crate) fn record_point(&mut self, scorer: Side) {
        match scorer {
            Side::Left => self.left_score += 1,
            Side::Right => self.right_score += 1,
        }
    }

    pub(crate) fn record_hit(&mut self, side: Side) {
        match side {
            Side::Left => self.left_hits += 1,
            Side::Right => self.right_hits += 1,
        }
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks += 1;
    }
}
