//! Render and input boundary of a running match.
//!
//! The episode loop calls [`MatchObserver::poll_interrupt`] before every tick
//! and [`MatchObserver::draw`] after it. Observers only see the game through a
//! shared reference, so nothing they do can change the outcome of a match.

use pongevo_engine::{Game, StepReport};

/// One tick as presented to an observer.
#[derive(Debug, Clone, Copy)]
pub struct MatchFrame<'a> {
    pub game: &'a Game,
    pub report: &'a StepReport,
    /// Short description of the match, such as `gen 3: #4 vs #7`.
    pub caption: &'a str,
}

pub trait MatchObserver {
    /// Returns `true` if the user asked to stop.
    fn poll_interrupt(&mut self) -> bool {
        false
    }

    fn draw(&mut self, frame: &MatchFrame<'_>) {
        let _ = frame;
    }
}

/// Observer that draws nothing and never interrupts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl MatchObserver for Headless {}
