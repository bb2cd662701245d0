//! Match logic built on top of [`core`](crate::core).
//!
//! - [`Game`] - Two paddles, one ball, scores and hit counters
//! - [`MatchState`] - Scores, hit counters and tick count of a match
//! - [`StepReport`] - Result of advancing a [`Game`] by one tick
//! - [`ServeSeed`] - Seed for the serve-angle RNG
//!
//! # Tick Order
//!
//! Every call to [`Game::step`] performs the following in order:
//!
//! 1. Advance the ball by its velocity
//! 2. Apply both sides' paddle actions (out-of-range moves are rejected)
//! 3. Reflect the ball off the top and bottom walls
//! 4. Resolve paddle contact: a ball whose leading edge crossed a paddle face
//!    this tick while its center lies within the paddle's vertical extent is a
//!    hit for that side
//! 5. Score a point for the opposing side when the ball center has left the
//!    arena, then re-serve towards the side that won the point

pub use self::{game::*, match_state::*, serve::*};

mod game;
mod match_state;
mod serve;
