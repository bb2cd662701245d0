//! Deterministic two-paddle ball game used as a fitness-measurement environment.
//!
//! The crate is split the same way as the rest of the workspace expects:
//!
//! - [`core`] - Plain geometry: [`ArenaConfig`], [`Ball`], [`Paddle`], [`Side`]
//! - [`engine`] - Match logic: [`Game`], [`MatchState`], [`StepReport`], [`ServeSeed`]
//!
//! A [`Game`] is a pure function of its [`ArenaConfig`], its [`ServeSeed`] and the
//! sequence of [`PaddleAction`]s fed into [`Game::step`]. Nothing here reads the
//! clock or the thread RNG, so two games built from the same inputs stay in
//! lockstep forever.
//!
//! # Example
//!
//! ```
//! use pongevo_engine::{ArenaConfig, Direction, Game, PaddleAction, ServeSeed, Side};
//!
//! let mut game = Game::new(ArenaConfig::default(), ServeSeed::new(7));
//!
//! // The top edge rejects a move that would leave the arena
//! while game.move_paddle(Side::Left, Direction::Up).is_ok() {}
//! assert_eq!(game.paddle(Side::Left).y(), 0.0);
//! assert!(game.move_paddle(Side::Left, Direction::Up).is_err());
//!
//! let report = game.step(PaddleAction::Hold, PaddleAction::Move(Direction::Down));
//! assert_eq!(report.state.ticks(), 1);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A paddle move that would leave the valid vertical range.
///
/// This is a designed-in signal rather than a fault: the paddle stays where it
/// was and callers are free to turn the rejection into a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{side} paddle cannot move {direction}: it would leave the arena")]
pub struct InvalidMoveError {
    pub side: Side,
    pub direction: Direction,
}

/// Rejected [`ArenaConfig`] values.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ArenaConfigError {
    #[display("arena dimensions must be positive, got {width}x{height}")]
    NonPositiveArena { width: f32, height: f32 },
    #[display("paddle size must be positive, got {width}x{height}")]
    NonPositivePaddle { width: f32, height: f32 },
    #[display("paddle height {paddle_height} does not fit arena height {arena_height}")]
    PaddleTooTall {
        paddle_height: f32,
        arena_height: f32,
    },
    #[display("paddles overlap: margin {margin} and width {paddle_width} in arena width {arena_width}")]
    PaddlesOverlap {
        margin: f32,
        paddle_width: f32,
        arena_width: f32,
    },
    #[display("paddle velocity must be positive, got {_0}")]
    NonPositivePaddleVelocity(#[error(not(source))] f32),
    #[display("ball radius and velocity must be positive, got radius {radius}, velocity {velocity}")]
    InvalidBall { radius: f32, velocity: f32 },
    #[display("serve angle must be within [0, 80) degrees, got {_0}")]
    InvalidServeAngle(#[error(not(source))] f32),
    #[display("ticks per second must be non-zero")]
    ZeroTickRate,
}
