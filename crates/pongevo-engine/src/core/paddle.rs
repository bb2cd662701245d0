use serde::{Deserialize, Serialize};

use crate::{ArenaConfig, InvalidMoveError};

/// Which end of the arena a paddle guards.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Vertical paddle movement.
///
/// `Up` decreases `y`, `Down` increases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Direction {
    #[display("up")]
    Up,
    #[display("down")]
    Down,
}

/// What a side does during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::IsVariant)]
pub enum PaddleAction {
    #[default]
    Hold,
    Move(Direction),
}

/// A paddle fixed to one side of the arena.
///
/// Only `y` changes during a match; the paddle never leaves
/// `[0, arena_height - height]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    side: Side,
    x: f32,
    y: f32,
    original_y: f32,
    width: f32,
    height: f32,
    velocity: f32,
    max_y: f32,
}

impl Paddle {
    /// Creates a paddle at its starting position for `side`.
    #[must_use]
    pub fn new(side: Side, arena: &ArenaConfig) -> Self {
        let (x, y) = arena.paddle_origin(side);
        Self {
            side,
            x,
            y,
            original_y: y,
            width: arena.paddle_width,
            height: arena.paddle_height,
            velocity: arena.paddle_velocity,
            max_y: arena.max_paddle_y(),
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// The `x` of the face the ball bounces off.
    #[must_use]
    pub fn face_x(&self) -> f32 {
        match self.side {
            Side::Left => self.x + self.width,
            Side::Right => self.x,
        }
    }

    /// Whether `y` lies within the paddle's vertical extent (edges included).
    #[must_use]
    pub fn covers(&self, y: f32) -> bool {
        (self.y..=self.y + self.height).contains(&y)
    }

    /// Moves the paddle by one velocity unit.
    ///
    /// The paddle is left untouched if the move would take it outside the
    /// valid vertical range.
    pub fn try_move(&mut self, direction: Direction) -> Result<(), InvalidMoveError> {
        let y = match direction {
            Direction::Up => self.y - self.velocity,
            Direction::Down => self.y + self.velocity,
        };
        if !(0.0..=self.max_y).contains(&y) {
            return Err(InvalidMoveError {
                side: self.side,
                direction,
            });
        }
        self.y = y;
        Ok(())
    }

    /// Returns the paddle to where it started.
    pub fn reset(&mut self) {
        self.y = self.original_y;
    }
}
