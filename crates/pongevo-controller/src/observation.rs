use pongevo_engine::{Ball, Game, Paddle, Side};

/// What one paddle sees of the game: the network's input vector.
///
/// Values are raw arena coordinates; no scaling is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Top edge of the observing paddle.
    pub paddle_y: f32,
    /// `|paddle.x - ball.x|`
    pub ball_distance_x: f32,
    pub ball_y: f32,
}

impl Observation {
    /// Number of values in [`Self::to_inputs`].
    pub const LEN: usize = 3;

    #[must_use]
    pub fn new(paddle: &Paddle, ball: &Ball) -> Self {
        Self {
            paddle_y: paddle.y(),
            ball_distance_x: (paddle.x() - ball.x()).abs(),
            ball_y: ball.y(),
        }
    }

    /// Observation for `side`'s paddle in the current game state.
    #[must_use]
    pub fn of(game: &Game, side: Side) -> Self {
        Self::new(game.paddle(side), game.ball())
    }

    #[must_use]
    pub fn to_inputs(&self) -> [f32; Self::LEN] {
        [self.paddle_y, self.ball_distance_x, self.ball_y]
    }
}
