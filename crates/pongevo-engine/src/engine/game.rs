use std::time::Duration;

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    ArenaConfig, Ball, Direction, InvalidMoveError, MatchState, Paddle, PaddleAction, ServeSeed,
    Side,
};

/// Something that happened during a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEvents {
    /// Side whose paddle returned the ball.
    pub hit: Option<Side>,
    /// Side that won a point.
    pub point: Option<Side>,
    pub wall_bounce: bool,
}

/// Outcome of [`Game::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Match state after the tick.
    pub state: MatchState,
    pub left_move: Result<(), InvalidMoveError>,
    pub right_move: Result<(), InvalidMoveError>,
    pub events: StepEvents,
}

impl StepReport {
    /// Result of the paddle action requested for `side`.
    ///
    /// A [`PaddleAction::Hold`] is always `Ok`.
    #[must_use]
    pub fn move_result(&self, side: Side) -> Result<(), InvalidMoveError> {
        match side {
            Side::Left => self.left_move,
            Side::Right => self.right_move,
        }
    }
}

/// One match between two paddles.
///
/// The game owns its own serve RNG seeded from a [`ServeSeed`]; [`Game::reset`]
/// reseeds it, so every reset replays the same serve sequence.
#[derive(Debug, Clone)]
pub struct Game {
    arena: ArenaConfig,
    seed: ServeSeed,
    rng: Pcg32,
    ball: Ball,
    left: Paddle,
    right: Paddle,
    state: MatchState,
}

impl Game {
    /// Creates a game and performs the opening serve.
    ///
    /// # Arguments
    ///
    /// * `arena` - Dimensions and body constants. The caller is expected to
    ///   have checked them with [`ArenaConfig::validate`].
    /// * `seed` - Seeds every serve of the game, including those after
    ///   [`Self::reset`], so equal seeds replay equal matches.
    ///
    /// # Returns
    ///
    /// A game at tick 0 with both paddles centered and the ball served.
    #[must_use]
    pub fn new(arena: ArenaConfig, seed: ServeSeed) -> Self {
        let mut game = Self {
            rng: Pcg32::seed_from_u64(seed.value()),
            ball: Ball::new(&arena),
            left: Paddle::new(Side::Left, &arena),
            right: Paddle::new(Side::Right, &arena),
            state: MatchState::new(),
            arena,
            seed,
        };
        game.reset();
        game
    }

    /// Starts the match over.
    ///
    /// Both paddles return to their original coordinates, scores and hit
    /// counters are cleared and a fresh ball is served in a random direction.
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed.value());
        self.left.reset();
        self.right.reset();
        self.state = MatchState::new();
        let toward = if self.rng.random_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        };
        self.ball.serve(toward, &mut self.rng);
    }

    #[must_use]
    pub fn arena(&self) -> &ArenaConfig {
        &self.arena
    }

    #[must_use]
    pub fn seed(&self) -> ServeSeed {
        self.seed
    }

    #[must_use]
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    #[must_use]
    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Simulated time since the last reset.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.state.elapsed(self.arena.ticks_per_second)
    }

    /// Moves one paddle by one velocity unit.
    ///
    /// Fails without moving if the paddle would leave
    /// `[0, arena_height - paddle_height]`.
    pub fn move_paddle(&mut self, side: Side, direction: Direction) -> Result<(), InvalidMoveError> {
        self.paddle_mut(side).try_move(direction)
    }

    fn apply_action(&mut self, side: Side, action: PaddleAction) -> Result<(), InvalidMoveError> {
        match action {
            PaddleAction::Hold => Ok(()),
            PaddleAction::Move(direction) => self.move_paddle(side, direction),
        }
    }

    /// Replaces the ball, keeping scores and paddles.
    ///
    /// Intended for setting up specific rally situations.
    pub fn place_ball(&mut self, ball: Ball) {
        self.ball = ball;
    }

    /// Advances the match by one tick.
    ///
    /// See the [module documentation](crate::engine) for the order in which
    /// the tick is resolved.
    pub fn step(&mut self, left: PaddleAction, right: PaddleAction) -> StepReport {
        let prev_x = self.ball.x();
        self.ball.advance();

        let left_move = self.apply_action(Side::Left, left);
        let right_move = self.apply_action(Side::Right, right);

        let wall_bounce = self.ball.bounce_off_walls(self.arena.height);

        let hit = self.resolve_paddle_contact(prev_x);
        if let Some(side) = hit {
            self.state.record_hit(side);
        }

        let point = self.resolve_point();
        if let Some(scorer) = point {
            self.state.record_point(scorer);
            self.ball.serve(scorer, &mut self.rng);
        }

        self.state.record_tick();

        StepReport {
            state: self.state,
            left_move,
            right_move,
            events: StepEvents {
                hit,
                point,
                wall_bounce,
            },
        }
    }

    fn resolve_paddle_contact(&mut self, prev_x: f32) -> Option<Side> {
        let side = self.ball.heading()?;
        let paddle = self.paddle(side);
        let (face, center, half_height) = (
            paddle.face_x(),
            paddle.center_y(),
            paddle.height() / 2.0,
        );
        let radius = self.ball.radius();
        let x = self.ball.x();
        let crossed = match side {
            Side::Left => prev_x - radius > face && x - radius <= face,
            Side::Right => prev_x + radius < face && x + radius >= face,
        };
        if !crossed || !paddle.covers(self.ball.y()) {
            return None;
        }
        self.ball.bounce_off_paddle(face, center, half_height);
        Some(side)
    }

    fn resolve_point(&self) -> Option<Side> {
        if self.ball.x() < 0.0 {
            Some(Side::Right)
        } else if self.ball.x() > self.arena.width {
            Some(Side::Left)
        } else {
            None
        }
    }
}
