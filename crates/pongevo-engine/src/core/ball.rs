use rand::Rng;

use crate::{ArenaConfig, Side};

/// The ball: center position, per-tick velocity and radius.
///
/// After any paddle bounce `|vy|` is at most `max_velocity`; the horizontal
/// speed chosen at serve time is kept until the next serve.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: f32,
    max_velocity: f32,
    max_serve_angle: f32,
    origin: (f32, f32),
}

impl Ball {
    /// Creates a resting ball at the arena center.
    ///
    /// The ball does not move until it is [served](Self::serve).
    #[must_use]
    pub fn new(arena: &ArenaConfig) -> Self {
        let origin = arena.center();
        Self {
            x: origin.0,
            y: origin.1,
            vx: 0.0,
            vy: 0.0,
            radius: arena.ball_radius,
            max_velocity: arena.ball_max_velocity,
            max_serve_angle: arena.max_serve_angle_deg.to_radians(),
            origin,
        }
    }

    /// Creates a ball at an explicit position and velocity.
    ///
    /// Useful for setting up collision scenarios; regular play goes through
    /// [`Self::serve`].
    #[must_use]
    pub fn with_motion(arena: &ArenaConfig, (x, y): (f32, f32), (vx, vy): (f32, f32)) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            ..Self::new(arena)
        }
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
    pub fn vx(&self) -> f32 {
        self.vx
    }

    #[must_use]
    pub fn vy(&self) -> f32 {
        self.vy
    }

    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[must_use]
    pub fn max_velocity(&self) -> f32 {
        self.max_velocity
    }

    /// The side the ball is currently travelling towards, if any.
    #[must_use]
    pub fn heading(&self) -> Option<Side> {
        if self.vx < 0.0 {
            Some(Side::Left)
        } else if self.vx > 0.0 {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Puts the ball back at the center and launches it towards `toward`.
    ///
    /// The launch angle is drawn uniformly from the configured serve cone, so
    /// the horizontal component is never zero.
    pub fn serve<R>(&mut self, toward: Side, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let angle = if self.max_serve_angle > 0.0 {
            rng.random_range(-self.max_serve_angle..=self.max_serve_angle)
        } else {
            0.0
        };
        let speed_x = (angle.cos() * self.max_velocity).abs();
        (self.x, self.y) = self.origin;
        self.vx = match toward {
            Side::Left => -speed_x,
            Side::Right => speed_x,
        };
        self.vy = angle.sin() * self.max_velocity;
    }

    pub(crate) fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    /// Reflects off the top and bottom walls.
    ///
    /// Returns `true` if a bounce happened.
    pub(crate) fn bounce_off_walls(&mut self, arena_height: f32) -> bool {
        if self.y - self.radius <= 0.0 && self.vy < 0.0 {
            self.y = self.radius;
            self.vy = -self.vy;
            true
        } else if self.y + self.radius >= arena_height && self.vy > 0.0 {
            self.y = arena_height - self.radius;
            self.vy = -self.vy;
            true
        } else {
            false
        }
    }

    /// Sends the ball back from a paddle face.
    ///
    /// The horizontal speed is kept and only its sign flips. The vertical speed
    /// is proportional to the contact point's offset from the paddle center:
    /// hitting the exact center returns the ball flat, hitting an edge returns
    /// it at `max_velocity`.
    pub(crate) fn bounce_off_paddle(&mut self, face_x: f32, center_y: f32, half_height: f32) {
        let offset = ((self.y - center_y) / half_height).clamp(-1.0, 1.0);
        self.vx = -self.vx;
        self.vy = offset * self.max_velocity;
        self.x = if self.vx > 0.0 {
            face_x + self.radius
        } else {
            face_x - self.radius
        };
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_serve_starts_at_center_heading_toward_side() {
        let arena = ArenaConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ball = Ball::new(&arena);
        for toward in [Side::Left, Side::Right, Side::Left] {
            ball.serve(toward, &mut rng);
            assert_eq!((ball.x(), ball.y()), (350.0, 250.0));
            assert_eq!(ball.heading(), Some(toward));
            // cos(30°) * 5
            assert!(ball.vx().abs() >= 4.33);
            assert!(ball.vy().abs() <= 2.5 + 1e-4);
        }
    }

    #[test]
    fn test_wall_bounce_reflects_vertical_velocity() {
        let arena = ArenaConfig::default();
        let mut ball = Ball::with_motion(&arena, (100.0, 3.0), (5.0, -2.0));
        assert!(ball.bounce_off_walls(arena.height));
        assert_eq!(ball.vy(), 2.0);
        assert_eq!(ball.y(), 7.0);
        assert_eq!(ball.vx(), 5.0);

        // Already moving away: no second bounce
        assert!(!ball.bounce_off_walls(arena.height));
    }

    #[test]
    fn test_paddle_bounce_bounds_vertical_velocity() {
        let arena = ArenaConfig::default();
        for y in [150.0, 200.0, 250.0, 300.0, 350.0] {
            let mut ball = Ball::with_motion(&arena, (28.0, y), (-5.0, 1.0));
            ball.bounce_off_paddle(30.0, 250.0, 50.0);
            assert_eq!(ball.vx(), 5.0);
            assert!(ball.vy().abs() <= ball.max_velocity());
            assert_eq!(ball.x(), 37.0);
        }
        let mut flat = Ball::with_motion(&arena, (28.0, 250.0), (-5.0, 1.0));
        flat.bounce_off_paddle(30.0, 250.0, 50.0);
        assert_eq!(flat.vy(), 0.0);
    }
}
