use serde::{Deserialize, Serialize};

use crate::{ArenaConfigError, Side};

/// Arena dimensions and body constants for one match.
///
/// Defaults reproduce the classic 700x500 window: 20x100 paddles moving 20
/// units per move, a radius-7 ball travelling 5 units per tick, and 60 ticks
/// per simulated second.
///
/// # Example
///
/// ```
/// use pongevo_engine::{ArenaConfig, Side};
///
/// let arena = ArenaConfig::default();
/// assert_eq!(arena.paddle_origin(Side::Left), (10.0, 200.0));
/// assert_eq!(arena.paddle_origin(Side::Right), (670.0, 200.0));
/// assert_eq!(arena.max_paddle_y(), 400.0);
/// assert!(arena.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Distance moved by one accepted paddle move.
    pub paddle_velocity: f32,
    /// Gap between a paddle and its side wall.
    pub paddle_margin: f32,
    pub ball_radius: f32,
    /// Ball speed per tick; also the bound on vertical speed after a bounce.
    pub ball_max_velocity: f32,
    /// Serves leave the center at an angle drawn from `[-max, max]` degrees.
    pub max_serve_angle_deg: f32,
    /// Fixed simulation rate used to convert ticks into elapsed time.
    pub ticks_per_second: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 500.0,
            paddle_width: 20.0,
            paddle_height: 100.0,
            paddle_velocity: 20.0,
            paddle_margin: 10.0,
            ball_radius: 7.0,
            ball_max_velocity: 5.0,
            max_serve_angle_deg: 30.0,
            ticks_per_second: 60,
        }
    }
}

impl ArenaConfig {
    /// Checks that the bodies fit inside the arena.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint. Every length and speed must be
    /// finite and positive (the paddle margin may be zero), the paddle must
    /// fit the arena height and the two paddles must not touch.
    pub fn validate(&self) -> Result<(), ArenaConfigError> {
        if !(is_positive(self.width) && is_positive(self.height)) {
            return Err(ArenaConfigError::NonPositiveArena {
                width: self.width,
                height: self.height,
            });
        }
        if !(is_positive(self.paddle_width) && is_positive(self.paddle_height)) {
            return Err(ArenaConfigError::NonPositivePaddle {
                width: self.paddle_width,
                height: self.paddle_height,
            });
        }
        if self.paddle_height > self.height {
            return Err(ArenaConfigError::PaddleTooTall {
                paddle_height: self.paddle_height,
                arena_height: self.height,
            });
        }
        // Written so that a NaN margin fails too
        if !(self.paddle_margin.is_finite()
            && self.paddle_margin >= 0.0
            && 2.0 * (self.paddle_margin + self.paddle_width) < self.width)
        {
            return Err(ArenaConfigError::PaddlesOverlap {
                margin: self.paddle_margin,
                paddle_width: self.paddle_width,
                arena_width: self.width,
            });
        }
        if !is_positive(self.paddle_velocity) {
            return Err(ArenaConfigError::NonPositivePaddleVelocity(
                self.paddle_velocity,
            ));
        }
        if !(is_positive(self.ball_radius) && is_positive(self.ball_max_velocity)) {
            return Err(ArenaConfigError::InvalidBall {
                radius: self.ball_radius,
                velocity: self.ball_max_velocity,
            });
        }
        if !(0.0..80.0).contains(&self.max_serve_angle_deg) {
            return Err(ArenaConfigError::InvalidServeAngle(
                self.max_serve_angle_deg,
            ));
        }
        if self.ticks_per_second == 0 {
            return Err(ArenaConfigError::ZeroTickRate);
        }
        Ok(())
    }

    /// Largest valid paddle `y` (top edge) for this arena.
    #[must_use]
    pub fn max_paddle_y(&self) -> f32 {
        self.height - self.paddle_height
    }

    /// Starting top-left corner of the given side's paddle.
    #[must_use]
    pub fn paddle_origin(&self, side: Side) -> (f32, f32) {
        let y = self.height / 2.0 - self.paddle_height / 2.0;
        let x = match side {
            Side::Left => self.paddle_margin,
            Side::Right => self.width - self.paddle_margin - self.paddle_width,
        };
        (x, y)
    }

    /// Center of the arena, where every serve starts.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(ArenaConfig::default().validate(), Ok(()));
        assert_eq!(ArenaConfig::default().center(), (350.0, 250.0));
    }

    #[test]
    fn test_rejects_paddle_taller_than_arena() {
        let arena = ArenaConfig {
            paddle_height: 600.0,
            ..ArenaConfig::default()
        };
        assert!(matches!(
            arena.validate(),
            Err(ArenaConfigError::PaddleTooTall { .. })
        ));
    }

    #[test]
    fn test_rejects_overlapping_paddles() {
        let arena = ArenaConfig {
            width: 50.0,
            ..ArenaConfig::default()
        };
        assert!(matches!(
            arena.validate(),
            Err(ArenaConfigError::PaddlesOverlap { .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_lengths() {
        let arena = ArenaConfig {
            paddle_margin: f32::NAN,
            ..ArenaConfig::default()
        };
        assert!(matches!(
            arena.validate(),
            Err(ArenaConfigError::PaddlesOverlap { .. })
        ));

        let arena = ArenaConfig {
            paddle_margin: -1.0,
            ..ArenaConfig::default()
        };
        assert!(arena.validate().is_err());

        let arena = ArenaConfig {
            width: f32::INFINITY,
            ..ArenaConfig::default()
        };
        assert!(matches!(
            arena.validate(),
            Err(ArenaConfigError::NonPositiveArena { .. })
        ));

        let arena = ArenaConfig {
            ball_max_velocity: f32::INFINITY,
            ..ArenaConfig::default()
        };
        assert!(matches!(
            arena.validate(),
            Err(ArenaConfigError::InvalidBall { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let arena = ArenaConfig {
            ticks_per_second: 0,
            ..ArenaConfig::default()
        };
        assert_eq!(arena.validate(), Err(ArenaConfigError::ZeroTickRate));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let arena: ArenaConfig = serde_json::from_str(r#"{ "width": 800.0 }"#).unwrap();
        assert_eq!(arena.width, 800.0);
        assert_eq!(arena.height, 500.0);
        assert!(serde_json::from_str::<ArenaConfig>(r#"{ "depth": 1.0 }"#).is_err());
    }
}
