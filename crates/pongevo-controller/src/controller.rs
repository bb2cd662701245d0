//! Decision making: from an [`Observation`] to a paddle move.
//!
//! The [`Controller`] trait is the seam between the match loop and whatever
//! drives a paddle. Two implementations are provided:
//!
//! - [`NetworkController`] - Arg-max over the outputs of an evolved
//!   [`FeedForwardNetwork`]. Output index `0` holds, `1` moves up (towards
//!   decreasing `y`), `2` moves down.
//! - [`TrackingController`] - A scripted opponent that keeps the paddle center
//!   on the ball's `y`. Useful as a sparring partner and as a fixed reference in
//!   tests.

use std::fmt;

use pongevo_engine::{ArenaConfig, Direction, PaddleAction};

use crate::{
    network::{FeedForwardNetwork, NetworkError},
    observation::Observation,
};

/// The three-way choice a controller makes each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant)]
pub enum Decision {
    #[display("hold")]
    Hold,
    #[display("up")]
    Up,
    #[display("down")]
    Down,
}

impl Decision {
    pub const ALL: [Decision; 3] = [Decision::Hold, Decision::Up, Decision::Down];

    /// Maps a network output index to a decision.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Picks the decision with the largest output.
    ///
    /// Ties go to the lowest index. `NaN` outputs never win. Returns `Hold` if
    /// no output can be compared.
    #[must_use]
    pub fn arg_max(outputs: &[f32]) -> Self {
        let mut best: Option<(usize, f32)> = None;
        for (index, &value) in outputs.iter().enumerate().take(Self::ALL.len()) {
            if best.is_none_or(|(_, max)| value > max) && !value.is_nan() {
                best = Some((index, value));
            }
        }
        best.and_then(|(index, _)| Self::from_index(index))
            .unwrap_or(Decision::Hold)
    }

    /// The engine action for this decision.
    #[must_use]
    pub fn action(self) -> PaddleAction {
        match self {
            Decision::Hold => PaddleAction::Hold,
            Decision::Up => PaddleAction::Move(Direction::Up),
            Decision::Down => PaddleAction::Move(Direction::Down),
        }
    }
}

/// Chooses a [`Decision`] for one paddle.
///
/// Implementations must be pure functions of the observation.
pub trait Controller: fmt::Debug + Send + Sync {
    fn decide(&self, observation: &Observation) -> Decision;
}

/// Adapts a [`FeedForwardNetwork`] with 3 inputs and 3 outputs.
#[derive(Debug, Clone)]
pub struct NetworkController {
    network: FeedForwardNetwork,
}

impl NetworkController {
    /// Wraps `network`, rejecting shapes that do not fit an [`Observation`]
    /// and the three [`Decision`]s.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::IncompatibleShape`] unless the network has
    /// [`Observation::LEN`] inputs and one output per [`Decision`].
    pub fn new(network: FeedForwardNetwork) -> Result<Self, NetworkError> {
        let shape = network.shape();
        if shape.inputs != Observation::LEN || shape.outputs != Decision::ALL.len() {
            return Err(NetworkError::IncompatibleShape {
                expected_inputs: Observation::LEN,
                expected_outputs: Decision::ALL.len(),
                inputs: shape.inputs,
                outputs: shape.outputs,
            });
        }
        Ok(Self { network })
    }

    #[must_use]
    pub fn network(&self) -> &FeedForwardNetwork {
        &self.network
    }
}

impl Controller for NetworkController {
    fn decide(&self, observation: &Observation) -> Decision {
        let outputs = self.network.activate(&observation.to_inputs());
        Decision::arg_max(&outputs)
    }
}

/// Follows the ball with the paddle center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingController {
    paddle_height: f32,
    dead_zone: f32,
}

impl TrackingController {
    /// Holds while the paddle center is within `dead_zone` of the ball.
    #[must_use]
    pub fn new(paddle_height: f32, dead_zone: f32) -> Self {
        Self {
            paddle_height,
            dead_zone,
        }
    }

    /// A tracker whose dead zone is half a paddle move, so it never
    /// oscillates around the ball.
    #[must_use]
    pub fn for_arena(arena: &ArenaConfig) -> Self {
        Self::new(arena.paddle_height, arena.paddle_velocity / 2.0)
    }
}

impl Controller for TrackingController {
    fn decide(&self, observation: &Observation) -> Decision {
        let center = observation.paddle_y + self.paddle_height / 2.0;
        if center < observation.ball_y - self.dead_zone {
            Decision::Down
        } else if center > observation.ball_y + self.dead_zone {
            Decision::Up
        } else {
            Decision::Hold
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::network::NetworkShape;

    use super::*;

    fn observation(paddle_y: f32, ball_y: f32) -> Observation {
        Observation {
            paddle_y,
            ball_distance_x: 100.0,
            ball_y,
        }
    }

    /// Output `k` equals input `k`, no hidden layer.
    fn identity_network() -> FeedForwardNetwork {
        let shape = NetworkShape {
            inputs: 3,
            hidden: vec![],
            outputs: 3,
        };
        FeedForwardNetwork::from_fn(shape, |i| if i % 5 == 0 { 1.0 } else { 0.0 })
    }

    #[test]
    fn test_arg_max_prefers_lowest_index_on_tie() {
        assert_eq!(Decision::arg_max(&[1.0, 1.0, 1.0]), Decision::Hold);
        assert_eq!(Decision::arg_max(&[0.0, 2.0, 2.0]), Decision::Up);
        assert_eq!(Decision::arg_max(&[-1.0, -2.0, 0.5]), Decision::Down);
        assert_eq!(Decision::arg_max(&[f32::NAN, 0.0, 1.0]), Decision::Down);
        assert_eq!(Decision::arg_max(&[]), Decision::Hold);
    }

    #[test]
    fn test_decision_actions() {
        assert_eq!(Decision::Hold.action(), PaddleAction::Hold);
        assert_eq!(Decision::Up.action(), PaddleAction::Move(Direction::Up));
        assert_eq!(Decision::Down.action(), PaddleAction::Move(Direction::Down));
        assert_eq!(Decision::from_index(3), None);
    }

    #[test]
    fn test_network_controller_uses_arg_max() {
        let controller = NetworkController::new(identity_network()).unwrap();
        // inputs: [paddle_y, distance, ball_y]
        let obs = Observation {
            paddle_y: 10.0,
            ball_distance_x: 300.0,
            ball_y: 50.0,
        };
        assert_eq!(controller.decide(&obs), Decision::Up);
        let obs = Observation {
            paddle_y: 10.0,
            ball_distance_x: 3.0,
            ball_y: 50.0,
        };
        assert_eq!(controller.decide(&obs), Decision::Down);
    }

    #[test]
    fn test_network_controller_rejects_wrong_shape() {
        let shape = NetworkShape {
            inputs: 3,
            hidden: vec![],
            outputs: 2,
        };
        let network = FeedForwardNetwork::from_fn(shape, |_| 0.0);
        assert!(matches!(
            NetworkController::new(network),
            Err(NetworkError::IncompatibleShape { outputs: 2, .. })
        ));
    }

    #[test]
    fn test_tracking_controller() {
        let tracker = TrackingController::for_arena(&ArenaConfig::default());
        // paddle center is y + 50
        assert_eq!(tracker.decide(&observation(200.0, 250.0)), Decision::Hold);
        assert_eq!(tracker.decide(&observation(200.0, 259.0)), Decision::Hold);
        assert_eq!(tracker.decide(&observation(200.0, 300.0)), Decision::Down);
        assert_eq!(tracker.decide(&observation(200.0, 100.0)), Decision::Up);
    }
}
