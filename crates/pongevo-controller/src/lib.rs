//! Controllers that turn a game snapshot into a paddle decision.
//!
//! Evaluation is split into three small steps:
//!
//! 1. **Observation** ([`observation`]) - Reads the three inputs a paddle sees from
//!    a [`Game`](pongevo_engine::Game): its own `y`, the horizontal distance to the
//!    ball and the ball's `y`.
//! 2. **Network** ([`network`]) - A dense feed-forward network whose flat weight
//!    vector is what training evolves.
//! 3. **Controller** ([`controller`]) - Picks a [`Decision`](controller::Decision)
//!    from an observation. [`NetworkController`](controller::NetworkController)
//!    takes the arg-max of the network outputs.
//!
//! # Architecture
//!
//! ```text
//! Game (pongevo-engine)
//!     ↓ observed as
//! Observation [paddle_y, |paddle_x - ball_x|, ball_y]
//!     ↓ fed to
//! FeedForwardNetwork (3 outputs)
//!     ↓ arg-max
//! Decision {Hold, Up, Down}
//!     ↓ mapped to
//! PaddleAction (pongevo-engine)
//! ```
//!
//! Controllers are stateless: the same observation always gives the same
//! decision, so a controller can be shared between both sides of a match.
//!
//! # Example
//!
//! ```
//! use pongevo_controller::{
//!     controller::{Controller, Decision, NetworkController},
//!     network::{FeedForwardNetwork, NetworkShape},
//!     observation::Observation,
//! };
//! use pongevo_engine::{ArenaConfig, Game, ServeSeed, Side};
//!
//! let shape = NetworkShape::default();
//! let network = FeedForwardNetwork::from_fn(shape, |_| 0.0);
//! let controller = NetworkController::new(network).unwrap();
//!
//! let game = Game::new(ArenaConfig::default(), ServeSeed::new(1));
//! let observation = Observation::of(&game, Side::Left);
//!
//! // All outputs tie at zero, so the lowest index wins
//! assert_eq!(controller.decide(&observation), Decision::Hold);
//! ```

pub mod controller;
pub mod network;
pub mod observation;
