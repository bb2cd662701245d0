//! One match between two controllers, run to a terminal condition.
//!
//! # Termination
//!
//! An episode ends after the first tick on which either
//!
//! - a side's score reaches [`EpisodeConfig::point_cap`] ([`Termination::PointCap`]), or
//! - the side(s) selected by [`EpisodeConfig::hit_cap_side`] reach
//!   [`EpisodeConfig::hit_cap`] hits ([`Termination::HitCap`]).
//!
//! The point cap is checked first. A user interrupt ends the episode early with
//! [`Interrupted`] and no fitness is reported.
//!
//! # Fitness Shaping
//!
//! Every tick each side pays [`EpisodeConfig::hold_penalty`] for holding and
//! [`EpisodeConfig::invalid_move_penalty`] for a move the engine rejected. At
//! the end each side earns its own hit count plus the simulated match duration
//! in seconds. The totals are returned as a [`FitnessDelta`]; the caller decides
//! which genome they belong to.

use pongevo_controller::{
    controller::{Controller, Decision},
    observation::Observation,
};
use pongevo_engine::{Game, InvalidMoveError, MatchState, Side};
use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    observer::{MatchFrame, MatchObserver},
};

/// The user asked to stop while a match was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("interrupted by user")]
pub struct Interrupted;

/// Whose hit count is compared against [`EpisodeConfig::hit_cap`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum HitCapSide {
    #[display("left")]
    Left,
    #[default]
    #[display("right")]
    Right,
    #[display("either")]
    Either,
}

impl HitCapSide {
    fn reached(self, state: &MatchState, cap: u32) -> Option<Side> {
        let sides: &[Side] = match self {
            HitCapSide::Left => &[Side::Left],
            HitCapSide::Right => &[Side::Right],
            HitCapSide::Either => &Side::ALL,
        };
        sides.iter().copied().find(|&side| state.hits(side) >= cap)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EpisodeConfig {
    /// Points needed by either side to end the match.
    pub point_cap: u32,
    pub hit_cap: u32,
    pub hit_cap_side: HitCapSide,
    /// Paid for every tick spent holding still.
    pub hold_penalty: f64,
    /// Paid for every move that would have left the arena.
    pub invalid_move_penalty: f64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            point_cap: 3,
            hit_cap: 25,
            hit_cap_side: HitCapSide::Right,
            hold_penalty: 0.01,
            invalid_move_penalty: 1.0,
        }
    }
}

impl EpisodeConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if either cap is zero or a penalty
    /// is negative or not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.point_cap == 0 {
            return Err(ConfigError::invalid("point_cap", "must be at least 1"));
        }
        if self.hit_cap == 0 {
            return Err(ConfigError::invalid("hit_cap", "must be at least 1"));
        }
        for (field, value) in [
            ("hold_penalty", self.hold_penalty),
            ("invalid_move_penalty", self.invalid_move_penalty),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(field, "must be finite and non-negative"));
            }
        }
        Ok(())
    }

    /// Returns how the match ended, if it did.
    #[must_use]
    pub fn termination(&self, state: &MatchState) -> Option<Termination> {
        if let Some(side) = Side::ALL
            .into_iter()
            .find(|&side| state.score(side) >= self.point_cap)
        {
            return Some(Termination::PointCap(side));
        }
        self.hit_cap_side
            .reached(state, self.hit_cap)
            .map(Termination::HitCap)
    }

    fn action_penalty(&self, decision: Decision, result: Result<(), InvalidMoveError>) -> f64 {
        match (decision, result) {
            (Decision::Hold, _) => self.hold_penalty,
            (_, Err(_)) => self.invalid_move_penalty,
            (_, Ok(())) => 0.0,
        }
    }
}

/// Why a completed episode stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum Termination {
    /// The given side reached the point cap.
    PointCap(Side),
    /// The given side reached the hit cap.
    HitCap(Side),
}

/// Fitness earned by each side of one episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessDelta {
    pub left: f64,
    pub right: f64,
}

impl FitnessDelta {
    #[must_use]
    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn add(&mut self, side: Side, value: f64) {
        match side {
            Side::Left => self.left += value,
            Side::Right => self.right += value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeOutcome {
    pub termination: Termination,
    pub state: MatchState,
    pub ticks: u64,
    /// Simulated seconds.
    pub duration_secs: f64,
    pub delta: FitnessDelta,
}

/// Resets `game` and plays it until a terminal condition.
///
/// # Arguments
///
/// * `game` - Reset before the first tick; left at the final position.
/// * `left`, `right` - Controllers of the two paddles. Both may be the same
///   controller.
/// * `config` - Caps and fitness shaping.
/// * `observer` - Polled for an interrupt before each tick and shown each
///   tick afterwards.
/// * `caption` - Passed through to the observer.
///
/// # Errors
///
/// Returns [`Interrupted`] as soon as `observer` asks to stop. The game is
/// then left mid-match.
pub fn run_episode<L, R>(
    game: &mut Game,
    left: &L,
    right: &R,
    config: &EpisodeConfig,
    observer: &mut dyn MatchObserver,
    caption: &str,
) -> Result<EpisodeOutcome, Interrupted>
where
    L: Controller + ?Sized,
    R: Controller + ?Sized,
{
    game.reset();
    let mut delta = FitnessDelta::default();

    let termination = loop {
        if observer.poll_interrupt() {
            return Err(Interrupted);
        }

        let left_decision = left.decide(&Observation::of(game, Side::Left));
        let right_decision = right.decide(&Observation::of(game, Side::Right));
        let report = game.step(left_decision.action(), right_decision.action());

        for (side, decision) in [(Side::Left, left_decision), (Side::Right, right_decision)] {
            delta.add(side, -config.action_penalty(decision, report.move_result(side)));
        }

        observer.draw(&MatchFrame {
            game,
            report: &report,
            caption,
        });

        if let Some(termination) = config.termination(&report.state) {
            break termination;
        }
    };

    let state = *game.state();
    let duration_secs = game.elapsed().as_secs_f64();
    for side in Side::ALL {
        delta.add(side, f64::from(state.hits(side)) + duration_secs);
    }

    Ok(EpisodeOutcome {
        termination,
        state,
        ticks: state.ticks(),
        duration_secs,
        delta,
    })
}

#[cfg(test)]
mod tests {
    use pongevo_controller::{
        controller::{NetworkController, TrackingController},
        network::{FeedForwardNetwork, NetworkShape},
    };
    use pongevo_engine::{ArenaConfig, ServeSeed};
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;
    use crate::observer::Headless;

    /// Always returns the same decision.
    #[derive(Debug)]
    struct Fixed(Decision);

    impl Controller for Fixed {
        fn decide(&self, _: &Observation) -> Decision {
            self.0
        }
    }

    /// Interrupts after a number of polls.
    struct InterruptAfter(usize);

    impl MatchObserver for InterruptAfter {
        fn poll_interrupt(&mut self) -> bool {
            if self.0 == 0 {
                return true;
            }
            self.0 -= 1;
            false
        }
    }

    fn game(seed: u64) -> Game {
        Game::new(ArenaConfig::default(), ServeSeed::new(seed))
    }

    #[test]
    fn test_hit_cap_side_selection() {
        let config = EpisodeConfig::default();
        let mut game = game(0);
        let tracker = TrackingController::for_arena(game.arena());
        let outcome =
            run_episode(&mut game, &tracker, &tracker, &config, &mut Headless, "").unwrap();
        // Two perfect trackers never miss, so only the right hit cap can end it
        assert_eq!(outcome.termination, Termination::HitCap(Side::Right));
        assert_eq!(outcome.state.right_hits(), 25);
        assert_eq!(outcome.state.left_score() + outcome.state.right_score(), 0);

        let config = EpisodeConfig {
            hit_cap_side: HitCapSide::Either,
            ..EpisodeConfig::default()
        };
        let outcome =
            run_episode(&mut game, &tracker, &tracker, &config, &mut Headless, "").unwrap();
        assert!(matches!(outcome.termination, Termination::HitCap(_)));
        assert_eq!(outcome.state.left_hits().max(outcome.state.right_hits()), 25);
    }

    #[test]
    fn test_tracker_beats_idle_paddle() {
        let config = EpisodeConfig::default();
        let mut game = game(11);
        let tracker = TrackingController::for_arena(game.arena());
        let idle = Fixed(Decision::Hold);
        let outcome =
            run_episode(&mut game, &idle, &tracker, &config, &mut Headless, "").unwrap();
        match outcome.termination {
            Termination::PointCap(side) => {
                assert_eq!(side, Side::Right);
                assert_eq!(outcome.state.right_score(), 3);
                assert_eq!(outcome.state.left_score(), 0);
            }
            Termination::HitCap(side) => {
                assert_eq!(side, Side::Right);
                assert_eq!(outcome.state.left_score(), 0);
            }
        }
    }

    fn random_network(seed: u64) -> NetworkController {
        let shape = NetworkShape::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let weights = (0..shape.weight_count())
            .map(|_| rng.random_range(-3.0..3.0))
            .collect();
        NetworkController::new(FeedForwardNetwork::new(shape, weights).unwrap()).unwrap()
    }

    #[test]
    fn test_every_pairing_ends_within_caps() {
        // Far more ticks than any capped match can take; reaching it means the
        // episode did not terminate
        const TICK_LIMIT: usize = 100_000;

        let arena = ArenaConfig::default();
        let tracker = || -> Box<dyn Controller> { Box::new(TrackingController::for_arena(&arena)) };
        let network = |seed| -> Box<dyn Controller> { Box::new(random_network(seed)) };
        let pairs = [
            (tracker(), tracker()),
            (network(1), network(2)),
            (network(3), network(3)),
            (network(4), tracker()),
            (tracker(), network(5)),
            (Box::new(Fixed(Decision::Up)) as Box<dyn Controller>, network(6)),
        ];

        for hit_cap_side in [HitCapSide::Left, HitCapSide::Right, HitCapSide::Either] {
            let config = EpisodeConfig {
                hit_cap_side,
                ..EpisodeConfig::default()
            };
            let capped: &[Side] = match hit_cap_side {
                HitCapSide::Left => &[Side::Left],
                HitCapSide::Right => &[Side::Right],
                HitCapSide::Either => &Side::ALL,
            };

            for (i, (left, right)) in (20..).zip(&pairs) {
                let mut game = game(i);
                let outcome = run_episode(
                    &mut game,
                    &**left,
                    &**right,
                    &config,
                    &mut InterruptAfter(TICK_LIMIT),
                    "",
                )
                .unwrap_or_else(|_| panic!("pair {i} under {hit_cap_side} never ended"));
                let state = outcome.state;

                for side in Side::ALL {
                    assert!(state.score(side) <= config.point_cap, "pair {i}: {state:?}");
                }
                for &side in capped {
                    assert!(state.hits(side) <= config.hit_cap, "pair {i}: {state:?}");
                }
                match outcome.termination {
                    Termination::PointCap(side) => {
                        assert_eq!(state.score(side), config.point_cap);
                        assert!(capped.iter().all(|&s| state.hits(s) < config.hit_cap));
                    }
                    Termination::HitCap(side) => {
                        assert!(capped.contains(&side), "pair {i}: {side:?} is not capped");
                        assert_eq!(state.hits(side), config.hit_cap);
                        assert!(Side::ALL.iter().all(|&s| state.score(s) < config.point_cap));
                    }
                }
                assert_eq!(outcome.ticks, state.ticks());
            }
        }
    }

    #[test]
    fn test_fitness_shaping() {
        let config = EpisodeConfig::default();
        let mut game = game(5);
        let tracker = TrackingController::for_arena(game.arena());
        let idle = Fixed(Decision::Hold);
        let outcome =
            run_episode(&mut game, &idle, &tracker, &config, &mut Headless, "").unwrap();

        #[expect(clippy::cast_precision_loss)]
        let ticks = outcome.ticks as f64;
        let expected_left =
            f64::from(outcome.state.left_hits()) + outcome.duration_secs - 0.01 * ticks;
        assert!((outcome.delta.left - expected_left).abs() < 1e-9);
        assert!((outcome.duration_secs - ticks / 60.0).abs() < 1e-6);
        // The tracker's own holds are penalized too
        assert!(outcome.delta.right <= f64::from(outcome.state.right_hits()) + outcome.duration_secs);
    }

    #[test]
    fn test_invalid_move_costs_exactly_one() {
        let config = EpisodeConfig {
            hold_penalty: 0.0,
            ..EpisodeConfig::default()
        };
        let mut game = game(8);
        let up = Fixed(Decision::Up);
        let idle = Fixed(Decision::Hold);
        let outcome =
            run_episode(&mut game, &up, &idle, &config, &mut Headless, "").unwrap();
        // y goes 200 -> 0 in 10 accepted moves, every later move is rejected
        #[expect(clippy::cast_precision_loss)]
        let rejected = (outcome.ticks - 10) as f64;
        let expected =
            f64::from(outcome.state.left_hits()) + outcome.duration_secs - rejected;
        assert!((outcome.delta.left - expected).abs() < 1e-9);
        assert_eq!(game.paddle(Side::Left).y(), 0.0);
    }

    #[test]
    fn test_interrupt_stops_episode() {
        let config = EpisodeConfig::default();
        let mut game = game(1);
        let idle = Fixed(Decision::Hold);
        let result = run_episode(&mut game, &idle, &idle, &config, &mut InterruptAfter(30), "");
        assert_eq!(result, Err(Interrupted));
        assert_eq!(game.state().ticks(), 30);
    }

    #[test]
    fn test_point_cap_checked_before_hit_cap() {
        let config = EpisodeConfig {
            point_cap: 1,
            hit_cap: 1,
            hit_cap_side: HitCapSide::Either,
            ..EpisodeConfig::default()
        };
        let state: MatchState = serde_json::from_str(
            r#"{"left_score":1,"right_score":0,"left_hits":1,"right_hits":1,"ticks":10}"#,
        )
        .unwrap();
        assert_eq!(
            config.termination(&state),
            Some(Termination::PointCap(Side::Left))
        );
    }

    #[test]
    fn test_validate_rejects_zero_caps() {
        let config = EpisodeConfig {
            point_cap: 0,
            ..EpisodeConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(EpisodeConfig::default().validate().is_ok());
    }
}
