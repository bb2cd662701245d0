//! Training harness that evolves paddle controllers by self-play.
//!
//! Every genome in a generation plays every other genome once. Match results are
//! turned into fitness, the evolutionary engine breeds the next generation, and
//! the whole engine state is checkpointed so a run can be resumed exactly.
//!
//! # How Training Works
//!
//! 1. **Population** - The [`EvolutionEngine`](engine::EvolutionEngine) owns the
//!    current [`Member`](genome::Member)s (genome + fitness)
//! 2. **Evaluation** - [`PopulationEvaluator`](evaluator::PopulationEvaluator) pairs
//!    members round-robin and runs one [episode](episode) per pair
//! 3. **Fitness** - Each episode returns a [`FitnessDelta`](episode::FitnessDelta)
//!    per side: own paddle hits plus simulated match duration, minus action
//!    penalties
//! 4. **Reproduction** - The engine keeps its elites and breeds the rest
//! 5. **Checkpoint** - [`CheckpointStore`](checkpoint::CheckpointStore) writes the
//!    engine after each generation
//! 6. **Repeat** - [`EvolutionDriver`](driver::EvolutionDriver) loops until the
//!    target generation count or an interrupt
//!
//! # Architecture
//!
//! ```text
//! EvolutionDriver
//!     ↓ drives
//! EvolutionEngine (GeneticEngine)
//!     ↓ asks for evaluation of
//! PopulationEvaluator
//!     ↓ runs
//! Episode (Game + two Controllers)
//!     ↓ produces
//! FitnessDelta
//!     ↓ accumulated into
//! Member fitness
//! ```
//!
//! # Determinism
//!
//! The engine RNG, every serve seed and the match order are derived from the
//! configured seed. Simulated time is used instead of the wall clock, so two
//! runs with the same configuration produce the same population, and resuming
//! from a checkpoint continues exactly where the uninterrupted run would be.
//!
//! # Example
//!
//! ```
//! use pongevo_controller::network::NetworkShape;
//! use pongevo_engine::{ArenaConfig, ServeSeed};
//! use pongevo_training::{
//!     driver::{DriverConfig, EvolutionDriver, RunOutcome},
//!     episode::EpisodeConfig,
//!     evaluator::PopulationEvaluator,
//!     genetic::{EngineParams, GeneticEngine},
//!     observer::Headless,
//! };
//!
//! let params = EngineParams { population_size: 4, elite_count: 1, ..EngineParams::default() };
//! let mut engine = GeneticEngine::new(NetworkShape::default(), params).unwrap();
//! let evaluator = PopulationEvaluator::new(
//!     ArenaConfig::default(),
//!     EpisodeConfig { point_cap: 1, hit_cap: 3, ..EpisodeConfig::default() },
//!     ServeSeed::new(0),
//! );
//! let driver = EvolutionDriver::new(DriverConfig::new(2), evaluator);
//!
//! let report = driver.run(&mut engine, &mut Headless).unwrap();
//! assert_eq!(report.outcome, RunOutcome::Completed);
//! assert_eq!(report.summaries.len(), 2);
//! ```

pub mod best;
pub mod checkpoint;
pub mod driver;
pub mod engine;
pub mod episode;
pub mod error;
pub mod evaluator;
pub mod genetic;
pub mod genome;
pub mod observer;
pub mod statistics;
pub mod weights;
