//! The generational loop with reporting and persistence.
//!
//! [`EvolutionDriver::run`] hands the engine's population to the
//! [`PopulationEvaluator`] each generation, logs a [`GenerationSummary`],
//! lets the engine reproduce and writes a checkpoint.
//!
//! # Resuming
//!
//! [`DriverConfig::generations`] is the total number of generations of the run,
//! not the number still to go. A driver given an engine restored from a
//! checkpoint only runs the remaining generations, and ends with the same
//! engine state an uninterrupted run would have reached.
//!
//! # Interrupts
//!
//! If the observer requests a stop, the partially evaluated generation is
//! discarded: no reproduction, no checkpoint and no best-individual file. The
//! checkpoints of earlier generations stay valid for resuming.

use std::path::PathBuf;

use pongevo_controller::network::FeedForwardNetwork;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    best::BestIndividual,
    checkpoint::CheckpointStore,
    engine::{EvolutionEngine, GenerationHooks},
    error::TrainingError,
    evaluator::{GenerationReport, PopulationEvaluator},
    observer::MatchObserver,
    statistics::GenerationSummary,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Total generations of the run.
    pub generations: usize,
    /// Write a checkpoint here after every generation.
    pub checkpoint_dir: Option<PathBuf>,
    /// Write the best individual here when the run completes.
    pub best_path: Option<PathBuf>,
    /// Name stored in the best-individual file.
    pub model_name: String,
}

impl DriverConfig {
    #[must_use]
    pub fn new(generations: usize) -> Self {
        Self {
            generations,
            checkpoint_dir: None,
            best_path: None,
            model_name: "best".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RunOutcome {
    Completed,
    /// Stopped while evaluating `generation`.
    Interrupted { generation: usize },
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// One entry per fully evaluated generation of this run.
    pub summaries: Vec<GenerationSummary>,
    pub best: Option<BestIndividual>,
    pub last_checkpoint: Option<PathBuf>,
}

#[derive(Debug)]
pub struct EvolutionDriver {
    config: DriverConfig,
    evaluator: PopulationEvaluator,
}

struct DriverHooks {
    store: Option<CheckpointStore>,
    summaries: Vec<GenerationSummary>,
    last_checkpoint: Option<PathBuf>,
}

impl<E> GenerationHooks<E, GenerationReport> for DriverHooks
where
    E: EvolutionEngine + Serialize,
{
    fn post_evaluate(&mut self, engine: &E, report: &GenerationReport) -> Result<(), TrainingError> {
        let Some(summary) = GenerationSummary::new(report, engine.members()) else {
            return Ok(());
        };
        info!(
            generation = summary.generation,
            best_genome = summary.best_genome,
            max = summary.fitness.max,
            mean = summary.fitness.mean,
            min = summary.fitness.min,
            matches = summary.matches,
            ticks = summary.total_ticks,
            "generation evaluated"
        );
        self.summaries.push(summary);
        Ok(())
    }

    fn end_generation(&mut self, engine: &E) -> Result<(), TrainingError> {
        if let Some(store) = &self.store {
            let path = store.save(engine)?;
            debug!(path = %path.display(), "checkpoint written");
            self.last_checkpoint = Some(path);
        }
        Ok(())
    }
}

impl EvolutionDriver {
    #[must_use]
    pub fn new(config: DriverConfig, evaluator: PopulationEvaluator) -> Self {
        Self { config, evaluator }
    }

    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Evolves `engine` until [`DriverConfig::generations`] or an interrupt.
    ///
    /// # Arguments
    ///
    /// * `engine` - A fresh engine or one restored from a checkpoint; its
    ///   current generation is where the run starts.
    /// * `observer` - Shown every match, and polled for interrupts.
    ///
    /// # Returns
    ///
    /// The summaries of the generations completed by this call and how the
    /// run ended. An interrupt is reported as [`RunOutcome::Interrupted`],
    /// not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::Network`] if a member cannot be turned into a
    /// controller and [`TrainingError::Persistence`] if a checkpoint or the
    /// best-individual file cannot be written.
    pub fn run<E>(
        &self,
        engine: &mut E,
        observer: &mut dyn MatchObserver,
    ) -> Result<RunReport, TrainingError>
    where
        E: EvolutionEngine<Genome = FeedForwardNetwork> + Serialize,
    {
        let start = engine.generation();
        let remaining = self.config.generations.saturating_sub(start);
        info!(
            start,
            target = self.config.generations,
            population = engine.members().len(),
            "starting evolution"
        );

        let mut hooks = DriverHooks {
            store: self.config.checkpoint_dir.as_ref().map(CheckpointStore::new),
            summaries: vec![],
            last_checkpoint: None,
        };
        let result = engine
            .run(
                remaining,
                |generation, members| self.evaluator.evaluate(generation, members, &mut *observer),
                &mut hooks,
            )
            .map(|_| ());

        let outcome = match result {
            Ok(()) => RunOutcome::Completed,
            Err(TrainingError::Interrupted(_)) => {
                let generation = engine.generation();
                warn!(generation, "interrupted, discarding the partially evaluated generation");
                RunOutcome::Interrupted { generation }
            }
            Err(e) => return Err(e),
        };

        let best = match outcome {
            RunOutcome::Completed => engine
                .best()
                .and_then(|m| BestIndividual::new(&self.config.model_name, engine.generation(), m)),
            RunOutcome::Interrupted { .. } => None,
        };
        if let (Some(best), Some(path)) = (&best, &self.config.best_path) {
            best.save(path)?;
            info!(
                path = %path.display(),
                genome = %best.genome_id,
                fitness = best.fitness,
                "best individual saved"
            );
        }

        Ok(RunReport {
            outcome,
            summaries: hooks.summaries,
            best,
            last_checkpoint: hooks.last_checkpoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use pongevo_controller::network::NetworkShape;
    use pongevo_engine::{ArenaConfig, ServeSeed};

    use super::*;
    use crate::{
        checkpoint::Checkpoint,
        episode::EpisodeConfig,
        genetic::{EngineParams, GeneticEngine},
        observer::{Headless, MatchFrame},
    };

    fn engine() -> GeneticEngine {
        let params = EngineParams {
            population_size: 4,
            elite_count: 1,
            tournament_size: 2,
            seed: 17,
            ..EngineParams::default()
        };
        GeneticEngine::new(NetworkShape::default(), params).unwrap()
    }

    fn evaluator() -> PopulationEvaluator {
        PopulationEvaluator::new(
            ArenaConfig::default(),
            EpisodeConfig {
                point_cap: 1,
                hit_cap: 3,
                ..EpisodeConfig::default()
            },
            ServeSeed::new(5),
        )
    }

    /// Requests a stop once a match of `generation` is drawn.
    struct StopInGeneration {
        prefix: String,
        stop: bool,
    }

    impl StopInGeneration {
        fn new(generation: usize) -> Self {
            Self {
                prefix: format!("gen {generation}:"),
                stop: false,
            }
        }
    }

    impl MatchObserver for StopInGeneration {
        fn poll_interrupt(&mut self) -> bool {
            self.stop
        }

        fn draw(&mut self, frame: &MatchFrame<'_>) {
            self.stop |= frame.caption.starts_with(&self.prefix);
        }
    }

    #[test]
    fn test_completed_run_writes_checkpoints_and_best() {
        let dir = tempfile::tempdir().unwrap();
        let config = DriverConfig {
            checkpoint_dir: Some(dir.path().join("ckpt")),
            best_path: Some(dir.path().join("best.json")),
            ..DriverConfig::new(3)
        };
        let driver = EvolutionDriver::new(config, evaluator());
        let mut engine = engine();

        let report = driver.run(&mut engine, &mut Headless).unwrap();
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.summaries.len(), 3);
        assert_eq!(
            report.summaries.iter().map(|s| s.generation).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(report.summaries.iter().all(|s| s.matches == 6));

        let store = CheckpointStore::new(dir.path().join("ckpt"));
        for generation in 1..=3 {
            assert!(store.path_for(generation).exists());
        }
        assert_eq!(report.last_checkpoint, Some(store.path_for(3)));

        let best = BestIndividual::load(&dir.path().join("best.json")).unwrap();
        assert_eq!(Some(&best), report.best.as_ref());
        assert_eq!(best.generations, 3);
        assert_eq!(Some(best.genome_id), engine.best().map(|m| m.id()));
    }

    #[test]
    fn test_resume_matches_uninterrupted_run() {
        let mut uninterrupted = engine();
        EvolutionDriver::new(DriverConfig::new(4), evaluator())
            .run(&mut uninterrupted, &mut Headless)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let first_half = DriverConfig {
            checkpoint_dir: Some(dir.path().to_owned()),
            ..DriverConfig::new(2)
        };
        EvolutionDriver::new(first_half, evaluator())
            .run(&mut engine(), &mut Headless)
            .unwrap();

        let store = CheckpointStore::new(dir.path());
        let latest = store.require_latest().unwrap();
        let checkpoint: Checkpoint<GeneticEngine> = CheckpointStore::load(&latest).unwrap();
        assert_eq!(checkpoint.generation, 2);
        let mut resumed = checkpoint.engine;
        let report = EvolutionDriver::new(DriverConfig::new(4), evaluator())
            .run(&mut resumed, &mut Headless)
            .unwrap();
        assert_eq!(report.summaries.len(), 2);

        assert_eq!(
            serde_json::to_value(&resumed).unwrap(),
            serde_json::to_value(&uninterrupted).unwrap()
        );
    }

    #[test]
    fn test_interrupt_discards_current_generation() {
        let dir = tempfile::tempdir().unwrap();
        let config = DriverConfig {
            checkpoint_dir: Some(dir.path().join("ckpt")),
            best_path: Some(dir.path().join("best.json")),
            ..DriverConfig::new(5)
        };
        let driver = EvolutionDriver::new(config, evaluator());
        let mut engine = engine();

        let report = driver.run(&mut engine, &mut StopInGeneration::new(1)).unwrap();
        assert_eq!(report.outcome, RunOutcome::Interrupted { generation: 1 });
        assert_eq!(report.summaries.len(), 1);
        assert!(report.best.is_none());
        assert_eq!(engine.generation(), 1);

        let store = CheckpointStore::new(dir.path().join("ckpt"));
        assert_eq!(store.latest().unwrap(), Some(store.path_for(1)));
        assert!(!dir.path().join("best.json").exists());
    }

    #[test]
    fn test_nothing_left_to_run() {
        let mut engine = engine();
        let report = EvolutionDriver::new(DriverConfig::new(0), evaluator())
            .run(&mut engine, &mut Headless)
            .unwrap();
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert!(report.summaries.is_empty());
        assert!(report.best.is_none());
    }
}
