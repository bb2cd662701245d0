use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use pongevo_engine::ServeSeed;
use pongevo_training::{
    checkpoint::{self, CheckpointStore},
    driver::{DriverConfig, EvolutionDriver, RunOutcome, RunReport},
    engine::EvolutionEngine as _,
    error::TrainingError,
    evaluator::PopulationEvaluator,
    genetic::GeneticEngine,
    observer::{Headless, MatchObserver},
    statistics::GenerationSummary,
};
use tracing::info;

use crate::{
    config::TrainingConfig,
    tui::TerminalObserver,
    util::{self, LogTarget},
};

/// Resolved configuration of the run, kept next to the checkpoints so that
/// `--resume` plays the same matches.
const RUN_CONFIG_FILE: &str = "run-config.json";
const STATS_FILE: &str = "stats.json";
const LOG_FILE: &str = "train.log";

const TUI_FPS: u32 = 30;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Training configuration file (JSON); missing fields use defaults
    #[arg(long, conflicts_with = "resume")]
    config: Option<PathBuf>,
    /// Total number of generations, overriding the configuration
    #[arg(long)]
    generations: Option<usize>,
    /// Seed of the run, overriding the configuration
    #[arg(long, conflicts_with = "resume")]
    seed: Option<u64>,
    /// Directory for checkpoints, statistics and the run configuration
    #[arg(long, default_value = "./checkpoints")]
    checkpoint_dir: PathBuf,
    /// Where to write the best individual
    #[arg(long, default_value = "best.json")]
    output: PathBuf,
    /// Name stored in the best-individual file
    #[arg(long, default_value = "pongevo")]
    name: String,
    /// Continue from the latest checkpoint in the checkpoint directory
    #[arg(long)]
    resume: bool,
    /// Watch the matches in the terminal (q / Esc / Ctrl-C stops training)
    #[arg(long)]
    tui: bool,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let log_path = arg.checkpoint_dir.join(LOG_FILE);
    util::init_logging(if arg.tui {
        LogTarget::File(&log_path)
    } else {
        LogTarget::Stderr
    })?;

    let mut session = TrainingSession::prepare(arg)?;
    let report = if arg.tui {
        ratatui::run(|terminal| session.train(&mut TerminalObserver::new(terminal, TUI_FPS)))?
    } else {
        session.train(&mut Headless)?
    };
    session.finish(&report)?;

    if arg.tui {
        eprintln!("  Log: {}", log_path.display());
    }
    Ok(())
}

#[derive(Debug)]
struct TrainingSession {
    config: TrainingConfig,
    engine: GeneticEngine,
    driver: EvolutionDriver,
    checkpoint_dir: PathBuf,
    /// Generation the run starts (or restarts) at.
    start: usize,
}

impl TrainingSession {
    fn prepare(arg: &TrainArg) -> anyhow::Result<Self> {
        let run_config_path = arg.checkpoint_dir.join(RUN_CONFIG_FILE);

        let (mut config, engine) = if arg.resume {
            let config: TrainingConfig =
                util::read_json_file("run configuration", &run_config_path)?;
            let store = CheckpointStore::new(&arg.checkpoint_dir);
            let path = store.require_latest()?;
            let checkpoint = CheckpointStore::load::<GeneticEngine>(&path)
                .with_context(|| format!("Failed to load checkpoint: {}", path.display()))?;
            info!(
                path = %path.display(),
                generation = checkpoint.generation,
                saved_at = %checkpoint.saved_at,
                "resuming from checkpoint"
            );
            (config, Some(checkpoint.engine))
        } else {
            let mut config = match &arg.config {
                Some(path) => util::read_json_file("training configuration", path)?,
                None => TrainingConfig::default(),
            };
            if let Some(seed) = arg.seed {
                config.engine.seed = seed;
            }
            (config, None)
        };
        if let Some(generations) = arg.generations {
            config.generations = generations;
        }
        config
            .validate()
            .context("Invalid training configuration")?;

        let engine = match engine {
            Some(engine) => {
                if engine.params() != &config.engine || engine.shape() != &config.network {
                    bail!(
                        "checkpoint does not match {}; the run configuration was changed",
                        run_config_path.display()
                    );
                }
                engine
            }
            None => GeneticEngine::new(config.network.clone(), config.engine.clone())?,
        };
        checkpoint::write_json(&run_config_path, &config)?;

        let evaluator = PopulationEvaluator::new(
            config.arena.clone(),
            config.episode.clone(),
            ServeSeed::new(config.engine.seed),
        );
        let driver = EvolutionDriver::new(
            DriverConfig {
                generations: config.generations,
                checkpoint_dir: Some(arg.checkpoint_dir.clone()),
                best_path: Some(arg.output.clone()),
                model_name: arg.name.clone(),
            },
            evaluator,
        );

        Ok(Self {
            start: engine.generation(),
            config,
            engine,
            driver,
            checkpoint_dir: arg.checkpoint_dir.clone(),
        })
    }

    fn train(&mut self, observer: &mut dyn MatchObserver) -> Result<RunReport, TrainingError> {
        self.driver.run(&mut self.engine, observer)
    }

    fn stats_path(&self) -> PathBuf {
        self.checkpoint_dir.join(STATS_FILE)
    }

    /// Writes the statistics file and prints a summary of the run.
    fn finish(&self, report: &RunReport) -> anyhow::Result<()> {
        let stats_path = self.stats_path();
        let previous = read_summaries(&stats_path)?;
        let summaries = merge_summaries(previous, self.start, &report.summaries);
        checkpoint::write_json(&stats_path, &summaries)?;

        eprintln!();
        eprintln!("Generation     Best      Mean       Min");
        for s in &report.summaries {
            eprintln!(
                "{:>10} {:>8.3} {:>9.3} {:>9.3}",
                s.generation, s.fitness.max, s.fitness.mean, s.fitness.min
            );
        }
        eprintln!();

        match report.outcome {
            RunOutcome::Completed => {
                eprintln!(
                    "Training completed: {} of {} generations",
                    self.engine.generation(),
                    self.config.generations
                );
            }
            RunOutcome::Interrupted { generation } => {
                eprintln!("Training interrupted during generation {generation}");
                eprintln!(
                    "  Resume with: pongevo train --resume --checkpoint-dir {}",
                    self.checkpoint_dir.display()
                );
            }
        }
        eprintln!("  Statistics: {}", stats_path.display());
        if let Some(path) = &report.last_checkpoint {
            eprintln!("  Last checkpoint: {}", path.display());
        }
        if let (Some(best), Some(path)) = (&report.best, &self.driver.config().best_path) {
            eprintln!();
            eprintln!("Best individual saved");
            eprintln!("  Path: {}", path.display());
            eprintln!("  Name: {}", best.name);
            eprintln!("  Genome: {}", best.genome_id);
            eprintln!("  Trained at: {}", best.trained_at);
            eprintln!("  Fitness: {:.3}", best.fitness);
        }
        Ok(())
    }
}

fn read_summaries(path: &Path) -> anyhow::Result<Vec<GenerationSummary>> {
    if !path.exists() {
        return Ok(vec![]);
    }
    util::read_json_file("statistics", path)
}

/// Earlier generations from `previous` followed by the ones of this run.
///
/// Entries at or after `start` in `previous` were produced by a run that was
/// later interrupted or overtaken, and are replaced.
fn merge_summaries(
    mut previous: Vec<GenerationSummary>,
    start: usize,
    current: &[GenerationSummary],
) -> Vec<GenerationSummary> {
    previous.retain(|s| s.generation < start);
    previous.extend_from_slice(current);
    previous
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pongevo_training::statistics::DescriptiveStats;

    use super::*;

    fn arg(dir: &Path) -> TrainArg {
        TrainArg {
            config: None,
            generations: None,
            seed: None,
            checkpoint_dir: dir.join("ckpt"),
            output: dir.join("best.json"),
            name: "test".to_owned(),
            resume: false,
            tui: false,
        }
    }

    fn write_small_config(dir: &Path) -> PathBuf {
        let path = dir.join("config.json");
        fs::write(
            &path,
            r#"{
                "engine": { "population_size": 3, "elite_count": 1, "tournament_size": 2 },
                "episode": { "point_cap": 1, "hit_cap": 3 },
                "generations": 2
            }"#,
        )
        .unwrap();
        path
    }

    fn generations_in(stats: &Path) -> Vec<usize> {
        util::read_json_file::<Vec<GenerationSummary>, _>("statistics", stats)
            .unwrap()
            .iter()
            .map(|s| s.generation)
            .collect()
    }

    #[test]
    fn test_fresh_run_then_resume_extends_statistics() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = TrainArg {
            config: Some(write_small_config(dir.path())),
            seed: Some(11),
            ..arg(dir.path())
        };

        let mut session = TrainingSession::prepare(&fresh).unwrap();
        assert_eq!(session.start, 0);
        let report = session.train(&mut Headless).unwrap();
        assert_eq!(report.outcome, RunOutcome::Completed);
        session.finish(&report).unwrap();
        assert!(dir.path().join("best.json").exists());
        assert_eq!(generations_in(&session.stats_path()), [0, 1]);

        // The stored run configuration keeps the seed and population size
        let stored: TrainingConfig = util::read_json_file(
            "run configuration",
            dir.path().join("ckpt").join(RUN_CONFIG_FILE),
        )
        .unwrap();
        assert_eq!(stored.engine.seed, 11);
        assert_eq!(stored.engine.population_size, 3);

        let resume = TrainArg {
            generations: Some(4),
            resume: true,
            ..arg(dir.path())
        };
        let mut session = TrainingSession::prepare(&resume).unwrap();
        assert_eq!(session.start, 2);
        assert_eq!(session.config.engine.seed, 11);
        let report = session.train(&mut Headless).unwrap();
        session.finish(&report).unwrap();
        assert_eq!(report.summaries.len(), 2);
        assert_eq!(generations_in(&session.stats_path()), [0, 1, 2, 3]);
    }

    #[test]
    fn test_resume_without_checkpoints_fails() {
        let dir = tempfile::tempdir().unwrap();
        let resume = TrainArg {
            resume: true,
            ..arg(dir.path())
        };
        assert!(TrainingSession::prepare(&resume).is_err());
    }

    #[test]
    fn test_resume_rejects_edited_run_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = TrainArg {
            config: Some(write_small_config(dir.path())),
            generations: Some(1),
            ..arg(dir.path())
        };
        let mut session = TrainingSession::prepare(&fresh).unwrap();
        session.train(&mut Headless).unwrap();

        let run_config_path = dir.path().join("ckpt").join(RUN_CONFIG_FILE);
        let mut config: TrainingConfig =
            util::read_json_file("run configuration", &run_config_path).unwrap();
        config.engine.mutation_rate = 0.5;
        checkpoint::write_json(&run_config_path, &config).unwrap();

        let resume = TrainArg {
            resume: true,
            ..arg(dir.path())
        };
        let err = TrainingSession::prepare(&resume).unwrap_err();
        assert!(err.to_string().contains("checkpoint does not match"), "{err}");
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "engine": { "population_size": 0 } }"#).unwrap();
        let fresh = TrainArg {
            config: Some(path),
            ..arg(dir.path())
        };
        let err = TrainingSession::prepare(&fresh).unwrap_err();
        assert!(err.to_string().contains("Invalid training configuration"));
    }

    #[test]
    fn test_merge_replaces_overtaken_generations() {
        let summary = |generation| GenerationSummary {
            generation,
            ..sample_summary()
        };
        let previous = vec![summary(0), summary(1), summary(2)];
        let merged = merge_summaries(previous, 1, &[summary(1), summary(2), summary(3)]);
        assert_eq!(
            merged.iter().map(|s| s.generation).collect::<Vec<_>>(),
            [0, 1, 2, 3]
        );
    }

    fn sample_summary() -> GenerationSummary {
        GenerationSummary {
            generation: 0,
            fitness: DescriptiveStats::new([0.0, 1.0]).unwrap(),
            best_genome: 0,
            matches: 1,
            total_ticks: 10,
            point_cap_endings: 1,
            hit_cap_endings: 0,
        }
    }
}
