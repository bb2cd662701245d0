use std::path::PathBuf;

use anyhow::Context;
use pongevo_controller::controller::{Controller, NetworkController, TrackingController};
use pongevo_engine::{Game, ServeSeed};
use pongevo_training::best::BestIndividual;
use rand::Rng as _;

use crate::{command::play::app::PlayApp, config::TrainingConfig, util};

mod app;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum Opponent {
    /// The network from the best-individual file
    #[default]
    Network,
    /// A scripted paddle that follows the ball
    Tracker,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Best-individual file written by `train`
    #[arg(default_value = "best.json")]
    model_path: PathBuf,
    /// Who controls the right paddle (network or tracker)
    #[arg(long, default_value = "network")]
    opponent: Opponent,
    /// Training configuration providing the arena and the point cap
    #[arg(long)]
    config: Option<PathBuf>,
    /// Serve seed; random if omitted
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        model_path,
        opponent,
        config,
        seed,
    } = arg;

    let config = match config {
        Some(path) => util::read_json_file("training configuration", path)?,
        None => TrainingConfig::default(),
    };
    config
        .validate()
        .context("Invalid training configuration")?;

    let (opponent, opponent_name): (Box<dyn Controller>, String) = match opponent {
        Opponent::Network => {
            let best = BestIndividual::load(model_path).with_context(|| {
                format!("Failed to load best individual: {}", model_path.display())
            })?;
            let name = format!("{} {} ({:.1})", best.name, best.genome_id, best.fitness);
            let controller = NetworkController::new(best.network)
                .with_context(|| format!("Unusable network in {}", model_path.display()))?;
            (Box::new(controller), name)
        }
        Opponent::Tracker => (
            Box::new(TrackingController::for_arena(&config.arena)),
            "tracker".to_owned(),
        ),
    };

    let seed = seed.map_or_else(|| ServeSeed::new(rand::rng().random()), ServeSeed::new);
    let game = Game::new(config.arena.clone(), seed);
    let tick_rate = config.arena.ticks_per_second;
    let mut app = PlayApp::new(game, opponent, &opponent_name, config.episode.point_cap);

    ratatui::run(|terminal| app.run(terminal, tick_rate))
}
