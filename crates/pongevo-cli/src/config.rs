use pongevo_controller::{
    controller::NetworkController,
    network::{FeedForwardNetwork, NetworkShape},
};
use pongevo_engine::ArenaConfig;
use pongevo_training::{episode::EpisodeConfig, error::ConfigError, genetic::EngineParams};
use serde::{Deserialize, Serialize};

/// Everything a training run needs besides paths.
///
/// Every field has a default, so a configuration file only lists what it
/// changes:
///
/// ```json
/// { "engine": { "population_size": 32 }, "generations": 200 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    pub arena: ArenaConfig,
    pub network: NetworkShape,
    pub episode: EpisodeConfig,
    pub engine: EngineParams,
    /// Total generations of the run.
    pub generations: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            network: NetworkShape::default(),
            episode: EpisodeConfig::default(),
            engine: EngineParams::default(),
            generations: 50,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arena.validate()?;
        self.network.validate()?;
        // The evolved networks must be usable as paddle controllers
        NetworkController::new(FeedForwardNetwork::from_fn(self.network.clone(), |_| 0.0))?;
        self.episode.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pongevo_controller::network::NetworkError;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: TrainingConfig = serde_json::from_str(
            r#"{ "engine": { "population_size": 8, "elite_count": 1 }, "generations": 3 }"#,
        )
        .unwrap();
        assert_eq!(config.engine.population_size, 8);
        assert_eq!(config.engine.elite_count, 1);
        assert_eq!(config.engine.tournament_size, EngineParams::default().tournament_size);
        assert_eq!(config.generations, 3);
        assert_eq!(config.arena, ArenaConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<TrainingConfig>(r#"{ "generation": 3 }"#).is_err());
        assert!(
            serde_json::from_str::<TrainingConfig>(r#"{ "episode": { "point_limit": 3 } }"#)
                .is_err()
        );
    }

    #[test]
    fn test_validate_reports_first_problem() {
        assert!(TrainingConfig::default().validate().is_ok());

        let mut config = TrainingConfig::default();
        config.arena.height = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Arena(_))));

        let mut config = TrainingConfig::default();
        config.network.outputs = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Network(NetworkError::IncompatibleShape { outputs: 2, .. }))
        ));

        let mut config = TrainingConfig::default();
        config.episode.point_cap = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "point_cap", .. })
        ));

        let mut config = TrainingConfig::default();
        config.engine.elite_count = config.engine.population_size + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "elite_count", .. })
        ));
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut config = TrainingConfig::default();
        config.engine.seed = 42;
        config.network.hidden = vec![6, 4];
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: TrainingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
