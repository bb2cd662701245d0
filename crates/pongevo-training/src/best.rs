use std::path::Path;

use chrono::{DateTime, Utc};
use pongevo_controller::network::FeedForwardNetwork;
use serde::{Deserialize, Serialize};

use crate::{
    checkpoint,
    error::PersistenceError,
    genome::{GenomeId, Member},
};

/// The best network of a training run, saved for playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestIndividual {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Generations bred when the run ended.
    pub generations: usize,
    pub genome_id: GenomeId,
    pub fitness: f64,
    pub network: FeedForwardNetwork,
}

impl BestIndividual {
    /// Returns `None` if `member` was never evaluated.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        generations: usize,
        member: &Member<FeedForwardNetwork>,
    ) -> Option<Self> {
        Some(Self {
            name: name.into(),
            trained_at: Utc::now(),
            generations,
            genome_id: member.id(),
            fitness: member.fitness()?,
            network: member.genome().clone(),
        })
    }

    /// Writes the file atomically, see [`checkpoint::write_json`].
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if serializing or writing fails.
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        checkpoint::write_json(path, self)
    }

    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if `path` cannot be read and
    /// [`PersistenceError::Json`] if it is not a best-individual file or its
    /// network weights do not match its shape.
    pub fn load(path: &Path) -> Result<Self, PersistenceError> {
        checkpoint::read_json(path)
    }
}

#[cfg(test)]
mod tests {
    use pongevo_controller::network::NetworkShape;

    use super::*;

    #[test]
    fn test_requires_fitness() {
        let network = FeedForwardNetwork::from_fn(NetworkShape::default(), |_| 0.5);
        let mut member = Member::new(GenomeId::new(4), network);
        assert!(BestIndividual::new("best", 3, &member).is_none());

        member.add_fitness(12.5);
        let best = BestIndividual::new("best", 3, &member).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best.json");
        best.save(&path).unwrap();
        let loaded = BestIndividual::load(&path).unwrap();
        assert_eq!(loaded, best);
        assert_eq!(loaded.genome_id, GenomeId::new(4));
        assert_eq!(loaded.fitness, 12.5);
    }
}
