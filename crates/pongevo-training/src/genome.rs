//! Genome handles shared between the engine and the evaluator.
//!
//! The evaluator never looks inside a genome. It only needs to turn one into a
//! [`Controller`] ([`Genome`]) and to add to its fitness ([`Member`]).

use pongevo_controller::{
    controller::{Controller, NetworkController},
    network::{FeedForwardNetwork, NetworkError},
};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the engine; never reused within a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("#{_0}")]
#[serde(transparent)]
pub struct GenomeId(u64);

impl GenomeId {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Something that can play a match.
pub trait Genome {
    type Controller: Controller;

    fn controller(&self) -> Result<Self::Controller, NetworkError>;
}

impl Genome for FeedForwardNetwork {
    type Controller = NetworkController;

    fn controller(&self) -> Result<Self::Controller, NetworkError> {
        NetworkController::new(self.clone())
    }
}

/// One individual of the population with its fitness for the current
/// generation.
///
/// `fitness` is `None` until the member has been evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member<G> {
    id: GenomeId,
    genome: G,
    fitness: Option<f64>,
}

impl<G> Member<G> {
    #[must_use]
    pub fn new(id: GenomeId, genome: G) -> Self {
        Self {
            id,
            genome,
            fitness: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> GenomeId {
        self.id
    }

    #[must_use]
    pub fn genome(&self) -> &G {
        &self.genome
    }

    #[must_use]
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Fitness for ranking; unevaluated members rank below everything.
    #[must_use]
    pub fn rank_key(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }

    /// Starts a new generation's accumulation at zero.
    pub fn reset_fitness(&mut self) {
        self.fitness = Some(0.0);
    }

    pub fn add_fitness(&mut self, delta: f64) {
        self.fitness = Some(self.fitness.unwrap_or(0.0) + delta);
    }

    pub(crate) fn clear_fitness(&mut self) {
        self.fitness = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitness_accumulates_from_reset() {
        let mut member = Member::new(GenomeId::new(3), ());
        assert_eq!(member.fitness(), None);
        assert_eq!(member.rank_key(), f64::NEG_INFINITY);

        member.add_fitness(1.5);
        member.add_fitness(-0.5);
        assert_eq!(member.fitness(), Some(1.0));

        member.reset_fitness();
        assert_eq!(member.fitness(), Some(0.0));
        assert_eq!(member.id().to_string(), "#3");
    }
}
