//! Genetic algorithm over network weight vectors.
//!
//! [`GeneticEngine`] implements [`EvolutionEngine`] for
//! [`FeedForwardNetwork`] genomes with a fixed [`NetworkShape`]. Only the weights
//! evolve.
//!
//! # Algorithm Overview
//!
//! After the population has been scored:
//!
//! 1. **Rank** - Members are ordered by fitness (stable, best first)
//! 2. **Best-ever** - The top member replaces the recorded best if it is better
//! 3. **Elitism** - The top `elite_count` members survive unchanged, keeping their ids
//! 4. **Tournament Selection** - Two parents are drawn per child
//! 5. **Crossover (BLX-α)** and **Gaussian Mutation** - See [`weights`]
//! 6. New members get fresh ids
//!
//! # Determinism
//!
//! All randomness comes from a [`Pcg32`] seeded by [`EngineParams::seed`] and
//! stored inside the engine. Serializing the engine captures the RNG state, the
//! id counter and the population, so a deserialized engine continues exactly
//! like the original would have.
//!
//! Deserialization checks the same invariants as [`GeneticEngine::new`] plus
//! the consistency of the stored population, so a hand-edited checkpoint is
//! rejected when it is loaded instead of failing in the middle of a run.

use pongevo_controller::network::{FeedForwardNetwork, NetworkShape};
use rand::{SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    engine::EvolutionEngine,
    error::ConfigError,
    genome::{GenomeId, Member},
    weights,
};

/// Parameters of [`GeneticEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineParams {
    pub population_size: usize,
    /// Top members copied unchanged into the next generation.
    pub elite_count: usize,
    /// Larger tournaments mean stronger selection pressure.
    pub tournament_size: usize,
    /// Probability of mutating each weight.
    pub mutation_rate: f64,
    pub mutation_sigma: f32,
    pub blx_alpha: f32,
    /// Initial weights are drawn from `[-init_bound, init_bound]`.
    pub init_bound: f32,
    /// Weights never leave `[-weight_bound, weight_bound]`.
    pub weight_bound: f32,
    pub seed: u64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            population_size: 16,
            elite_count: 2,
            tournament_size: 3,
            mutation_rate: 0.2,
            mutation_sigma: 0.3,
            blx_alpha: 0.3,
            init_bound: 1.0,
            weight_bound: 5.0,
            seed: 0,
        }
    }
}

impl EngineParams {
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first field out of range:
    /// an empty population, more elites or a larger tournament than the
    /// population, a mutation rate outside `[0, 1]`, or a negative or
    /// non-finite float.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::invalid("population_size", "must be at least 1"));
        }
        if self.elite_count > self.population_size {
            return Err(ConfigError::invalid(
                "elite_count",
                format!("{} exceeds population size {}", self.elite_count, self.population_size),
            ));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(ConfigError::invalid(
                "tournament_size",
                format!("must be in 1..={}", self.population_size),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::invalid("mutation_rate", "must be in [0, 1]"));
        }
        if !(self.mutation_sigma.is_finite() && self.mutation_sigma >= 0.0) {
            return Err(ConfigError::invalid("mutation_sigma", "must be finite and non-negative"));
        }
        if !(self.blx_alpha.is_finite() && self.blx_alpha >= 0.0) {
            return Err(ConfigError::invalid("blx_alpha", "must be finite and non-negative"));
        }
        if !(self.weight_bound.is_finite() && self.weight_bound > 0.0) {
            return Err(ConfigError::invalid("weight_bound", "must be finite and positive"));
        }
        if !(self.init_bound.is_finite() && (0.0..=self.weight_bound).contains(&self.init_bound)) {
            return Err(ConfigError::invalid("init_bound", "must be in [0, weight_bound]"));
        }
        Ok(())
    }
}

/// A generational GA evolving network weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawGeneticEngine")]
pub struct GeneticEngine {
    params: EngineParams,
    shape: NetworkShape,
    generation: usize,
    next_id: u64,
    rng: Pcg32,
    members: Vec<Member<FeedForwardNetwork>>,
    best: Option<Member<FeedForwardNetwork>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGeneticEngine {
    params: EngineParams,
    shape: NetworkShape,
    generation: usize,
    next_id: u64,
    rng: Pcg32,
    members: Vec<Member<FeedForwardNetwork>>,
    best: Option<Member<FeedForwardNetwork>>,
}

impl TryFrom<RawGeneticEngine> for GeneticEngine {
    type Error = ConfigError;

    fn try_from(raw: RawGeneticEngine) -> Result<Self, Self::Error> {
        raw.shape.validate()?;
        raw.params.validate()?;
        if raw.members.len() != raw.params.population_size {
            return Err(ConfigError::invalid(
                "members",
                format!(
                    "{} members stored for population size {}",
                    raw.members.len(),
                    raw.params.population_size
                ),
            ));
        }
        for member in raw.members.iter().chain(&raw.best) {
            if *member.genome().shape() != raw.shape {
                return Err(ConfigError::invalid(
                    "members",
                    format!("genome {} does not have the engine's network shape", member.id()),
                ));
            }
            // New ids are taken from the counter, so it must be past every stored one
            if member.id().value() >= raw.next_id {
                return Err(ConfigError::invalid(
                    "next_id",
                    format!("{} is not above stored genome {}", raw.next_id, member.id()),
                ));
            }
        }
        Ok(Self {
            params: raw.params,
            shape: raw.shape,
            generation: raw.generation,
            next_id: raw.next_id,
            rng: raw.rng,
            members: raw.members,
            best: raw.best,
        })
    }
}

impl GeneticEngine {
    /// Creates generation 0 with random weights.
    ///
    /// # Arguments
    ///
    /// * `shape` - Layer sizes shared by every member; only weights evolve.
    /// * `params` - Population and operator settings. `params.seed` seeds
    ///   the engine's RNG.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Network`] if `shape` has an empty layer and
    /// [`ConfigError::Invalid`] if `params` fails [`EngineParams::validate`].
    pub fn new(shape: NetworkShape, params: EngineParams) -> Result<Self, ConfigError> {
        shape.validate()?;
        params.validate()?;
        let mut engine = Self {
            rng: Pcg32::seed_from_u64(params.seed),
            params,
            shape,
            generation: 0,
            next_id: 0,
            members: vec![],
            best: None,
        };
        let len = engine.shape.weight_count();
        for _ in 0..engine.params.population_size {
            let weights = weights::random(&mut engine.rng, engine.params.init_bound, len);
            let member = engine.new_member(weights);
            engine.members.push(member);
        }
        Ok(engine)
    }

    #[must_use]
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    #[must_use]
    pub fn shape(&self) -> &NetworkShape {
        &self.shape
    }

    fn new_member(&mut self, weights: Vec<f32>) -> Member<FeedForwardNetwork> {
        let id = GenomeId::new(self.next_id);
        self.next_id += 1;
        let network = FeedForwardNetwork::from_fn(self.shape.clone(), |i| weights[i]);
        Member::new(id, network)
    }

    fn ranked(&self) -> Vec<Member<FeedForwardNetwork>> {
        let mut ranked = self.members.clone();
        ranked.sort_by(|a, b| b.rank_key().total_cmp(&a.rank_key()));
        ranked
    }
}

impl EvolutionEngine for GeneticEngine {
    type Genome = FeedForwardNetwork;

    fn generation(&self) -> usize {
        self.generation
    }

    fn members(&self) -> &[Member<FeedForwardNetwork>] {
        &self.members
    }

    fn members_mut(&mut self) -> &mut [Member<FeedForwardNetwork>] {
        &mut self.members
    }

    fn best(&self) -> Option<&Member<FeedForwardNetwork>> {
        self.best.as_ref()
    }

    fn reproduce(&mut self) {
        let ranked = self.ranked();

        if let Some(top) = ranked.first().filter(|m| m.fitness().is_some())
            && self.best.as_ref().is_none_or(|best| top.rank_key() > best.rank_key())
        {
            self.best = Some(top.clone());
        }

        let mut next = Vec::with_capacity(self.params.population_size);
        for elite in &ranked[..self.params.elite_count] {
            let mut elite = elite.clone();
            elite.clear_fitness();
            next.push(elite);
        }

        while next.len() < self.params.population_size {
            let p1 = tournament_select(&ranked, self.params.tournament_size, &mut self.rng);
            let p2 = tournament_select(&ranked, self.params.tournament_size, &mut self.rng);
            let mut child = weights::blx_alpha(
                p1.genome().weights(),
                p2.genome().weights(),
                self.params.blx_alpha,
                self.params.weight_bound,
                &mut self.rng,
            );
            weights::mutate(
                &mut child,
                self.params.mutation_sigma,
                self.params.weight_bound,
                self.params.mutation_rate,
                &mut self.rng,
            );
            let member = self.new_member(child);
            next.push(member);
        }

        self.members = next;
        self.generation += 1;
    }
}

/// Picks the fittest of `tournament_size` distinct random members.
fn tournament_select<'a, R>(
    population: &'a [Member<FeedForwardNetwork>],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Member<FeedForwardNetwork>
where
    R: rand::Rng + ?Sized,
{
    population
        .choose_multiple(rng, tournament_size)
        .reduce(|a, b| if b.rank_key() > a.rank_key() { b } else { a })
        .unwrap_or(&population[0])
}
