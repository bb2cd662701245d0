//! Round-robin evaluation of one generation.
//!
//! [`PopulationEvaluator::evaluate`] scores a whole population:
//!
//! 1. Every member's fitness is reset to zero, before any match is played
//! 2. [`round_robin`] lists the pairings; each pair plays one episode with the
//!    lower index on the left
//! 3. Each side's [`FitnessDelta`](crate::episode::FitnessDelta) is added to its
//!    member
//!
//! A member's final fitness is therefore the sum of its deltas over all its
//! matches, independent of the order the matches are played in.
//!
//! # Serve Seeds
//!
//! Match `(i, j)` of generation `g` is served from `base.derive([g, i, j])`, so
//! re-evaluating a restored population replays exactly the same matches.

use pongevo_engine::{ArenaConfig, Game, ServeSeed};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    episode::{self, EpisodeConfig, EpisodeOutcome, Termination},
    error::TrainingError,
    genome::{Genome, Member},
    observer::MatchObserver,
};

/// A scheduled match between population indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// `i` plays left, `j` plays right, `i < j`.
    Match(usize, usize),
    /// A lone member plays itself; only the left side's delta counts.
    SelfMatch(usize),
}

/// Every unordered pair of `0..n` once, in lexicographic order.
///
/// A population of one gets a single [`Pairing::SelfMatch`] so it still
/// receives a fitness. An empty population gets nothing.
///
/// # Example
///
/// ```
/// use pongevo_training::evaluator::{Pairing, round_robin};
///
/// let pairs: Vec<_> = round_robin(3).collect();
/// assert_eq!(pairs, [Pairing::Match(0, 1), Pairing::Match(0, 2), Pairing::Match(1, 2)]);
/// assert_eq!(round_robin(1).collect::<Vec<_>>(), [Pairing::SelfMatch(0)]);
/// ```
pub fn round_robin(n: usize) -> impl Iterator<Item = Pairing> {
    let single = (n == 1).then_some(Pairing::SelfMatch(0));
    let pairs = (0..n).flat_map(move |i| (i + 1..n).map(move |j| Pairing::Match(i, j)));
    single.into_iter().chain(pairs)
}

/// Totals over one evaluated generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub matches: usize,
    pub total_ticks: u64,
    pub total_hits: u64,
    pub point_cap_endings: usize,
    pub hit_cap_endings: usize,
}

impl GenerationReport {
    fn record(&mut self, outcome: &EpisodeOutcome) {
        self.matches += 1;
        self.total_ticks += outcome.ticks;
        self.total_hits +=
            u64::from(outcome.state.left_hits()) + u64::from(outcome.state.right_hits());
        match outcome.termination {
            Termination::PointCap(_) => self.point_cap_endings += 1,
            Termination::HitCap(_) => self.hit_cap_endings += 1,
        }
    }
}

/// Plays the round-robin tournament of one generation.
#[derive(Debug, Clone)]
pub struct PopulationEvaluator {
    arena: ArenaConfig,
    episode: EpisodeConfig,
    seed: ServeSeed,
}

impl PopulationEvaluator {
    #[must_use]
    pub fn new(arena: ArenaConfig, episode: EpisodeConfig, seed: ServeSeed) -> Self {
        Self {
            arena,
            episode,
            seed,
        }
    }

    #[must_use]
    pub fn arena(&self) -> &ArenaConfig {
        &self.arena
    }

    #[must_use]
    pub fn episode(&self) -> &EpisodeConfig {
        &self.episode
    }

    /// Serve seed of match `(i, j)` in `generation`.
    #[must_use]
    pub fn match_seed(&self, generation: usize, i: usize, j: usize) -> ServeSeed {
        self.seed.derive(&[generation as u64, i as u64, j as u64])
    }

    /// Resets and scores every member.
    ///
    /// On [`TrainingError::Interrupted`] the fitness values are partial and
    /// must not be used.
    pub fn evaluate<G>(
        &self,
        generation: usize,
        members: &mut [Member<G>],
        observer: &mut dyn MatchObserver,
    ) -> Result<GenerationReport, TrainingError>
    where
        G: Genome,
    {
        for member in members.iter_mut() {
            member.reset_fitness();
        }
        let controllers = members
            .iter()
            .map(|m| m.genome().controller())
            .collect::<Result<Vec<_>, _>>()?;

        let mut report = GenerationReport {
            generation,
            ..GenerationReport::default()
        };
        for pairing in round_robin(members.len()) {
            let (i, j) = match pairing {
                Pairing::Match(i, j) => (i, j),
                Pairing::SelfMatch(i) => (i, i),
            };
            let caption = format!("gen {generation}: {} vs {}", members[i].id(), members[j].id());
            let mut game = Game::new(self.arena.clone(), self.match_seed(generation, i, j));
            let outcome = episode::run_episode(
                &mut game,
                &controllers[i],
                &controllers[j],
                &self.episode,
                observer,
                &caption,
            )?;

            members[i].add_fitness(outcome.delta.left);
            if let Pairing::Match(..) = pairing {
                members[j].add_fitness(outcome.delta.right);
            }
            debug!(
                generation,
                left = %members[i].id(),
                right = %members[j].id(),
                termination = ?outcome.termination,
                ticks = outcome.ticks,
                left_delta = outcome.delta.left,
                right_delta = outcome.delta.right,
                "match finished"
            );
            report.record(&outcome);
        }
        Ok(report)
    }
}
