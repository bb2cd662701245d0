//! Boundary between the training harness and an evolutionary algorithm.
//!
//! The harness treats the algorithm as a black box: it reads and scores the
//! current population through [`EvolutionEngine::members_mut`] and asks for the
//! next one with [`EvolutionEngine::reproduce`]. Selection, crossover, speciation
//! or anything else stays inside the implementation.
//!
//! [`EvolutionEngine::run`] is the generational loop itself. Callers plug in
//! the evaluation function and [`GenerationHooks`] for reporting and
//! checkpointing.

use crate::{error::TrainingError, genome::Member};

/// An evolutionary algorithm over genomes of type [`Self::Genome`].
pub trait EvolutionEngine {
    type Genome;

    /// Number of generations already bred.
    ///
    /// This is also the index of the population returned by
    /// [`Self::members`].
    fn generation(&self) -> usize;

    fn members(&self) -> &[Member<Self::Genome>];

    fn members_mut(&mut self) -> &mut [Member<Self::Genome>];

    /// Best evaluated member seen so far.
    fn best(&self) -> Option<&Member<Self::Genome>>;

    /// Replaces the evaluated population with the next generation.
    fn reproduce(&mut self);

    /// Runs `generations` evaluate-reproduce cycles.
    ///
    /// Errors from `evaluate` or from `hooks` stop the loop immediately; a
    /// generation that failed during evaluation is not reproduced.
    fn run<R, F, H>(
        &mut self,
        generations: usize,
        mut evaluate: F,
        hooks: &mut H,
    ) -> Result<Option<&Member<Self::Genome>>, TrainingError>
    where
        Self: Sized,
        F: FnMut(usize, &mut [Member<Self::Genome>]) -> Result<R, TrainingError>,
        H: GenerationHooks<Self, R>,
    {
        for _ in 0..generations {
            let generation = self.generation();
            let report = evaluate(generation, self.members_mut())?;
            hooks.post_evaluate(self, &report)?;
            self.reproduce();
            hooks.end_generation(self)?;
        }
        Ok(self.best())
    }
}

/// Callbacks invoked by [`EvolutionEngine::run`].
pub trait GenerationHooks<E: ?Sized, R> {
    /// Called after the population was scored, before reproduction.
    fn post_evaluate(&mut self, engine: &E, report: &R) -> Result<(), TrainingError> {
        let _ = (engine, report);
        Ok(())
    }

    /// Called once the next generation exists.
    fn end_generation(&mut self, engine: &E) -> Result<(), TrainingError> {
        let _ = engine;
        Ok(())
    }
}

impl<E: ?Sized, R> GenerationHooks<E, R> for () {}
