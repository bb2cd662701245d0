//! Per-generation statistics for logging and the run summary.

use serde::{Deserialize, Serialize};

use crate::{evaluator::GenerationReport, genome::Member};

/// Summary of a set of `f64` values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes statistics from unsorted values.
    ///
    /// Returns `None` for an empty input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pongevo_training::statistics::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);

        let min = *values.first()?;
        let max = *values.last()?;
        #[expect(clippy::cast_precision_loss)]
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let median = values[values.len() / 2];
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}

/// What happened in one generation, as recorded in `stats.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub fitness: DescriptiveStats,
    pub best_genome: u64,
    pub matches: usize,
    pub total_ticks: u64,
    pub point_cap_endings: usize,
    pub hit_cap_endings: usize,
}

impl GenerationSummary {
    /// Summarizes an evaluated population.
    ///
    /// Returns `None` if no member has a fitness.
    #[must_use]
    pub fn new<G>(report: &GenerationReport, members: &[Member<G>]) -> Option<Self> {
        let fitness = DescriptiveStats::new(members.iter().filter_map(Member::fitness))?;
        let best = members
            .iter()
            .filter(|m| m.fitness().is_some())
            .max_by(|a, b| a.rank_key().total_cmp(&b.rank_key()))?;
        Some(Self {
            generation: report.generation,
            fitness,
            best_genome: best.id().value(),
            matches: report.matches,
            total_ticks: report.total_ticks,
            point_cap_endings: report.point_cap_endings,
            hit_cap_endings: report.hit_cap_endings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::GenomeId;

    #[test]
    fn test_empty_is_none() {
        assert_eq!(DescriptiveStats::new([]), None);
    }

    #[test]
    fn test_std_dev() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    fn test_summary_picks_best_member() {
        let mut members: Vec<_> = (0..3).map(|i| Member::new(GenomeId::new(i), ())).collect();
        members[0].add_fitness(1.0);
        members[1].add_fitness(4.0);
        let report = GenerationReport {
            generation: 7,
            matches: 3,
            ..GenerationReport::default()
        };
        let summary = GenerationSummary::new(&report, &members).unwrap();
        assert_eq!(summary.best_genome, 1);
        assert_eq!(summary.fitness.max, 4.0);
        assert_eq!(summary.fitness.min, 1.0);
        assert_eq!(summary.generation, 7);
    }
}
