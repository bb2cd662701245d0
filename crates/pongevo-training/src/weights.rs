//! Operations on flat network weight vectors.
//!
//! These are the variation operators used by
//! [`GeneticEngine`](crate::genetic::GeneticEngine). Network weights are signed,
//! so every operator keeps its result within `[-bound, bound]`.
//!
//! - **Initialization**: [`random`] draws uniform weights
//! - **Crossover**: [`blx_alpha`] blends two parents
//! - **Mutation**: [`mutate`] adds Gaussian noise

use rand::Rng;
use rand_distr::StandardNormal;

/// Creates a weight vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use pongevo_training::weights;
///
/// let weights = weights::from_fn(|i| 1.0 / (i as f32 + 1.0), 3);
/// assert_eq!(weights, vec![1.0, 0.5, 1.0 / 3.0]);
/// ```
pub fn from_fn<F>(f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    (0..len).map(f).collect()
}

/// Draws `len` weights uniformly from `[-bound, bound]`.
pub fn random<R>(rng: &mut R, bound: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(-bound..=bound), len)
}

/// BLX-α crossover.
///
/// For each position the child is drawn uniformly from the parents' interval
/// widened by `alpha` times its length on both sides, then clamped to
/// `[-bound, bound]`.
///
/// # Panics
///
/// Panics if the parents have different lengths.
pub fn blx_alpha<R>(p1: &[f32], p2: &[f32], alpha: f32, bound: f32, rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    p1.iter()
        .zip(p2)
        .map(|(&x1, &x2)| {
            let min = f32::min(x1, x2);
            let max = f32::max(x1, x2);
            let d = max - min;
            rng.random_range(min - alpha * d..=max + alpha * d)
                .clamp(-bound, bound)
        })
        .collect()
}

/// Gaussian mutation in place.
///
/// Each weight is perturbed by `N(0, sigma)` with probability `rate`, then
/// clamped to `[-bound, bound]`.
pub fn mutate<R>(weights: &mut [f32], sigma: f32, bound: f32, rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for w in weights {
        if rng.random_bool(rate) {
            let noise: f32 = rng.sample(StandardNormal);
            *w = (*w + sigma * noise).clamp(-bound, bound);
        }
    }
}
