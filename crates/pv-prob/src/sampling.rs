//! Compound discrete samplers.
//!
//! Each entry point clamps its inputs instead of failing:
//! `p ∉ (0,1) → 0.5`, geometric `p < 1e-12 → 1e-12`, negative-binomial `r ≤ 0 → 1`,
//! geometric-sum `r ≤ 0 → 10` and `r > 10000 → 10000`, `size ≤ 0 → 1000`.
//! Geometric sums saturate at `u64::MAX`. The plain functions draw from a fresh thread-local
//! generator; the `_with_rng` variants take any [`Rng`] (seeded in tests).

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Gamma, Geometric, Poisson};
use serde::Serialize;

use pv_core::{Error, Result};

use crate::catalog::{geometric_probability, open_probability};
use crate::handle::Draw;

/// Sample count used when the requested size is not positive.
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;
/// Negative-binomial `r` used when the requested value is not positive.
pub const DEFAULT_NEGATIVE_BINOMIAL_R: u64 = 1;
/// Geometric-sum repeat count used when the requested value is not positive.
pub const DEFAULT_GEOMETRIC_SUM_R: u64 = 10;
/// Largest geometric-sum repeat count.
pub const MAX_GEOMETRIC_SUM_R: u64 = 10_000;

/// An ordered batch of non-negative integer draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleBatch {
    /// The draws, in generation order.
    pub samples: Vec<u64>,
}

impl SampleBatch {
    /// Number of draws.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample mean (`NaN` for an empty batch).
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return f64::NAN;
        }
        self.samples.iter().map(|&s| s as f64).sum::<f64>() / self.samples.len() as f64
    }
}

fn clamp_size(size: i64) -> usize {
    if size <= 0 { DEFAULT_SAMPLE_SIZE } else { size as usize }
}

fn clamp_count(r: i64, fallback: u64) -> u64 {
    if r <= 0 { fallback } else { r as u64 }
}

/// Failures before the `r`-th success, drawn as a gamma-Poisson mixture:
/// `λ ~ Gamma(r, (1-p)/p)`, `X ~ Poisson(λ)`.
#[derive(Debug, Clone, Copy)]
pub struct NegativeBinomialDraw {
    r: u64,
    p: f64,
}

impl NegativeBinomialDraw {
    /// `r` and `p` are clamped (`r = 0 → 1`, `p ∉ (0,1) → 0.5`).
    pub fn new(r: u64, p: f64) -> Self {
        Self { r: r.max(DEFAULT_NEGATIVE_BINOMIAL_R), p: open_probability(p) }
    }

    /// Draw one count.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let scale = (1.0 - self.p) / self.p;
        let lambda = match Gamma::new(self.r as f64, scale) {
            Ok(g) => g.sample(rng),
            Err(_) => return 0,
        };
        if !(lambda > 0.0) || !lambda.is_finite() {
            return 0;
        }
        match Poisson::new(lambda) {
            Ok(pois) => {
                let k: f64 = pois.sample(rng);
                k as u64
            }
            // λ beyond the Poisson sampler's range: its mean is the best integer proxy.
            Err(_) => lambda.round() as u64,
        }
    }
}

impl Draw for NegativeBinomialDraw {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        self.sample(rng) as f64
    }
}

/// `n` i.i.d. negative-binomial counts (failures before the `r`-th success).
pub fn negative_binomial(r: i64, p: f64, size: i64) -> Result<SampleBatch> {
    negative_binomial_with_rng(r, p, size, &mut rand::rng())
}

/// [`negative_binomial`] with a caller-supplied generator.
pub fn negative_binomial_with_rng<R: Rng + ?Sized>(
    r: i64,
    p: f64,
    size: i64,
    rng: &mut R,
) -> Result<SampleBatch> {
    let draw = NegativeBinomialDraw::new(clamp_count(r, DEFAULT_NEGATIVE_BINOMIAL_R), p);
    let n = clamp_size(size);
    tracing::trace!(r = draw.r, p = draw.p, n, "negative binomial sampling");
    Ok(SampleBatch { samples: (0..n).map(|_| draw.sample(rng)).collect() })
}

/// Failures-before-first-success sampler.
///
/// `rand_distr::Geometric` already counts failures, which equals
/// "trials to first success" shifted down by one. Its setup loops forever once
/// `1 - p` rounds to 1, hence the floor on `p`.
fn shifted_geometric(p: f64) -> Result<Geometric> {
    Geometric::new(geometric_probability(p)).map_err(|e| Error::Computation(format!("rand_distr: {e}")))
}

/// `n` i.i.d. failures-before-first-success draws.
pub fn geometric(p: f64, size: i64) -> Result<SampleBatch> {
    geometric_with_rng(p, size, &mut rand::rng())
}

/// [`geometric`] with a caller-supplied generator.
pub fn geometric_with_rng<R: Rng + ?Sized>(p: f64, size: i64, rng: &mut R) -> Result<SampleBatch> {
    let dist = shifted_geometric(p)?;
    let n = clamp_size(size);
    tracing::trace!(p, n, "geometric sampling");
    Ok(SampleBatch { samples: (0..n).map(|_| dist.sample(rng)).collect() })
}

/// `n` sums, each of `r` independent failures-before-first-success draws.
///
/// Draws are consumed in order, so with the same generator state the output
/// equals summing consecutive chunks of `r` from [`geometric_with_rng`].
pub fn geometric_sum(p: f64, r: i64, size: i64) -> Result<SampleBatch> {
    geometric_sum_with_rng(p, r, size, &mut rand::rng())
}

/// [`geometric_sum`] with a caller-supplied generator.
pub fn geometric_sum_with_rng<R: Rng + ?Sized>(
    p: f64,
    r: i64,
    size: i64,
    rng: &mut R,
) -> Result<SampleBatch> {
    let dist = shifted_geometric(p)?;
    let r = clamp_count(r, DEFAULT_GEOMETRIC_SUM_R).min(MAX_GEOMETRIC_SUM_R);
    let n = clamp_size(size);
    tracing::trace!(p, r, n, "geometric sum sampling");
    let samples = (0..n)
        .map(|_| (0..r).fold(0u64, |acc, _| acc.saturating_add(dist.sample(rng))))
        .collect();
    Ok(SampleBatch { samples })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_size_clamp() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(geometric_with_rng(0.5, 0, &mut rng).unwrap().len(), DEFAULT_SAMPLE_SIZE);
        assert_eq!(geometric_with_rng(0.5, -5, &mut rng).unwrap().len(), DEFAULT_SAMPLE_SIZE);
        assert_eq!(negative_binomial_with_rng(5, 0.5, 37, &mut rng).unwrap().len(), 37);
        assert_eq!(geometric_sum_with_rng(0.5, 3, 12, &mut rng).unwrap().len(), 12);
    }

    #[test]
    fn test_invalid_p_matches_half() {
        let a = geometric_with_rng(1.5, 200, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = geometric_with_rng(0.5, 200, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_geometric_sum_is_chunked_geometric() {
        let sums = geometric_sum_with_rng(0.3, 4, 50, &mut StdRng::seed_from_u64(42)).unwrap();
        let flat = geometric_with_rng(0.3, 200, &mut StdRng::seed_from_u64(42)).unwrap();
        let chunked: Vec<u64> = flat.samples.chunks(4).map(|c| c.iter().sum()).collect();
        assert_eq!(sums.samples, chunked);
    }

    #[test]
    fn test_geometric_sum_default_r() {
        let a = geometric_sum_with_rng(0.5, 0, 20, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = geometric_sum_with_rng(0.5, 10, 20, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_negative_binomial_mean() {
        // E[X] = r(1-p)/p = 5
        let batch = negative_binomial_with_rng(5, 0.5, 20_000, &mut StdRng::seed_from_u64(11)).unwrap();
        assert!((batch.mean() - 5.0).abs() < 0.15, "mean={}", batch.mean());
    }

    #[test]
    fn test_geometric_mean() {
        // E[X] = (1-p)/p = 3
        let batch = geometric_with_rng(0.25, 20_000, &mut StdRng::seed_from_u64(5)).unwrap();
        assert!((batch.mean() - 3.0).abs() < 0.1, "mean={}", batch.mean());
        assert!(batch.samples.contains(&0));
    }

    #[test]
    fn test_empty_batch_mean() {
        assert!(SampleBatch { samples: vec![] }.mean().is_nan());
    }

    #[test]
    fn test_tiny_p_terminates() {
        let mut rng = StdRng::seed_from_u64(17);
        let batch = geometric_with_rng(1e-18, 5, &mut rng).unwrap();
        assert_eq!(batch.len(), 5);
        let sums = geometric_sum_with_rng(1e-17, 3, 4, &mut rng).unwrap();
        assert_eq!(sums.len(), 4);
    }

    #[test]
    fn test_geometric_sum_large_draws_do_not_overflow() {
        let batch = geometric_sum_with_rng(2e-16, 5000, 1, &mut StdRng::seed_from_u64(8)).unwrap();
        assert_eq!(batch.len(), 1);
        assert!(batch.samples[0] > 0);
    }

    #[test]
    fn test_geometric_sum_r_ceiling() {
        let a = geometric_sum_with_rng(0.5, i64::MAX, 3, &mut StdRng::seed_from_u64(4)).unwrap();
        let b = geometric_sum_with_rng(0.5, MAX_GEOMETRIC_SUM_R as i64, 3, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(a, b);
    }
}
