//! Probability integral transform (PIT) datasets.
//!
//! For continuous `X` with CDF `F`, `U = F(X)` is Uniform(0, 1). [`pit`] draws
//! samples, maps them through `F`, and returns three paired panels: the raw
//! samples against the true density, the CDF with a few traced points, and the
//! transformed samples against the uniform reference.

use pv_core::{Error, Result};
use rand::Rng;
use serde::Serialize;

use crate::handle::{ContinuousHandle, DistributionHandle};
use crate::math::{self, Histogram};
use crate::sampling::DEFAULT_SAMPLE_SIZE;

/// Points on which the true density and CDF are drawn.
pub const PIT_CURVE_POINTS: usize = 1000;
/// Histogram bins for both sample panels.
pub const PIT_HISTOGRAM_BINS: usize = 50;

/// A point traced through the CDF: `u = F(x)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TracedPoint {
    /// Abscissa.
    pub x: f64,
    /// `F(x)`.
    pub u: f64,
}

/// Raw samples with the true density.
#[derive(Debug, Clone, Serialize)]
pub struct SourcePanel {
    /// Drawn samples, in draw order.
    pub samples: Vec<f64>,
    /// `[min, max]` of the samples, `PIT_CURVE_POINTS` points.
    pub grid: Vec<f64>,
    /// True density on `grid`.
    pub density: Vec<f64>,
    /// Density histogram of the samples.
    pub histogram: Histogram,
}

/// The CDF over the same abscissae, with traced points.
#[derive(Debug, Clone, Serialize)]
pub struct TransformPanel {
    /// Same abscissae as the source panel.
    pub grid: Vec<f64>,
    /// `F` on `grid`.
    pub cdf: Vec<f64>,
    /// Traced points (mean − std, mean, mean + std, or the quartiles).
    pub traces: Vec<TracedPoint>,
}

/// Transformed samples with the uniform reference.
#[derive(Debug, Clone, Serialize)]
pub struct UniformPanel {
    /// `u_i = F(x_i)`.
    pub u: Vec<f64>,
    /// Reference density support.
    pub reference_x: [f64; 2],
    /// Reference density (constant 1).
    pub reference_y: [f64; 2],
    /// Density histogram of `u` on `[0, 1]`.
    pub histogram: Histogram,
    /// One-sample KS statistic against Uniform(0, 1).
    pub ks_statistic: f64,
}

/// The three PIT panels.
#[derive(Debug, Clone, Serialize)]
pub struct PitData {
    /// Distribution label.
    pub label: String,
    /// Panel 1.
    pub source: SourcePanel,
    /// Panel 2.
    pub transform: TransformPanel,
    /// Panel 3.
    pub uniform: UniformPanel,
}

/// PIT with a fresh thread-local generator.
pub fn pit(handle: &DistributionHandle, n: usize) -> Result<PitData> {
    pit_with_rng(handle, n, &mut rand::rng())
}

/// PIT with a caller-supplied generator. `n == 0` draws the default 1000.
///
/// Discrete handles are rejected: `F(X)` is not uniform for them.
pub fn pit_with_rng<R: Rng>(handle: &DistributionHandle, n: usize, rng: &mut R) -> Result<PitData> {
    let h = handle.as_continuous().ok_or_else(|| {
        Error::Validation(format!("PIT requires a continuous distribution, got {}", handle.label()))
    })?;
    let n = if n == 0 { DEFAULT_SAMPLE_SIZE } else { n };

    let samples: Vec<f64> = (0..n).map(|_| h.sample(rng)).collect();
    let u: Vec<f64> = samples.iter().map(|&x| h.cdf(x)).collect();

    let (lo, hi) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    let grid = math::linspace(lo, hi, PIT_CURVE_POINTS);
    let density = grid.iter().map(|&x| h.pdf(x)).collect();
    let cdf = grid.iter().map(|&x| h.cdf(x)).collect();

    let ks_statistic = math::ks_uniform_statistic(&u);
    tracing::debug!(label = h.label(), n, ks = ks_statistic, "PIT computed");

    Ok(PitData {
        label: h.label().to_string(),
        source: SourcePanel {
            histogram: Histogram::density(&samples, PIT_HISTOGRAM_BINS, lo, hi),
            samples,
            grid: grid.clone(),
            density,
        },
        transform: TransformPanel { grid, cdf, traces: traced_points(h) },
        uniform: UniformPanel {
            histogram: Histogram::density(&u, PIT_HISTOGRAM_BINS, 0.0, 1.0),
            u,
            reference_x: [0.0, 1.0],
            reference_y: [1.0, 1.0],
            ks_statistic,
        },
    })
}

/// `mean − std`, `mean`, `mean + std` mapped through `F`; quartiles when a
/// moment is not finite.
pub fn traced_points(h: &ContinuousHandle) -> Vec<TracedPoint> {
    let (mean, std) = (h.mean(), h.std_dev());
    let xs = if mean.is_finite() && std.is_finite() {
        [mean - std, mean, mean + std]
    } else {
        [h.quantile(0.25), h.quantile(0.5), h.quantile(0.75)]
    };
    xs.into_iter().map(|x| TracedPoint { x, u: h.cdf(x) }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DistributionSpec;
    use crate::family::Family;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_standard_normal_traces() {
        let handle = DistributionSpec::defaults(Family::Normal).handle().unwrap();
        let traces = traced_points(handle.as_continuous().unwrap());
        let xs: Vec<f64> = traces.iter().map(|t| t.x).collect();
        assert_eq!(xs, vec![-1.0, 0.0, 1.0]);
        assert_abs_diff_eq!(traces[1].u, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(traces[2].u, 0.841_344_746_068_542_9, epsilon = 1e-9);
    }

    #[test]
    fn test_cauchy_like_traces_fall_back_to_quartiles() {
        let handle = DistributionSpec::StudentT { df: 1.0 }.handle().unwrap();
        let traces = traced_points(handle.as_continuous().unwrap());
        assert_abs_diff_eq!(traces[0].x, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(traces[1].x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(traces[2].x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_panels_shape() {
        let handle = DistributionSpec::Gamma { alpha: 2.0, beta: 1.5 }.handle().unwrap();
        let data = pit_with_rng(&handle, 500, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(data.source.samples.len(), 500);
        assert_eq!(data.source.grid.len(), PIT_CURVE_POINTS);
        assert_eq!(data.source.density.len(), PIT_CURVE_POINTS);
        assert_eq!(data.transform.cdf.len(), PIT_CURVE_POINTS);
        assert_eq!(data.uniform.u.len(), 500);
        assert_eq!(data.uniform.histogram.density.len(), PIT_HISTOGRAM_BINS);
        assert!(data.uniform.u.iter().all(|u| (0.0..=1.0).contains(u)));
        let min = data.source.samples.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_eq!(data.source.grid[0], min);
    }

    #[test]
    fn test_discrete_rejected() {
        let handle = DistributionSpec::defaults(Family::Poisson).handle().unwrap();
        let err = pit_with_rng(&handle, 10, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_zero_samples_uses_default() {
        let handle = DistributionSpec::defaults(Family::Exponential).handle().unwrap();
        let data = pit_with_rng(&handle, 0, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(data.uniform.u.len(), DEFAULT_SAMPLE_SIZE);
    }
}
