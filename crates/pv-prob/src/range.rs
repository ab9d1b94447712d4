//! Domain-range selection.
//!
//! Two policies coexist. [`RangePolicy::Fixed`] uses a hand-tuned window per
//! family, derived from the validated parameters, so heavy tails never produce
//! degenerate ranges. [`RangePolicy::Quantile`] spans the
//! `[q(0.001), q(0.999)]` interval of any handle with an invertible CDF.
//!
//! Dense windows are kept finite and wide enough that every point is distinct;
//! integer windows hold at most [`MAX_INTEGER_POINTS`] values.

use serde::{Deserialize, Serialize};

use crate::catalog::DistributionSpec;
use crate::handle::DistributionHandle;
use crate::math::linspace;

/// Points in a fixed continuous window.
pub const FIXED_POINTS: usize = 200;
/// Points in a quantile continuous window.
pub const QUANTILE_POINTS: usize = 1000;
/// Lower tail probability of the quantile window.
pub const QUANTILE_LOWER: f64 = 0.001;
/// Upper tail probability of the quantile window.
pub const QUANTILE_UPPER: f64 = 0.999;
/// Longest integer window.
pub const MAX_INTEGER_POINTS: usize = 10_001;
/// Largest magnitude of a dense window end.
const WINDOW_LIMIT: f64 = 1e300;

/// How the x-values are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Family-specific deterministic window (served endpoints).
    #[default]
    Fixed,
    /// `[q(0.001), q(0.999)]` for any distribution (exploratory path).
    Quantile,
}

/// Ordered abscissae: dense reals or consecutive integers.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalPoints {
    /// Evenly spaced reals.
    Dense(Vec<f64>),
    /// Consecutive integers.
    Integers(Vec<i64>),
}

impl EvalPoints {
    /// Number of points.
    pub fn len(&self) -> usize {
        match self {
            EvalPoints::Dense(v) => v.len(),
            EvalPoints::Integers(v) => v.len(),
        }
    }

    /// Whether there are no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The points as `f64`.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            EvalPoints::Dense(v) => v.clone(),
            EvalPoints::Integers(v) => v.iter().map(|&k| k as f64).collect(),
        }
    }
}

/// Select x-values for `handle` under `policy`.
///
/// The fixed policy needs a catalog spec; handles without one fall back to the
/// quantile window.
pub fn select(handle: &DistributionHandle, policy: RangePolicy) -> EvalPoints {
    let points = match (policy, handle.spec()) {
        (RangePolicy::Fixed, Some(spec)) => fixed_window(spec),
        (RangePolicy::Fixed, None) => {
            tracing::debug!(label = handle.label(), "no catalog spec, using quantile window");
            quantile_window(handle)
        }
        (RangePolicy::Quantile, _) => quantile_window(handle),
    };
    tracing::debug!(label = handle.label(), ?policy, n = points.len(), "range selected");
    points
}

/// The family's hand-tuned window.
pub fn fixed_window(spec: &DistributionSpec) -> EvalPoints {
    let dense = |lo: f64, hi: f64| dense_window(lo, hi, FIXED_POINTS);
    match *spec {
        DistributionSpec::Normal { mu, sigma } => dense(mu - 4.0 * sigma, mu + 4.0 * sigma),
        DistributionSpec::Gamma { alpha, beta } => dense(0.0, 3.0 * alpha * beta),
        DistributionSpec::Beta { .. } => dense(0.0, 1.0),
        DistributionSpec::Exponential { lambda } => dense(0.0, 10.0 / lambda),
        DistributionSpec::ChiSquared { df } => dense(0.0, 4.0 * df),
        DistributionSpec::StudentT { .. } => dense(-5.0, 5.0),
        DistributionSpec::Pareto { .. } => dense(1.0, 10.0),
        DistributionSpec::Poisson { lambda } => {
            integer_window(0, (3.0 * lambda).floor() as i64)
        }
        DistributionSpec::Binomial { n, .. } => {
            integer_window(0, i64::try_from(n).unwrap_or(i64::MAX))
        }
        DistributionSpec::Geometric { .. } => integer_window(1, 20),
        DistributionSpec::NegativeBinomial { .. } => integer_window(0, 30),
        DistributionSpec::Hypergeometric { population, successes, draws } => {
            let lo = (draws + successes).saturating_sub(population);
            let hi = successes.min(draws);
            integer_window(lo as i64, hi as i64)
        }
    }
}

/// `[q(0.001), q(0.999)]`: 1000 dense points, or every integer between the
/// floored lower and ceiled upper quantile.
pub fn quantile_window(handle: &DistributionHandle) -> EvalPoints {
    let lo = handle.quantile(QUANTILE_LOWER);
    let hi = handle.quantile(QUANTILE_UPPER);
    if handle.is_continuous() {
        dense_window(lo, hi, QUANTILE_POINTS)
    } else {
        integer_window(lo.floor() as i64, hi.ceil() as i64)
    }
}

/// `n` evenly spaced, strictly increasing, finite points over `[lo, hi]`.
///
/// Ends are clamped to `±1e300`. A span too narrow for `n` distinct floats at
/// that magnitude is widened symmetrically.
fn dense_window(lo: f64, hi: f64, n: usize) -> EvalPoints {
    let clamp = |v: f64, fallback: f64| if v.is_nan() { fallback } else { v.clamp(-WINDOW_LIMIT, WINDOW_LIMIT) };
    let mut lo = clamp(lo, -WINDOW_LIMIT);
    let mut hi = clamp(hi, WINDOW_LIMIT);
    if hi < lo {
        std::mem::swap(&mut lo, &mut hi);
    }
    let magnitude = lo.abs().max(hi.abs());
    let min_span = (4.0 * f64::EPSILON * magnitude * n as f64).max(f64::MIN_POSITIVE * n as f64 * 4.0);
    if hi - lo < min_span {
        let mid = 0.5 * lo + 0.5 * hi;
        let half = 0.5 * min_span;
        tracing::debug!(lo, hi, widened = min_span, "degenerate window widened");
        lo = mid - half;
        hi = mid + half;
    }
    EvalPoints::Dense(linspace(lo, hi, n))
}

/// Consecutive integers in `[lo, hi]`, truncated to [`MAX_INTEGER_POINTS`].
fn integer_window(lo: i64, hi: i64) -> EvalPoints {
    if hi < lo {
        return EvalPoints::Integers(Vec::new());
    }
    let last = lo.saturating_add(MAX_INTEGER_POINTS as i64 - 1);
    if hi > last {
        tracing::debug!(lo, hi, truncated = last, "integer window truncated");
    }
    EvalPoints::Integers((lo..=hi.min(last)).collect())
}
