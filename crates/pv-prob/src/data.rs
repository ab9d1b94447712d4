//! Density/mass + CDF evaluation over a selected range.

use serde::Serialize;

use crate::handle::DistributionHandle;
use crate::range::{self, EvalPoints, RangePolicy};

/// Upper clip for density/mass values.
pub const PROP_CEILING: f64 = 100.0;

/// Plot-ready arrays for one univariate distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionData {
    /// Increasing, unique abscissae (integer-valued for discrete handles).
    pub x: Vec<f64>,
    /// Density or mass, clipped to `[0, 100]`.
    pub y_prop: Vec<f64>,
    /// Cumulative probability, unclipped.
    pub y_cdf: Vec<f64>,
    /// Mean (`NaN`/`inf` when undefined; serializes as `null`).
    pub mean: f64,
    /// Standard deviation (`NaN`/`inf` when undefined; serializes as `null`).
    pub std: f64,
    /// Whether the handle is continuous.
    pub is_continuous: bool,
}

impl DistributionData {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether there are no points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Abscissae as integers (truncating; meaningful for discrete data).
    pub fn x_integers(&self) -> Vec<i64> {
        self.x.iter().map(|&v| v as i64).collect()
    }
}

fn clip_prop(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, PROP_CEILING) }
}

/// Evaluate `handle` over the range chosen by `policy`.
pub fn calculate(handle: &DistributionHandle, policy: RangePolicy) -> DistributionData {
    let points = range::select(handle, policy);
    evaluate(handle, &points)
}

/// Evaluate `handle` over explicit `points`.
pub fn evaluate(handle: &DistributionHandle, points: &EvalPoints) -> DistributionData {
    let (x, y_prop, y_cdf) = match (handle, points) {
        (DistributionHandle::Discrete(h), EvalPoints::Integers(ks)) => (
            ks.iter().map(|&k| k as f64).collect(),
            ks.iter().map(|&k| clip_prop(h.pmf(k))).collect(),
            ks.iter().map(|&k| h.cdf(k)).collect(),
        ),
        _ => {
            let xs = points.to_f64();
            let y_prop = xs.iter().map(|&x| clip_prop(handle.prop(x))).collect();
            let y_cdf = xs.iter().map(|&x| handle.cdf(x)).collect();
            (xs, y_prop, y_cdf)
        }
    };
    DistributionData {
        x,
        y_prop,
        y_cdf,
        mean: handle.mean(),
        std: handle.std_dev(),
        is_continuous: handle.is_continuous(),
    }
}
