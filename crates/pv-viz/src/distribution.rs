use pv_prob::{DistributionData, DistributionHandle, RangePolicy, data};
use serde::{Deserialize, Serialize};

use crate::finite;

/// Density/mass and CDF on shared abscissae, plus moments, for a two-panel figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionPlotArtifact {
    /// Figure title.
    pub title: String,
    /// Whether `y_prop` is a density (line) or a mass (stems).
    pub is_continuous: bool,
    /// Abscissae.
    pub x: Vec<f64>,
    /// Density or mass aligned with `x`.
    pub y_prop: Vec<f64>,
    /// CDF aligned with `x`.
    pub y_cdf: Vec<f64>,
    /// Mean, `None` when undefined.
    pub mean: Option<f64>,
    /// Standard deviation, `None` when undefined or infinite.
    pub std: Option<f64>,
}

impl DistributionPlotArtifact {
    /// Wrap computed data under `title`.
    pub fn from_data(data: DistributionData, title: impl Into<String>) -> Self {
        let DistributionData { x, y_prop, y_cdf, mean, std, is_continuous } = data;
        Self { title: title.into(), is_continuous, x, y_prop, y_cdf, mean: finite(mean), std: finite(std) }
    }

    /// Evaluate `handle` under `policy`.
    pub fn from_handle(handle: &DistributionHandle, policy: RangePolicy, title: impl Into<String>) -> Self {
        Self::from_data(data::calculate(handle, policy), title)
    }

    /// `[mean - std, mean + std]` when both moments are defined.
    pub fn std_band(&self) -> Option<(f64, f64)> {
        Some((self.mean? - self.std?, self.mean? + self.std?))
    }
}
