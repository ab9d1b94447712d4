//! # pv-viz
//!
//! Visualization data artifacts for ProbViz.
//!
//! This crate is intentionally dependency-light and focuses on emitting
//! plot-friendly JSON structures (arrays instead of nested objects). The HTTP
//! layer serves them as-is and the renderer reads them back.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Served `{x, y, title}` curves and sample batches.
pub mod curve;

/// Full density/mass + CDF artifacts for two-panel figures.
pub mod distribution;

/// Probability integral transform artifacts.
pub mod pit;

/// Bivariate and simplex density grids.
pub mod grid;

pub use curve::{AxisValues, CurveArtifact, SamplesArtifact};
pub use distribution::DistributionPlotArtifact;
pub use grid::{Density2dArtifact, SimplexDensityArtifact};
pub use pit::{PitArtifact, PitTracePoint};

/// `Some(v)` for finite `v`; undefined moments serialize as `null`.
pub(crate) fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
