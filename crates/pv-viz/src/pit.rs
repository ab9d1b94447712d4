use pv_prob::PitData;
use serde::{Deserialize, Serialize};

/// A point traced through the CDF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitTracePoint {
    /// Abscissa.
    pub x: f64,
    /// `F(x)`.
    pub u: f64,
}

/// Three-panel PIT artifact (parallel arrays).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitArtifact {
    /// Figure title.
    pub title: String,
    /// Number of samples drawn.
    pub n_samples: usize,
    /// Raw samples.
    pub samples: Vec<f64>,
    /// Abscissae shared by the density and CDF curves.
    pub curve_x: Vec<f64>,
    /// True density on `curve_x`.
    pub density_y: Vec<f64>,
    /// CDF on `curve_x`.
    pub cdf_y: Vec<f64>,
    /// Histogram edges of the raw samples.
    pub sample_hist_edges: Vec<f64>,
    /// Histogram density of the raw samples.
    pub sample_hist_density: Vec<f64>,
    /// Points traced through the CDF.
    pub traces: Vec<PitTracePoint>,
    /// Transformed samples `F(x_i)`.
    pub u: Vec<f64>,
    /// Histogram edges of `u` on `[0, 1]`.
    pub u_hist_edges: Vec<f64>,
    /// Histogram density of `u`.
    pub u_hist_density: Vec<f64>,
    /// Reference uniform density: `[[0, 1], [1, 1]]` as (x, y).
    pub reference_x: Vec<f64>,
    /// Reference density values.
    pub reference_y: Vec<f64>,
    /// KS statistic of `u` against Uniform(0, 1).
    pub ks_statistic: f64,
}

impl From<PitData> for PitArtifact {
    fn from(data: PitData) -> Self {
        let PitData { label, source, transform, uniform } = data;
        Self {
            title: format!("Probability Integral Transform: {label}"),
            n_samples: source.samples.len(),
            samples: source.samples,
            curve_x: transform.grid,
            density_y: source.density,
            cdf_y: transform.cdf,
            sample_hist_edges: source.histogram.edges,
            sample_hist_density: source.histogram.density,
            traces: transform.traces.into_iter().map(|t| PitTracePoint { x: t.x, u: t.u }).collect(),
            u: uniform.u,
            u_hist_edges: uniform.histogram.edges,
            u_hist_density: uniform.histogram.density,
            reference_x: uniform.reference_x.to_vec(),
            reference_y: uniform.reference_y.to_vec(),
            ks_statistic: uniform.ks_statistic,
        }
    }
}
