use pv_core::Result;
use pv_prob::bivariate::{self, BivariateDistribution};
use pv_prob::{CompositionalDensity, SimplexGrid};
use serde::{Deserialize, Serialize};

/// Bivariate density on a rectilinear grid.
///
/// `z[i][j]` is the density at `(x[j], y[i])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Density2dArtifact {
    /// Figure title.
    pub title: String,
    /// Grid axis along x.
    pub x: Vec<f64>,
    /// Grid axis along y.
    pub y: Vec<f64>,
    /// Density rows (one per `y`).
    pub z: Vec<Vec<f64>>,
    /// Mean vector.
    pub mean: [f64; 2],
    /// Covariance matrix (row-major).
    pub covariance: [[f64; 2]; 2],
}

impl Density2dArtifact {
    /// Compute the grid for `dist`. Fails with a shape error unless the mean has
    /// length 2 and the covariance is 2×2.
    pub fn compute<D: BivariateDistribution + ?Sized>(dist: &D, title: impl Into<String>) -> Result<Self> {
        let data = bivariate::calculate_2d(dist)?;
        let mean = dist.mean();
        let cov = dist.covariance();
        Ok(Self {
            title: title.into(),
            x: data.x_axis().to_vec(),
            y: data.y_axis(),
            z: data.z,
            mean: [mean[0], mean[1]],
            covariance: [[cov[(0, 0)], cov[(0, 1)]], [cov[(1, 0)], cov[(1, 1)]]],
        })
    }

    /// Largest density value (0 for an empty grid).
    pub fn z_max(&self) -> f64 {
        self.z.iter().flatten().copied().fold(0.0, f64::max)
    }
}

/// Compositional density on the masked simplex grid.
///
/// `z[i][j]` is the density at `(x[j], y[i], 1 - x[j] - y[i])`, or `null`
/// outside the simplex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplexDensityArtifact {
    /// Figure title.
    pub title: String,
    /// Points per axis.
    pub resolution: usize,
    /// Grid axis along x.
    pub x: Vec<f64>,
    /// Grid axis along y.
    pub y: Vec<f64>,
    /// Masked density rows.
    pub z: Vec<Vec<Option<f64>>>,
    /// Number of cells inside the simplex.
    pub valid_cells: usize,
}

impl SimplexDensityArtifact {
    /// Build a `round(sqrt(num_points))`-per-axis grid and evaluate `density` on it.
    pub fn compute<D: CompositionalDensity + ?Sized>(
        density: &D,
        num_points: usize,
        title: impl Into<String>,
    ) -> Self {
        let grid = SimplexGrid::build(num_points);
        let z = grid.masked_density(density);
        let axis = grid.x.first().cloned().unwrap_or_default();
        Self {
            title: title.into(),
            resolution: grid.resolution,
            x: axis.clone(),
            y: axis,
            z,
            valid_cells: grid.valid_count(),
        }
    }

    /// Largest finite density value (0 when none).
    pub fn z_max(&self) -> f64 {
        self.z.iter().flatten().flatten().copied().fold(0.0, f64::max)
    }
}
