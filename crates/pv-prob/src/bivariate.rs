//! Bivariate density grids.

use nalgebra::{DMatrix, DVector, Dyn};
use pv_core::{Error, Result};
use serde::Serialize;
use statrs::distribution::{self as sd, Continuous, MultivariateNormalError};

use crate::math::linspace;

/// Points per grid axis.
pub const GRID_POINTS: usize = 100;
/// Half-width of each axis, in marginal standard deviations.
pub const GRID_HALF_WIDTH: f64 = 4.0;

/// A joint distribution on the plane.
pub trait BivariateDistribution {
    /// Mean vector (must have length 2).
    fn mean(&self) -> DVector<f64>;

    /// Covariance matrix (must be 2×2).
    fn covariance(&self) -> DMatrix<f64>;

    /// Joint density of every row of an `N×2` batch.
    fn pdf_batch(&self, points: &DMatrix<f64>) -> Vec<f64>;
}

/// Multivariate normal backed by `statrs`.
#[derive(Debug, Clone)]
pub struct MultivariateNormal {
    mean: DVector<f64>,
    cov: DMatrix<f64>,
    inner: sd::MultivariateNormal<Dyn>,
}

impl MultivariateNormal {
    /// Build from a mean vector and a square covariance of matching dimension.
    ///
    /// A dimension mismatch is a `Shape` error, an asymmetric covariance a
    /// `Validation` error, and a covariance that is not positive-definite a
    /// `Computation` error.
    pub fn new(mean: DVector<f64>, cov: DMatrix<f64>) -> Result<Self> {
        let d = mean.len();
        if d == 0 || cov.nrows() != d || cov.ncols() != d {
            return Err(Error::Shape(format!(
                "mean has length {d} but covariance is {}x{}",
                cov.nrows(),
                cov.ncols()
            )));
        }
        if mean.iter().chain(cov.iter()).any(|v| !v.is_finite()) {
            return Err(Error::Validation("mean and covariance must be finite".to_string()));
        }
        let inner = sd::MultivariateNormal::new_from_nalgebra(mean.clone(), cov.clone()).map_err(|e| match e {
            MultivariateNormalError::CholeskyFailed => {
                Error::Computation("covariance is not positive-definite".to_string())
            }
            MultivariateNormalError::DimensionMismatch => Error::Shape(format!("statrs: {e}")),
            other => Error::Validation(format!("statrs: {other}")),
        })?;
        Ok(Self { mean, cov, inner })
    }
    /// Build from plain slices: `mean` of length `d`, `cov` as `d` rows of `d`.
    pub fn from_rows(mean: &[f64], cov: &[Vec<f64>]) -> Result<Self> {
        let d = mean.len();
        if cov.len() != d || cov.iter().any(|row| row.len() != d) {
            return Err(Error::Shape(format!(
                "mean has length {d} but covariance rows are {:?}",
                cov.iter().map(Vec::len).collect::<Vec<_>>()
            )));
        }
        let flat: Vec<f64> = cov.iter().flatten().copied().collect();
        Self::new(DVector::from_column_slice(mean), DMatrix::from_row_slice(d, d, &flat))
    }

    /// Dimension.
    pub fn dim(&self) -> usize {
        self.mean.len()
    }
}

impl BivariateDistribution for MultivariateNormal {
    fn mean(&self) -> DVector<f64> {
        self.mean.clone()
    }

    fn covariance(&self) -> DMatrix<f64> {
        self.cov.clone()
    }

    fn pdf_batch(&self, points: &DMatrix<f64>) -> Vec<f64> {
        if points.ncols() != self.dim() {
            return vec![f64::NAN; points.nrows()];
        }
        points
            .row_iter()
            .map(|row| self.inner.pdf(&row.transpose()))
            .collect()
    }
}

/// Meshgrid output: `x`, `y` and `z` share one shape (rows follow y, columns follow x).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwoDimensionalDistributionData {
    /// X coordinate per cell.
    pub x: Vec<Vec<f64>>,
    /// Y coordinate per cell.
    pub y: Vec<Vec<f64>>,
    /// Joint density per cell (non-negative).
    pub z: Vec<Vec<f64>>,
}

impl TwoDimensionalDistributionData {
    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.z.len(), self.z.first().map_or(0, Vec::len))
    }

    /// Axis values along x (first row of `x`).
    pub fn x_axis(&self) -> &[f64] {
        self.x.first().map_or(&[], Vec::as_slice)
    }

    /// Axis values along y (first column of `y`).
    pub fn y_axis(&self) -> Vec<f64> {
        self.y.iter().filter_map(|row| row.first().copied()).collect()
    }
}

/// Evaluates a [`BivariateDistribution`] on a `100×100` grid spanning
/// `mean ± 4·σ` per axis.
pub struct TwoDimensionalCalculator<'a, D: BivariateDistribution + ?Sized> {
    dist: &'a D,
    mean: [f64; 2],
    std: [f64; 2],
}

impl<'a, D: BivariateDistribution + ?Sized> TwoDimensionalCalculator<'a, D> {
    /// Check the shape contract once: mean length 2, covariance 2×2.
    pub fn new(dist: &'a D) -> Result<Self> {
        let mean = dist.mean();
        let cov = dist.covariance();
        if mean.len() != 2 {
            return Err(Error::Shape(format!("mean must have length 2, got {}", mean.len())));
        }
        if cov.shape() != (2, 2) {
            return Err(Error::Shape(format!(
                "covariance must be 2x2, got {}x{}",
                cov.nrows(),
                cov.ncols()
            )));
        }
        let std = [cov[(0, 0)].max(0.0).sqrt(), cov[(1, 1)].max(0.0).sqrt()];
        Ok(Self { dist, mean: [mean[0], mean[1]], std })
    }

    /// Axis values for dimension `axis` (0 = x, 1 = y).
    pub fn axis(&self, axis: usize) -> Vec<f64> {
        let half = GRID_HALF_WIDTH * self.std[axis];
        linspace(self.mean[axis] - half, self.mean[axis] + half, GRID_POINTS)
    }

    /// Evaluate the joint density over the grid in a single batch.
    pub fn compute(&self) -> Result<TwoDimensionalDistributionData> {
        let xs = self.axis(0);
        let ys = self.axis(1);
        let (rows, cols) = (ys.len(), xs.len());

        let batch = DMatrix::from_fn(rows * cols, 2, |i, j| if j == 0 { xs[i % cols] } else { ys[i / cols] });
        let flat = self.dist.pdf_batch(&batch);
        if flat.len() != rows * cols {
            return Err(Error::Shape(format!(
                "density batch returned {} values for {} points",
                flat.len(),
                rows * cols
            )));
        }
        tracing::debug!(rows, cols, "bivariate grid evaluated");

        let z = flat
            .chunks(cols)
            .map(|row| row.iter().map(|&v| if v.is_finite() { v.max(0.0) } else { 0.0 }).collect())
            .collect();
        Ok(TwoDimensionalDistributionData {
            x: (0..rows).map(|_| xs.clone()).collect(),
            y: ys.iter().map(|&y| vec![y; cols]).collect(),
            z,
        })
    }
}

/// Validate `dist` and compute its density grid.
pub fn calculate_2d<D: BivariateDistribution + ?Sized>(dist: &D) -> Result<TwoDimensionalDistributionData> {
    TwoDimensionalCalculator::new(dist)?.compute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn standard() -> MultivariateNormal {
        MultivariateNormal::from_rows(&[0.0, 0.0], &[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap()
    }

    #[test]
    fn test_pdf_at_mean() {
        let mvn = standard();
        let pts = DMatrix::from_row_slice(1, 2, &[0.0, 0.0]);
        assert_relative_eq!(mvn.pdf_batch(&pts)[0], 1.0 / (2.0 * std::f64::consts::PI), max_relative = 1e-12);
    }

    #[test]
    fn test_correlated_pdf() {
        // ρ = 0.5, unit variances: p(1, 1) = exp(-1/1.5) / (2π sqrt(0.75))
        let mvn = MultivariateNormal::from_rows(&[0.0, 0.0], &[vec![1.0, 0.5], vec![0.5, 1.0]]).unwrap();
        let pts = DMatrix::from_row_slice(1, 2, &[1.0, 1.0]);
        let expected = (-1.0_f64 / 1.5).exp() / (2.0 * std::f64::consts::PI * 0.75_f64.sqrt());
        assert_relative_eq!(mvn.pdf_batch(&pts)[0], expected, max_relative = 1e-12);
    }

    #[test]
    fn test_not_positive_definite() {
        let err = MultivariateNormal::from_rows(&[0.0, 0.0], &[vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap_err();
        assert!(matches!(err, Error::Computation(_)));
    }

    #[test]
    fn test_asymmetric_covariance() {
        let err = MultivariateNormal::from_rows(&[0.0, 0.0], &[vec![1.0, 0.2], vec![0.1, 1.0]]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_batch_column_mismatch_is_nan() {
        let pts = DMatrix::from_row_slice(2, 3, &[0.0; 6]);
        assert!(standard().pdf_batch(&pts).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_shape_mismatch() {
        let err = MultivariateNormal::from_rows(&[0.0, 0.0], &[vec![1.0, 0.0]]).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }

    #[test]
    fn test_calculator_rejects_three_dims() {
        let mvn = MultivariateNormal::from_rows(
            &[0.0, 0.0, 0.0],
            &[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]],
        )
        .unwrap();
        assert!(matches!(TwoDimensionalCalculator::new(&mvn), Err(Error::Shape(_))));
    }

    #[test]
    fn test_grid_shape_and_span() {
        let mvn = MultivariateNormal::from_rows(&[1.0, -2.0], &[vec![4.0, 0.0], vec![0.0, 0.25]]).unwrap();
        let data = calculate_2d(&mvn).unwrap();
        assert_eq!(data.shape(), (GRID_POINTS, GRID_POINTS));
        assert_eq!(data.x.len(), GRID_POINTS);
        assert_eq!(data.y[0].len(), GRID_POINTS);
        assert_abs_diff_eq!(data.x_axis()[0], -7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(data.x_axis()[GRID_POINTS - 1], 9.0, epsilon = 1e-12);
        let ys = data.y_axis();
        assert_abs_diff_eq!(ys[0], -4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ys[GRID_POINTS - 1], 0.0, epsilon = 1e-12);
        assert!(data.z.iter().flatten().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_grid_integrates_to_one() {
        let data = calculate_2d(&standard()).unwrap();
        let dx = data.x_axis()[1] - data.x_axis()[0];
        let ys = data.y_axis();
        let dy = ys[1] - ys[0];
        let mass: f64 = data.z.iter().flatten().sum::<f64>() * dx * dy;
        assert_abs_diff_eq!(mass, 1.0, epsilon = 1e-2);
    }
}
