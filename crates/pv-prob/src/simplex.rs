//! Masked grids over the 3-component simplex.

use nalgebra::{DVector, Dyn};
use pv_core::{Error, Result};
use statrs::distribution::{self as sd, Continuous};

use crate::catalog::POSITIVE_FALLBACK;
use crate::math::linspace;

/// Tolerance when testing `z = 1 - x - y >= 0`.
pub const SIMPLEX_TOLERANCE: f64 = 1e-12;

/// A density on `{(x, y, z) : x, y, z >= 0, x + y + z = 1}`.
pub trait CompositionalDensity {
    /// Density at a point of the simplex.
    fn density(&self, point: [f64; 3]) -> f64;
}

/// A uniform grid over `[0,1]²` with the simplex cells marked valid.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexGrid {
    /// Points per axis.
    pub resolution: usize,
    /// Grid x per cell (`resolution × resolution`; rows follow y).
    pub x: Vec<Vec<f64>>,
    /// Grid y per cell.
    pub y: Vec<Vec<f64>>,
    /// `true` where `1 - x - y >= 0` (within tolerance).
    pub mask: Vec<Vec<bool>>,
    /// Valid `(x, y, z)` triples in row-major order.
    pub points: Vec<[f64; 3]>,
}

impl SimplexGrid {
    /// Build a grid with `round(sqrt(num_points))` points per axis (at least 2).
    pub fn build(num_points: usize) -> Self {
        let resolution = ((num_points as f64).sqrt().round() as usize).max(2);
        let axis = linspace(0.0, 1.0, resolution);

        let mut x = Vec::with_capacity(resolution);
        let mut y = Vec::with_capacity(resolution);
        let mut mask = Vec::with_capacity(resolution);
        let mut points = Vec::new();
        for &yv in &axis {
            let mut mask_row = Vec::with_capacity(resolution);
            for &xv in &axis {
                let z = 1.0 - xv - yv;
                let valid = z >= -SIMPLEX_TOLERANCE;
                if valid {
                    points.push([xv, yv, z.max(0.0)]);
                }
                mask_row.push(valid);
            }
            x.push(axis.clone());
            y.push(vec![yv; resolution]);
            mask.push(mask_row);
        }
        tracing::debug!(resolution, valid = points.len(), "simplex grid built");
        Self { resolution, x, y, mask, points }
    }

    /// Number of valid cells.
    pub fn valid_count(&self) -> usize {
        self.points.len()
    }

    /// Evaluate `density` on valid cells; invalid cells and non-finite values are `None`.
    pub fn masked_density<D: CompositionalDensity + ?Sized>(&self, density: &D) -> Vec<Vec<Option<f64>>> {
        let mut valid = self.points.iter();
        self.mask
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&ok| {
                        if !ok {
                            return None;
                        }
                        let p = valid.next()?;
                        let v = density.density(*p);
                        v.is_finite().then_some(v)
                    })
                    .collect()
            })
            .collect()
    }
}

/// Dirichlet on the 3-simplex, backed by `statrs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dirichlet {
    alpha: [f64; 3],
    inner: sd::Dirichlet<Dyn>,
}

impl Dirichlet {
    /// Concentrations that are not finite and positive are clamped to 0.1.
    pub fn new(alpha: [f64; 3]) -> Result<Self> {
        let alpha = alpha.map(|a| if a.is_finite() && a > 0.0 { a } else { POSITIVE_FALLBACK });
        let inner = sd::Dirichlet::new(alpha.to_vec()).map_err(|e| Error::Validation(format!("statrs: {e}")))?;
        Ok(Self { alpha, inner })
    }

    /// Concentrations after clamping.
    pub fn alpha(&self) -> [f64; 3] {
        self.alpha
    }
}

/// Largest `|x + y + z - 1|` accepted as a simplex point.
const SUM_TOLERANCE: f64 = 1e-6;
/// Weight of the centroid when pulling a boundary point into the open simplex.
const BOUNDARY_NUDGE: f64 = 1e-9;

impl CompositionalDensity for Dirichlet {
    /// Boundary points follow the limit of the density: a zero coordinate with
    /// `α > 1` gives 0, with `α < 1` gives `+inf`. Zero coordinates with `α = 1`
    /// do not enter the density, so the point is moved just inside the simplex.
    fn density(&self, point: [f64; 3]) -> f64 {
        if point.iter().any(|v| !v.is_finite()) || (point.iter().sum::<f64>() - 1.0).abs() > SUM_TOLERANCE {
            return f64::NAN;
        }
        for (&a, &v) in self.alpha.iter().zip(point.iter()) {
            if v <= 0.0 && a != 1.0 {
                return if a > 1.0 { 0.0 } else { f64::INFINITY };
            }
        }
        let interior = if point.iter().all(|&v| v > 0.0 && v < 1.0) {
            point
        } else {
            point.map(|v| (v.max(0.0) + BOUNDARY_NUDGE) / (1.0 + 3.0 * BOUNDARY_NUDGE))
        };
        self.inner.pdf(&DVector::from_row_slice(&interior))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_grid_mask_is_lower_triangle() {
        let grid = SimplexGrid::build(100);
        assert_eq!(grid.resolution, 10);
        // row i keeps columns 0..=(n-1-i)
        assert_eq!(grid.valid_count(), 55);
        for (i, row) in grid.mask.iter().enumerate() {
            assert_eq!(row.iter().filter(|&&m| m).count(), 10 - i);
        }
        assert!(grid.points.iter().all(|p| p[2] >= 0.0));
        assert!(grid.points.iter().all(|p| (p[0] + p[1] + p[2] - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_minimum_resolution() {
        let grid = SimplexGrid::build(0);
        assert_eq!(grid.resolution, 2);
        assert_eq!(grid.valid_count(), 3);
    }

    #[test]
    fn test_uniform_dirichlet() {
        // Dirichlet(1,1,1) is uniform with density Γ(3) = 2
        let d = Dirichlet::new([1.0, 1.0, 1.0]).unwrap();
        assert_abs_diff_eq!(d.density([0.2, 0.3, 0.5]), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.density([0.0, 0.0, 1.0]), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dirichlet_clamp() {
        assert_eq!(Dirichlet::new([0.0, -1.0, f64::NAN]).unwrap().alpha(), [0.1, 0.1, 0.1]);
    }

    #[test]
    fn test_masked_density_boundary() {
        let grid = SimplexGrid::build(25);
        let dense = grid.masked_density(&Dirichlet::new([0.5, 2.0, 2.0]).unwrap());
        // (0, 0) corner: x = 0 with α₁ < 1 is infinite
        assert_eq!(dense[0][0], None);
        // outside the simplex
        assert_eq!(dense[4][4], None);
        // interior cell
        assert!(dense[1][1].is_some_and(|v| v > 0.0));
    }

    #[test]
    fn test_dirichlet_interior_density() {
        // Dirichlet(2,3,4) at (0.2,0.3,0.5): Γ(9)/(Γ(2)Γ(3)Γ(4)) · 0.2 · 0.3² · 0.5³ = 3360 · 0.00225
        let d = Dirichlet::new([2.0, 3.0, 4.0]).unwrap();
        assert_abs_diff_eq!(d.density([0.2, 0.3, 0.5]), 7.56, epsilon = 1e-9);
    }

    #[test]
    fn test_dirichlet_off_simplex_is_nan() {
        let d = Dirichlet::new([2.0, 2.0, 2.0]).unwrap();
        assert!(d.density([0.5, 0.5, 0.5]).is_nan());
        assert!(d.density([f64::NAN, 0.5, 0.5]).is_nan());
        assert_eq!(d.density([0.0, 0.5, 0.5]), 0.0);
    }
}
