//! Probability building blocks for ProbViz.
//!
//! This crate turns a family tag plus raw parameters into plot-ready data:
//! - [`catalog`]: parameter validation/clamping and handle construction
//! - [`handle`]: continuous/discrete distribution handles over `statrs`
//! - [`range`]: fixed-window and quantile-window x-value selection
//! - [`data`]: density/mass + cumulative evaluation with clipping
//! - [`bivariate`] and [`simplex`]: 2D density grids
//! - [`pit`]: probability integral transform datasets
//! - [`sampling`]: compound discrete samplers (negative-binomial, geometric, geometric-sum)
//!
//! Everything here is stateless; handles are built per request and dropped after use.

pub mod bivariate;
pub mod catalog;
pub mod data;
pub mod family;
pub mod handle;
pub mod math;
pub mod pit;
pub mod range;
pub mod sampling;
pub mod simplex;

pub use bivariate::{
    BivariateDistribution, MultivariateNormal, TwoDimensionalCalculator,
    TwoDimensionalDistributionData,
};
pub use catalog::{DistributionSpec, RawParams};
pub use data::{DistributionData, calculate};
pub use family::Family;
pub use handle::{ContinuousHandle, DiscreteHandle, DistributionHandle};
pub use pit::PitData;
pub use range::{EvalPoints, RangePolicy};
pub use sampling::SampleBatch;
pub use simplex::{CompositionalDensity, Dirichlet, SimplexGrid};
