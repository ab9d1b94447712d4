pub mod canvas;
pub mod color;
pub mod config;
pub mod header;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;
pub mod theme;

use std::path::Path;

use config::VizConfig;
use pv_prob::{BivariateDistribution, CompositionalDensity, DistributionHandle, RangePolicy};
use pv_viz::{Density2dArtifact, DistributionPlotArtifact, PitArtifact, SimplexDensityArtifact};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown artifact kind: {0}")]
    UnknownKind(String),
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Core(#[from] pv_core::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render an artifact JSON to SVG string.
pub fn render_svg(artifact_json: &str, kind: &str, config: &VizConfig) -> Result<String> {
    let svg = match kind {
        "distribution" => {
            let art: DistributionPlotArtifact = serde_json::from_str(artifact_json)?;
            plots::distribution::render(&art, config)?
        }
        "pit" => {
            let art: PitArtifact = serde_json::from_str(artifact_json)?;
            plots::pit::render(&art, config)?
        }
        "density2d" | "density_2d" => {
            let art: Density2dArtifact = serde_json::from_str(artifact_json)?;
            plots::density_2d::render(&art, config)?
        }
        "simplex" => {
            let art: SimplexDensityArtifact = serde_json::from_str(artifact_json)?;
            plots::simplex::render(&art, config)?
        }
        other => return Err(RenderError::UnknownKind(other.to_string())),
    };
    Ok(svg)
}

/// Render an artifact JSON to a file. Only `.svg` (or no extension) is supported.
pub fn render_to_file(
    artifact_json: &str,
    kind: &str,
    path: &Path,
    config: &VizConfig,
) -> Result<()> {
    check_extension(path)?;
    let svg = render_svg(artifact_json, kind, config)?;
    output::svg::save_svg(&svg, path)
}

fn check_extension(path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        None | Some("svg") => Ok(()),
        Some(other) => Err(RenderError::UnknownKind(format!("format: {other}"))),
    }
}

/// PDF/PMF and CDF side by side, over the quantile window.
pub fn plot_distribution(handle: &DistributionHandle, title: &str, path: &Path) -> Result<()> {
    plot_distribution_with_config(handle, title, path, &VizConfig::default())
}

pub fn plot_distribution_with_config(
    handle: &DistributionHandle,
    title: &str,
    path: &Path,
    config: &VizConfig,
) -> Result<()> {
    check_extension(path)?;
    let artifact = DistributionPlotArtifact::from_handle(handle, RangePolicy::Quantile, title);
    let svg = plots::distribution::render(&artifact, config)?;
    tracing::debug!(label = handle.label(), path = %path.display(), "distribution plot written");
    output::svg::save_svg(&svg, path)
}

/// Three-panel probability integral transform figure with `n` samples.
pub fn visualize_pit(handle: &DistributionHandle, n: usize, path: &Path) -> Result<()> {
    visualize_pit_with_config(handle, n, path, &VizConfig::default())
}

pub fn visualize_pit_with_config(
    handle: &DistributionHandle,
    n: usize,
    path: &Path,
    config: &VizConfig,
) -> Result<()> {
    check_extension(path)?;
    let artifact = PitArtifact::from(pv_prob::pit::pit(handle, n)?);
    let svg = plots::pit::render(&artifact, config)?;
    tracing::debug!(label = handle.label(), n, path = %path.display(), "PIT figure written");
    output::svg::save_svg(&svg, path)
}

/// Heatmap of a bivariate density over its `mean ± 4σ` grid.
pub fn plot_density_2d<D: BivariateDistribution + ?Sized>(
    dist: &D,
    title: &str,
    path: &Path,
) -> Result<()> {
    plot_density_2d_with_config(dist, title, path, &VizConfig::default())
}

pub fn plot_density_2d_with_config<D: BivariateDistribution + ?Sized>(
    dist: &D,
    title: &str,
    path: &Path,
    config: &VizConfig,
) -> Result<()> {
    check_extension(path)?;
    let artifact = Density2dArtifact::compute(dist, title)?;
    let svg = plots::density_2d::render(&artifact, config)?;
    output::svg::save_svg(&svg, path)
}

/// Masked heatmap of a density on the 3-component simplex.
pub fn plot_simplex_density<D: CompositionalDensity + ?Sized>(
    density: &D,
    num_points: usize,
    title: &str,
    path: &Path,
) -> Result<()> {
    plot_simplex_density_with_config(density, num_points, title, path, &VizConfig::default())
}

pub fn plot_simplex_density_with_config<D: CompositionalDensity + ?Sized>(
    density: &D,
    num_points: usize,
    title: &str,
    path: &Path,
    config: &VizConfig,
) -> Result<()> {
    check_extension(path)?;
    let artifact = SimplexDensityArtifact::compute(density, num_points, title);
    let svg = plots::simplex::render(&artifact, config)?;
    output::svg::save_svg(&svg, path)
}
