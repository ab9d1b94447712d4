//! ProbViz CLI

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use pv_prob::{Dirichlet, DistributionSpec, MultivariateNormal, RawParams, sampling};
use pv_viz::SamplesArtifact;
use pv_viz_render::config::{VizConfig, resolve_config};

#[derive(Parser)]
#[command(name = "probviz")]
#[command(about = "ProbViz - probability distribution figures and samplers")]
#[command(version = pv_core::VERSION)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    /// Visualization config (YAML). Overrides the theme it names, `probviz` by default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// PDF/PMF and CDF of a catalog distribution
    Plot {
        /// Family tag (normal, gamma, beta, exponential, poisson, binomial, geometric,
        /// negative_binomial, hypergeometric, chi2, t, pareto)
        family: String,

        /// Distribution parameter as `name=value`; repeat for several
        #[arg(short = 'P', long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,

        /// Figure title. Defaults to the family name and its parameters.
        #[arg(long)]
        title: Option<String>,

        /// Output SVG path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Probability integral transform figure for a continuous distribution
    Pit {
        /// Family tag (continuous families only)
        family: String,

        /// Distribution parameter as `name=value`; repeat for several
        #[arg(short = 'P', long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,

        /// Number of samples (0 = 1000)
        #[arg(short = 'n', long, default_value = "1000")]
        samples: usize,

        /// Output SVG path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Joint density of a bivariate normal
    Density2d {
        /// Mean vector `mx,my`
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "0,0")]
        mean: Vec<f64>,

        /// Covariance, row-major `sxx,sxy,syx,syy`
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "1,0,0,1")]
        cov: Vec<f64>,

        /// Figure title
        #[arg(long, default_value = "Bivariate Normal Distribution")]
        title: String,

        /// Output SVG path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Dirichlet density on the 3-component simplex
    Simplex {
        /// Concentrations `a1,a2,a3`
        #[arg(long, value_delimiter = ',', default_value = "2,3,4")]
        alpha: Vec<f64>,

        /// Grid points per axis
        #[arg(long, default_value = "200")]
        points: usize,

        /// Figure title
        #[arg(long)]
        title: Option<String>,

        /// Output SVG path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Draw a batch from a compound discrete sampler (JSON `{samples}`)
    Sample {
        /// Sampler
        #[arg(value_enum)]
        kind: SamplerKind,

        /// Success probability
        #[arg(short, long, default_value = "0.5")]
        p: f64,

        /// Successes (negative-binomial) or summed draws (geometric-sum).
        /// Defaults to 5 and 10 respectively.
        #[arg(short, long, allow_negative_numbers = true)]
        r: Option<i64>,

        /// Number of draws (values <= 0 use 1000)
        #[arg(short, long, default_value = "1000", allow_negative_numbers = true)]
        size: i64,

        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SamplerKind {
    NegativeBinomial,
    Geometric,
    GeometricSum,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Plot { family, params, title, output } => {
            cmd_plot(&family, &params, title.as_deref(), &output, &config)
        }
        Commands::Pit { family, params, samples, output } => {
            cmd_pit(&family, &params, samples, &output, &config)
        }
        Commands::Density2d { mean, cov, title, output } => {
            cmd_density_2d(&mean, &cov, &title, &output, &config)
        }
        Commands::Simplex { alpha, points, title, output } => {
            cmd_simplex(&alpha, points, title.as_deref(), &output, &config)
        }
        Commands::Sample { kind, p, r, size, output } => cmd_sample(kind, p, r, size, output.as_ref()),
        Commands::Version => {
            println!("probviz {}", pv_core::VERSION);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<VizConfig> {
    let Some(path) = path else {
        return Ok(resolve_config(None)?);
    };
    let yaml = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded visualization config");
    Ok(resolve_config(Some(&yaml))?)
}

fn parse_param(s: &str) -> std::result::Result<(String, f64), String> {
    let (name, value) = s.split_once('=').ok_or_else(|| format!("expected name=value, got {s:?}"))?;
    let value: f64 = value.trim().parse().map_err(|e| format!("invalid value for {name}: {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn catalog_spec(family: &str, params: &[(String, f64)]) -> Result<DistributionSpec> {
    let raw: RawParams = params.iter().cloned().collect();
    let spec = DistributionSpec::parse(family, &raw)?;
    tracing::debug!(?spec, "validated parameters");
    Ok(spec)
}

fn cmd_plot(
    family: &str,
    params: &[(String, f64)],
    title: Option<&str>,
    output: &Path,
    config: &VizConfig,
) -> Result<()> {
    let spec = catalog_spec(family, params)?;
    let handle = spec.handle()?;
    let title = title.map_or_else(|| spec.title(), str::to_string);
    pv_viz_render::plot_distribution_with_config(&handle, &title, output, config)?;
    tracing::info!(path = %output.display(), "distribution plot written");
    Ok(())
}

fn cmd_pit(
    family: &str,
    params: &[(String, f64)],
    samples: usize,
    output: &Path,
    config: &VizConfig,
) -> Result<()> {
    let spec = catalog_spec(family, params)?;
    if spec.family().is_discrete() {
        anyhow::bail!("PIT needs a continuous family, got {}", spec.family().tag());
    }
    let handle = spec.handle()?;
    pv_viz_render::visualize_pit_with_config(&handle, samples, output, config)?;
    tracing::info!(path = %output.display(), samples, "PIT figure written");
    Ok(())
}

fn cmd_density_2d(mean: &[f64], cov: &[f64], title: &str, output: &Path, config: &VizConfig) -> Result<()> {
    let rows: Vec<Vec<f64>> = cov.chunks(2).map(<[f64]>::to_vec).collect();
    let mvn = MultivariateNormal::from_rows(mean, &rows)?;
    pv_viz_render::plot_density_2d_with_config(&mvn, title, output, config)?;
    tracing::info!(path = %output.display(), "density plot written");
    Ok(())
}

fn cmd_simplex(
    alpha: &[f64],
    points: usize,
    title: Option<&str>,
    output: &Path,
    config: &VizConfig,
) -> Result<()> {
    let [a1, a2, a3] = alpha else {
        anyhow::bail!("--alpha takes exactly three concentrations, got {}", alpha.len());
    };
    let dirichlet = Dirichlet::new([*a1, *a2, *a3])?;
    let [a1, a2, a3] = dirichlet.alpha();
    let title = title.map_or_else(|| format!("Dirichlet(\u{03B1}={a1}, {a2}, {a3})"), str::to_string);
    pv_viz_render::plot_simplex_density_with_config(&dirichlet, points, &title, output, config)?;
    tracing::info!(path = %output.display(), points, "simplex plot written");
    Ok(())
}

fn cmd_sample(kind: SamplerKind, p: f64, r: Option<i64>, size: i64, output: Option<&PathBuf>) -> Result<()> {
    let batch = match kind {
        SamplerKind::NegativeBinomial => sampling::negative_binomial(r.unwrap_or(5), p, size)?,
        SamplerKind::Geometric => sampling::geometric(p, size)?,
        SamplerKind::GeometricSum => sampling::geometric_sum(p, r.unwrap_or(10), size)?,
    };
    tracing::info!(?kind, n = batch.len(), mean = batch.mean(), "sample batch drawn");
    write_json(output, serde_json::to_value(SamplesArtifact::from(batch))?)
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_parsing() {
        assert_eq!(parse_param("sigma=2.5").unwrap(), ("sigma".to_string(), 2.5));
        assert_eq!(parse_param(" mu = -1 ").unwrap(), ("mu".to_string(), -1.0));
        assert!(parse_param("sigma").is_err());
        assert!(parse_param("sigma=x").is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::parse_from(["probviz", "plot", "normal", "-P", "mu=1", "-o", "out.svg"]);
        assert!(matches!(cli.command, Commands::Plot { ref params, .. } if params.len() == 1));

        let cli = Cli::parse_from(["probviz", "density2d", "--mean", "-1,2", "--cov", "1,0.3,0.3,2", "-o", "d.svg"]);
        match cli.command {
            Commands::Density2d { mean, cov, .. } => {
                assert_eq!(mean, vec![-1.0, 2.0]);
                assert_eq!(cov.len(), 4);
            }
            _ => panic!("expected density2d"),
        }

        let cli = Cli::parse_from(["probviz", "sample", "geometric-sum", "--size", "10"]);
        assert!(matches!(cli.command, Commands::Sample { kind: SamplerKind::GeometricSum, size: 10, .. }));
    }

    #[test]
    fn unknown_family_is_an_error() {
        assert!(catalog_spec("cauchy", &[]).is_err());
    }
}
