//! Distribution catalog: raw parameters → validated spec → handle.
//!
//! Validation never fails. Every out-of-domain parameter is replaced by a
//! fixed fallback so that every request for a known family yields a chart:
//!
//! | family | invalid | clamp |
//! |---|---|---|
//! | normal | σ ≤ 0 | σ = 0.1 |
//! | gamma | α ≤ 0, β ≤ 0 | 0.1 |
//! | beta | a ≤ 0, b ≤ 0 | 0.1 |
//! | exponential | λ ≤ 0 | 0.1 |
//! | poisson | λ ≤ 0, λ > 3000 | 0.1, 3000 |
//! | binomial | N ≤ 0, N > 10000, p ∉ [0,1] | N = 1, N = 10000, p = 0.5 |
//! | geometric | p ∉ (0,1), p < 1e-12 | 0.5, 1e-12 |
//! | negative binomial | r ≤ 0, p ∉ (0,1) | r = 1, p = 0.5 |
//! | hypergeometric | M ≤ 0, M > 10000, n ∉ [0,M], N ∉ [0,M] | M = 1, M = 10000, n = M/2, N = M/2 |
//! | chi2, t | df ≤ 0 | 0.1 |
//! | pareto | b ≤ 0 | 0.1 |
//!
//! The upper ceilings keep the enumerated integer window of a discrete chart
//! within [`MAX_COUNT`] + 1 points.

use std::collections::BTreeMap;

use pv_core::{Error, Result};
use rand_distr as rd;
use serde::Serialize;
use statrs::distribution::{self as sd, Discrete as _, DiscreteCDF as _};
use statrs::statistics::{DiscreteDistribution, Distribution as Moments, Max, Min};

use crate::family::Family;
use crate::handle::{ContinuousHandle, CountDraw, DiscreteHandle, DistributionHandle, Draw, RealDraw};
use crate::sampling::NegativeBinomialDraw;

/// Raw `name → value` parameters, as parsed from a query string.
pub type RawParams = BTreeMap<String, f64>;

/// Fallback for positive real parameters.
pub const POSITIVE_FALLBACK: f64 = 0.1;
/// Fallback for probabilities.
pub const PROBABILITY_FALLBACK: f64 = 0.5;
/// Smallest geometric success probability; below it `1 - p` rounds to 1.
pub const MIN_GEOMETRIC_P: f64 = 1e-12;
/// Ceiling for binomial trials and the hypergeometric population.
pub const MAX_COUNT: u64 = 10_000;
/// Ceiling for the Poisson mean; its fixed window spans `[0, 3λ]`.
pub const MAX_POISSON_LAMBDA: f64 = 3_000.0;

/// A validated parameter set for one family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum DistributionSpec {
    /// Normal with mean `mu` and standard deviation `sigma`.
    Normal { mu: f64, sigma: f64 },
    /// Gamma with shape `alpha` and scale `beta`.
    Gamma { alpha: f64, beta: f64 },
    /// Beta with shapes `a`, `b`.
    Beta { a: f64, b: f64 },
    /// Exponential with rate `lambda`.
    Exponential { lambda: f64 },
    /// Poisson with mean `lambda`.
    Poisson { lambda: f64 },
    /// Binomial with `n` trials and success probability `p`.
    Binomial { n: u64, p: f64 },
    /// Geometric (trials to first success) with success probability `p`.
    Geometric { p: f64 },
    /// Negative binomial: failures before the `r`-th success.
    NegativeBinomial { r: u64, p: f64 },
    /// Hypergeometric: `draws` from a `population` holding `successes`.
    Hypergeometric { population: u64, successes: u64, draws: u64 },
    /// Chi-squared with `df` degrees of freedom.
    #[serde(rename = "chi2")]
    ChiSquared { df: f64 },
    /// Standard Student t with `df` degrees of freedom.
    #[serde(rename = "t")]
    StudentT { df: f64 },
    /// Pareto with scale 1 and shape `b`.
    Pareto { b: f64 },
}

fn positive(family: Family, name: &str, v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        tracing::debug!(%family, param = name, value = v, clamped = POSITIVE_FALLBACK, "parameter clamped");
        POSITIVE_FALLBACK
    }
}

fn at_most<T: PartialOrd + Copy + std::fmt::Debug>(family: Family, name: &str, v: T, ceiling: T) -> T {
    if v > ceiling {
        tracing::debug!(%family, param = name, value = ?v, clamped = ?ceiling, "parameter clamped");
        ceiling
    } else {
        v
    }
}

fn finite_or(family: Family, name: &str, v: f64, default: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        tracing::debug!(%family, param = name, value = v, clamped = default, "parameter clamped");
        default
    }
}

/// Probability in the closed interval `[0, 1]`.
pub(crate) fn closed_probability(p: f64) -> f64 {
    if (0.0..=1.0).contains(&p) { p } else { PROBABILITY_FALLBACK }
}

/// Probability in the open interval `(0, 1)`.
pub(crate) fn open_probability(p: f64) -> f64 {
    if p > 0.0 && p < 1.0 { p } else { PROBABILITY_FALLBACK }
}

/// Open-interval probability floored at [`MIN_GEOMETRIC_P`].
pub(crate) fn geometric_probability(p: f64) -> f64 {
    open_probability(p).max(MIN_GEOMETRIC_P)
}

fn logged_probability(family: Family, name: &str, p: f64, f: fn(f64) -> f64) -> f64 {
    let out = f(p);
    if out != p {
        tracing::debug!(%family, param = name, value = p, clamped = out, "parameter clamped");
    }
    out
}

/// Truncate toward zero; non-finite and negative values map to 0.
fn truncated(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 { v.trunc() as u64 } else { 0 }
}

/// Truncate toward zero; negative and non-finite values become an out-of-range
/// sentinel so the validator replaces them.
fn truncated_count(v: f64) -> u64 {
    let t = v.trunc();
    if t.is_finite() && t >= 0.0 { t as u64 } else { u64::MAX }
}

fn lookup(raw: &RawParams, keys: &[&str], default: f64) -> f64 {
    keys.iter().find_map(|k| raw.get(*k).copied()).unwrap_or(default)
}

impl DistributionSpec {
    /// The family this spec belongs to.
    pub fn family(&self) -> Family {
        match self {
            DistributionSpec::Normal { .. } => Family::Normal,
            DistributionSpec::Gamma { .. } => Family::Gamma,
            DistributionSpec::Beta { .. } => Family::Beta,
            DistributionSpec::Exponential { .. } => Family::Exponential,
            DistributionSpec::Poisson { .. } => Family::Poisson,
            DistributionSpec::Binomial { .. } => Family::Binomial,
            DistributionSpec::Geometric { .. } => Family::Geometric,
            DistributionSpec::NegativeBinomial { .. } => Family::NegativeBinomial,
            DistributionSpec::Hypergeometric { .. } => Family::Hypergeometric,
            DistributionSpec::ChiSquared { .. } => Family::ChiSquared,
            DistributionSpec::StudentT { .. } => Family::StudentT,
            DistributionSpec::Pareto { .. } => Family::Pareto,
        }
    }

    /// Family defaults (already valid).
    pub fn defaults(family: Family) -> Self {
        Self::from_raw(family, &RawParams::new())
    }

    /// Build a validated spec from raw parameters.
    ///
    /// Missing keys take the family default; integer parameters are truncated
    /// toward zero; the result is passed through [`DistributionSpec::validated`].
    pub fn from_raw(family: Family, raw: &RawParams) -> Self {
        let spec = match family {
            Family::Normal => DistributionSpec::Normal {
                mu: lookup(raw, &["mu"], 0.0),
                sigma: lookup(raw, &["sigma"], 1.0),
            },
            Family::Gamma => DistributionSpec::Gamma {
                alpha: lookup(raw, &["alpha"], 1.0),
                beta: lookup(raw, &["beta"], 1.0),
            },
            Family::Beta => {
                DistributionSpec::Beta { a: lookup(raw, &["a"], 1.0), b: lookup(raw, &["b"], 1.0) }
            }
            Family::Exponential => {
                DistributionSpec::Exponential { lambda: lookup(raw, &["lambda_param", "lambda"], 1.0) }
            }
            Family::Poisson => {
                DistributionSpec::Poisson { lambda: lookup(raw, &["lambda_param", "lambda"], 3.0) }
            }
            Family::Binomial => DistributionSpec::Binomial {
                n: truncated(lookup(raw, &["n", "N"], 10.0)),
                p: lookup(raw, &["p"], 0.5),
            },
            Family::Geometric => DistributionSpec::Geometric { p: lookup(raw, &["p"], 0.5) },
            Family::NegativeBinomial => DistributionSpec::NegativeBinomial {
                r: truncated(lookup(raw, &["r"], 5.0)),
                p: lookup(raw, &["p"], 0.5),
            },
            Family::Hypergeometric => DistributionSpec::Hypergeometric {
                population: truncated(lookup(raw, &["M"], 20.0)),
                successes: truncated_count(lookup(raw, &["n"], 7.0)),
                draws: truncated_count(lookup(raw, &["N"], 12.0)),
            },
            Family::ChiSquared => DistributionSpec::ChiSquared { df: lookup(raw, &["df"], 3.0) },
            Family::StudentT => DistributionSpec::StudentT { df: lookup(raw, &["df"], 10.0) },
            Family::Pareto => DistributionSpec::Pareto { b: lookup(raw, &["b"], 1.0) },
        };
        spec.validated()
    }

    /// Parse a family tag and build the validated spec.
    ///
    /// Fails only for an unknown tag.
    pub fn parse(tag: &str, raw: &RawParams) -> Result<Self> {
        Ok(Self::from_raw(tag.parse()?, raw))
    }

    /// Apply the clamp table. Idempotent.
    pub fn validated(self) -> Self {
        let family = self.family();
        match self {
            DistributionSpec::Normal { mu, sigma } => DistributionSpec::Normal {
                mu: finite_or(family, "mu", mu, 0.0),
                sigma: positive(family, "sigma", sigma),
            },
            DistributionSpec::Gamma { alpha, beta } => DistributionSpec::Gamma {
                alpha: positive(family, "alpha", alpha),
                beta: positive(family, "beta", beta),
            },
            DistributionSpec::Beta { a, b } => {
                DistributionSpec::Beta { a: positive(family, "a", a), b: positive(family, "b", b) }
            }
            DistributionSpec::Exponential { lambda } => {
                DistributionSpec::Exponential { lambda: positive(family, "lambda", lambda) }
            }
            DistributionSpec::Poisson { lambda } => DistributionSpec::Poisson {
                lambda: at_most(family, "lambda", positive(family, "lambda", lambda), MAX_POISSON_LAMBDA),
            },
            DistributionSpec::Binomial { n, p } => DistributionSpec::Binomial {
                n: if n == 0 {
                    tracing::debug!(%family, param = "n", clamped = 1, "parameter clamped");
                    1
                } else {
                    at_most(family, "n", n, MAX_COUNT)
                },
                p: logged_probability(family, "p", p, closed_probability),
            },
            DistributionSpec::Geometric { p } => {
                DistributionSpec::Geometric { p: logged_probability(family, "p", p, geometric_probability) }
            }
            DistributionSpec::NegativeBinomial { r, p } => DistributionSpec::NegativeBinomial {
                r: if r == 0 {
                    tracing::debug!(%family, param = "r", clamped = 1, "parameter clamped");
                    1
                } else {
                    r
                },
                p: logged_probability(family, "p", p, open_probability),
            },
            DistributionSpec::Hypergeometric { population, successes, draws } => {
                let population = at_most(family, "M", population.max(1), MAX_COUNT);
                let half = population / 2;
                let within = |name: &str, v: u64| {
                    if v <= population {
                        v
                    } else {
                        tracing::debug!(%family, param = name, value = v, clamped = half, "parameter clamped");
                        half
                    }
                };
                DistributionSpec::Hypergeometric {
                    population,
                    successes: within("n", successes),
                    draws: within("N", draws),
                }
            }
            DistributionSpec::ChiSquared { df } => {
                DistributionSpec::ChiSquared { df: positive(family, "df", df) }
            }
            DistributionSpec::StudentT { df } => {
                DistributionSpec::StudentT { df: positive(family, "df", df) }
            }
            DistributionSpec::Pareto { b } => DistributionSpec::Pareto { b: positive(family, "b", b) },
        }
    }

    /// Plot title, e.g. `Normal Distribution (μ=0, σ=1)`.
    pub fn title(&self) -> String {
        let name = self.family().display_name();
        let params = match *self {
            DistributionSpec::Normal { mu, sigma } => format!("μ={mu}, σ={sigma}"),
            DistributionSpec::Gamma { alpha, beta } => format!("α={alpha}, β={beta}"),
            DistributionSpec::Beta { a, b } => format!("a={a}, b={b}"),
            DistributionSpec::Exponential { lambda } | DistributionSpec::Poisson { lambda } => {
                format!("λ={lambda}")
            }
            DistributionSpec::Binomial { n, p } => format!("n={n}, p={p}"),
            DistributionSpec::Geometric { p } => format!("p={p}"),
            DistributionSpec::NegativeBinomial { r, p } => format!("r={r}, p={p}"),
            DistributionSpec::Hypergeometric { population, successes, draws } => {
                format!("M={population}, n={successes}, N={draws}")
            }
            DistributionSpec::ChiSquared { df } | DistributionSpec::StudentT { df } => {
                format!("df={df}")
            }
            DistributionSpec::Pareto { b } => format!("b={b}"),
        };
        format!("{name} Distribution ({params})")
    }

    /// Build a fresh handle bound to the (re-validated) parameters.
    ///
    /// A sampler the `rand_distr` side cannot build is left out; the handle then
    /// samples through its quantile.
    pub fn handle(&self) -> Result<DistributionHandle> {
        let spec = self.validated();
        let handle = match spec {
            DistributionSpec::Normal { mu, sigma } => continuous(
                spec,
                sd::Normal::new(mu, sigma).map_err(stats_err)?,
                rd::Normal::new(mu, sigma),
            ),
            DistributionSpec::Gamma { alpha, beta } => continuous(
                spec,
                sd::Gamma::new(alpha, 1.0 / beta).map_err(stats_err)?,
                rd::Gamma::new(alpha, beta),
            ),
            DistributionSpec::Beta { a, b } => {
                continuous(spec, sd::Beta::new(a, b).map_err(stats_err)?, rd::Beta::new(a, b))
            }
            DistributionSpec::Exponential { lambda } => {
                continuous(spec, sd::Exp::new(lambda).map_err(stats_err)?, rd::Exp::new(lambda))
            }
            DistributionSpec::ChiSquared { df } => {
                continuous(spec, sd::ChiSquared::new(df).map_err(stats_err)?, rd::ChiSquared::new(df))
            }
            DistributionSpec::StudentT { df } => continuous(
                spec,
                sd::StudentsT::new(0.0, 1.0, df).map_err(stats_err)?,
                rd::StudentT::new(df),
            ),
            DistributionSpec::Pareto { b } => {
                continuous(spec, sd::Pareto::new(1.0, b).map_err(stats_err)?, rd::Pareto::new(1.0, b))
            }
            DistributionSpec::Poisson { lambda } => DistributionHandle::Discrete(DiscreteHandle::from_catalog(
                spec,
                sd::Poisson::new(lambda).map_err(stats_err)?,
                optional_sampler(spec, rd::Poisson::new(lambda)).map(|d| Box::new(RealDraw(d)) as Box<dyn Draw>),
            )),
            DistributionSpec::Binomial { n, p } => discrete(
                spec,
                sd::Binomial::new(p, n).map_err(stats_err)?,
                rd::Binomial::new(n, p),
                0,
            ),
            DistributionSpec::Geometric { p } => {
                discrete(spec, sd::Geometric::new(p).map_err(stats_err)?, rd::Geometric::new(p), 1)
            }
            DistributionSpec::NegativeBinomial { r, p } => {
                DistributionHandle::Discrete(DiscreteHandle::from_catalog(
                    spec,
                    NegativeBinomialMoments(sd::NegativeBinomial::new(r as f64, p).map_err(stats_err)?),
                    Some(Box::new(NegativeBinomialDraw::new(r, p))),
                ))
            }
            DistributionSpec::Hypergeometric { population, successes, draws } => discrete(
                spec,
                sd::Hypergeometric::new(population, successes, draws).map_err(stats_err)?,
                rd::Hypergeometric::new(population, successes, draws),
                0,
            ),
        };
        Ok(handle)
    }
}

/// `statrs` reports negative-binomial moments through `DiscreteDistribution`
/// only; this wrapper exposes them as `Distribution` like the other families.
#[derive(Debug, Clone, Copy)]
struct NegativeBinomialMoments(sd::NegativeBinomial);

impl sd::Discrete<u64, f64> for NegativeBinomialMoments {
    fn pmf(&self, x: u64) -> f64 {
        self.0.pmf(x)
    }

    fn ln_pmf(&self, x: u64) -> f64 {
        self.0.ln_pmf(x)
    }
}

impl sd::DiscreteCDF<u64, f64> for NegativeBinomialMoments {
    fn cdf(&self, x: u64) -> f64 {
        self.0.cdf(x)
    }

    fn sf(&self, x: u64) -> f64 {
        self.0.sf(x)
    }
}

impl Min<u64> for NegativeBinomialMoments {
    fn min(&self) -> u64 {
        Min::min(&self.0)
    }
}

impl Max<u64> for NegativeBinomialMoments {
    fn max(&self) -> u64 {
        Max::max(&self.0)
    }
}

impl Moments<f64> for NegativeBinomialMoments {
    fn mean(&self) -> Option<f64> {
        DiscreteDistribution::mean(&self.0)
    }

    fn variance(&self) -> Option<f64> {
        DiscreteDistribution::variance(&self.0)
    }
}

fn optional_sampler<S, E: std::fmt::Display>(spec: DistributionSpec, built: std::result::Result<S, E>) -> Option<S> {
    match built {
        Ok(sampler) => Some(sampler),
        Err(e) => {
            tracing::debug!(family = %spec.family(), error = %e, "no native sampler, sampling by quantile");
            None
        }
    }
}

fn continuous<D, S, E>(spec: DistributionSpec, dist: D, sampler: std::result::Result<S, E>) -> DistributionHandle
where
    D: sd::Continuous<f64, f64> + sd::ContinuousCDF<f64, f64> + Send + Sync + 'static,
    D: Moments<f64> + Min<f64> + Max<f64>,
    S: rd::Distribution<f64> + Send + Sync + 'static,
    E: std::fmt::Display,
{
    let sampler = optional_sampler(spec, sampler).map(|s| Box::new(RealDraw(s)) as Box<dyn Draw>);
    DistributionHandle::Continuous(ContinuousHandle::from_catalog(spec, dist, sampler))
}

fn discrete<D, S, E>(
    spec: DistributionSpec,
    dist: D,
    sampler: std::result::Result<S, E>,
    offset: u64,
) -> DistributionHandle
where
    D: sd::Discrete<u64, f64> + sd::DiscreteCDF<u64, f64> + Send + Sync + 'static,
    D: Moments<f64> + Min<u64> + Max<u64>,
    S: rd::Distribution<u64> + Send + Sync + 'static,
    E: std::fmt::Display,
{
    let sampler =
        optional_sampler(spec, sampler).map(|dist| Box::new(CountDraw { dist, offset }) as Box<dyn Draw>);
    DistributionHandle::Discrete(DiscreteHandle::from_catalog(spec, dist, sampler))
}

fn stats_err(e: impl std::fmt::Display) -> Error {
    Error::Computation(format!("statrs: {e}"))
}
