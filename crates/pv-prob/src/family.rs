//! Distribution family tags.

use std::fmt;
use std::str::FromStr;

use pv_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A supported univariate distribution family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Normal `N(μ, σ)`.
    Normal,
    /// Gamma with shape `α` and scale `β`.
    Gamma,
    /// Beta on `[0, 1]`.
    Beta,
    /// Exponential with rate `λ`.
    Exponential,
    /// Poisson with mean `λ`.
    Poisson,
    /// Binomial with `N` trials.
    Binomial,
    /// Geometric counting trials to the first success (support starts at 1).
    Geometric,
    /// Negative binomial counting failures before the `r`-th success.
    NegativeBinomial,
    /// Hypergeometric with population `M`, `n` successes and `N` draws.
    Hypergeometric,
    /// Chi-squared with `df` degrees of freedom.
    #[serde(rename = "chi2")]
    ChiSquared,
    /// Standard Student t with `df` degrees of freedom.
    #[serde(rename = "t")]
    StudentT,
    /// Pareto with scale 1 and shape `b`.
    Pareto,
}

impl Family {
    /// Every family, in catalog order.
    pub const ALL: [Family; 12] = [
        Family::Normal,
        Family::Gamma,
        Family::Beta,
        Family::Exponential,
        Family::Poisson,
        Family::Binomial,
        Family::Geometric,
        Family::NegativeBinomial,
        Family::Hypergeometric,
        Family::ChiSquared,
        Family::StudentT,
        Family::Pareto,
    ];

    /// Canonical tag, as used in request paths.
    pub fn tag(self) -> &'static str {
        match self {
            Family::Normal => "normal",
            Family::Gamma => "gamma",
            Family::Beta => "beta",
            Family::Exponential => "exponential",
            Family::Poisson => "poisson",
            Family::Binomial => "binomial",
            Family::Geometric => "geometric",
            Family::NegativeBinomial => "negative_binomial",
            Family::Hypergeometric => "hypergeometric",
            Family::ChiSquared => "chi2",
            Family::StudentT => "t",
            Family::Pareto => "pareto",
        }
    }

    /// Human-readable name used in plot titles.
    pub fn display_name(self) -> &'static str {
        match self {
            Family::Normal => "Normal",
            Family::Gamma => "Gamma",
            Family::Beta => "Beta",
            Family::Exponential => "Exponential",
            Family::Poisson => "Poisson",
            Family::Binomial => "Binomial",
            Family::Geometric => "Geometric",
            Family::NegativeBinomial => "Negative Binomial",
            Family::Hypergeometric => "Hypergeometric",
            Family::ChiSquared => "Chi-Squared",
            Family::StudentT => "Student's t",
            Family::Pareto => "Pareto",
        }
    }

    /// Whether the family has integer support.
    pub fn is_discrete(self) -> bool {
        matches!(
            self,
            Family::Poisson
                | Family::Binomial
                | Family::Geometric
                | Family::NegativeBinomial
                | Family::Hypergeometric
        )
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Family {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Family::ALL
            .into_iter()
            .find(|f| f.tag() == normalized)
            .ok_or_else(|| Error::Validation(format!("unknown distribution family: {s}")))
    }
}
