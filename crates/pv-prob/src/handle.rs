//! Distribution handles.
//!
//! A handle wraps a `statrs` distribution behind a small object-safe kernel so the
//! rest of the pipeline can dispatch on continuity ([`DistributionHandle`]) without
//! caring which family it holds. Handles optionally carry a `rand_distr` sampler;
//! without one, sampling falls back to inverse-transform through the quantile.

use rand::{Rng, RngCore};
use rand_distr::Distribution as Sample;
use statrs::distribution::{Continuous, ContinuousCDF, Discrete, DiscreteCDF};
use statrs::statistics::{Distribution as Moments, Max, Min};

use crate::catalog::DistributionSpec;
use crate::family::Family;

/// Upper end of the discrete quantile search on unbounded supports.
pub const QUANTILE_SEARCH_CAP: i64 = 1 << 62;

trait ContinuousKernel: Send + Sync {
    fn pdf(&self, x: f64) -> f64;
    fn cdf(&self, x: f64) -> f64;
    fn mean(&self) -> f64;
    fn std_dev(&self) -> f64;
    fn support(&self) -> (f64, f64);
    fn inverse_cdf(&self, p: f64) -> f64;
}

impl<D> ContinuousKernel for D
where
    D: Continuous<f64, f64> + ContinuousCDF<f64, f64> + Moments<f64> + Min<f64> + Max<f64>,
    D: Send + Sync,
{
    fn pdf(&self, x: f64) -> f64 {
        Continuous::pdf(self, x)
    }

    fn cdf(&self, x: f64) -> f64 {
        ContinuousCDF::cdf(self, x)
    }

    fn mean(&self) -> f64 {
        Moments::mean(self).unwrap_or(f64::NAN)
    }

    fn std_dev(&self) -> f64 {
        Moments::std_dev(self).unwrap_or(f64::NAN)
    }

    fn support(&self) -> (f64, f64) {
        (Min::min(self), Max::max(self))
    }

    fn inverse_cdf(&self, p: f64) -> f64 {
        ContinuousCDF::inverse_cdf(self, p)
    }
}

trait DiscreteKernel: Send + Sync {
    fn pmf(&self, k: u64) -> f64;
    fn cdf(&self, k: u64) -> f64;
    fn mean(&self) -> f64;
    fn std_dev(&self) -> f64;
    fn support(&self) -> (u64, u64);
    fn inverse_cdf(&self, p: f64) -> u64;
}

impl<D> DiscreteKernel for D
where
    D: Discrete<u64, f64> + DiscreteCDF<u64, f64> + Moments<f64> + Min<u64> + Max<u64>,
    D: Send + Sync,
{
    fn pmf(&self, k: u64) -> f64 {
        Discrete::pmf(self, k)
    }

    fn cdf(&self, k: u64) -> f64 {
        DiscreteCDF::cdf(self, k)
    }

    fn mean(&self) -> f64 {
        Moments::mean(self).unwrap_or(f64::NAN)
    }

    fn std_dev(&self) -> f64 {
        Moments::std_dev(self).unwrap_or(f64::NAN)
    }

    fn support(&self) -> (u64, u64) {
        (Min::min(self), Max::max(self))
    }

    fn inverse_cdf(&self, p: f64) -> u64 {
        DiscreteCDF::inverse_cdf(self, p)
    }
}

/// Object-safe variate generator.
pub(crate) trait Draw: Send + Sync {
    fn draw(&self, rng: &mut dyn RngCore) -> f64;
}

/// Adapter for real-valued `rand_distr` samplers.
pub(crate) struct RealDraw<D>(pub(crate) D);

impl<D: Sample<f64> + Send + Sync> Draw for RealDraw<D> {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        self.0.sample(rng)
    }
}

/// Adapter for count-valued `rand_distr` samplers, with a constant offset
/// (e.g. `+1` to turn failures into trials).
pub(crate) struct CountDraw<D> {
    pub(crate) dist: D,
    pub(crate) offset: u64,
}

impl<D: Sample<u64> + Send + Sync> Draw for CountDraw<D> {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        (self.dist.sample(rng) + self.offset) as f64
    }
}

/// A continuous distribution: density, CDF, quantile, moments.
pub struct ContinuousHandle {
    label: String,
    spec: Option<DistributionSpec>,
    kernel: Box<dyn ContinuousKernel>,
    sampler: Option<Box<dyn Draw>>,
}

impl ContinuousHandle {
    /// Wrap any `statrs` continuous distribution.
    ///
    /// Handles built this way carry no catalog spec, so range selection always
    /// uses the quantile window, and sampling goes through the quantile.
    pub fn new<D>(label: impl Into<String>, dist: D) -> Self
    where
        D: Continuous<f64, f64> + ContinuousCDF<f64, f64> + Moments<f64> + Min<f64> + Max<f64>,
        D: Send + Sync + 'static,
    {
        Self { label: label.into(), spec: None, kernel: Box::new(dist), sampler: None }
    }

    pub(crate) fn from_catalog<D>(spec: DistributionSpec, dist: D, sampler: Option<Box<dyn Draw>>) -> Self
    where
        D: Continuous<f64, f64> + ContinuousCDF<f64, f64> + Moments<f64> + Min<f64> + Max<f64>,
        D: Send + Sync + 'static,
    {
        Self {
            label: spec.title(),
            spec: Some(spec),
            kernel: Box::new(dist),
            sampler,
        }
    }

    /// Descriptive label (the plot title for catalog handles).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The validated catalog spec, if the handle came from the catalog.
    pub fn spec(&self) -> Option<&DistributionSpec> {
        self.spec.as_ref()
    }

    /// Probability density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        self.kernel.pdf(x)
    }

    /// Cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        self.kernel.cdf(x)
    }

    /// Inverse CDF; `p <= 0` and `p >= 1` map to the support ends.
    pub fn quantile(&self, p: f64) -> f64 {
        let (lo, hi) = self.kernel.support();
        if p.is_nan() {
            return f64::NAN;
        }
        if p <= 0.0 {
            return lo;
        }
        if p >= 1.0 {
            return hi;
        }
        self.kernel.inverse_cdf(p).clamp(lo, hi)
    }

    /// Mean, `NaN` when undefined.
    pub fn mean(&self) -> f64 {
        self.kernel.mean()
    }

    /// Standard deviation, `NaN` when undefined (may be `+inf`).
    pub fn std_dev(&self) -> f64 {
        self.kernel.std_dev()
    }

    /// Support `[min, max]` (ends may be infinite).
    pub fn support(&self) -> (f64, f64) {
        self.kernel.support()
    }

    /// Whether a native sampler is attached.
    pub fn has_sampler(&self) -> bool {
        self.sampler.is_some()
    }

    /// Draw one variate.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match &self.sampler {
            Some(sampler) => sampler.draw(rng),
            None => {
                let u: f64 = rng.random();
                self.quantile(u)
            }
        }
    }
}

/// A discrete distribution on the integers: mass, CDF, quantile, moments.
pub struct DiscreteHandle {
    label: String,
    spec: Option<DistributionSpec>,
    kernel: Box<dyn DiscreteKernel>,
    sampler: Option<Box<dyn Draw>>,
}

impl DiscreteHandle {
    /// Wrap any `statrs` discrete distribution over `u64`.
    pub fn new<D>(label: impl Into<String>, dist: D) -> Self
    where
        D: Discrete<u64, f64> + DiscreteCDF<u64, f64> + Moments<f64> + Min<u64> + Max<u64>,
        D: Send + Sync + 'static,
    {
        Self { label: label.into(), spec: None, kernel: Box::new(dist), sampler: None }
    }

    pub(crate) fn from_catalog<D>(spec: DistributionSpec, dist: D, sampler: Option<Box<dyn Draw>>) -> Self
    where
        D: Discrete<u64, f64> + DiscreteCDF<u64, f64> + Moments<f64> + Min<u64> + Max<u64>,
        D: Send + Sync + 'static,
    {
        Self {
            label: spec.title(),
            spec: Some(spec),
            kernel: Box::new(dist),
            sampler,
        }
    }

    /// Descriptive label (the plot title for catalog handles).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The validated catalog spec, if the handle came from the catalog.
    pub fn spec(&self) -> Option<&DistributionSpec> {
        self.spec.as_ref()
    }

    /// Probability mass at `k` (zero for negative `k`).
    pub fn pmf(&self, k: i64) -> f64 {
        if k < 0 { 0.0 } else { self.kernel.pmf(k as u64) }
    }

    /// `P(X <= k)` (zero for negative `k`).
    pub fn cdf(&self, k: i64) -> f64 {
        if k < 0 { 0.0 } else { self.kernel.cdf(k as u64) }
    }

    /// Smallest `k` in the support with `P(X <= k) >= p`.
    ///
    /// Unbounded supports are searched up to [`QUANTILE_SEARCH_CAP`], which is
    /// returned when the CDF has not reached `p` by then.
    pub fn quantile(&self, p: f64) -> i64 {
        let (lo, hi) = self.support();
        if p.is_nan() || p <= self.cdf(lo) {
            return lo;
        }
        let cap = hi.unwrap_or(QUANTILE_SEARCH_CAP);
        // the statrs search unwraps a bracket that must contain p
        if p >= 1.0 || self.cdf(cap) < p {
            return cap;
        }
        i64::try_from(self.kernel.inverse_cdf(p)).map_or(cap, |k| k.min(cap))
    }

    /// Mean, `NaN` when undefined.
    pub fn mean(&self) -> f64 {
        self.kernel.mean()
    }

    /// Standard deviation, `NaN` when undefined.
    pub fn std_dev(&self) -> f64 {
        self.kernel.std_dev()
    }

    /// Support as `(min, max)`; `max` is `None` when unbounded.
    pub fn support(&self) -> (i64, Option<i64>) {
        let (lo, hi) = self.kernel.support();
        let lo = i64::try_from(lo).unwrap_or(i64::MAX);
        let hi = if hi == u64::MAX { None } else { i64::try_from(hi).ok() };
        (lo, hi)
    }

    /// Whether a native sampler is attached.
    pub fn has_sampler(&self) -> bool {
        self.sampler.is_some()
    }

    /// Draw one variate.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> i64 {
        match &self.sampler {
            Some(sampler) => sampler.draw(rng) as i64,
            None => {
                let u: f64 = rng.random();
                self.quantile(u)
            }
        }
    }
}

/// A distribution handle, tagged by continuity.
pub enum DistributionHandle {
    /// Density + dense-domain semantics.
    Continuous(ContinuousHandle),
    /// Mass + integer-domain semantics.
    Discrete(DiscreteHandle),
}

impl DistributionHandle {
    /// `true` iff the handle exposes a density.
    pub fn is_continuous(&self) -> bool {
        matches!(self, DistributionHandle::Continuous(_))
    }

    /// Catalog family, if the handle came from the catalog.
    pub fn family(&self) -> Option<Family> {
        self.spec().map(DistributionSpec::family)
    }

    /// The validated catalog spec, if any.
    pub fn spec(&self) -> Option<&DistributionSpec> {
        match self {
            DistributionHandle::Continuous(h) => h.spec(),
            DistributionHandle::Discrete(h) => h.spec(),
        }
    }

    /// Descriptive label.
    pub fn label(&self) -> &str {
        match self {
            DistributionHandle::Continuous(h) => h.label(),
            DistributionHandle::Discrete(h) => h.label(),
        }
    }

    /// Density (continuous) or mass (discrete, `x` floored) at `x`.
    pub fn prop(&self, x: f64) -> f64 {
        match self {
            DistributionHandle::Continuous(h) => h.pdf(x),
            DistributionHandle::Discrete(h) => {
                if x.fract() == 0.0 {
                    h.pmf(x as i64)
                } else {
                    0.0
                }
            }
        }
    }

    /// Cumulative probability at `x` (discrete handles floor `x`).
    pub fn cdf(&self, x: f64) -> f64 {
        match self {
            DistributionHandle::Continuous(h) => h.cdf(x),
            DistributionHandle::Discrete(h) => h.cdf(x.floor() as i64),
        }
    }

    /// Quantile as `f64` (integer-valued for discrete handles).
    pub fn quantile(&self, p: f64) -> f64 {
        match self {
            DistributionHandle::Continuous(h) => h.quantile(p),
            DistributionHandle::Discrete(h) => h.quantile(p) as f64,
        }
    }

    /// Mean, `NaN` when undefined.
    pub fn mean(&self) -> f64 {
        match self {
            DistributionHandle::Continuous(h) => h.mean(),
            DistributionHandle::Discrete(h) => h.mean(),
        }
    }

    /// Standard deviation, `NaN` when undefined.
    pub fn std_dev(&self) -> f64 {
        match self {
            DistributionHandle::Continuous(h) => h.std_dev(),
            DistributionHandle::Discrete(h) => h.std_dev(),
        }
    }

    /// The continuous handle, if this is one.
    pub fn as_continuous(&self) -> Option<&ContinuousHandle> {
        match self {
            DistributionHandle::Continuous(h) => Some(h),
            DistributionHandle::Discrete(_) => None,
        }
    }

    /// The discrete handle, if this is one.
    pub fn as_discrete(&self) -> Option<&DiscreteHandle> {
        match self {
            DistributionHandle::Continuous(_) => None,
            DistributionHandle::Discrete(h) => Some(h),
        }
    }
}

impl std::fmt::Debug for DistributionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributionHandle")
            .field("label", &self.label())
            .field("continuous", &self.is_continuous())
            .finish()
    }
}
