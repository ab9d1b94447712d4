//! Numeric helpers shared by the range selector, PIT and renderers.

use serde::Serialize;

/// Evenly spaced points over `[start, stop]` (inclusive), `n` of them.
///
/// The last point is exactly `stop`. `n == 1` yields `[start]`, `n == 0` yields nothing.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            out[n - 1] = stop;
            out
        }
    }
}

/// A density-normalized histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Bin edges, `bins + 1` of them.
    pub edges: Vec<f64>,
    /// Density per bin: `count / (n * width)`, so the bars integrate to 1.
    pub density: Vec<f64>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins over `[lo, hi]`.
    ///
    /// Values outside the range are ignored; a value equal to `hi` lands in the
    /// last bin. A degenerate range (`hi <= lo`) is widened by 0.5 on each side.
    pub fn density(values: &[f64], bins: usize, lo: f64, hi: f64) -> Self {
        let bins = bins.max(1);
        let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
        let width = (hi - lo) / bins as f64;
        let mut counts = vec![0usize; bins];
        let mut total = 0usize;
        for &v in values {
            if !(lo..=hi).contains(&v) {
                continue;
            }
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
            total += 1;
        }
        let norm = if total == 0 { 0.0 } else { 1.0 / (total as f64 * width) };
        Self {
            edges: linspace(lo, hi, bins + 1),
            density: counts.into_iter().map(|c| c as f64 * norm).collect(),
        }
    }

    /// Bin centers.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }
}

/// One-sample Kolmogorov-Smirnov statistic of `u` against Uniform(0, 1).
///
/// Returns `NaN` for an empty sample.
pub fn ks_uniform_statistic(u: &[f64]) -> f64 {
    if u.is_empty() {
        return f64::NAN;
    }
    let mut sorted: Vec<f64> = u.iter().map(|v| v.clamp(0.0, 1.0)).collect();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;
    sorted.iter().enumerate().fold(0.0_f64, |d, (i, &v)| {
        let above = (i + 1) as f64 / n - v;
        let below = v - i as f64 / n;
        d.max(above).max(below)
    })
}

/// Asymptotic KS critical value `sqrt(-ln(alpha/2) / 2) / sqrt(n)`.
pub fn ks_critical_value(n: usize, alpha: f64) -> f64 {
    (-(alpha / 2.0).ln() / 2.0).sqrt() / (n.max(1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linspace_endpoints() {
        let xs = linspace(-4.0, 4.0, 200);
        assert_eq!(xs.len(), 200);
        assert_eq!(xs[0], -4.0);
        assert_eq!(xs[199], 4.0);
        assert!(xs.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_histogram_integrates_to_one() {
        let values: Vec<f64> = (0..1000).map(|i| i as f64 / 999.0).collect();
        let h = Histogram::density(&values, 50, 0.0, 1.0);
        assert_eq!(h.edges.len(), 51);
        assert_eq!(h.density.len(), 50);
        let width = 1.0 / 50.0;
        let area: f64 = h.density.iter().map(|d| d * width).sum();
        assert_abs_diff_eq!(area, 1.0, epsilon = 1e-12);
        assert_eq!(h.centers().len(), 50);
    }

    #[test]
    fn test_histogram_degenerate_range() {
        let h = Histogram::density(&[2.0, 2.0], 4, 2.0, 2.0);
        assert_eq!(h.edges[0], 1.5);
        assert_eq!(h.edges[4], 2.5);
    }

    #[test]
    fn test_ks_statistic() {
        let n = 1000;
        let grid: Vec<f64> = (0..n).map(|i| (i as f64 + 0.5) / n as f64).collect();
        assert!(ks_uniform_statistic(&grid) <= 0.5 / n as f64 + 1e-12);
        let skewed: Vec<f64> = grid.iter().map(|u| u * u).collect();
        assert!(ks_uniform_statistic(&skewed) > 0.2);
        assert!(ks_uniform_statistic(&[]).is_nan());
    }

    #[test]
    fn test_ks_critical_value() {
        // c(0.05) ≈ 1.358
        assert_abs_diff_eq!(ks_critical_value(1, 0.05), 1.358, epsilon = 1e-3);
    }
}
