/// Axis configuration with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Auto-scale linear axis with "nice number" ticks.
    ///
    /// Non-finite bounds fall back to `[0, 1]`.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (lo, hi) = finite_bounds(data_min, data_max);
        let (nice_min, nice_max, step) = nice_range(lo, hi, target_ticks);
        let mut axis = Self::fixed(nice_min, nice_max);
        axis.fill_ticks(step, 5);
        axis
    }

    /// Linear axis pinned to `[min, max]` with nice ticks inside it.
    pub fn clamped(min: f64, max: f64, target_ticks: usize) -> Self {
        let (lo, hi) = finite_bounds(min, max);
        let (_, _, step) = nice_range(lo, hi, target_ticks);
        let mut axis = Self::fixed(lo, hi);
        axis.fill_ticks(step, 5);
        axis
    }

    /// Integer axis for discrete data: one tick per integer when there are at
    /// most `max_ticks`, otherwise nice integer steps.
    pub fn integer(data_min: f64, data_max: f64, max_ticks: usize) -> Self {
        let (lo, hi) = finite_bounds(data_min.floor(), data_max.ceil());
        let span = hi - lo;
        let step = if span <= max_ticks.max(1) as f64 {
            1.0
        } else {
            // smallest 1-2-5 step that keeps the tick count within max_ticks
            let rough = span / (max_ticks.max(2) - 1) as f64;
            let decade = 10.0_f64.powf(rough.log10().floor());
            [1.0, 2.0, 5.0, 10.0]
                .iter()
                .map(|m| m * decade)
                .find(|s| *s >= rough)
                .unwrap_or(10.0 * decade)
                .max(1.0)
                .round()
        };
        // half a unit of padding so end stems are not on the frame
        let mut axis = Self::fixed(lo - 0.5, hi + 0.5);
        let first = (lo / step).ceil() * step;
        let mut v = first;
        while v <= hi + 1e-9 {
            axis.tick_positions.push(v);
            axis.tick_labels.push(format!("{}", v as i64));
            v += step;
        }
        axis
    }

    /// Fixed axis with explicit limits (no tick auto-generation).
    pub fn fixed(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            label: String::new(),
            tick_positions: Vec::new(),
            tick_labels: Vec::new(),
            minor_ticks: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    fn fill_ticks(&mut self, step: f64, minor_per_major: usize) {
        let first = (self.min / step).ceil() * step;
        let mut v = first;
        while v <= self.max + step * 0.01 {
            self.tick_positions.push(v);
            self.tick_labels.push(format_tick(v, step));
            v += step;
        }

        let minor_step = step / minor_per_major as f64;
        let mut mv = (self.min / minor_step).ceil() * minor_step;
        while mv <= self.max + minor_step * 0.01 {
            if !self.tick_positions.iter().any(|t| (t - mv).abs() < minor_step * 0.01) {
                self.minor_ticks.push(mv);
            }
            mv += minor_step;
        }
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = (value - self.min) / (self.max - self.min);
        px_min + frac * (px_max - px_min)
    }

    /// Map pixel coordinate to data value (inverse).
    pub fn pixel_to_data(&self, px: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = (px - px_min) / (px_max - px_min);
        self.min + frac * (self.max - self.min)
    }
}

fn finite_bounds(lo: f64, hi: f64) -> (f64, f64) {
    match (lo.is_finite(), hi.is_finite()) {
        (true, true) if lo <= hi => (lo, hi),
        (true, true) => (hi, lo),
        (true, false) => (lo, lo + 1.0),
        (false, true) => (hi - 1.0, hi),
        (false, false) => (0.0, 1.0),
    }
}

/// "Nice numbers" algorithm for pleasant tick spacing.
fn nice_range(data_min: f64, data_max: f64, target_ticks: usize) -> (f64, f64, f64) {
    if (data_max - data_min).abs() < 1e-15 {
        let pad = if data_min.abs() > 1e-15 { data_min.abs() * 0.1 } else { 1.0 };
        return nice_range(data_min - pad, data_max + pad, target_ticks);
    }
    let range = data_max - data_min;
    let rough_step = range / (target_ticks.max(2) - 1) as f64;
    let step = nice_step(rough_step);
    let nice_min = (data_min / step).floor() * step;
    let nice_max = (data_max / step).ceil() * step;
    (nice_min, nice_max, step)
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // Avoid "-0"
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 {
        format!("{}", v.round() as i64)
    } else {
        format!("{:.prec$}", v, prec = decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_linear_basic() {
        let ax = Axis::auto_linear(0.0, 10.0, 6);
        assert!(!ax.tick_positions.is_empty());
        assert!(ax.min <= 0.0);
        assert!(ax.max >= 10.0);
        assert_eq!(ax.tick_positions.len(), ax.tick_labels.len());
    }

    #[test]
    fn auto_linear_non_finite() {
        let ax = Axis::auto_linear(f64::NAN, f64::INFINITY, 5);
        assert!(ax.min.is_finite() && ax.max.is_finite());
        assert!(ax.max > ax.min);
    }

    #[test]
    fn degenerate_range_is_widened() {
        let ax = Axis::auto_linear(3.0, 3.0, 5);
        assert!(ax.min < 3.0 && ax.max > 3.0);
    }

    #[test]
    fn clamped_keeps_limits() {
        let ax = Axis::clamped(0.0, 1.05, 6);
        assert_eq!(ax.min, 0.0);
        assert_eq!(ax.max, 1.05);
        assert_eq!(ax.tick_labels.first().map(String::as_str), Some("0.0"));
        assert!(ax.tick_positions.iter().all(|&t| t <= 1.05));
    }

    #[test]
    fn integer_ticks() {
        let ax = Axis::integer(0.0, 10.0, 25);
        assert_eq!(ax.tick_labels.len(), 11);
        assert_eq!(ax.tick_labels[10], "10");
        assert_eq!(ax.min, -0.5);

        let wide = Axis::integer(0.0, 300.0, 10);
        assert!(wide.tick_positions.len() <= 11);
        assert!(wide.tick_positions.iter().all(|t| t.fract() == 0.0));
    }

    #[test]
    fn no_negative_zero() {
        let ax = Axis::auto_linear(-1.0, 1.0, 5);
        assert!(ax.tick_labels.iter().all(|l| l != "-0.0" && l != "-0"));
    }

    #[test]
    fn data_to_pixel_linear() {
        let ax = Axis::auto_linear(0.0, 100.0, 5);
        let px = ax.data_to_pixel(50.0, 0.0, 500.0);
        assert!((px - 250.0).abs() < 1.0);
        assert!((ax.pixel_to_data(px, 0.0, 500.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn nice_step_values() {
        assert!((nice_step(3.2) - 2.0).abs() < 1e-9);
        assert!((nice_step(0.7) - 0.5).abs() < 1e-9);
        assert!((nice_step(15.0) - 10.0).abs() < 1e-9);
        assert!((nice_step(4.5) - 5.0).abs() < 1e-9);
        assert!((nice_step(1.2) - 1.0).abs() < 1e-9);
    }
}
