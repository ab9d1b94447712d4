use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::primitives::TextStyle;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Space a panel needs around its plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margins {
    /// Compute margins from axis labels and config.
    ///
    /// `titled` reserves room for a panel title above the area.
    pub fn for_axes(
        canvas: &Canvas,
        y_axis: Option<&Axis>,
        x_axis: Option<&Axis>,
        titled: bool,
        config: &VizConfig,
    ) -> Self {
        let tick_style = TextStyle { size: config.font.tick_size, ..Default::default() };
        let label_style = TextStyle { size: config.font.label_size, ..Default::default() };
        let tick_out = if config.axes.tick_direction == "in" { 0.0 } else { config.axes.tick_length };

        // Left margin: y-axis tick labels + axis label + padding
        let mut left = 12.0;
        if let Some(y) = y_axis {
            let max_tick_w = y
                .tick_labels
                .iter()
                .map(|l| canvas.measure_text(l, &tick_style).width)
                .fold(0.0_f64, f64::max);
            left += max_tick_w + tick_out + 6.0;
            if !y.label.is_empty() {
                left += label_style.size + 8.0;
            }
        }

        // Bottom margin: x-axis tick labels + axis label + padding
        let mut bottom = 10.0;
        if let Some(x) = x_axis {
            bottom += tick_style.size + tick_out + 6.0;
            if !x.label.is_empty() {
                bottom += label_style.size + 6.0;
            }
        }

        let top = if titled { config.font.title_size * 1.3 + 10.0 } else { 12.0 };

        Self { left, top, right: 14.0, bottom }
    }

    /// Component-wise maximum, so panels in a row share one inset.
    pub fn union(self, other: Self) -> Self {
        Self {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Fit the area inside the panel `(x, y, w, h)` with `margins`.
    pub fn inset(x: f64, y: f64, w: f64, h: f64, margins: Margins) -> Self {
        let width = w - margins.left - margins.right;
        let height = h - margins.top - margins.bottom;
        Self { left: x + margins.left, top: y + margins.top, width: width.max(50.0), height: height.max(50.0) }
    }

    /// Single panel filling the canvas below `top_offset` (figure title space).
    pub fn auto(
        canvas: &Canvas,
        y_axis: Option<&Axis>,
        x_axis: Option<&Axis>,
        top_offset: f64,
        config: &VizConfig,
    ) -> Self {
        let margins = Margins::for_axes(canvas, y_axis, x_axis, false, config);
        Self::inset(0.0, top_offset, canvas.width, canvas.height - top_offset, margins)
    }

    /// Manual margins (for multi-panel layouts).
    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Whether `(px, py)` lies inside the area.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.left && px <= self.right() && py >= self.top && py <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_fits_canvas() {
        let canvas = Canvas::new(400.0, 300.0).unwrap();
        let config = VizConfig::default();
        let x = Axis::auto_linear(0.0, 10.0, 6).with_label("x");
        let y = Axis::auto_linear(0.0, 1.0, 5).with_label("Density");
        let area = PlotArea::auto(&canvas, Some(&y), Some(&x), 20.0, &config);
        assert!(area.left > 20.0);
        assert!(area.top >= 20.0);
        assert!(area.right() < 400.0);
        assert!(area.bottom() < 300.0);
        assert!(area.contains(area.left + 1.0, area.top + 1.0));
        assert!(!area.contains(0.0, 0.0));
    }

    #[test]
    fn title_reserves_space() {
        let canvas = Canvas::new(400.0, 300.0).unwrap();
        let config = VizConfig::default();
        let plain = Margins::for_axes(&canvas, None, None, false, &config);
        let titled = Margins::for_axes(&canvas, None, None, true, &config);
        assert!(titled.top > plain.top);
    }
}
