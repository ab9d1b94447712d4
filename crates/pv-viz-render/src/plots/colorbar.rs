use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::draw_frame;
use crate::primitives::*;

/// Colormap position of `value` in `[0, z_max]`, snapped to the lower edge of
/// one of `levels` bands (`levels == 0` keeps it continuous).
pub(crate) fn level_fraction(value: f64, z_max: f64, levels: usize) -> f64 {
    if z_max.is_nan() || z_max <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    let t = (value / z_max).clamp(0.0, 1.0);
    if levels == 0 {
        return t;
    }
    let band = ((t * levels as f64).floor() as usize).min(levels - 1);
    if levels == 1 { 0.0 } else { band as f64 / (levels - 1) as f64 }
}

/// Vertical colorbar for `[0, z_max]` with tick labels on the right.
pub(crate) fn draw_colorbar(
    canvas: &mut Canvas,
    bar: &PlotArea,
    z_max: f64,
    label: &str,
    config: &VizConfig,
) {
    let steps = if config.heatmap.levels > 0 { config.heatmap.levels } else { 64 };
    let step_h = bar.height / steps as f64;
    for i in 0..steps {
        // top of the bar is the maximum
        let t = 1.0 - (i as f64 + 0.5) / steps as f64;
        let value = t * z_max;
        let c = config.colormap_at(level_fraction(value, z_max, config.heatmap.levels));
        canvas.rect(bar.left, bar.top + i as f64 * step_h, bar.width, step_h + 0.3, &Style::filled(c));
    }
    draw_frame(canvas, bar);

    let axis = Axis::clamped(0.0, z_max.max(f64::MIN_POSITIVE), 5);
    let tick_style = TextStyle {
        size: config.font.tick_size * 0.9,
        anchor: TextAnchor::Start,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    let tick_line = LineStyle::solid(crate::color::Color::rgb(0, 0, 0), 0.5);
    let mut widest = 0.0_f64;
    for (pos, text) in axis.tick_positions.iter().zip(&axis.tick_labels) {
        let py = axis.data_to_pixel(*pos, bar.bottom(), bar.top);
        canvas.line(bar.right(), py, bar.right() + 3.0, py, &tick_line);
        canvas.text(bar.right() + 5.0, py, text, &tick_style);
        widest = widest.max(canvas.measure_text(text, &tick_style).width);
    }

    if !label.is_empty() {
        let label_style = TextStyle::centered(config.font.label_size * 0.9);
        canvas.text_rotated(
            bar.right() + widest + 16.0,
            bar.top + bar.height / 2.0,
            label,
            &label_style,
            -90.0,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_fraction() {
        assert_eq!(level_fraction(0.5, 2.0, 0), 0.25);
        assert_eq!(level_fraction(f64::NAN, 2.0, 0), 0.0);
        assert_eq!(level_fraction(1.0, 0.0, 10), 0.0);
    }

    #[test]
    fn banded_fraction() {
        // 5 bands over [0, 1]: 0.55 falls in band 2 of 0..=4
        assert_eq!(level_fraction(0.55, 1.0, 5), 0.5);
        assert_eq!(level_fraction(1.0, 1.0, 5), 1.0);
        assert_eq!(level_fraction(0.0, 1.0, 5), 0.0);
    }

    #[test]
    fn colorbar_has_labels() {
        let mut canvas = Canvas::new(200.0, 200.0).unwrap();
        let bar = PlotArea::manual(20.0, 20.0, 15.0, 150.0);
        draw_colorbar(&mut canvas, &bar, 0.16, "Density", &VizConfig::default());
        let svg = canvas.finish_svg();
        assert!(svg.contains(">Density</text>"));
        assert!(svg.contains(">0.00</text>"));
    }
}
