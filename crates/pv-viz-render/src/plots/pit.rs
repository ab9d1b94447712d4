use pv_viz::PitArtifact;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::header::{draw_panel_title, draw_suptitle, suptitle_height};
use crate::layout::axes::Axis;
use crate::layout::legend::{self, LegendEntry, LegendKind, LegendPosition};
use crate::layout::margins::{Margins, PlotArea};
use crate::layout::multi_panel::PanelRow;
use crate::plots::axes_draw::draw_axes;
use crate::primitives::*;

/// Source samples, the CDF mapping, and the transformed samples, left to right.
pub fn render(artifact: &PitArtifact, config: &VizConfig) -> crate::Result<String> {
    if artifact.curve_x.is_empty() || artifact.u.is_empty() {
        return Ok(empty_svg());
    }

    let fig_w = config.figure.width * 2.25;
    let fig_h = config.figure.height;
    let mut canvas = Canvas::new(fig_w, fig_h)?;

    let x_lo = artifact.curve_x[0];
    let x_hi = artifact.curve_x[artifact.curve_x.len() - 1];
    let x_axis = Axis::clamped(x_lo, x_hi, 5).with_label("x");

    let source_max = finite_max(artifact.sample_hist_density.iter().chain(&artifact.density_y));
    let source_y = Axis::auto_linear(0.0, source_max * 1.1, 5).with_label("Density");
    let cdf_y = Axis::clamped(0.0, 1.05, 6).with_label("u (Probability)");
    let u_x = Axis::clamped(0.0, 1.0, 5).with_label("u");
    let u_top = config.pit.uniform_y_max.max(finite_max(artifact.u_hist_density.iter()) * 1.05);
    let u_y = Axis::clamped(0.0, u_top, 6).with_label("Density");

    let top = suptitle_height(&artifact.title, config);
    draw_suptitle(&mut canvas, &artifact.title, config);

    let margins = Margins::for_axes(&canvas, Some(&source_y), Some(&x_axis), true, config)
        .union(Margins::for_axes(&canvas, Some(&cdf_y), Some(&x_axis), true, config))
        .union(Margins::for_axes(&canvas, Some(&u_y), Some(&u_x), true, config));
    let row = PanelRow::new(0.0, top, fig_w, fig_h - top, 12.0, 3, margins);

    draw_source_panel(&mut canvas, &row.panels[0], artifact, &x_axis, &source_y, config);
    draw_transform_panel(&mut canvas, &row.panels[1], artifact, &x_axis, &cdf_y, config);
    draw_uniform_panel(&mut canvas, &row.panels[2], artifact, &u_x, &u_y, config);

    Ok(canvas.finish_svg())
}

fn draw_source_panel(
    canvas: &mut Canvas,
    area: &PlotArea,
    artifact: &PitArtifact,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
) {
    draw_axes(canvas, area, x_axis, y_axis, config);
    draw_panel_title(canvas, area, "1. Source Distribution", config);

    let hist_color = config.colors.samples;
    canvas.push_clip(area.left, area.top, area.width, area.height);
    draw_histogram(
        canvas,
        area,
        x_axis,
        y_axis,
        &artifact.sample_hist_edges,
        &artifact.sample_hist_density,
        &Style::outlined(hist_color, config.pit.histogram_alpha),
    );
    let curve: Vec<(f64, f64)> = artifact
        .curve_x
        .iter()
        .zip(&artifact.density_y)
        .map(|(&x, &y)| {
            (x_axis.data_to_pixel(x, area.left, area.right()), y_axis.data_to_pixel(y, area.bottom(), area.top))
        })
        .collect();
    canvas.polyline(&curve, &LineStyle::solid(config.colors.density, 2.0));
    canvas.pop_clip();

    legend::draw_legend(
        canvas,
        area,
        &[
            LegendEntry::new(format!("Sampled Data (n={})", artifact.n_samples), hist_color, LegendKind::FilledRect),
            LegendEntry::new("True PDF", config.colors.density, LegendKind::Line(None)),
        ],
        config.font.size,
        LegendPosition::TopRight,
    );
}

fn draw_transform_panel(
    canvas: &mut Canvas,
    area: &PlotArea,
    artifact: &PitArtifact,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
) {
    draw_axes(canvas, area, x_axis, y_axis, config);
    draw_panel_title(canvas, area, "2. Transformation via CDF U = F(X)", config);

    let to_px = |x: f64, u: f64| {
        (x_axis.data_to_pixel(x, area.left, area.right()), y_axis.data_to_pixel(u, area.bottom(), area.top))
    };

    canvas.push_clip(area.left, area.top, area.width, area.height);
    let curve: Vec<(f64, f64)> =
        artifact.curve_x.iter().zip(&artifact.cdf_y).map(|(&x, &u)| to_px(x, u)).collect();
    canvas.polyline(&curve, &LineStyle::solid(Color::rgb(0, 0, 0), 2.0));

    let fallback = [Color::rgb(255, 0, 0)];
    let colors = if config.colors.traces.is_empty() { &fallback[..] } else { &config.colors.traces[..] };
    for (i, trace) in artifact.traces.iter().enumerate() {
        if !(trace.x.is_finite() && trace.u.is_finite()) {
            continue;
        }
        let color = colors[i % colors.len()];
        let guide = LineStyle::dashed(color.with_alpha(0.6), 1.0);
        let (px, pu) = to_px(trace.x, trace.u);
        let (_, base) = to_px(trace.x, 0.0);
        // x-axis up to the curve, then across to the right edge
        canvas.line(px, base, px, pu, &guide);
        canvas.arrow(px, pu, area.right() - 2.0, pu, &guide);
        canvas.marker(px, pu, &MarkerStyle { color, size: 3.5, ..Default::default() });
    }
    canvas.pop_clip();

    let note = TextStyle { size: config.font.size * 0.9, ..Default::default() };
    let note_w = canvas.measure_text("Input x maps to", &note).width;
    canvas.rect(
        area.left + 6.0,
        area.top + 6.0,
        note_w + 10.0,
        2.0 * note.size + 10.0,
        &Style::note_box(0.8),
    );
    canvas.text(area.left + 11.0, area.top + 8.0 + note.size, "Input x maps to", &note);
    canvas.text(area.left + 11.0, area.top + 8.0 + 2.0 * note.size, "output u", &note);
}

fn draw_uniform_panel(
    canvas: &mut Canvas,
    area: &PlotArea,
    artifact: &PitArtifact,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
) {
    draw_axes(canvas, area, x_axis, y_axis, config);
    draw_panel_title(canvas, area, "3. Target Distribution U ~ Uniform(0, 1)", config);

    let hist_color = config.colors.transformed;
    canvas.push_clip(area.left, area.top, area.width, area.height);
    draw_histogram(
        canvas,
        area,
        x_axis,
        y_axis,
        &artifact.u_hist_edges,
        &artifact.u_hist_density,
        &Style::outlined(hist_color, config.pit.histogram_alpha),
    );
    let reference: Vec<(f64, f64)> = artifact
        .reference_x
        .iter()
        .zip(&artifact.reference_y)
        .map(|(&x, &y)| {
            (x_axis.data_to_pixel(x, area.left, area.right()), y_axis.data_to_pixel(y, area.bottom(), area.top))
        })
        .collect();
    canvas.polyline(&reference, &LineStyle::dashed(config.colors.reference, 2.0));
    canvas.pop_clip();

    if config.pit.show_ks {
        let style = TextStyle { size: config.font.size * 0.9, ..Default::default() };
        canvas.text(
            area.left + 6.0,
            area.top + 6.0 + style.size,
            &format!("KS = {:.4}", artifact.ks_statistic),
            &style,
        );
    }

    legend::draw_legend(
        canvas,
        area,
        &[
            LegendEntry::new("Transformed Data", hist_color, LegendKind::FilledRect),
            LegendEntry::new("Uniform PDF", config.colors.reference, LegendKind::Line(Some("6 3".into()))),
        ],
        config.font.size,
        LegendPosition::TopRight,
    );
}

/// Density histogram bars; `edges` has one more entry than `density`.
fn draw_histogram(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    edges: &[f64],
    density: &[f64],
    style: &Style,
) {
    let py_bot = y_axis.data_to_pixel(0.0, area.bottom(), area.top);
    for (bin, &d) in density.iter().enumerate() {
        let (Some(&lo), Some(&hi)) = (edges.get(bin), edges.get(bin + 1)) else {
            break;
        };
        if !(d.is_finite() && d > 0.0) {
            continue;
        }
        let px_lo = x_axis.data_to_pixel(lo, area.left, area.right());
        let px_hi = x_axis.data_to_pixel(hi, area.left, area.right());
        let py_top = y_axis.data_to_pixel(d, area.bottom(), area.top);
        canvas.rect(px_lo, py_top, px_hi - px_lo, py_bot - py_top, style);
    }
}

fn finite_max<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values.copied().filter(|v| v.is_finite()).fold(0.0_f64, f64::max)
}

fn empty_svg() -> String {
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><text x="10" y="30">No PIT data</text></svg>"#.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_prob::{DistributionSpec, Family, pit};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn normal_artifact(n: usize) -> PitArtifact {
        let h = DistributionSpec::defaults(Family::Normal).handle().unwrap();
        PitArtifact::from(pit::pit_with_rng(&h, n, &mut StdRng::seed_from_u64(11)).unwrap())
    }

    #[test]
    fn three_panels() {
        let art = normal_artifact(2000);
        let svg = render(&art, &VizConfig::default()).unwrap();
        assert!(svg.contains("1. Source Distribution"));
        assert!(svg.contains("2. Transformation via CDF U = F(X)"));
        assert!(svg.contains("3. Target Distribution U ~ Uniform(0, 1)"));
        assert!(svg.contains("Probability Integral Transform: "));
        assert!(svg.contains("Sampled Data (n=2000)"));
        assert!(svg.contains("KS = "));
    }

    #[test]
    fn traced_points_drawn() {
        let art = normal_artifact(500);
        let svg = render(&art, &VizConfig::default()).unwrap();
        // three trace markers plus the legend has no markers
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn ks_label_can_be_hidden() {
        let art = normal_artifact(200);
        let mut config = VizConfig::default();
        config.pit.show_ks = false;
        assert!(!render(&art, &config).unwrap().contains("KS = "));
    }

    #[test]
    fn empty_artifact() {
        let mut art = normal_artifact(10);
        art.u.clear();
        assert!(render(&art, &VizConfig::default()).unwrap().contains("No PIT data"));
    }

    #[test]
    fn histogram_skips_empty_bins() {
        let mut canvas = Canvas::new(200.0, 200.0).unwrap();
        let area = PlotArea::manual(10.0, 10.0, 180.0, 180.0);
        let ax = Axis::fixed(0.0, 1.0);
        draw_histogram(
            &mut canvas,
            &area,
            &ax,
            &ax,
            &[0.0, 0.5, 1.0],
            &[0.0, 0.8],
            &Style::filled(Color::rgb(0, 0, 0)),
        );
        // background rect plus one bar
        assert_eq!(canvas.finish_svg().matches("<rect").count(), 2);
    }
}
