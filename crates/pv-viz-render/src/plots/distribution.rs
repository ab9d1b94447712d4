use pv_viz::DistributionPlotArtifact;

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::header::{draw_panel_title, draw_suptitle, suptitle_height};
use crate::layout::axes::Axis;
use crate::layout::legend::{self, LegendEntry, LegendKind, LegendPosition};
use crate::layout::margins::{Margins, PlotArea};
use crate::layout::multi_panel::PanelRow;
use crate::plots::axes_draw::{draw_axes, draw_vline};
use crate::primitives::*;

/// Two panels: density/mass with mean and ±1 std lines, and the CDF.
pub fn render(artifact: &DistributionPlotArtifact, config: &VizConfig) -> crate::Result<String> {
    let n = artifact.x.len();
    if n == 0 || artifact.y_prop.len() != n || artifact.y_cdf.len() != n {
        return Ok(empty_svg());
    }

    let fig_w = config.figure.width * 2.0;
    let fig_h = config.figure.height;
    let mut canvas = Canvas::new(fig_w, fig_h)?;

    let x_min = artifact.x[0];
    let x_max = artifact.x[n - 1];
    let x_axis = if artifact.is_continuous {
        Axis::clamped(x_min, x_max, 6)
    } else {
        Axis::integer(x_min, x_max, config.distribution.max_integer_ticks)
    }
    .with_label("x");

    let y_max = artifact.y_prop.iter().copied().filter(|v| v.is_finite()).fold(0.0_f64, f64::max);
    let (prop_name, prop_label) = if artifact.is_continuous {
        ("PDF", "Probability Density")
    } else {
        ("PMF", "Probability Mass")
    };
    let prop_axis = Axis::auto_linear(0.0, y_max * 1.05, 5).with_label(prop_label);
    let cdf_axis = Axis::clamped(0.0, 1.05, 6).with_label("Cumulative Probability");

    let suptitle = suptitle_text(artifact);
    let top = suptitle_height(&suptitle, config);
    draw_suptitle(&mut canvas, &suptitle, config);

    let margins = Margins::for_axes(&canvas, Some(&prop_axis), Some(&x_axis), true, config)
        .union(Margins::for_axes(&canvas, Some(&cdf_axis), Some(&x_axis), true, config));
    let row = PanelRow::new(0.0, top, fig_w, fig_h - top, 10.0, 2, margins);
    let (prop_area, cdf_area) = (row.panels[0], row.panels[1]);

    // --- Left: PDF/PMF ---
    draw_axes(&mut canvas, &prop_area, &x_axis, &prop_axis, config);
    draw_panel_title(&mut canvas, &prop_area, "PDF/PMF", config);

    let color = config.colors.density;
    canvas.push_clip(prop_area.left, prop_area.top, prop_area.width, prop_area.height);
    let px: Vec<f64> =
        artifact.x.iter().map(|&x| x_axis.data_to_pixel(x, prop_area.left, prop_area.right())).collect();
    let base = prop_axis.data_to_pixel(0.0, prop_area.bottom(), prop_area.top);
    let py: Vec<f64> = artifact
        .y_prop
        .iter()
        .map(|&y| prop_axis.data_to_pixel(y, prop_area.bottom(), prop_area.top))
        .collect();
    if artifact.is_continuous {
        canvas.fill_between(&px, &vec![base; n], &py, &Style::filled(color.with_alpha(config.distribution.fill_alpha)));
        let points: Vec<(f64, f64)> = px.iter().copied().zip(py.iter().copied()).collect();
        canvas.polyline(&points, &LineStyle::solid(color, 1.5));
    } else {
        let stem = LineStyle::solid(color, 1.2);
        let head = MarkerStyle { color, size: 2.5, ..Default::default() };
        for (&x, &y) in px.iter().zip(&py) {
            canvas.line(x, base, x, y, &stem);
            canvas.marker(x, y, &head);
        }
    }

    let mut entries = vec![LegendEntry::new(
        prop_name,
        color,
        if artifact.is_continuous { LegendKind::Line(None) } else { LegendKind::Marker },
    )];
    if config.distribution.show_moments {
        if let Some(mean) = artifact.mean {
            draw_vline(&mut canvas, &prop_area, &x_axis, mean, &LineStyle::dashed(config.colors.mean, 1.2));
            entries.push(LegendEntry::new("Mean", config.colors.mean, LegendKind::Line(Some("6 3".into()))));
        }
        if let Some((lo, hi)) = artifact.std_band() {
            let std_style = LineStyle::dashed(config.colors.std, 1.2);
            draw_vline(&mut canvas, &prop_area, &x_axis, lo, &std_style);
            draw_vline(&mut canvas, &prop_area, &x_axis, hi, &std_style);
            entries.push(LegendEntry::new(
                "Mean \u{00B1} 1 Std",
                config.colors.std,
                LegendKind::Line(Some("6 3".into())),
            ));
        }
    }
    canvas.pop_clip();
    legend::draw_legend(&mut canvas, &prop_area, &entries, config.font.size, LegendPosition::TopRight);

    // --- Right: CDF ---
    draw_axes(&mut canvas, &cdf_area, &x_axis, &cdf_axis, config);
    draw_panel_title(&mut canvas, &cdf_area, "CDF", config);

    canvas.push_clip(cdf_area.left, cdf_area.top, cdf_area.width, cdf_area.height);
    let to_px = |x: f64, y: f64| {
        (
            x_axis.data_to_pixel(x, cdf_area.left, cdf_area.right()),
            cdf_axis.data_to_pixel(y, cdf_area.bottom(), cdf_area.top),
        )
    };
    let points: Vec<(f64, f64)> = if artifact.is_continuous {
        artifact.x.iter().zip(&artifact.y_cdf).map(|(&x, &y)| to_px(x, y)).collect()
    } else {
        step_post(&artifact.x, &artifact.y_cdf, x_axis.max).into_iter().map(|(x, y)| to_px(x, y)).collect()
    };
    canvas.polyline(&points, &LineStyle::solid(config.colors.cdf, 2.0));
    canvas.pop_clip();
    legend::draw_legend(
        &mut canvas,
        &cdf_area,
        &[LegendEntry::new("CDF", config.colors.cdf, LegendKind::Line(None))],
        config.font.size,
        LegendPosition::BottomRight,
    );

    Ok(canvas.finish_svg())
}

/// `"{title} (Mean=…, Std=…)"`, with undefined moments spelled out.
fn suptitle_text(artifact: &DistributionPlotArtifact) -> String {
    let fmt = |v: Option<f64>| v.map_or_else(|| "undefined".to_string(), |v| format!("{v:.2}"));
    format!("{} (Mean={}, Std={})", artifact.title, fmt(artifact.mean), fmt(artifact.std))
}

/// Right-continuous staircase: each value holds until the next abscissa, the
/// last one until `x_end`.
fn step_post(x: &[f64], y: &[f64], x_end: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(2 * x.len());
    for (i, (&xi, &yi)) in x.iter().zip(y).enumerate() {
        out.push((xi, yi));
        let next = x.get(i + 1).copied().unwrap_or(x_end.max(xi));
        out.push((next, yi));
    }
    out
}

fn empty_svg() -> String {
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><text x="10" y="30">No distribution data</text></svg>"#.into()
}
