use pv_viz::SimplexDensityArtifact;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::header::{draw_panel_title, draw_suptitle, suptitle_height};
use crate::layout::axes::Axis;
use crate::layout::margins::{Margins, PlotArea};
use crate::layout::multi_panel::ColorbarLayout;
use crate::plots::axes_draw::draw_axes;
use crate::plots::colorbar::{draw_colorbar, level_fraction};
use crate::primitives::*;

/// Share of finite cells below the colormap ceiling; boundary spikes above it saturate.
const COLOR_QUANTILE: f64 = 0.99;

/// Masked heatmap over the simplex projected onto `(x₁, x₂)`.
pub fn render(artifact: &SimplexDensityArtifact, config: &VizConfig) -> crate::Result<String> {
    let n = artifact.resolution;
    if n < 2 || artifact.x.len() != n || artifact.y.len() != n || artifact.z.len() != n {
        return Ok(empty_svg());
    }

    // square plot area plus the colorbar strip
    let fig_h = config.figure.height;
    let fig_w = fig_h + 110.0;
    let mut canvas = Canvas::new(fig_w, fig_h)?;

    let x_axis = Axis::clamped(0.0, 1.0, 6).with_label("x\u{2081}");
    let y_axis = Axis::clamped(0.0, 1.0, 6).with_label("x\u{2082}");

    let top = suptitle_height(&artifact.title, config);
    draw_suptitle(&mut canvas, &artifact.title, config);
    let mut margins = Margins::for_axes(&canvas, Some(&y_axis), Some(&x_axis), true, config);
    margins.right += 56.0;
    let panel = PlotArea::inset(0.0, top, fig_w, fig_h - top, margins);
    let layout = ColorbarLayout::new(panel, 14.0, 10.0);
    let area = layout.main;

    let z_cap = color_ceiling(artifact);
    let step = 1.0 / (n - 1) as f64;
    canvas.push_clip(area.left, area.top, area.width, area.height);
    for (row, &yc) in artifact.z.iter().zip(&artifact.y) {
        let py_hi = y_axis.data_to_pixel(yc + step / 2.0, area.bottom(), area.top);
        let py_lo = y_axis.data_to_pixel(yc - step / 2.0, area.bottom(), area.top);
        for (cell, &xc) in row.iter().zip(&artifact.x) {
            let Some(z) = cell else { continue };
            let px_lo = x_axis.data_to_pixel(xc - step / 2.0, area.left, area.right());
            let px_hi = x_axis.data_to_pixel(xc + step / 2.0, area.left, area.right());
            let color = config.colormap_at(level_fraction(*z, z_cap, config.heatmap.levels));
            canvas.rect(px_lo, py_hi, px_hi - px_lo + 0.3, py_lo - py_hi + 0.3, &Style::filled(color));
        }
    }
    canvas.pop_clip();

    // simplex boundary
    let corners = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)].map(|(x, y)| {
        (x_axis.data_to_pixel(x, area.left, area.right()), y_axis.data_to_pixel(y, area.bottom(), area.top))
    });
    canvas.polyline(&corners, &LineStyle::solid(config.colors.contour, 1.0));

    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);
    draw_panel_title(&mut canvas, &area, &format!("{} valid cells", artifact.valid_cells), config);

    let note = TextStyle {
        size: config.font.size * 0.9,
        color: Color::rgb(60, 60, 60),
        anchor: TextAnchor::End,
        ..Default::default()
    };
    canvas.text(area.right() - 6.0, area.top + 6.0 + note.size, "x\u{2083} = 1 \u{2212} x\u{2081} \u{2212} x\u{2082}", &note);

    draw_colorbar(&mut canvas, &layout.colorbar, z_cap, "Density", config);

    Ok(canvas.finish_svg())
}

/// Colormap ceiling: the 99th percentile of the finite cell values.
fn color_ceiling(artifact: &SimplexDensityArtifact) -> f64 {
    let mut values: Vec<f64> =
        artifact.z.iter().flatten().flatten().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let idx = ((values.len() - 1) as f64 * COLOR_QUANTILE).round() as usize;
    values[idx]
}

fn empty_svg() -> String {
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><text x="10" y="30">No simplex data</text></svg>"#.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_prob::Dirichlet;

    #[test]
    fn masked_cells_are_skipped() {
        let art = SimplexDensityArtifact::compute(&Dirichlet::new([1.0, 1.0, 1.0]).unwrap(), 100, "Uniform");
        let svg = render(&art, &VizConfig::default()).unwrap();
        assert!(svg.contains("55 valid cells"));
        // background + 55 cells + colorbar bands
        let bands = VizConfig::default().heatmap.levels;
        assert_eq!(svg.matches("<rect").count(), 1 + 55 + bands);
    }

    #[test]
    fn ceiling_ignores_spikes() {
        let art = SimplexDensityArtifact::compute(&Dirichlet::new([0.5, 2.0, 2.0]).unwrap(), 400, "Spiky");
        let cap = color_ceiling(&art);
        assert!(cap > 0.0);
        assert!(cap <= art.z_max());
    }

    #[test]
    fn wrong_shape_is_placeholder() {
        let mut art = SimplexDensityArtifact::compute(&Dirichlet::new([2.0, 2.0, 2.0]).unwrap(), 25, "x");
        art.z.pop();
        assert!(render(&art, &VizConfig::default()).unwrap().contains("No simplex data"));
    }
}
