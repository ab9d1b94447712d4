use pv_viz::Density2dArtifact;

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::header::{draw_panel_title, draw_suptitle, suptitle_height};
use crate::layout::axes::Axis;
use crate::layout::margins::{Margins, PlotArea};
use crate::layout::multi_panel::ColorbarLayout;
use crate::plots::axes_draw::draw_axes;
use crate::plots::colorbar::{draw_colorbar, level_fraction};
use crate::primitives::*;

const COLORBAR_WIDTH: f64 = 14.0;
/// Room right of the colorbar for its tick labels and caption.
const COLORBAR_LABEL_ROOM: f64 = 56.0;
const ELLIPSE_SEGMENTS: usize = 96;

/// Top-down heatmap of the joint density with 1σ/2σ covariance ellipses.
pub fn render(artifact: &Density2dArtifact, config: &VizConfig) -> crate::Result<String> {
    let (nx, ny) = (artifact.x.len(), artifact.y.len());
    if nx < 2 || ny < 2 || artifact.z.len() != ny || artifact.z.iter().any(|row| row.len() != nx) {
        return Ok(empty_svg());
    }

    let fig_w = config.figure.width + COLORBAR_LABEL_ROOM;
    let fig_h = config.figure.height;
    let mut canvas = Canvas::new(fig_w, fig_h)?;

    let x_axis = Axis::clamped(artifact.x[0], artifact.x[nx - 1], 6).with_label("X");
    let y_axis = Axis::clamped(artifact.y[0], artifact.y[ny - 1], 6).with_label("Y");

    let top = suptitle_height(&artifact.title, config);
    draw_suptitle(&mut canvas, &artifact.title, config);
    let mut margins = Margins::for_axes(&canvas, Some(&y_axis), Some(&x_axis), true, config);
    margins.right += COLORBAR_LABEL_ROOM;
    let panel = PlotArea::inset(0.0, top, fig_w, fig_h - top, margins);
    let layout = if config.heatmap.colorbar {
        ColorbarLayout::new(panel, COLORBAR_WIDTH, 10.0)
    } else {
        ColorbarLayout { main: panel, colorbar: panel }
    };
    let area = layout.main;

    let z_max = artifact.z_max();
    canvas.push_clip(area.left, area.top, area.width, area.height);
    let dx = (artifact.x[nx - 1] - artifact.x[0]) / (nx - 1) as f64;
    let dy = (artifact.y[ny - 1] - artifact.y[0]) / (ny - 1) as f64;
    for (row, &yc) in artifact.z.iter().zip(&artifact.y) {
        let py_hi = y_axis.data_to_pixel(yc + dy / 2.0, area.bottom(), area.top);
        let py_lo = y_axis.data_to_pixel(yc - dy / 2.0, area.bottom(), area.top);
        for (&z, &xc) in row.iter().zip(&artifact.x) {
            let px_lo = x_axis.data_to_pixel(xc - dx / 2.0, area.left, area.right());
            let px_hi = x_axis.data_to_pixel(xc + dx / 2.0, area.left, area.right());
            let color = config.colormap_at(level_fraction(z, z_max, config.heatmap.levels));
            // slight overlap hides hairline seams between cells
            canvas.rect(px_lo, py_hi, px_hi - px_lo + 0.3, py_lo - py_hi + 0.3, &Style::filled(color));
        }
    }

    if config.heatmap.mark_mean {
        let [mx, my] = artifact.mean;
        let px = x_axis.data_to_pixel(mx, area.left, area.right());
        let py = y_axis.data_to_pixel(my, area.bottom(), area.top);
        let contour = LineStyle::solid(config.colors.contour.with_alpha(0.6), 0.8);
        for k in [1.0, 2.0] {
            let pts: Vec<(f64, f64)> = covariance_ellipse(artifact.mean, artifact.covariance, k)
                .into_iter()
                .map(|(x, y)| {
                    (x_axis.data_to_pixel(x, area.left, area.right()), y_axis.data_to_pixel(y, area.bottom(), area.top))
                })
                .collect();
            canvas.polyline(&pts, &contour);
        }
        canvas.marker(
            px,
            py,
            &MarkerStyle { shape: MarkerShape::Square, size: 2.0, color: config.colors.contour },
        );
    }
    canvas.pop_clip();

    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);
    draw_panel_title(&mut canvas, &area, "Top-down View", config);
    if config.heatmap.colorbar {
        draw_colorbar(&mut canvas, &layout.colorbar, z_max, "Probability Density", config);
    }

    Ok(canvas.finish_svg())
}

/// Closed `k`-sigma ellipse of a 2×2 covariance around `mean`; empty when the
/// covariance is not positive-definite.
fn covariance_ellipse(mean: [f64; 2], cov: [[f64; 2]; 2], k: f64) -> Vec<(f64, f64)> {
    let (a, b, c) = (cov[0][0], 0.5 * (cov[0][1] + cov[1][0]), cov[1][1]);
    let half_trace = 0.5 * (a + c);
    let radius = (0.25 * (a - c).powi(2) + b * b).sqrt();
    let (l1, l2) = (half_trace + radius, half_trace - radius);
    if !(l1.is_finite() && l2.is_finite()) || l2 <= 0.0 {
        return Vec::new();
    }
    let theta = 0.5 * (2.0 * b).atan2(a - c);
    let (s1, s2) = (k * l1.sqrt(), k * l2.sqrt());
    let (sin, cos) = theta.sin_cos();
    (0..=ELLIPSE_SEGMENTS)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / ELLIPSE_SEGMENTS as f64;
            let (u, v) = (s1 * t.cos(), s2 * t.sin());
            (mean[0] + u * cos - v * sin, mean[1] + u * sin + v * cos)
        })
        .collect()
}

fn empty_svg() -> String {
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><text x="10" y="30">No density grid</text></svg>"#.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_prob::MultivariateNormal;

    fn artifact() -> Density2dArtifact {
        let mvn = MultivariateNormal::from_rows(&[1.0, -1.0], &[vec![1.0, 0.5], vec![0.5, 2.0]]).unwrap();
        Density2dArtifact::compute(&mvn, "Bivariate Normal").unwrap()
    }

    #[test]
    fn heatmap_cells_and_colorbar() {
        let svg = render(&artifact(), &VizConfig::default()).unwrap();
        assert!(svg.contains("Bivariate Normal"));
        assert!(svg.contains(">Probability Density</text>"));
        // 100×100 cells + colorbar bands + legend-free background
        assert!(svg.matches("<rect").count() >= 100 * 100);
    }

    #[test]
    fn no_colorbar() {
        let mut config = VizConfig::default();
        config.heatmap.colorbar = false;
        let svg = render(&artifact(), &config).unwrap();
        assert!(!svg.contains(">Probability Density</text>"));
    }

    #[test]
    fn ellipse_of_identity_is_circle() {
        let pts = covariance_ellipse([0.0, 0.0], [[1.0, 0.0], [0.0, 1.0]], 2.0);
        assert_eq!(pts.len(), ELLIPSE_SEGMENTS + 1);
        assert!(pts.iter().all(|(x, y)| (x.hypot(*y) - 2.0).abs() < 1e-9));
    }

    #[test]
    fn ellipse_of_singular_cov_is_empty() {
        assert!(covariance_ellipse([0.0, 0.0], [[1.0, 1.0], [1.0, 1.0]], 1.0).is_empty());
    }

    #[test]
    fn ragged_grid_is_placeholder() {
        let mut art = artifact();
        art.z[3].pop();
        assert!(render(&art, &VizConfig::default()).unwrap().contains("No density grid"));
    }
}
