use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Vertical space reserved for a figure title, 0 when there is none.
pub fn suptitle_height(title: &str, config: &VizConfig) -> f64 {
    if title.trim().is_empty() { 0.0 } else { config.font.suptitle_size * 1.3 + 10.0 }
}

/// Draw the figure title centered across the canvas.
pub fn draw_suptitle(canvas: &mut Canvas, title: &str, config: &VizConfig) {
    if title.trim().is_empty() {
        return;
    }
    let style = TextStyle {
        size: config.font.suptitle_size,
        weight: FontWeight::Bold,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };
    canvas.text(canvas.width / 2.0, 8.0, title, &style);
}

/// Draw a panel title just above the plot area.
pub fn draw_panel_title(canvas: &mut Canvas, area: &PlotArea, title: &str, config: &VizConfig) {
    if title.is_empty() {
        return;
    }
    let style = TextStyle {
        size: config.font.title_size,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Alphabetic,
        ..Default::default()
    };
    canvas.text(area.left + area.width / 2.0, area.top - 7.0, title, &style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_takes_no_space() {
        let config = VizConfig::default();
        assert_eq!(suptitle_height("  ", &config), 0.0);
        assert!(suptitle_height("Normal", &config) > config.font.suptitle_size);
    }

    #[test]
    fn suptitle_is_bold_and_centered() {
        let mut canvas = Canvas::new(400.0, 300.0).unwrap();
        draw_suptitle(&mut canvas, "Gamma Distribution", &VizConfig::default());
        let svg = canvas.finish_svg();
        assert!(svg.contains(r#"x="200.00""#));
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains("Gamma Distribution"));
    }
}
