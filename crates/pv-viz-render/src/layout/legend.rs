use crate::canvas::Canvas;
use crate::color::Color;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub kind: LegendKind,
}

impl LegendEntry {
    pub fn new(label: impl Into<String>, color: Color, kind: LegendKind) -> Self {
        Self { label: label.into(), color, kind }
    }
}

pub enum LegendKind {
    FilledRect,
    Line(Option<String>), // dash pattern
    Marker,
}

/// Corner of the plot area the legend box is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    TopRight,
    TopLeft,
    BottomRight,
}

/// Draw a legend in the plot area.
pub fn draw_legend(
    canvas: &mut Canvas,
    area: &PlotArea,
    entries: &[LegendEntry],
    config_font_size: f64,
    position: LegendPosition,
) {
    if entries.is_empty() {
        return;
    }

    let row_height = config_font_size + 4.0;
    let swatch_w = 14.0;
    let swatch_h = config_font_size - 2.0;
    let gap = 6.0;
    let padding = 5.0;

    let text_style = TextStyle {
        size: config_font_size * 0.85,
        baseline: TextBaseline::Central,
        ..Default::default()
    };

    let max_w = entries
        .iter()
        .map(|e| canvas.measure_text(&e.label, &text_style).width)
        .fold(0.0_f64, f64::max);

    let legend_w = padding + swatch_w + gap + max_w + padding;
    let legend_h = padding + entries.len() as f64 * row_height + padding;

    let (lx, ly) = match position {
        LegendPosition::TopRight => (area.right() - legend_w - 5.0, area.top + 5.0),
        LegendPosition::TopLeft => (area.left + 5.0, area.top + 5.0),
        LegendPosition::BottomRight => {
            (area.right() - legend_w - 5.0, area.bottom() - legend_h - 5.0)
        }
    };

    let bg_style = Style::note_box(0.85);
    canvas.rect(lx, ly, legend_w, legend_h, &bg_style);

    for (i, entry) in entries.iter().enumerate() {
        let ey = ly + padding + i as f64 * row_height + row_height / 2.0;
        let sx = lx + padding;

        match entry.kind {
            LegendKind::FilledRect => {
                canvas.rect(
                    sx,
                    ey - swatch_h / 2.0,
                    swatch_w,
                    swatch_h,
                    &Style::outlined(entry.color, 0.6),
                );
            }
            LegendKind::Line(ref dash) => {
                let ls = LineStyle { color: entry.color, width: 1.5, dash: dash.clone() };
                canvas.line(sx, ey, sx + swatch_w, ey, &ls);
            }
            LegendKind::Marker => {
                canvas.marker(
                    sx + swatch_w / 2.0,
                    ey,
                    &MarkerStyle { color: entry.color, size: 3.0, ..Default::default() },
                );
            }
        }

        canvas.text(sx + swatch_w + gap, ey, &entry.label, &text_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_rendered() {
        let mut canvas = Canvas::new(300.0, 200.0).unwrap();
        let area = PlotArea::manual(20.0, 20.0, 260.0, 160.0);
        let entries = [
            LegendEntry::new("PDF", Color::rgb(0, 0, 255), LegendKind::Line(None)),
            LegendEntry::new("Mean", Color::rgb(255, 165, 0), LegendKind::Line(Some("6 3".into()))),
            LegendEntry::new("Samples", Color::rgb(135, 206, 235), LegendKind::FilledRect),
        ];
        draw_legend(&mut canvas, &area, &entries, 10.0, LegendPosition::TopLeft);
        let svg = canvas.finish_svg();
        assert!(svg.contains(">PDF</text>"));
        assert!(svg.contains(">Samples</text>"));
        assert!(svg.contains(r#"stroke-dasharray="6 3""#));
    }

    #[test]
    fn empty_legend_draws_nothing() {
        let mut canvas = Canvas::new(300.0, 200.0).unwrap();
        let area = PlotArea::manual(20.0, 20.0, 260.0, 160.0);
        draw_legend(&mut canvas, &area, &[], 10.0, LegendPosition::TopRight);
        assert!(!canvas.finish_svg().contains("<text"));
    }
}
