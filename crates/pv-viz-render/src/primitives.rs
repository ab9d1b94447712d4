//! Drawing styles shared by the chart renderers.

use crate::color::Color;

/// Area style: bars, heatmap cells, boxes, marker bodies.
#[derive(Debug, Clone)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: None, stroke: None, stroke_width: 1.0 }
    }
}

impl Style {
    /// Solid area without an outline.
    pub fn filled(color: Color) -> Self {
        Self { fill: Some(color), ..Default::default() }
    }

    /// Histogram bar: translucent body, opaque edge.
    pub fn outlined(color: Color, fill_alpha: f64) -> Self {
        Self { fill: Some(color.with_alpha(fill_alpha)), stroke: Some(color), stroke_width: 0.6 }
    }

    /// White note box with a light grey border, drawn over plot content.
    pub fn note_box(fill_alpha: f64) -> Self {
        Self {
            fill: Some(Color::rgb(255, 255, 255).with_alpha(fill_alpha)),
            stroke: Some(Color::rgb(200, 200, 200)),
            stroke_width: 0.5,
        }
    }
}

/// Stroke for curves, stems, guides and axis lines.
#[derive(Debug, Clone)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    /// SVG `stroke-dasharray`.
    pub dash: Option<String>,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::solid(Color::rgb(0, 0, 0), 1.0)
    }
}

impl LineStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dash: None }
    }

    /// Mean and ±σ markers, reference diagonals.
    pub fn dashed(color: Color, width: f64) -> Self {
        Self { color, width, dash: Some("6 3".into()) }
    }
}

#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub weight: FontWeight,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            color: Color::rgb(0, 0, 0),
            weight: FontWeight::Regular,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }
}

impl TextStyle {
    pub fn centered(size: f64) -> Self {
        Self { size, anchor: TextAnchor::Middle, ..Default::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Horizontal alignment, as SVG `text-anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Vertical alignment, as SVG `dominant-baseline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Central,
    Hanging,
}

impl TextBaseline {
    pub fn as_str(&self) -> &str {
        match self {
            TextBaseline::Alphabetic => "auto",
            TextBaseline::Central => "central",
            TextBaseline::Hanging => "hanging",
        }
    }
}

/// Solid point marker: stem heads, PIT trace points, legend swatches.
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    /// Radius (circle) or half side (square), in points.
    pub size: f64,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self { shape: MarkerShape::Circle, size: 3.0, color: Color::rgb(0, 0, 0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outlined_bar_keeps_opaque_edge() {
        let c = Color::rgb(10, 20, 30);
        let s = Style::outlined(c, 0.4);
        assert_eq!(s.stroke, Some(c));
        assert_eq!(s.fill, Some(c.with_alpha(0.4)));
    }

    #[test]
    fn test_svg_alignment_names() {
        assert_eq!(TextAnchor::End.as_str(), "end");
        assert_eq!(TextBaseline::Alphabetic.as_str(), "auto");
        assert!(LineStyle::default().dash.is_none());
        assert_eq!(LineStyle::dashed(Color::rgb(0, 0, 0), 1.0).dash.as_deref(), Some("6 3"));
    }
}
