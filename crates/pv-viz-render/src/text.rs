use crate::primitives::{FontWeight, TextStyle};

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Advance width of one glyph in em units, for a generic sans-serif face.
fn advance_em(ch: char) -> f64 {
    match ch {
        ' ' => 0.28,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.26,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' => 0.36,
        'm' | 'w' | 'M' | 'W' | '\u{2212}' | '\u{00B1}' => 0.84,
        c if c.is_ascii_digit() => 0.56,
        c if c.is_ascii_uppercase() => 0.66,
        c if c.is_ascii_lowercase() => 0.52,
        // Greek and other symbols
        _ => 0.6,
    }
}

/// Estimate text extents in points without loading font files.
pub fn measure_text(text: &str, size_pt: f64, weight: FontWeight) -> TextMetrics {
    let bold = if weight == FontWeight::Bold { 1.06 } else { 1.0 };
    let em: f64 = text.chars().map(advance_em).sum();
    TextMetrics { width: em * size_pt * bold, height: size_pt * 1.2, ascent: size_pt * 0.93 }
}

/// Measure text with a TextStyle.
pub fn measure_styled(text: &str, style: &TextStyle) -> TextMetrics {
    measure_text(text, style.size, style.weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_hello() {
        let m = measure_text("Hello", 12.0, FontWeight::Regular);
        assert!(m.width > 20.0);
        assert!(m.height > 8.0);
        assert!(m.ascent > 0.0);
    }

    #[test]
    fn bold_wider_than_regular() {
        let r = measure_text("Test", 12.0, FontWeight::Regular);
        let b = measure_text("Test", 12.0, FontWeight::Bold);
        assert!(b.width > r.width);
    }

    #[test]
    fn narrow_glyphs() {
        let narrow = measure_text("iiii", 10.0, FontWeight::Regular);
        let wide = measure_text("MMMM", 10.0, FontWeight::Regular);
        assert!(wide.width > 2.0 * narrow.width);
        assert_eq!(measure_text("", 10.0, FontWeight::Regular).width, 0.0);
    }
}
