use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` (leading `#` optional). Malformed channels read as 0.
    pub fn hex(s: &str) -> Self {
        let s = s.trim().strip_prefix('#').unwrap_or(s.trim());
        let channel = |i: usize| s.get(i..i + 2).and_then(|c| u8::from_str_radix(c, 16).ok());
        Self { r: channel(0).unwrap_or(0), g: channel(2).unwrap_or(0), b: channel(4).unwrap_or(0), a: 1.0 }
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            self.to_hex()
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation between two colors (for colormaps).
    pub fn lerp(a: Color, b: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: (a.r as f64 * (1.0 - t) + b.r as f64 * t).round() as u8,
            g: (a.g as f64 * (1.0 - t) + b.g as f64 * t).round() as u8,
            b: (a.b as f64 * (1.0 - t) + b.b as f64 * t).round() as u8,
            a: a.a * (1.0 - t) + b.a * t,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Color::hex(&s))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

// --- Palettes ---

pub const PROBVIZ: &[&str] = &[
    "#1f77b4", "#d62728", "#ff7f0e", "#2ca02c", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

pub const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

pub fn palette_colors(name: &str) -> Vec<Color> {
    let strs = match name {
        "tableau10" => TABLEAU10,
        _ => PROBVIZ,
    };
    strs.iter().map(|s| Color::hex(s)).collect()
}

// --- Sequential colormaps for density heatmaps ---

/// Viridis anchors at t = 0, 0.125, ..., 1.
const VIRIDIS: [&str; 9] = [
    "#440154", "#472d7b", "#3b528b", "#2c728e", "#21918c", "#28ae80", "#5ec962", "#addc30",
    "#fde725",
];

/// Greyscale-friendly blues, white to navy.
const BLUES: [&str; 5] = ["#f7fbff", "#c6dbef", "#6baed6", "#2171b5", "#08306b"];

fn piecewise(anchors: &[&str], t: f64) -> Color {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let segments = (anchors.len() - 1) as f64;
    let pos = t * segments;
    let i = (pos.floor() as usize).min(anchors.len() - 2);
    Color::lerp(Color::hex(anchors[i]), Color::hex(anchors[i + 1]), pos - i as f64)
}

/// Viridis sequential colormap, `t` in `[0, 1]`.
pub fn viridis(t: f64) -> Color {
    piecewise(&VIRIDIS, t)
}

/// Sequential colormap by name (`viridis` or `blues`; anything else is viridis).
pub fn colormap(name: &str, t: f64) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "blues" => piecewise(&BLUES, t),
        _ => viridis(t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Color::hex("#1D4ED8");
        assert_eq!(c.r, 0x1D);
        assert_eq!(c.g, 0x4E);
        assert_eq!(c.b, 0xD8);
        assert!((c.a - 1.0).abs() < 1e-9);
    }

    #[test]
    fn hex_malformed() {
        assert_eq!(Color::hex("#12"), Color::rgb(0x12, 0, 0));
        assert_eq!(Color::hex(""), Color::rgb(0, 0, 0));
    }

    #[test]
    fn svg_fill_alpha() {
        let c = Color::rgb(29, 78, 216).with_alpha(0.5);
        assert_eq!(c.to_svg_fill(), "rgba(29,78,216,0.500)");
        assert_eq!(c.to_hex(), "#1d4ed8");
    }

    #[test]
    fn palette_lookup() {
        assert_eq!(palette_colors("probviz").len(), 8);
        assert_eq!(palette_colors("tableau10").len(), 10);
        assert_eq!(palette_colors("unknown"), palette_colors("probviz"));
    }

    #[test]
    fn viridis_endpoints() {
        assert_eq!(viridis(0.0), Color::hex("#440154"));
        assert_eq!(viridis(1.0), Color::hex("#fde725"));
        assert_eq!(viridis(0.5), Color::hex("#21918c"));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
        assert_eq!(viridis(7.0), viridis(1.0));
    }

    #[test]
    fn blues_by_name() {
        assert_eq!(colormap("Blues", 0.0), Color::hex("#f7fbff"));
        assert_eq!(colormap("viridis", 1.0), viridis(1.0));
    }
}
