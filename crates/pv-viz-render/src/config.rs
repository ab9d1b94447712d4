use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use crate::color::Color;
use crate::theme::BuiltinTheme;

/// Top-level visualization configuration (YAML or programmatic).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub colors: ColorsConfig,
    pub palette: String,
    pub colormap: String,
    pub distribution: DistributionConfig,
    pub pit: PitConfig,
    pub heatmap: HeatmapConfig,
    pub output: OutputConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::ProbViz.base_config()
    }
}

impl VizConfig {
    pub fn palette_colors(&self) -> Vec<Color> {
        crate::color::palette_colors(&self.palette)
    }

    /// Colormap lookup for heatmaps.
    pub fn colormap_at(&self, t: f64) -> Color {
        crate::color::colormap(&self.colormap, t)
    }
}

/// Size of one panel; multi-panel figures scale the width by the panel count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 504.0,  // 7" * 72
            height: 360.0, // 5" * 72
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    pub title_size: f64,
    pub suptitle_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { size: 10.0, label_size: 11.0, tick_size: 8.5, title_size: 12.0, suptitle_size: 15.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
    pub minor_tick_length: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "out".into(),
            show_top_ticks: false,
            show_right_ticks: false,
            tick_length: 4.0,
            minor_tick_length: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: true, color: Color::hex("#b0b0b0"), alpha: 0.3 }
    }
}

/// Named colors for the roles a plot element can play.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub density: Color,
    pub cdf: Color,
    pub mean: Color,
    pub std: Color,
    pub samples: Color,
    pub transformed: Color,
    pub reference: Color,
    pub traces: Vec<Color>,
    pub contour: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            density: Color::hex("#1f77b4"),
            cdf: Color::hex("#d62728"),
            mean: Color::hex("#ff7f0e"),
            std: Color::hex("#2ca02c"),
            samples: Color::hex("#87ceeb"),
            transformed: Color::hex("#ffa500"),
            reference: Color::hex("#d62728"),
            traces: vec![Color::hex("#d62728"), Color::hex("#2ca02c"), Color::hex("#800080")],
            contour: Color::hex("#000000"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    pub fill_alpha: f64,
    pub show_moments: bool,
    /// Discrete x-axes get one tick per integer up to this many points.
    pub max_integer_ticks: usize,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self { fill_alpha: 0.3, show_moments: true, max_integer_ticks: 25 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PitConfig {
    pub histogram_alpha: f64,
    pub uniform_y_max: f64,
    pub show_ks: bool,
}

impl Default for PitConfig {
    fn default() -> Self {
        Self { histogram_alpha: 0.7, uniform_y_max: 1.5, show_ks: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Number of filled levels; 0 draws a continuous colormap.
    pub levels: usize,
    pub colorbar: bool,
    pub mark_mean: bool,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self { levels: 20, colorbar: true, mark_mean: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: "svg".into() }
    }
}

/// Resolve a VizConfig from optional YAML string.
/// Priority: user YAML overrides → base config of the theme the YAML names.
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    let Some(yaml) = user_yaml else {
        return Ok(VizConfig::default());
    };
    let user: Value =
        serde_yaml_ng::from_str(yaml).map_err(|e| crate::RenderError::Config(e.to_string()))?;
    if user.is_null() {
        return Ok(VizConfig::default());
    }
    if !user.is_mapping() {
        return Err(crate::RenderError::Config("top-level YAML must be a mapping".into()));
    }

    let theme = user.get("theme").and_then(Value::as_str).unwrap_or("probviz").to_owned();
    let base = BuiltinTheme::parse(&theme).base_config();
    let mut merged =
        serde_yaml_ng::to_value(&base).map_err(|e| crate::RenderError::Config(e.to_string()))?;
    merge(&mut merged, user);
    tracing::debug!(theme = theme.as_str(), "visualization config resolved");
    serde_yaml_ng::from_value(merged).map_err(|e| crate::RenderError::Config(e.to_string()))
}

/// Deep-merge `overlay` into `base`; mappings merge key by key, anything else replaces.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(b), Value::Mapping(o)) => {
            for (k, v) in o {
                match b.get_mut(&k) {
                    Some(slot) => merge(slot, v),
                    None => {
                        b.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_probviz() {
        let c = resolve_config(None).unwrap();
        assert_eq!(c.theme, "probviz");
        assert!(c.grid.show);
    }

    #[test]
    fn theme_base_with_overrides() {
        let yaml = "theme: minimal\nfont:\n  tick_size: 12\n";
        let c = resolve_config(Some(yaml)).unwrap();
        assert_eq!(c.theme, "minimal");
        assert_eq!(c.font.tick_size, 12.0);
        // untouched keys keep the minimal theme values
        assert_eq!(c.font.label_size, BuiltinTheme::Minimal.base_config().font.label_size);
        assert!(!c.grid.show);
    }

    #[test]
    fn colors_from_hex() {
        let yaml = "colors:\n  density: '#000080'\n";
        let c = resolve_config(Some(yaml)).unwrap();
        assert_eq!(c.colors.density, Color::rgb(0, 0, 0x80));
        assert_eq!(c.colors.cdf, ColorsConfig::default().cdf);
    }

    #[test]
    fn empty_yaml_is_default() {
        let c = resolve_config(Some("")).unwrap();
        assert_eq!(c.theme, "probviz");
    }

    #[test]
    fn invalid_yaml() {
        assert!(matches!(
            resolve_config(Some("figure: [1, 2")),
            Err(crate::RenderError::Config(_))
        ));
        assert!(matches!(resolve_config(Some("- a\n- b\n")), Err(crate::RenderError::Config(_))));
    }
}
