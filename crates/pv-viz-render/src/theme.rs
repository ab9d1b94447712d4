use crate::color::Color;
use crate::config::*;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTheme {
    ProbViz,
    Minimal,
}

impl BuiltinTheme {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "minimal" => Self::Minimal,
            _ => Self::ProbViz,
        }
    }

    pub fn base_config(self) -> VizConfig {
        match self {
            Self::ProbViz => probviz(),
            Self::Minimal => minimal(),
        }
    }
}

fn probviz() -> VizConfig {
    VizConfig {
        theme: "probviz".into(),
        figure: FigureConfig::default(),
        font: FontConfig::default(),
        axes: AxesConfig::default(),
        grid: GridConfig::default(),
        colors: ColorsConfig::default(),
        palette: "probviz".into(),
        colormap: "viridis".into(),
        distribution: DistributionConfig::default(),
        pit: PitConfig::default(),
        heatmap: HeatmapConfig::default(),
        output: OutputConfig::default(),
    }
}

fn minimal() -> VizConfig {
    VizConfig {
        theme: "minimal".into(),
        figure: FigureConfig { width: 432.0, height: 302.4 },
        font: FontConfig {
            size: 9.0,
            label_size: 10.0,
            tick_size: 8.0,
            title_size: 10.5,
            suptitle_size: 12.0,
        },
        axes: AxesConfig {
            tick_direction: "in".into(),
            show_top_ticks: true,
            show_right_ticks: true,
            tick_length: 4.0,
            minor_tick_length: 2.0,
        },
        grid: GridConfig { show: false, ..GridConfig::default() },
        colors: ColorsConfig {
            density: Color::hex("#4e79a7"),
            cdf: Color::hex("#e15759"),
            mean: Color::hex("#f28e2b"),
            std: Color::hex("#59a14f"),
            samples: Color::hex("#76b7b2"),
            transformed: Color::hex("#edc948"),
            reference: Color::hex("#e15759"),
            traces: vec![Color::hex("#e15759"), Color::hex("#59a14f"), Color::hex("#b07aa1")],
            contour: Color::hex("#333333"),
        },
        palette: "tableau10".into(),
        colormap: "blues".into(),
        heatmap: HeatmapConfig { levels: 0, ..HeatmapConfig::default() },
        ..probviz()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fallback() {
        assert_eq!(BuiltinTheme::parse("Minimal "), BuiltinTheme::Minimal);
        assert_eq!(BuiltinTheme::parse("atlas"), BuiltinTheme::ProbViz);
    }

    #[test]
    fn minimal_overrides() {
        let c = BuiltinTheme::Minimal.base_config();
        assert_eq!(c.theme, "minimal");
        assert_eq!(c.heatmap.levels, 0);
        assert_eq!(c.pit.uniform_y_max, PitConfig::default().uniform_y_max);
    }
}
