use crate::layout::margins::{Margins, PlotArea};

/// Side-by-side panels of equal width (distribution: PDF + CDF; PIT: three panels).
#[derive(Debug, Clone)]
pub struct PanelRow {
    pub panels: Vec<PlotArea>,
}

impl PanelRow {
    /// Split `total_width` starting at `x` into `n` equal cells separated by
    /// `gap`, then inset each cell by `margins`.
    pub fn new(
        x: f64,
        top: f64,
        total_width: f64,
        height: f64,
        gap: f64,
        n: usize,
        margins: Margins,
    ) -> Self {
        let n = n.max(1);
        let cell_w = (total_width - gap * (n - 1) as f64) / n as f64;
        let panels = (0..n)
            .map(|i| {
                let cx = x + i as f64 * (cell_w + gap);
                PlotArea::inset(cx, top, cell_w, height, margins)
            })
            .collect();
        Self { panels }
    }
}

/// Plot area with a colorbar strip to its right (density heatmaps).
#[derive(Debug, Clone)]
pub struct ColorbarLayout {
    pub main: PlotArea,
    pub colorbar: PlotArea,
}

impl ColorbarLayout {
    pub fn new(main: PlotArea, bar_width: f64, gap: f64) -> Self {
        let shrunk = PlotArea::manual(main.left, main.top, main.width - bar_width - gap, main.height);
        Self {
            colorbar: PlotArea::manual(shrunk.right() + gap, main.top, bar_width, main.height),
            main: shrunk,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_MARGINS: Margins = Margins { left: 0.0, top: 0.0, right: 0.0, bottom: 0.0 };

    #[test]
    fn three_equal_panels() {
        let row = PanelRow::new(0.0, 10.0, 320.0, 200.0, 10.0, 3, NO_MARGINS);
        assert_eq!(row.panels.len(), 3);
        assert!((row.panels[0].width - 100.0).abs() < 1e-9);
        assert!((row.panels[1].left - 110.0).abs() < 1e-9);
        assert!((row.panels[2].right() - 320.0).abs() < 1e-9);
    }

    #[test]
    fn colorbar_right_of_main() {
        let layout = ColorbarLayout::new(PlotArea::manual(10.0, 10.0, 300.0, 200.0), 15.0, 10.0);
        assert!((layout.main.width - 275.0).abs() < 1e-9);
        assert!((layout.colorbar.left - 295.0).abs() < 1e-9);
        assert!((layout.colorbar.right() - 310.0).abs() < 1e-9);
    }
}
