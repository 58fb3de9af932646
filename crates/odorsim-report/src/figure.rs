//! Renderable figure model.
//!
//! Assembly functions build a `Figure` from finished matrices and vectors;
//! `render::to_svg` draws it. Nothing here computes distances.

use crate::colormap::Colormap;
use crate::overlay::GridLine;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Color scale for a heatmap panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapStyle {
    pub vmin: f64,
    pub vmax: f64,
    pub colormap: Colormap,
    /// Force square cells
    pub square: bool,
    pub colorbar: bool,
}

/// Marker styling for scatter panels.
///
/// `size` is the marker area in pt^2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub size: f64,
    pub alpha: f64,
    pub line_width: f64,
    /// Edge gray level (0 = black)
    pub edge_gray: f64,
    pub filled: bool,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            size: 20.0,
            alpha: 0.3,
            line_width: 1.5,
            edge_gray: 0.0,
            filled: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeatmapPanel {
    pub matrix: Array2<f64>,
    pub style: HeatmapStyle,
    /// Empty for chemical panels
    pub overlay: Vec<GridLine>,
}

#[derive(Debug, Clone)]
pub struct ScatterPanel {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub marker: MarkerStyle,
}

#[derive(Debug, Clone)]
pub enum PanelKind {
    /// Spacer cell, axis off
    Blank,
    Heatmap(HeatmapPanel),
    Scatter(ScatterPanel),
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub kind: PanelKind,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
}

impl Panel {
    pub fn blank() -> Self {
        Self::new(PanelKind::Blank)
    }

    pub fn new(kind: PanelKind) -> Self {
        Self {
            kind,
            title: None,
            x_label: None,
            y_label: None,
        }
    }

    pub fn heatmap(&self) -> Option<&HeatmapPanel> {
        match &self.kind {
            PanelKind::Heatmap(h) => Some(h),
            _ => None,
        }
    }

    pub fn scatter(&self) -> Option<&ScatterPanel> {
        match &self.kind {
            PanelKind::Scatter(s) => Some(s),
            _ => None,
        }
    }
}

/// Grid of panels, stored row-major.
#[derive(Debug, Clone)]
pub struct Figure {
    /// Pixel size of the rendered figure
    pub size: (u32, u32),
    pub n_rows: usize,
    pub n_cols: usize,
    /// Relative column widths, one per column
    pub width_ratios: Vec<f64>,
    pub panels: Vec<Panel>,
    /// Figure-level x label, centered under the grid
    pub sup_xlabel: Option<String>,
    /// Figure-level y label, centered left of the grid
    pub sup_ylabel: Option<String>,
}

impl Figure {
    /// Grid of blank panels with equal column widths.
    pub fn grid(n_rows: usize, n_cols: usize, size: (u32, u32)) -> Self {
        Self {
            size,
            n_rows,
            n_cols,
            width_ratios: vec![1.0; n_cols],
            panels: (0..n_rows * n_cols).map(|_| Panel::blank()).collect(),
            sup_xlabel: None,
            sup_ylabel: None,
        }
    }

    /// Panel at (row, col). Panics when out of range.
    pub fn panel(&self, row: usize, col: usize) -> &Panel {
        assert!(row < self.n_rows && col < self.n_cols, "panel ({}, {}) out of range", row, col);
        &self.panels[row * self.n_cols + col]
    }

    pub fn panel_mut(&mut self, row: usize, col: usize) -> &mut Panel {
        assert!(row < self.n_rows && col < self.n_cols, "panel ({}, {}) out of range", row, col);
        &mut self.panels[row * self.n_cols + col]
    }

    /// Number of panels that are not blank.
    pub fn n_drawn(&self) -> usize {
        self.panels
            .iter()
            .filter(|p| !matches!(p.kind, PanelKind::Blank))
            .count()
    }
}
