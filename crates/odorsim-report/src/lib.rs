//! odorsim Comparison Renderer
//!
//! Lays out finished dissimilarity matrices and condensed vectors as
//! multi-panel figures for comparing chemical and neural odor structure.
//!
//! # Figures
//!
//! - Heatmap grid: chemical matrix per odor-set row, neural matrices per
//!   layer, structural overlay lines on neural panels
//! - Scatter grid: neural vs chemical condensed distances per comparison key
//!
//! Assembly produces a [`Figure`] model; [`render::to_svg`] turns it into
//! an SVG string. The `odorsim` binary handles file I/O.

pub mod colormap;
pub mod figure;
pub mod heatmaps;
pub mod overlay;
pub mod render;
pub mod scatter;

// Re-exports
pub use colormap::Colormap;
pub use figure::{Figure, HeatmapPanel, HeatmapStyle, MarkerStyle, Panel, PanelKind, ScatterPanel};
pub use heatmaps::{chem_heatmap_style, heatmap_grid, neural_heatmap_style, neural_key};
pub use overlay::{overlay_lines, overlay_lines_named, GridLine, LineWeight, OverlayStyle};
pub use render::to_svg;
pub use scatter::{scatter_dist, scatter_grid, scatter_title, SCATTER_X_RANGE};
