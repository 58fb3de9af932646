//! Structural grid lines drawn over neural heatmaps.
//!
//! A line sits at every sorted-odor position in [0, 22). Positions that
//! start a new odor subset under the chosen grouping are drawn heavier.

use odorsim_core::{OdorSetGrouping, Result, OVERLAY_EXTENT};
use serde::{Deserialize, Serialize};

/// Line styling for the structural overlay.
///
/// Colors are gray levels in [0, 1] (1 = white).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub thin_width: f64,
    pub thick_width: f64,
    pub thin_gray: f64,
    pub thick_gray: f64,
    /// Added to every scaled position
    pub offset: f64,
    /// Multiplies every position
    pub scalar: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            thin_width: 0.1,
            thick_width: 0.5,
            thin_gray: 1.0,
            thick_gray: 1.0,
            offset: 0.0,
            scalar: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineWeight {
    Thin,
    Thick,
}

/// One horizontal + vertical line pair at `position` (data units, measured
/// from the top-left corner of the heatmap).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub position: f64,
    pub weight: LineWeight,
    pub width: f64,
    pub gray: f64,
}

/// Grid lines for `grouping`, in drawing order.
pub fn overlay_lines(grouping: OdorSetGrouping, style: &OverlayStyle) -> Vec<GridLine> {
    let boundaries = grouping.boundaries();
    (0..OVERLAY_EXTENT)
        .map(|line| {
            let position = line as f64 * style.scalar + style.offset;
            if boundaries.contains(&line) {
                GridLine {
                    position,
                    weight: LineWeight::Thick,
                    width: style.thick_width,
                    gray: style.thick_gray,
                }
            } else {
                GridLine {
                    position,
                    weight: LineWeight::Thin,
                    width: style.thin_width,
                    gray: style.thin_gray,
                }
            }
        })
        .collect()
}

/// Same as [`overlay_lines`] for a grouping given by name.
///
/// Unknown names are an `InvalidConfiguration` error.
pub fn overlay_lines_named(grouping: &str, style: &OverlayStyle) -> Result<Vec<GridLine>> {
    let grouping: OdorSetGrouping = grouping.parse()?;
    Ok(overlay_lines(grouping, style))
}
