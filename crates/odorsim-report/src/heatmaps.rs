//! Chemical vs neural heatmap grid.
//!
//! Layout, one row per odor-set grouping:
//!
//! ```text
//! | chem | spacer | layer 0 | layer 1 | ...
//! ```
//!
//! Column widths are [1, 0.25, 1, 1, ...]. Neural panels carry the
//! structural overlay for their row's grouping.

use crate::colormap::Colormap;
use crate::figure::{Figure, HeatmapPanel, HeatmapStyle, PanelKind};
use crate::overlay::{overlay_lines, OverlayStyle};
use log::info;
use ndarray::Array2;
use odorsim_core::{KeyedMatrices, OdorSetGrouping, OdorsimError, Result};

/// Chemical distance color scale: [0, 1.5], inferno reversed.
pub fn chem_heatmap_style() -> HeatmapStyle {
    HeatmapStyle {
        vmin: 0.0,
        vmax: 1.5,
        colormap: Colormap::InfernoR,
        square: true,
        colorbar: false,
    }
}

/// Neural distance color scale: [0.2, 1.1], rocket.
pub fn neural_heatmap_style() -> HeatmapStyle {
    HeatmapStyle {
        vmin: 0.2,
        vmax: 1.1,
        colormap: Colormap::Rocket,
        square: true,
        colorbar: false,
    }
}

/// Key of the neural matrix for a grouping and layer ("tiled_l2").
pub fn neural_key(grouping: OdorSetGrouping, layer: &str) -> String {
    format!("{}_{}", grouping.name(), layer)
}

const SPACER_WIDTH: f64 = 0.25;

/// Assemble the heatmap grid.
///
/// `chem` is keyed by grouping name; `neural` by [`neural_key`].
pub fn heatmap_grid(
    chem: &KeyedMatrices,
    neural: &KeyedMatrices,
    layers: &[String],
    groups: &[OdorSetGrouping],
) -> Result<Figure> {
    if groups.is_empty() {
        return Err(OdorsimError::config("heatmap grid needs at least one grouping"));
    }
    let n_cols = 2 + layers.len();
    let mut figure = Figure::grid(groups.len(), n_cols, (800, 800));
    figure.width_ratios = std::iter::once(1.0)
        .chain(std::iter::once(SPACER_WIDTH))
        .chain(layers.iter().map(|_| 1.0))
        .collect();

    for (row, &grouping) in groups.iter().enumerate() {
        let chem_matrix = chem
            .get(grouping.name())
            .ok_or_else(|| OdorsimError::missing_key(grouping.name(), "chemical matrices"))?;
        let n = square_side(chem_matrix, grouping.name())?;

        let chem_panel = figure.panel_mut(row, 0);
        chem_panel.kind = PanelKind::Heatmap(HeatmapPanel {
            matrix: chem_matrix.clone(),
            style: chem_heatmap_style(),
            overlay: Vec::new(),
        });
        chem_panel.y_label = Some(grouping.title());

        for (i, layer) in layers.iter().enumerate() {
            let key = neural_key(grouping, layer);
            let matrix = neural
                .get(&key)
                .ok_or_else(|| OdorsimError::missing_key(key.as_str(), "neural matrices"))?;
            let side = square_side(matrix, &key)?;
            if side != n {
                return Err(OdorsimError::shape(format!(
                    "'{}' is {}x{} but the '{}' chemical matrix is {}x{}",
                    key, side, side, grouping, n, n
                )));
            }
            figure.panel_mut(row, 2 + i).kind = PanelKind::Heatmap(HeatmapPanel {
                matrix: matrix.clone(),
                style: neural_heatmap_style(),
                overlay: overlay_lines(grouping, &OverlayStyle::default()),
            });
        }
    }

    figure.panel_mut(0, 0).title = Some("Descriptor odor space".to_string());
    for (i, layer) in layers.iter().enumerate() {
        figure.panel_mut(0, 2 + i).title = Some(layer.to_uppercase());
    }
    figure.panel_mut(groups.len() - 1, 0).x_label = Some("Sorted odor ID".to_string());

    info!(
        "assembled heatmap grid: {} groupings x {} layers",
        groups.len(),
        layers.len()
    );
    Ok(figure)
}

fn square_side(matrix: &Array2<f64>, key: &str) -> Result<usize> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(OdorsimError::shape(format!(
            "'{}' must be square, got {}x{}",
            key, rows, cols
        )));
    }
    Ok(rows)
}
