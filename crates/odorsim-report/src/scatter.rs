//! Neural vs chemical distance scatter grid.

use crate::figure::{Figure, MarkerStyle, Panel, PanelKind, ScatterPanel};
use log::info;
use ndarray::ArrayView2;
use odorsim_core::{KeyedPseudopopulations, OdorsimError, Result};
use odorsim_dist::{prepare_scatter, ScatterData};

/// Fixed neural-distance axis range.
pub const SCATTER_X_RANGE: (f64, f64) = (0.0, 1.1);

const SCATTER_COLS: usize = 3;

/// Display title for a comparison key ("tiled_l2" -> "PCx L2").
pub fn scatter_title(key: &str) -> String {
    key.replace("tiled_l", "PCx L")
}

/// Assemble one scatter panel per key, three per row, sharing both axes.
pub fn scatter_grid(data: &ScatterData, keys: &[String]) -> Result<Figure> {
    if keys.is_empty() {
        return Err(OdorsimError::config("scatter grid needs at least one key"));
    }
    let n_rows = keys.len().div_ceil(SCATTER_COLS);
    let n_cols = keys.len().min(SCATTER_COLS);
    let mut figure = Figure::grid(n_rows, n_cols, (900, 300 * n_rows as u32));
    let y_range = shared_y_range(data);

    for (i, key) in keys.iter().enumerate() {
        let x = data.neural_for(key)?;
        if x.len() != data.chem.len() {
            return Err(OdorsimError::shape(format!(
                "'{}' has {} condition pairs but the chemical vector has {}",
                key,
                x.len(),
                data.chem.len()
            )));
        }
        let mut panel = Panel::new(PanelKind::Scatter(ScatterPanel {
            x: x.clone(),
            y: data.chem.clone(),
            x_range: SCATTER_X_RANGE,
            y_range,
            marker: MarkerStyle::default(),
        }));
        panel.title = Some(scatter_title(key));
        *figure.panel_mut(i / SCATTER_COLS, i % SCATTER_COLS) = panel;
    }

    figure.sup_xlabel = Some("Neural distance (1-r)".to_string());
    figure.sup_ylabel = Some("Chemical distance (1-r)".to_string());
    info!("assembled scatter grid: {} keys in {}x{}", keys.len(), n_rows, n_cols);
    Ok(figure)
}

/// Compute scatter vectors and assemble the grid in one step.
pub fn scatter_dist(
    chem_subset: &ArrayView2<'_, f64>,
    neural: &KeyedPseudopopulations,
    keys: &[String],
) -> Result<Figure> {
    let data = prepare_scatter(neural, chem_subset, keys)?;
    scatter_grid(&data, keys)
}

/// y range covering every chemical distance, padded by 5%.
fn shared_y_range(data: &ScatterData) -> (f64, f64) {
    let (lo, hi) = data
        .chem
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 2.0);
    }
    let pad = ((hi - lo) * 0.05).max(1e-3);
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};
    use odorsim_core::{default_scatter_keys, KeyedVectors};

    fn data() -> ScatterData {
        let mut neural = KeyedVectors::new();
        neural.insert("Boutons".to_string(), array![0.1, 0.5, 0.9]);
        neural.insert("tiled_l2".to_string(), array![0.3, 0.4, 1.0]);
        ScatterData {
            neural,
            chem: array![0.2, 1.0, 1.8],
        }
    }

    #[test]
    fn test_title_prefix() {
        assert_eq!(scatter_title("tiled_l3"), "PCx L3");
        assert_eq!(scatter_title("TeLC L2"), "TeLC L2");
    }

    #[test]
    fn test_grid_shape_and_axes() {
        let keys = vec!["Boutons".to_string(), "tiled_l2".to_string()];
        let fig = scatter_grid(&data(), &keys).unwrap();
        assert_eq!((fig.n_rows, fig.n_cols), (1, 2));
        let p = fig.panel(0, 1).scatter().unwrap();
        assert_eq!(p.x_range, (0.0, 1.1));
        assert!(!p.marker.filled);
        assert_eq!(fig.panel(0, 1).title.as_deref(), Some("PCx L2"));
        let q = fig.panel(0, 0).scatter().unwrap();
        assert_eq!(p.y_range, q.y_range);
        assert!(q.y_range.0 < 0.2 && q.y_range.1 > 1.8);
    }

    #[test]
    fn test_default_keys_fill_two_rows() {
        let keys = default_scatter_keys();
        let mut d = data();
        for k in &keys {
            d.neural.entry(k.clone()).or_insert_with(|| array![0.2, 0.2, 0.2]);
        }
        let fig = scatter_grid(&d, &keys).unwrap();
        assert_eq!((fig.n_rows, fig.n_cols), (2, 3));
        assert_eq!(fig.n_drawn(), 6);
        assert_eq!(fig.panel(1, 2).title.as_deref(), Some("TeLC L3"));
    }

    #[test]
    fn test_missing_and_mismatched() {
        let err = scatter_grid(&data(), &["Model".to_string()]).unwrap_err();
        assert!(matches!(err, OdorsimError::MissingKey { .. }));

        let mut d = data();
        d.neural.insert("short".to_string(), Array1::zeros(2));
        assert!(matches!(
            scatter_grid(&d, &["short".to_string()]),
            Err(OdorsimError::InvalidShape(_))
        ));
    }
}
