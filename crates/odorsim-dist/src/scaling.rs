//! Per-column standardization of observation matrices.

use log::warn;
use ndarray::{Array2, ArrayView2, Axis};
use odorsim_core::ColumnScaling;

/// Standardize each column of `data` independently.
///
/// Uses the population standard deviation (ddof = 0). A column with zero
/// variance is left at scale 1: it is centered but never divided by zero.
pub fn scale_columns(data: &ArrayView2<'_, f64>, scaling: ColumnScaling) -> Array2<f64> {
    let mut out = data.to_owned();
    let n_rows = data.nrows() as f64;
    if n_rows == 0.0 {
        return out;
    }

    for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
        let mean = column.sum() / n_rows;
        if scaling.with_mean {
            column.mapv_inplace(|v| v - mean);
        }
        if scaling.with_std {
            let var = data
                .column(j)
                .iter()
                .map(|&v| (v - mean) * (v - mean))
                .sum::<f64>()
                / n_rows;
            let std = var.sqrt();
            if std > f64::EPSILON {
                column.mapv_inplace(|v| v / std);
            } else {
                warn!("column {} has zero variance; left unscaled", j);
            }
        }
    }
    out
}
