//! Generic pairwise distance primitive.
//!
//! Axis contract: `cor_dist` takes a (variables x conditions) matrix and
//! returns a (conditions x conditions) matrix. Conditions are the columns of
//! the input. Both the chemical and neural paths go through this function.

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use odorsim_core::{Metric, OdorsimError, Result};

/// Norms below this are treated as a constant (zero-variance) vector.
const DEGENERATE_NORM: f64 = 1e-12;

/// Pairwise distances between the columns of `cells_by_condition`.
///
/// The result is symmetric with an exact zero diagonal. Correlation and
/// cosine values are clipped to [0, 2].
pub fn cor_dist(cells_by_condition: &ArrayView2<'_, f64>, metric: Metric) -> Result<Array2<f64>> {
    let (n_vars, n_conditions) = cells_by_condition.dim();
    if n_vars == 0 || n_conditions == 0 {
        return Err(OdorsimError::shape(format!(
            "cannot compute distances on an empty {}x{} matrix",
            n_vars, n_conditions
        )));
    }
    if let Some(((var, cond), v)) = cells_by_condition
        .indexed_iter()
        .find(|(_, v)| !v.is_finite())
    {
        return Err(OdorsimError::input(format!(
            "non-finite value {} at variable {}, condition {}",
            v, var, cond
        )));
    }
    debug!(
        "cor_dist: {} conditions over {} variables ({})",
        n_conditions, n_vars, metric
    );

    // One row per condition
    let conditions = cells_by_condition.t();
    let prepared: Vec<Array1<f64>> = match metric {
        Metric::Correlation => conditions
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| unit_vector(&centered(&row), i, metric))
            .collect::<Result<_>>()?,
        Metric::Cosine => conditions
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| unit_vector(&row.to_owned(), i, metric))
            .collect::<Result<_>>()?,
        Metric::Euclidean | Metric::Cityblock => {
            conditions.rows().into_iter().map(|r| r.to_owned()).collect()
        }
    };

    let mut dist = Array2::<f64>::zeros((n_conditions, n_conditions));
    for i in 0..n_conditions {
        for j in (i + 1)..n_conditions {
            let d = pair_distance(&prepared[i].view(), &prepared[j].view(), metric);
            dist[[i, j]] = d;
            dist[[j, i]] = d;
        }
    }
    Ok(dist)
}

/// Distance between two prepared vectors.
fn pair_distance(a: &ArrayView1<'_, f64>, b: &ArrayView1<'_, f64>, metric: Metric) -> f64 {
    match metric {
        // Inputs are already centered (correlation) and normalized
        Metric::Correlation | Metric::Cosine => (1.0 - a.dot(b)).clamp(0.0, 2.0),
        Metric::Euclidean => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt(),
        Metric::Cityblock => a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum(),
    }
}

fn centered(v: &ArrayView1<'_, f64>) -> Array1<f64> {
    let mean = v.sum() / v.len() as f64;
    v.mapv(|x| x - mean)
}

fn unit_vector(v: &Array1<f64>, index: usize, metric: Metric) -> Result<Array1<f64>> {
    let norm = v.dot(v).sqrt();
    if norm < DEGENERATE_NORM {
        return Err(OdorsimError::input(format!(
            "condition {} has a {} vector; {} distance is undefined",
            index,
            if metric == Metric::Correlation {
                "constant"
            } else {
                "zero"
            },
            metric
        )));
    }
    Ok(v / norm)
}

/// Pearson correlation between two equally long vectors.
///
/// Returns an error for length mismatch or a constant input.
pub fn pearson(x: &ArrayView1<'_, f64>, y: &ArrayView1<'_, f64>) -> Result<f64> {
    if x.len() != y.len() || x.is_empty() {
        return Err(OdorsimError::shape(format!(
            "pearson needs two non-empty vectors of equal length, got {} and {}",
            x.len(),
            y.len()
        )));
    }
    let a = unit_vector(&centered(x), 0, Metric::Correlation)?;
    let b = unit_vector(&centered(y), 1, Metric::Correlation)?;
    Ok(a.dot(&b).clamp(-1.0, 1.0))
}
