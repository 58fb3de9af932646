//! Data model shared by the distance engine and the renderer.

use crate::errors::{OdorsimError, Result};
use ndarray::{Array2, Array3, ArrayD, ArrayView2, ArrayView3, Axis, Ix3};
use std::collections::BTreeMap;

/// Named dissimilarity matrices (e.g. "tiled_l2" -> 22x22 matrix).
pub type KeyedMatrices = BTreeMap<String, Array2<f64>>;

/// Named flattened dissimilarity vectors.
pub type KeyedVectors = BTreeMap<String, ndarray::Array1<f64>>;

/// Named pseudopopulation tensors.
pub type KeyedPseudopopulations = BTreeMap<String, Pseudopopulation>;

/// Repeated neural measurements with axes (trial, unit, odor).
///
/// The axis order is part of the type's contract: every constructor checks
/// rank and finiteness, so downstream code never re-validates.
#[derive(Debug, Clone, PartialEq)]
pub struct Pseudopopulation {
    data: Array3<f64>,
}

impl Pseudopopulation {
    /// Wrap a (trial, unit, odor) tensor.
    pub fn new(data: Array3<f64>) -> Result<Self> {
        let (n_trials, n_units, n_odors) = data.dim();
        if n_trials == 0 || n_units == 0 || n_odors == 0 {
            return Err(OdorsimError::shape(format!(
                "pseudopopulation has an empty axis: (trials={}, units={}, odors={})",
                n_trials, n_units, n_odors
            )));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(OdorsimError::input(
                "pseudopopulation contains non-finite values",
            ));
        }
        Ok(Self { data })
    }

    /// Wrap a dynamic-rank array; anything but rank 3 is rejected.
    pub fn from_dyn(data: ArrayD<f64>) -> Result<Self> {
        let ndim = data.ndim();
        let data = data.into_dimensionality::<Ix3>().map_err(|_| {
            OdorsimError::shape(format!(
                "pseudopopulation must be 3-dimensional (trial, unit, odor), got {} dimensions",
                ndim
            ))
        })?;
        Self::new(data)
    }

    pub fn n_trials(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn n_units(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn n_odors(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    pub fn view(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    /// Average over the trial axis, giving a (unit, odor) matrix.
    pub fn trial_mean(&self) -> Result<Array2<f64>> {
        self.data
            .mean_axis(Axis(0))
            .ok_or_else(|| OdorsimError::shape("pseudopopulation has no trials to average"))
    }

    /// Concatenate trials along the odor axis, giving a
    /// (unit, odor * trial) matrix where column `o * n_trials + t` holds
    /// trial `t` of odor `o`.
    pub fn trial_columns(&self) -> Array2<f64> {
        let (n_trials, n_units, n_odors) = self.data.dim();
        Array2::from_shape_fn((n_units, n_odors * n_trials), |(u, col)| {
            let odor = col / n_trials;
            let trial = col % n_trials;
            self.data[[trial, u, odor]]
        })
    }

    pub fn into_inner(self) -> Array3<f64> {
        self.data
    }
}

/// Reject observation matrices that are too small or contain NaN/inf.
pub fn validate_observations(observations: &ArrayView2<'_, f64>, what: &str) -> Result<()> {
    let (rows, cols) = observations.dim();
    if rows < 2 || cols < 2 {
        return Err(OdorsimError::input(format!(
            "{} must be at least 2x2, got {}x{}",
            what, rows, cols
        )));
    }
    if observations.iter().any(|v| !v.is_finite()) {
        return Err(OdorsimError::input(format!(
            "{} contains non-finite values",
            what
        )));
    }
    Ok(())
}
