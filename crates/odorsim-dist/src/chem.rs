//! Chemical descriptor-space distances.
//!
//! Axis contract: the observation matrix is (odor x descriptor). Descriptor
//! columns are scaled independently, then the matrix is transposed so the
//! pairwise primitive compares odors.

use crate::pairwise::cor_dist;
use crate::scaling::scale_columns;
use log::debug;
use ndarray::{Array2, ArrayView2};
use odorsim_core::{validate_observations, ChemDistanceConfig, Result};

/// Odor x odor dissimilarity in chemical descriptor space.
pub fn chem_dist_mat(
    observations: &ArrayView2<'_, f64>,
    config: &ChemDistanceConfig,
) -> Result<Array2<f64>> {
    validate_observations(observations, "chemical observation matrix")?;
    debug!(
        "chem_dist_mat: {} odors x {} descriptors, scaling={:?}, metric={}",
        observations.nrows(),
        observations.ncols(),
        config.scaling,
        config.metric
    );

    match config.scaling {
        Some(scaling) => {
            let scaled = scale_columns(observations, scaling);
            cor_dist(&scaled.t(), config.metric)
        }
        None => cor_dist(&observations.t(), config.metric),
    }
}
