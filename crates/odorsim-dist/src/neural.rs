//! Neural population distances.
//!
//! Axis contract: a `Pseudopopulation` is (trial, unit, odor). Both
//! aggregation modes reduce it to a (unit, column) matrix before calling the
//! pairwise primitive, which compares columns:
//!
//! * `Mean`: columns are odors, values averaged over trials.
//! * `Trial`: columns are odor-major, trial-minor (`odor * n_trials + trial`).

use crate::pairwise::cor_dist;
use log::{debug, info};
use ndarray::{Array1, Array2, Axis};
use odorsim_core::{
    Aggregation, NeuralDistanceConfig, OdorsimError, Pseudopopulation, Result, TrialFold,
};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Odor dissimilarity of a pseudopopulation.
///
/// `rng` drives the per-unit shuffle control and is required when
/// `config.shuffle` is set; it is ignored otherwise.
pub fn neural_dist_mat(
    pseudopop: &Pseudopopulation,
    config: &NeuralDistanceConfig,
    rng: Option<&mut dyn RngCore>,
) -> Result<Array2<f64>> {
    config.validate()?;
    debug!(
        "neural_dist_mat: trials={}, units={}, odors={}, aggregation={}, metric={}, shuffle={}",
        pseudopop.n_trials(),
        pseudopop.n_units(),
        pseudopop.n_odors(),
        config.aggregation,
        config.metric,
        config.shuffle
    );

    match config.aggregation {
        Aggregation::Mean => {
            let mut units_by_odor = pseudopop.trial_mean()?;
            if config.shuffle {
                let rng = rng.ok_or_else(|| {
                    OdorsimError::config("shuffle requested without a random source")
                })?;
                shuffle_rows(&mut units_by_odor, rng);
                info!(
                    "shuffled {} unit response vectors independently",
                    units_by_odor.nrows()
                );
            }
            cor_dist(&units_by_odor.view(), config.metric)
        }
        Aggregation::Trial { fold } => {
            let units_by_replicate = pseudopop.trial_columns();
            let expanded = cor_dist(&units_by_replicate.view(), config.metric)?;
            match fold {
                TrialFold::Expanded => Ok(expanded),
                TrialFold::BlockMean => Ok(fold_trial_blocks(
                    &expanded,
                    pseudopop.n_odors(),
                    pseudopop.n_trials(),
                )),
            }
        }
    }
}

/// Permute every row with its own permutation.
pub fn shuffle_rows(matrix: &mut Array2<f64>, rng: &mut dyn RngCore) {
    for mut row in matrix.axis_iter_mut(Axis(0)) {
        let mut values = row.to_vec();
        values.shuffle(&mut *rng);
        for (dst, src) in row.iter_mut().zip(values) {
            *dst = src;
        }
    }
}

/// Collapse a (odor*trial)^2 replicate matrix to odor x odor.
///
/// Off-diagonal entries average all trial pairs of the two odors. The
/// diagonal stays 0; see [`trial_self_distance`] for the cross-trial
/// spread of each odor.
pub fn fold_trial_blocks(expanded: &Array2<f64>, n_odors: usize, n_trials: usize) -> Array2<f64> {
    let mut out = Array2::<f64>::zeros((n_odors, n_odors));
    let pairs = (n_trials * n_trials) as f64;
    for a in 0..n_odors {
        for b in (a + 1)..n_odors {
            let mut sum = 0.0;
            for ta in 0..n_trials {
                for tb in 0..n_trials {
                    sum += expanded[[a * n_trials + ta, b * n_trials + tb]];
                }
            }
            let mean = sum / pairs;
            out[[a, b]] = mean;
            out[[b, a]] = mean;
        }
    }
    out
}

/// Mean distance between distinct trials of the same odor, one per odor.
///
/// Zero for every odor when there is a single trial.
pub fn trial_self_distance(expanded: &Array2<f64>, n_odors: usize, n_trials: usize) -> Array1<f64> {
    if n_trials < 2 {
        return Array1::zeros(n_odors);
    }
    let pairs = (n_trials * (n_trials - 1) / 2) as f64;
    Array1::from_shape_fn(n_odors, |o| {
        let base = o * n_trials;
        let mut sum = 0.0;
        for ta in 0..n_trials {
            for tb in (ta + 1)..n_trials {
                sum += expanded[[base + ta, base + tb]];
            }
        }
        sum / pairs
    })
}
