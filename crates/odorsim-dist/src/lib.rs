//! # odorsim-dist
//!
//! Distance engine: turns chemical observation matrices and neural
//! pseudopopulation tensors into dissimilarity matrices and condensed
//! vectors.
//!
//! All entry points share one pairwise primitive ([`pairwise::cor_dist`]),
//! which compares the *columns* of its input. Each caller states its own
//! axis contract in its module docs.

pub mod chem;
pub mod neural;
pub mod pairwise;
pub mod scaling;
pub mod scatter;
pub mod squareform;

pub use chem::chem_dist_mat;
pub use neural::{fold_trial_blocks, neural_dist_mat, shuffle_rows, trial_self_distance};
pub use pairwise::{cor_dist, pearson};
pub use scaling::scale_columns;
pub use scatter::{prepare_scatter, ScatterData};
pub use squareform::{check_dissimilarity, condensed_len, squareform_to_matrix, squareform_to_vector};
