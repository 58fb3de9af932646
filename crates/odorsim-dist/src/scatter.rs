//! Paired condensed vectors for neural-vs-chemical scatter comparison.

use crate::chem::chem_dist_mat;
use crate::neural::neural_dist_mat;
use crate::squareform::squareform_to_vector;
use log::debug;
use ndarray::{Array1, ArrayView2};
use odorsim_core::{
    Aggregation, ChemDistanceConfig, ColumnScaling, KeyedPseudopopulations, KeyedVectors, Metric,
    NeuralDistanceConfig, OdorsimError, Result,
};

/// Flattened distances ready for pointwise comparison.
///
/// Every vector shares the same upper-triangle pair order.
#[derive(Debug, Clone)]
pub struct ScatterData {
    /// Trial-averaged neural correlation distances, per key
    pub neural: KeyedVectors,
    /// Variance-scaled chemical correlation distances
    pub chem: Array1<f64>,
}

impl ScatterData {
    /// Neural vector for `key`.
    pub fn neural_for(&self, key: &str) -> Result<&Array1<f64>> {
        self.neural
            .get(key)
            .ok_or_else(|| OdorsimError::missing_key(key, "scatter neural vectors"))
    }

    /// Number of condition pairs per vector.
    pub fn n_pairs(&self) -> usize {
        self.chem.len()
    }
}

/// Build one neural vector per requested key plus the chemical vector.
///
/// Neural sources are averaged over trials; the chemical subset (odor x
/// descriptor) is centered and scaled to unit variance per descriptor.
/// Both use the correlation metric.
pub fn prepare_scatter(
    neural: &KeyedPseudopopulations,
    chem_subset: &ArrayView2<'_, f64>,
    keys: &[String],
) -> Result<ScatterData> {
    let chem_config = ChemDistanceConfig {
        scaling: Some(ColumnScaling::standard()),
        metric: Metric::Correlation,
    };
    let chem_matrix = chem_dist_mat(chem_subset, &chem_config)?;
    let chem = squareform_to_vector(&chem_matrix.view(), true)?;

    let neural_config = NeuralDistanceConfig::new(Aggregation::Mean);
    let mut flat = KeyedVectors::new();
    for key in keys {
        let pseudopop = neural
            .get(key)
            .ok_or_else(|| OdorsimError::missing_key(key.as_str(), "neural pseudopopulations"))?;
        if pseudopop.n_odors() != chem_subset.nrows() {
            return Err(OdorsimError::shape(format!(
                "'{}' has {} odors but the chemical subset has {}",
                key,
                pseudopop.n_odors(),
                chem_subset.nrows()
            )));
        }
        let matrix = neural_dist_mat(pseudopop, &neural_config, None)?;
        flat.insert(key.clone(), squareform_to_vector(&matrix.view(), false)?);
    }
    debug!(
        "prepare_scatter: {} keys, {} condition pairs each",
        flat.len(),
        chem.len()
    );

    Ok(ScatterData { neural: flat, chem })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};
    use odorsim_core::Pseudopopulation;

    fn inputs() -> (KeyedPseudopopulations, Array2<f64>) {
        let mut neural = KeyedPseudopopulations::new();
        for (k, key) in ["Boutons", "tiled_l2"].iter().enumerate() {
            let data = Array3::from_shape_fn((2, 6, 5), |(t, u, o)| {
                ((u * 5 + o * (k + 2)) % 7) as f64 + 0.2 * t as f64
            });
            neural.insert(key.to_string(), Pseudopopulation::new(data).unwrap());
        }
        let chem = Array2::from_shape_fn((5, 4), |(o, d)| ((o * 3 + d * d) % 5) as f64 + 0.1 * o as f64);
        (neural, chem)
    }

    #[test]
    fn test_vectors_share_length() {
        let (neural, chem) = inputs();
        let keys = vec!["Boutons".to_string(), "tiled_l2".to_string()];
        let data = prepare_scatter(&neural, &chem.view(), &keys).unwrap();
        assert_eq!(data.n_pairs(), 10);
        for key in &keys {
            assert_eq!(data.neural_for(key).unwrap().len(), 10);
        }
    }

    #[test]
    fn test_missing_key() {
        let (neural, chem) = inputs();
        let keys = vec!["Model".to_string()];
        let err = prepare_scatter(&neural, &chem.view(), &keys).unwrap_err();
        assert!(matches!(err, OdorsimError::MissingKey { ref key, .. } if key == "Model"));
    }

    #[test]
    fn test_odor_count_mismatch() {
        let (neural, chem) = inputs();
        let keys = vec!["Boutons".to_string()];
        let fewer = chem.slice(ndarray::s![..4, ..]).to_owned();
        assert!(matches!(
            prepare_scatter(&neural, &fewer.view(), &keys),
            Err(OdorsimError::InvalidShape(_))
        ));
    }
}
