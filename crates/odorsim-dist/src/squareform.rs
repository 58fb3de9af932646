//! Conversion between square dissimilarity matrices and condensed vectors.
//!
//! The condensed order is the row-major walk of the strict upper triangle:
//! (0,1), (0,2), ..., (0,n-1), (1,2), ..., (n-2,n-1). Every flattened vector
//! in the crate uses this order, so position k names the same condition pair
//! in all of them.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use odorsim_core::{OdorsimError, Result};

/// Absolute tolerance for the symmetry / zero-diagonal check.
const SYMMETRY_TOL: f64 = 1e-10;

/// Length of the condensed vector for an n x n matrix.
pub fn condensed_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Flatten the strict upper triangle of a square matrix.
///
/// With `checks` enabled the matrix must also be symmetric with a zero
/// diagonal.
pub fn squareform_to_vector(matrix: &ArrayView2<'_, f64>, checks: bool) -> Result<Array1<f64>> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(OdorsimError::shape(format!(
            "dissimilarity matrix must be square, got {}x{}",
            rows, cols
        )));
    }
    if checks {
        check_dissimilarity(matrix)?;
    }

    let mut out = Vec::with_capacity(condensed_len(rows));
    for i in 0..rows {
        for j in (i + 1)..cols {
            out.push(matrix[[i, j]]);
        }
    }
    Ok(Array1::from(out))
}

/// Expand a condensed vector back into a symmetric matrix with zero diagonal.
pub fn squareform_to_matrix(vector: &ArrayView1<'_, f64>) -> Result<Array2<f64>> {
    let n = side_from_condensed(vector.len())?;
    let mut out = Array2::<f64>::zeros((n, n));
    let mut k = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            out[[i, j]] = vector[k];
            out[[j, i]] = vector[k];
            k += 1;
        }
    }
    Ok(out)
}

/// Solve n(n-1)/2 = len for n.
fn side_from_condensed(len: usize) -> Result<usize> {
    let n = ((1.0 + (1.0 + 8.0 * len as f64).sqrt()) / 2.0).round() as usize;
    if condensed_len(n) != len {
        return Err(OdorsimError::shape(format!(
            "condensed vector length {} is not a triangular number",
            len
        )));
    }
    Ok(n.max(1))
}

/// Verify symmetry and a zero diagonal.
pub fn check_dissimilarity(matrix: &ArrayView2<'_, f64>) -> Result<()> {
    let n = matrix.nrows();
    for i in 0..n {
        if matrix[[i, i]].abs() > SYMMETRY_TOL {
            return Err(OdorsimError::input(format!(
                "dissimilarity diagonal must be zero, found {} at ({}, {})",
                matrix[[i, i]],
                i,
                i
            )));
        }
        for j in (i + 1)..n {
            if (matrix[[i, j]] - matrix[[j, i]]).abs() > SYMMETRY_TOL {
                return Err(OdorsimError::input(format!(
                    "dissimilarity matrix is not symmetric at ({}, {})",
                    i, j
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_upper_triangle_order() {
        let m = array![
            [0.0, 1.0, 2.0, 3.0],
            [1.0, 0.0, 4.0, 5.0],
            [2.0, 4.0, 0.0, 6.0],
            [3.0, 5.0, 6.0, 0.0]
        ];
        let v = squareform_to_vector(&m.view(), true).unwrap();
        assert_eq!(v.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_expand_inverts_flatten() {
        let m = array![[0.0, 0.3, 1.2], [0.3, 0.0, 0.7], [1.2, 0.7, 0.0]];
        let v = squareform_to_vector(&m.view(), true).unwrap();
        let back = squareform_to_matrix(&v.view()).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_non_square_rejected() {
        let m = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            squareform_to_vector(&m.view(), false),
            Err(OdorsimError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_checks_catch_asymmetry() {
        let m = array![[0.0, 1.0], [0.5, 0.0]];
        assert!(squareform_to_vector(&m.view(), true).is_err());
        // unchecked flatten just reads the upper triangle
        assert_eq!(squareform_to_vector(&m.view(), false).unwrap().to_vec(), vec![1.0]);
    }

    #[test]
    fn test_bad_condensed_length() {
        let v = array![1.0, 2.0];
        assert!(squareform_to_matrix(&v.view()).is_err());
        // empty vector is a 1x1 matrix
        let empty = Array1::<f64>::zeros(0);
        assert_eq!(squareform_to_matrix(&empty.view()).unwrap().dim(), (1, 1));
    }
}
