//! Small dense helpers shared by the estimators and the noise generator.

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{DpgError, Result};

/// Concatenate two vectors
pub fn stack(head: ArrayView1<f64>, tail: ArrayView1<f64>) -> Array1<f64> {
    let mut result = Array1::zeros(head.len() + tail.len());
    result.slice_mut(s![..head.len()]).assign(&head);
    result.slice_mut(s![head.len()..]).assign(&tail);
    result
}

/// Split a vector after the first `at` entries
pub fn split(stacked: ArrayView1<f64>, at: usize) -> (Array1<f64>, Array1<f64>) {
    (
        stacked.slice(s![..at]).to_owned(),
        stacked.slice(s![at..]).to_owned(),
    )
}

/// `a bᵀ`
pub fn outer(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Array2<f64> {
    let column = a.insert_axis(ndarray::Axis(1));
    let row = b.insert_axis(ndarray::Axis(0));
    column.dot(&row)
}

pub fn trace(m: ArrayView2<f64>) -> f64 {
    m.diag().sum()
}

/// Lower-triangular Cholesky factor of a symmetric positive semi-definite matrix.
///
/// Zero pivots are tolerated (the corresponding column is left at zero) so a
/// degenerate covariance such as `diag(1, 0)` still factors.
pub fn cholesky(m: ArrayView2<f64>) -> Result<Array2<f64>> {
    let n = m.nrows();
    if m.ncols() != n {
        return Err(DpgError::dimension_mismatch(
            "square matrix".to_string(),
            format!("{}x{}", m.nrows(), m.ncols()),
        ));
    }

    let mut l = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        let mut diag = m[[j, j]];
        for k in 0..j {
            diag -= l[[j, k]] * l[[j, k]];
        }
        if diag < -1e-12 * m[[j, j]].abs().max(1.0) || !diag.is_finite() {
            return Err(DpgError::NumericalError(format!(
                "matrix is not positive semi-definite (pivot {} = {})",
                j, diag
            )));
        }
        let pivot = diag.max(0.0).sqrt();
        l[[j, j]] = pivot;
        if pivot == 0.0 {
            continue;
        }
        for i in (j + 1)..n {
            let mut sum = m[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = sum / pivot;
        }
    }
    Ok(l)
}
