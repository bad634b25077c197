//! Gaussian noise sources: exploration traces and start-state perturbation.

use ndarray::{Array1, Array2, ArrayView1};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Normal, StandardNormal};

use crate::config::NoiseScale;
use crate::error::{DpgError, Result};
use crate::linalg;

/// Sample a `horizon × action_dim` trace of zero-mean Gaussian noise.
///
/// A scalar scale is the per-component standard deviation; a matrix scale is
/// the covariance of each row.
///
/// Implementations of [`ControlProblem::exploration`](crate::problem::ControlProblem::exploration)
/// receive `&mut dyn RngCore`; pass `&mut rng` to get a sized generator.
pub fn gaussian_trace<R: Rng>(
    scale: &NoiseScale,
    horizon: usize,
    action_dim: usize,
    rng: &mut R,
) -> Result<Array2<f64>> {
    match scale {
        NoiseScale::Scalar(sigma) => {
            let normal = Normal::new(0.0, *sigma)
                .map_err(|e| DpgError::NumericalError(e.to_string()))?;
            Ok(Array2::random_using((horizon, action_dim), normal, rng))
        }
        NoiseScale::Matrix(cov) => {
            if cov.dim() != (action_dim, action_dim) {
                return Err(DpgError::dimension_mismatch(
                    format!("{}x{} noise covariance", action_dim, action_dim),
                    format!("{}x{}", cov.nrows(), cov.ncols()),
                ));
            }
            let l = linalg::cholesky(cov.view())?;
            let z: Array2<f64> = Array2::random_using((horizon, action_dim), StandardNormal, rng);
            Ok(z.dot(&l.t()))
        }
    }
}

/// `x0 + N(0, variance·I)`
pub fn perturb<R: Rng>(x0: ArrayView1<f64>, variance: f64, rng: &mut R) -> Result<Array1<f64>> {
    let normal = Normal::new(0.0, variance.sqrt())
        .map_err(|e| DpgError::NumericalError(e.to_string()))?;
    let offset = Array1::random_using(x0.len(), normal, rng);
    Ok(&x0 + &offset)
}
