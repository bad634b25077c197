//! # Recursive critic estimators
//!
//! Both estimators treat the stacked critic parameters `p = [v; w]` as the
//! unknown of a linear regression `y ≈ φᵀp`, where `φ = [∂Q/∂v; ∂Q/∂w]` and
//! `y` is the bootstrapped one-step target. They share one output shape,
//! `(p', P')`, so the training loop can swap them freely.
//!
//! - [`rls_update`]: recursive least squares with exponential forgetting
//! - [`kalman_update`]: one predictor-form Kalman step with correlated
//!   process/measurement noise

pub mod kalman;
pub mod rls;

pub use kalman::{kalman_update, KalmanNoise};
pub use rls::rls_update;

use ndarray::{ArrayView1, ArrayView2};

use crate::error::{DpgError, Result};

/// Shape checks common to both estimators
fn check_shapes(p: ArrayView1<f64>, phi: ArrayView1<f64>, cov: ArrayView2<f64>) -> Result<()> {
    DpgError::check_len("regressor", p.len(), phi.len())?;
    if cov.dim() != (p.len(), p.len()) {
        return Err(DpgError::dimension_mismatch(
            format!("{}x{} covariance", p.len(), p.len()),
            format!("{}x{}", cov.nrows(), cov.ncols()),
        ));
    }
    Ok(())
}

/// Rejects non-finite or vanishing innovation denominators
fn check_denominator(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > f64::EPSILON {
        Ok(())
    } else {
        Err(DpgError::NumericalError(format!(
            "{} innovation denominator is degenerate ({})",
            name, value
        )))
    }
}
