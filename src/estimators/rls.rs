use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use super::{check_denominator, check_shapes};
use crate::error::Result;
use crate::linalg;

/// One recursive-least-squares step with forgetting factor `lambda`.
///
/// ```text
/// gain = Pφ / (λ + φᵀPφ)
/// p'   = p + gain·(y − φᵀp)
/// P'   = (P − gain·φᵀP) / λ
/// ```
///
/// A non-finite or vanishing `λ + φᵀPφ` is reported as a numerical error
/// instead of being propagated into `P`.
pub fn rls_update(
    p: ArrayView1<f64>,
    y: f64,
    phi: ArrayView1<f64>,
    cov: ArrayView2<f64>,
    lambda: f64,
) -> Result<(Array1<f64>, Array2<f64>)> {
    check_shapes(p, phi, cov)?;

    let p_phi = cov.dot(&phi);
    let denominator = lambda + phi.dot(&p_phi);
    check_denominator("RLS", denominator)?;

    let gain = &p_phi / denominator;
    let innovation = y - phi.dot(&p);
    let updated = &p + &(&gain * innovation);

    let phi_p = phi.dot(&cov);
    let updated_cov = (&cov - &linalg::outer(gain.view(), phi_p.view())) / lambda;

    Ok((updated, updated_cov))
}
