use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{check_denominator, check_shapes};
use crate::error::{DpgError, Result};
use crate::linalg;

/// Measurement-side noise of the critic Kalman filter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KalmanNoise {
    /// Observation noise variance
    pub r2: f64,
    /// Cross-covariance between process and observation noise
    pub r12: Array1<f64>,
}

impl KalmanNoise {
    pub fn new(r2: f64, dim: usize) -> Self {
        KalmanNoise {
            r2,
            r12: Array1::zeros(dim),
        }
    }
}

/// One Kalman step for the random-walk model `p⁺ = p + e₁`, `y = φᵀp + e₂`.
///
/// `r1` is the process noise covariance. The critic passes `φφᵀ`, so noise
/// only enters along the direction currently being observed.
///
/// ```text
/// S   = φᵀPφ + R2
/// K   = (Pφ + R12) / S
/// p'  = p + K·(y − φᵀp)
/// P'  = P + R1 − K·S·Kᵀ
/// ```
pub fn kalman_update(
    r1: ArrayView2<f64>,
    noise: &KalmanNoise,
    p: ArrayView1<f64>,
    y: f64,
    phi: ArrayView1<f64>,
    cov: ArrayView2<f64>,
) -> Result<(Array1<f64>, Array2<f64>)> {
    check_shapes(p, phi, cov)?;
    if r1.dim() != cov.dim() {
        return Err(DpgError::dimension_mismatch(
            format!("{}x{} process noise", cov.nrows(), cov.ncols()),
            format!("{}x{}", r1.nrows(), r1.ncols()),
        ));
    }
    DpgError::check_len("R12", p.len(), noise.r12.len())?;

    let p_phi = cov.dot(&phi);
    let innovation_var = phi.dot(&p_phi) + noise.r2;
    check_denominator("Kalman", innovation_var)?;

    let gain = (&p_phi + &noise.r12) / innovation_var;
    let innovation = y - phi.dot(&p);
    let updated = &p + &(&gain * innovation);

    let correction = linalg::outer(gain.view(), gain.view()) * innovation_var;
    let updated_cov = &cov + &r1 - &correction;

    Ok((updated, updated_cov))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimators::rls_update;
    use ndarray::array;

    #[test]
    fn test_matches_rls_without_process_noise() {
        let p = array![0.5, -1.0];
        let phi = array![2.0, 1.0];
        let cov = array![[3.0, 0.5], [0.5, 2.0]];
        let r1 = Array2::<f64>::zeros((2, 2));

        let (kp, kcov) = kalman_update(r1.view(), &KalmanNoise::new(1.0, 2), p.view(), 4.0, phi.view(), cov.view()).unwrap();
        let (rp, rcov) = rls_update(p.view(), 4.0, phi.view(), cov.view(), 1.0).unwrap();

        for (a, b) in kp.iter().zip(rp.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        for (a, b) in kcov.iter().zip(rcov.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_observation_pulls_toward_measurement() {
        let phi = array![1.0];
        let cov = array![[10.0]];
        let r1 = linalg::outer(phi.view(), phi.view());
        let (p, next_cov) = kalman_update(r1.view(), &KalmanNoise::new(1.0, 1), array![0.0].view(), 5.0, phi.view(), cov.view()).unwrap();

        // K = 10 / 11
        assert!((p[0] - 50.0 / 11.0).abs() < 1e-12);
        // 10 + 1 − 100/11
        assert!((next_cov[[0, 0]] - (11.0 - 100.0 / 11.0)).abs() < 1e-12);
    }

    #[test]
    fn test_cross_covariance_shifts_gain() {
        let phi = array![1.0, 0.0];
        let cov = Array2::<f64>::eye(2);
        let r1 = Array2::<f64>::zeros((2, 2));
        let noise = KalmanNoise {
            r2: 1.0,
            r12: array![0.0, 1.0],
        };
        let (p, _) = kalman_update(r1.view(), &noise, array![0.0, 0.0].view(), 2.0, phi.view(), cov.view()).unwrap();
        // gain = ([1, 0] + [0, 1]) / 2
        assert_eq!(p, array![1.0, 1.0]);
    }

    #[test]
    fn test_rejects_bad_cross_covariance() {
        let noise = KalmanNoise::new(1.0, 3);
        let result = kalman_update(
            Array2::<f64>::zeros((2, 2)).view(),
            &noise,
            array![0.0, 0.0].view(),
            1.0,
            array![1.0, 1.0].view(),
            Array2::<f64>::eye(2).view(),
        );
        assert!(matches!(result, Err(DpgError::DimensionMismatch { .. })));
    }
}
