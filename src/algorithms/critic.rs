use ndarray::{Array1, Array2};

use crate::config::{CriticUpdate, DpgConfig};
use crate::error::Result;
use crate::estimators::{kalman_update, rls_update, KalmanNoise};
use crate::linalg;
use crate::optimizer::{RmsNormalizer, StepSizes};
use crate::problem::Gradients;
use crate::state::Parameters;

/// Resets a recursive estimator's covariance once it grows past a limit
#[derive(Clone, Debug, PartialEq)]
pub struct CovarianceGuard {
    initial_scale: f64,
    reset_trace: Option<f64>,
}

impl CovarianceGuard {
    pub fn new(initial_scale: f64, reset_trace: Option<f64>) -> Self {
        CovarianceGuard {
            initial_scale,
            reset_trace,
        }
    }

    pub fn initial(&self, dim: usize) -> Array2<f64> {
        Array2::eye(dim) * self.initial_scale
    }

    /// Returns true if the covariance was reset.
    pub fn enforce(&self, covariance: &mut Array2<f64>) -> bool {
        let limit = match self.reset_trace {
            Some(limit) => limit,
            None => return false,
        };
        let trace = linalg::trace(covariance.view());
        if trace.is_finite() && trace <= limit {
            return false;
        }
        log::warn!(
            "dpg: critic covariance trace {:.3e} exceeds {:.3e}, resetting to {:.3e}·I",
            trace,
            limit,
            self.initial_scale
        );
        *covariance = self.initial(covariance.nrows());
        true
    }
}

/// Gradients accumulated over one trajectory in gradient mode
#[derive(Clone, Debug, PartialEq)]
pub struct CriticGradients {
    pub w: Array1<f64>,
    pub v: Array1<f64>,
}

impl CriticGradients {
    pub fn zeros(params: &Parameters) -> Self {
        CriticGradients {
            w: Array1::zeros(params.w.len()),
            v: Array1::zeros(params.v.len()),
        }
    }

    pub fn norms(&self) -> (f64, f64) {
        (self.w.dot(&self.w).sqrt(), self.v.dot(&self.v).sqrt())
    }
}

/// Critic update strategy together with the state it carries between steps
#[derive(Clone, Debug)]
pub enum CriticState {
    /// Running squared gradients for `w` and `v`
    Gradient {
        w: RmsNormalizer,
        v: RmsNormalizer,
    },
    /// Covariance over the stacked `[v; w]` block
    Rls {
        covariance: Array2<f64>,
        forgetting: f64,
        guard: CovarianceGuard,
    },
    Kalman {
        covariance: Array2<f64>,
        noise: KalmanNoise,
        guard: CovarianceGuard,
    },
}

impl CriticState {
    pub fn new(config: &DpgConfig, params: &Parameters) -> Self {
        let tuning = &config.tuning;
        let dim = params.v.len() + params.w.len();

        match config.critic_update {
            CriticUpdate::Gradient => CriticState::Gradient {
                w: RmsNormalizer::new(params.w.len(), tuning.rms_decay, tuning.rms_epsilon),
                v: RmsNormalizer::new(params.v.len(), tuning.rms_decay, tuning.rms_epsilon),
            },
            CriticUpdate::Rls => {
                let guard = CovarianceGuard::new(tuning.rls_initial_covariance, tuning.covariance_reset_trace);
                CriticState::Rls {
                    covariance: guard.initial(dim),
                    forgetting: config.lambda_rls,
                    guard,
                }
            }
            CriticUpdate::Kalman => {
                let guard = CovarianceGuard::new(tuning.kalman_initial_covariance, tuning.covariance_reset_trace);
                CriticState::Kalman {
                    covariance: guard.initial(dim),
                    noise: KalmanNoise::new(tuning.kalman_r2, dim),
                    guard,
                }
            }
        }
    }

    pub fn mode(&self) -> CriticUpdate {
        match self {
            CriticState::Gradient { .. } => CriticUpdate::Gradient,
            CriticState::Rls { .. } => CriticUpdate::Rls,
            CriticState::Kalman { .. } => CriticUpdate::Kalman,
        }
    }

    pub fn covariance(&self) -> Option<&Array2<f64>> {
        match self {
            CriticState::Gradient { .. } => None,
            CriticState::Rls { covariance, .. } | CriticState::Kalman { covariance, .. } => Some(covariance),
        }
    }

    /// Feed one transition's bootstrap target to the critic.
    ///
    /// Gradient mode only accumulates `δ·∂Q/∂w` and `δ·∂Q/∂v` into `acc`;
    /// `current_value` is evaluated for the TD error and nowhere else. The
    /// recursive modes rewrite `live.v` and `live.w` immediately.
    pub fn observe<F>(
        &mut self,
        live: &mut Parameters,
        target: f64,
        grads: &Gradients,
        current_value: F,
        acc: &mut CriticGradients,
    ) -> Result<()>
    where
        F: FnOnce(&Parameters) -> f64,
    {
        match self {
            CriticState::Gradient { .. } => {
                let delta = target - current_value(&*live);
                acc.w.scaled_add(delta, &grads.dq_dw);
                acc.v.scaled_add(delta, &grads.dq_dv);
            }
            CriticState::Rls { covariance, forgetting, guard } => {
                let phi = linalg::stack(grads.dq_dv.view(), grads.dq_dw.view());
                let (p, cov) = rls_update(
                    live.critic_stacked().view(),
                    target,
                    phi.view(),
                    covariance.view(),
                    *forgetting,
                )?;
                live.set_critic_stacked(&p)?;
                *covariance = cov;
                guard.enforce(covariance);
            }
            CriticState::Kalman { covariance, noise, guard } => {
                let phi = linalg::stack(grads.dq_dv.view(), grads.dq_dw.view());
                let process_noise = linalg::outer(phi.view(), phi.view());
                let (p, cov) = kalman_update(
                    process_noise.view(),
                    noise,
                    live.critic_stacked().view(),
                    target,
                    phi.view(),
                    covariance.view(),
                )?;
                live.set_critic_stacked(&p)?;
                *covariance = cov;
                guard.enforce(covariance);
            }
        }
        Ok(())
    }

    /// End-of-trajectory update; only gradient mode has one.
    pub fn apply(&mut self, live: &mut Parameters, acc: &CriticGradients, steps: &StepSizes, horizon: usize) {
        match self {
            CriticState::Gradient { w, v } => {
                let horizon = horizon as f64;
                w.ascend(&mut live.w, &acc.w, steps.critic_w / horizon);
                v.ascend(&mut live.v, &acc.v, steps.critic_v / horizon);
            }
            CriticState::Rls { .. } | CriticState::Kalman { .. } => {}
        }
    }
}
