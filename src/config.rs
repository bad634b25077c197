//! # Configuration
//!
//! [`DpgConfig`] is the immutable record of hyperparameters for one run of
//! the optimizer. It can be assembled with [`DpgBuilder`], parsed from JSON,
//! or written out literally; every entry point funnels through
//! [`DpgConfig::validate`] before a single iteration runs.
//!
//! The constants that shape convergence but are rarely touched (evaluation
//! interval, divergence threshold, RMS decay, initial covariances) live in
//! [`Tuning`] with their customary defaults.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{DpgError, Result};

/// Critic update strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriticUpdate {
    /// Batched stochastic gradient on the temporal-difference error
    Gradient,
    /// Online recursive least squares with exponential forgetting
    Rls,
    /// Online Kalman filter with data-dependent process noise
    Kalman,
}

impl CriticUpdate {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriticUpdate::Gradient => "gradient",
            CriticUpdate::Rls => "rls",
            CriticUpdate::Kalman => "kalman",
        }
    }
}

impl fmt::Display for CriticUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CriticUpdate {
    type Err = DpgError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gradient" => Ok(CriticUpdate::Gradient),
            "rls" => Ok(CriticUpdate::Rls),
            "kalman" => Ok(CriticUpdate::Kalman),
            other => Err(DpgError::invalid_parameter(
                "critic_update".to_string(),
                format!("unknown mode '{}', expected one of gradient, rls, kalman", other),
            )),
        }
    }
}

/// Exploration noise magnitude
///
/// A scalar is a standard deviation applied independently to every action
/// component; a matrix is the full action-space covariance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoiseScale {
    Scalar(f64),
    Matrix(Array2<f64>),
}

impl NoiseScale {
    /// Divide the noise amplitude by `divisor`.
    ///
    /// For a covariance matrix the amplitude is the square root, so the
    /// matrix itself is divided by `divisor²`.
    pub fn shrink(&self, divisor: f64) -> NoiseScale {
        match self {
            NoiseScale::Scalar(sigma) => NoiseScale::Scalar(sigma / divisor),
            NoiseScale::Matrix(cov) => NoiseScale::Matrix(cov / (divisor * divisor)),
        }
    }

    /// Representative standard deviation, used for reporting.
    pub fn magnitude(&self) -> f64 {
        match self {
            NoiseScale::Scalar(sigma) => sigma.abs(),
            NoiseScale::Matrix(cov) => cov.diag().iter().cloned().fold(0.0, f64::max).sqrt(),
        }
    }

    fn validate(&self, action_dim: usize) -> Result<()> {
        match self {
            NoiseScale::Scalar(sigma) => {
                if !sigma.is_finite() || *sigma < 0.0 {
                    return Err(DpgError::invalid_parameter(
                        "sigma_beta".to_string(),
                        format!("must be finite and non-negative, got {}", sigma),
                    ));
                }
            }
            NoiseScale::Matrix(cov) => {
                if cov.dim() != (action_dim, action_dim) {
                    return Err(DpgError::dimension_mismatch(
                        format!("{}x{} noise covariance", action_dim, action_dim),
                        format!("{}x{}", cov.nrows(), cov.ncols()),
                    ));
                }
                if cov.iter().any(|x| !x.is_finite()) {
                    return Err(DpgError::invalid_parameter(
                        "sigma_beta",
                        "noise covariance contains non-finite entries",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl From<f64> for NoiseScale {
    fn from(sigma: f64) -> Self {
        NoiseScale::Scalar(sigma)
    }
}

/// Constants that are part of the algorithm but seldom changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Iterations between noise-free evaluations (iteration 1 is always evaluated)
    pub eval_interval: usize,
    /// An evaluation cost above `divergence_ratio * best` triggers rollback
    pub divergence_ratio: f64,
    /// Variance of the Gaussian perturbation added to the nominal start state
    pub perturbation_variance: f64,
    /// Decay of the running squared-gradient estimate
    pub rms_decay: f64,
    /// Added to the RMS denominator
    pub rms_epsilon: f64,
    /// Initial RLS covariance is this times the identity
    pub rls_initial_covariance: f64,
    /// Initial Kalman covariance is this times the identity
    pub kalman_initial_covariance: f64,
    /// Kalman observation noise variance
    pub kalman_r2: f64,
    /// Step sizes are divided by this on divergence
    pub divergence_step_divisor: f64,
    /// Exploration amplitude is divided by this on divergence
    pub divergence_noise_divisor: f64,
    /// Reset the recursive-estimator covariance when its trace exceeds this
    pub covariance_reset_trace: Option<f64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            eval_interval: 100,
            divergence_ratio: 1.2,
            perturbation_variance: 2.0,
            rms_decay: 0.9,
            rms_epsilon: 1e-10,
            rls_initial_covariance: 100.0,
            kalman_initial_covariance: 100.0,
            kalman_r2: 1.0,
            divergence_step_divisor: 10.0,
            divergence_noise_divisor: 2.0,
            covariance_reset_trace: None,
        }
    }
}

impl Tuning {
    fn validate(&self) -> Result<()> {
        if self.eval_interval == 0 {
            return Err(DpgError::invalid_parameter("eval_interval", "must be positive"));
        }
        check_positive("divergence_ratio", self.divergence_ratio)?;
        check_non_negative("perturbation_variance", self.perturbation_variance)?;
        check_unit_interval("rms_decay", self.rms_decay)?;
        check_positive("rms_epsilon", self.rms_epsilon)?;
        check_positive("rls_initial_covariance", self.rls_initial_covariance)?;
        check_positive("kalman_initial_covariance", self.kalman_initial_covariance)?;
        check_positive("kalman_r2", self.kalman_r2)?;
        check_positive("divergence_step_divisor", self.divergence_step_divisor)?;
        check_positive("divergence_noise_divisor", self.divergence_noise_divisor)?;
        if let Some(limit) = self.covariance_reset_trace {
            check_positive("covariance_reset_trace", limit)?;
        }
        Ok(())
    }
}

/// Hyperparameters of a DPG run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DpgConfig {
    /// Exploration noise
    pub sigma_beta: NoiseScale,
    /// Actor step size
    pub alpha_theta: f64,
    /// Critic step size for the advantage block `w`
    pub alpha_w: f64,
    /// Critic step size for the value block `v`
    pub alpha_v: f64,
    /// Reserved; carried through the run but never applied
    pub alpha_u: f64,
    /// Discount factor
    pub gamma: f64,
    /// Target tracking rate
    pub tau: f64,
    /// Number of iterations
    pub iters: usize,
    /// Action dimensionality
    pub action_dim: usize,
    pub critic_update: CriticUpdate,
    /// RLS forgetting factor
    pub lambda_rls: f64,
    pub stepreduce_interval: usize,
    pub stepreduce_factor: f64,
    /// Iterations during which the actor is frozen
    pub hold_actor: usize,
    #[serde(default)]
    pub tuning: Tuning,
    /// Seed for the run's random number generator
    #[serde(default)]
    pub seed: Option<u64>,
}

impl DpgConfig {
    /// Check every range invariant.
    pub fn validate(&self) -> Result<()> {
        if self.action_dim == 0 {
            return Err(DpgError::invalid_parameter("action_dim", "must be positive"));
        }
        self.sigma_beta.validate(self.action_dim)?;
        check_non_negative("alpha_theta", self.alpha_theta)?;
        check_non_negative("alpha_w", self.alpha_w)?;
        check_non_negative("alpha_v", self.alpha_v)?;
        if !self.alpha_u.is_finite() {
            return Err(DpgError::invalid_parameter("alpha_u", "must be finite"));
        }
        check_unit_interval("gamma", self.gamma)?;
        check_unit_interval("tau", self.tau)?;
        check_unit_interval("lambda_rls", self.lambda_rls)?;
        check_unit_interval("stepreduce_factor", self.stepreduce_factor)?;
        if self.iters == 0 {
            return Err(DpgError::invalid_parameter("iters", "must be positive"));
        }
        if self.stepreduce_interval == 0 {
            return Err(DpgError::invalid_parameter("stepreduce_interval", "must be positive"));
        }
        self.tuning.validate()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DpgConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(DpgError::invalid_parameter(
            name.to_string(),
            format!("must lie in (0, 1], got {}", value),
        ))
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DpgError::invalid_parameter(
            name.to_string(),
            format!("must be finite and positive, got {}", value),
        ))
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DpgError::invalid_parameter(
            name.to_string(),
            format!("must be finite and non-negative, got {}", value),
        ))
    }
}

/// Builder for [`DpgConfig`]
pub struct DpgBuilder {
    config: DpgConfig,
}

impl DpgBuilder {
    pub fn new(action_dim: usize) -> Self {
        DpgBuilder {
            config: DpgConfig {
                sigma_beta: NoiseScale::Scalar(1.0),
                alpha_theta: 0.001,
                alpha_w: 0.01,
                alpha_v: 0.01,
                alpha_u: 0.0,
                gamma: 0.99,
                tau: 0.01,
                iters: 1000,
                action_dim,
                critic_update: CriticUpdate::Gradient,
                lambda_rls: 0.999,
                stepreduce_interval: 1000,
                stepreduce_factor: 0.5,
                hold_actor: 0,
                tuning: Tuning::default(),
                seed: None,
            },
        }
    }

    pub fn noise(mut self, sigma_beta: impl Into<NoiseScale>) -> Self {
        self.config.sigma_beta = sigma_beta.into();
        self
    }

    pub fn step_sizes(mut self, alpha_theta: f64, alpha_w: f64, alpha_v: f64) -> Self {
        self.config.alpha_theta = alpha_theta;
        self.config.alpha_w = alpha_w;
        self.config.alpha_v = alpha_v;
        self
    }

    pub fn auxiliary_step_size(mut self, alpha_u: f64) -> Self {
        self.config.alpha_u = alpha_u;
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.config.gamma = gamma;
        self
    }

    pub fn tau(mut self, tau: f64) -> Self {
        self.config.tau = tau;
        self
    }

    pub fn iters(mut self, iters: usize) -> Self {
        self.config.iters = iters;
        self
    }

    pub fn critic_update(mut self, mode: CriticUpdate) -> Self {
        self.config.critic_update = mode;
        self
    }

    pub fn lambda_rls(mut self, lambda: f64) -> Self {
        self.config.lambda_rls = lambda;
        self
    }

    pub fn step_reduction(mut self, interval: usize, factor: f64) -> Self {
        self.config.stepreduce_interval = interval;
        self.config.stepreduce_factor = factor;
        self
    }

    pub fn hold_actor(mut self, iterations: usize) -> Self {
        self.config.hold_actor = iterations;
        self
    }

    pub fn eval_interval(mut self, interval: usize) -> Self {
        self.config.tuning.eval_interval = interval;
        self
    }

    pub fn tuning(mut self, tuning: Tuning) -> Self {
        self.config.tuning = tuning;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<DpgConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
