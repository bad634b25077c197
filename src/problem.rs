//! # Collaborator interface
//!
//! The optimizer never knows what system it controls. Everything
//! problem-specific (dynamics, policy and critic families, exploration
//! noise, reward) is supplied by the caller through [`ControlProblem`].
//!
//! Time steps passed to the collaborators are the 0-based row index of the
//! trajectory the value was read from.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::RngCore;

use crate::config::NoiseScale;
use crate::error::{DpgError, Result};
use crate::state::ParameterView;

/// A rollout: one row per time step
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    /// T × n
    pub states: Array2<f64>,
    /// T × m
    pub actions: Array2<f64>,
}

impl Trajectory {
    pub fn new(states: Array2<f64>, actions: Array2<f64>) -> Result<Self> {
        if states.nrows() != actions.nrows() {
            return Err(DpgError::dimension_mismatch(
                format!("{} action rows", states.nrows()),
                format!("{}", actions.nrows()),
            ));
        }
        Ok(Trajectory { states, actions })
    }

    /// Number of time steps
    pub fn len(&self) -> usize {
        self.states.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn state_dim(&self) -> usize {
        self.states.ncols()
    }

    pub fn action_dim(&self) -> usize {
        self.actions.ncols()
    }
}

/// One consecutive pair of time steps, as seen by [`ControlProblem::gradients`]
#[derive(Clone, Copy, Debug)]
pub struct Transition<'a> {
    pub state: ArrayView1<'a, f64>,
    pub next_state: ArrayView1<'a, f64>,
    pub action: ArrayView1<'a, f64>,
    /// Policy action at `next_state`
    pub next_action: ArrayView1<'a, f64>,
    pub t: usize,
}

/// Partial derivatives returned by the gradient collaborator
#[derive(Clone, Debug, PartialEq)]
pub struct Gradients {
    /// ∂Q/∂a, length m
    pub dq_da: Array1<f64>,
    /// ∂Q/∂w, length of `w`
    pub dq_dw: Array1<f64>,
    /// ∂Q/∂v, length of `v`
    pub dq_dv: Array1<f64>,
    /// ∂μ/∂Θ, len(Θ) × m
    pub dmu_dtheta: Array2<f64>,
}

impl Gradients {
    /// Verify the shapes against the parameters they were computed for.
    pub fn check(&self, params: ParameterView<'_>, action_dim: usize) -> Result<()> {
        DpgError::check_len("dQ/da", action_dim, self.dq_da.len())?;
        DpgError::check_len("dQ/dw", params.w.len(), self.dq_dw.len())?;
        DpgError::check_len("dQ/dv", params.v.len(), self.dq_dv.len())?;
        if self.dmu_dtheta.dim() != (params.theta.len(), action_dim) {
            return Err(DpgError::dimension_mismatch(
                format!("{}x{} dmu/dtheta", params.theta.len(), action_dim),
                format!("{}x{}", self.dmu_dtheta.nrows(), self.dmu_dtheta.ncols()),
            ));
        }
        Ok(())
    }

    /// (∂μ/∂Θ)·(∂Q/∂a), this step's contribution to the actor gradient
    pub fn actor_direction(&self) -> Array1<f64> {
        self.dmu_dtheta.dot(&self.dq_da)
    }
}

/// The functions a caller supplies to describe a control problem.
///
/// Implementations are expected to be pure: the optimizer may call any of
/// them any number of times, and `reward` may be called from several threads
/// at once while a trajectory's cost is being summed.
///
/// # Time index
///
/// Every `t` argument is the 0-based row of the trajectory: the first step
/// of a rollout is `t = 0` and the last is `t = T - 1`. A reward or policy
/// written for steps numbered `1..=T` must add one itself. Within the
/// training loop, `policy`, `action_value` and `gradients` for the
/// transition starting at row `t` all receive that same `t`.
pub trait ControlProblem: Sync {
    /// μ(state; Θ)
    fn policy(&self, state: ArrayView1<f64>, theta: ArrayView1<f64>, t: usize) -> Array1<f64>;

    /// Q(state, action; Θ, w, v)
    fn action_value(
        &self,
        state: ArrayView1<f64>,
        action: ArrayView1<f64>,
        params: ParameterView<'_>,
        t: usize,
    ) -> f64;

    /// Critic and policy derivatives for one transition
    fn gradients(&self, transition: &Transition<'_>, params: ParameterView<'_>) -> Gradients;

    /// Roll the system forward from `initial_state` under policy Θ.
    ///
    /// `noise` is `None` for noise-free evaluation rollouts, otherwise a trace
    /// produced by [`ControlProblem::exploration`].
    fn simulate(
        &self,
        theta: ArrayView1<f64>,
        initial_state: ArrayView1<f64>,
        noise: Option<ArrayView2<f64>>,
    ) -> Result<Trajectory>;

    /// Sample an exploration noise trace (T × m) at the given scale.
    fn exploration(&self, scale: &NoiseScale, rng: &mut dyn RngCore) -> Result<Array2<f64>>;

    /// Immediate reward
    fn reward(&self, state: ArrayView1<f64>, action: ArrayView1<f64>, t: usize) -> f64;
}
