#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use dpg::config::{CriticUpdate, DpgBuilder, DpgConfig, NoiseScale};
use dpg::error::{DpgError, Result};
use dpg::noise;
use dpg::problem::{ControlProblem, Gradients, Trajectory, Transition};
use dpg::state::{ParameterView, Parameters};
use ndarray::{array, Array1, Array2, ArrayView1, ArrayView2};
use rand::RngCore;

/// x' = a·x + b·u, μ(s) = Θ·s, r = −s² − u²
///
/// The critic is the compatible one for a linear policy:
/// Q(s, a) = v·s² + w·(a − Θs)·s
pub struct LinearQuadratic {
    pub a: f64,
    pub b: f64,
    pub horizon: usize,
}

impl Default for LinearQuadratic {
    fn default() -> Self {
        LinearQuadratic {
            a: 0.5,
            b: 0.5,
            horizon: 20,
        }
    }
}

impl ControlProblem for LinearQuadratic {
    fn policy(&self, state: ArrayView1<f64>, theta: ArrayView1<f64>, _t: usize) -> Array1<f64> {
        array![theta[0] * state[0]]
    }

    fn action_value(
        &self,
        state: ArrayView1<f64>,
        action: ArrayView1<f64>,
        params: ParameterView<'_>,
        _t: usize,
    ) -> f64 {
        let s = state[0];
        let a = action[0];
        params.v[0] * s * s + params.w[0] * (a - params.theta[0] * s) * s
    }

    fn gradients(&self, transition: &Transition<'_>, params: ParameterView<'_>) -> Gradients {
        let s = transition.state[0];
        let a = transition.action[0];
        Gradients {
            dq_da: array![params.w[0] * s],
            dq_dw: array![(a - params.theta[0] * s) * s],
            dq_dv: array![s * s],
            dmu_dtheta: array![[s]],
        }
    }

    fn simulate(
        &self,
        theta: ArrayView1<f64>,
        initial_state: ArrayView1<f64>,
        noise: Option<ArrayView2<f64>>,
    ) -> Result<Trajectory> {
        if let Some(trace) = noise {
            if trace.nrows() < self.horizon {
                return Err(DpgError::dimension_mismatch(
                    format!("{} noise rows", self.horizon),
                    format!("{}", trace.nrows()),
                ));
            }
        }

        let mut states = Array2::zeros((self.horizon, 1));
        let mut actions = Array2::zeros((self.horizon, 1));
        let mut x = initial_state[0];
        for t in 0..self.horizon {
            let e = noise.map_or(0.0, |trace| trace[[t, 0]]);
            let u = theta[0] * x + e;
            states[[t, 0]] = x;
            actions[[t, 0]] = u;
            x = self.a * x + self.b * u;
        }
        Trajectory::new(states, actions)
    }

    fn exploration(&self, scale: &NoiseScale, mut rng: &mut dyn RngCore) -> Result<Array2<f64>> {
        noise::gaussian_trace(scale, self.horizon, 1, &mut rng)
    }

    fn reward(&self, state: ArrayView1<f64>, action: ArrayView1<f64>, _t: usize) -> f64 {
        -state[0] * state[0] - action[0] * action[0]
    }
}

/// Wraps a problem and inflates every evaluation rollout after the first
pub struct Sabotaged {
    pub inner: LinearQuadratic,
    pub evaluations: AtomicUsize,
    pub factor: f64,
}

impl Sabotaged {
    pub fn new(factor: f64) -> Self {
        Sabotaged {
            inner: LinearQuadratic::default(),
            evaluations: AtomicUsize::new(0),
            factor,
        }
    }
}

impl ControlProblem for Sabotaged {
    fn policy(&self, state: ArrayView1<f64>, theta: ArrayView1<f64>, t: usize) -> Array1<f64> {
        self.inner.policy(state, theta, t)
    }

    fn action_value(
        &self,
        state: ArrayView1<f64>,
        action: ArrayView1<f64>,
        params: ParameterView<'_>,
        t: usize,
    ) -> f64 {
        self.inner.action_value(state, action, params, t)
    }

    fn gradients(&self, transition: &Transition<'_>, params: ParameterView<'_>) -> Gradients {
        self.inner.gradients(transition, params)
    }

    fn simulate(
        &self,
        theta: ArrayView1<f64>,
        initial_state: ArrayView1<f64>,
        noise: Option<ArrayView2<f64>>,
    ) -> Result<Trajectory> {
        let mut trajectory = self.inner.simulate(theta, initial_state, noise)?;
        if noise.is_none() && self.evaluations.fetch_add(1, Ordering::SeqCst) > 0 {
            trajectory.states *= self.factor;
            trajectory.actions *= self.factor;
        }
        Ok(trajectory)
    }

    fn exploration(&self, scale: &NoiseScale, rng: &mut dyn RngCore) -> Result<Array2<f64>> {
        self.inner.exploration(scale, rng)
    }

    fn reward(&self, state: ArrayView1<f64>, action: ArrayView1<f64>, t: usize) -> f64 {
        self.inner.reward(state, action, t)
    }
}

pub fn scalar_params(theta: f64, w: f64, v: f64) -> Parameters {
    Parameters::new(array![theta], array![w], array![v])
}

/// Settings under which every critic mode learns the linear-quadratic problem
pub fn base_config(mode: CriticUpdate) -> DpgBuilder {
    DpgBuilder::new(1)
        .critic_update(mode)
        .noise(0.5)
        .step_sizes(0.5, 0.5, 0.5)
        .gamma(0.9)
        .tau(0.1)
        .lambda_rls(0.99)
        .step_reduction(1000, 0.5)
        .hold_actor(0)
}

pub fn config(builder: DpgBuilder) -> DpgConfig {
    builder.build().expect("valid test configuration")
}

/// One `action_value` call as seen by [`Recording`]
#[derive(Clone, Debug, PartialEq)]
pub struct ValueCall {
    pub params: Parameters,
    pub t: usize,
}

/// Wraps a problem and records the parameters every critic evaluation sees
pub struct Recording {
    pub inner: LinearQuadratic,
    pub calls: Mutex<Vec<ValueCall>>,
}

impl Recording {
    pub fn new() -> Self {
        Recording {
            inner: LinearQuadratic::default(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn take_calls(&self) -> Vec<ValueCall> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }
}

impl ControlProblem for Recording {
    fn policy(&self, state: ArrayView1<f64>, theta: ArrayView1<f64>, t: usize) -> Array1<f64> {
        self.inner.policy(state, theta, t)
    }

    fn action_value(
        &self,
        state: ArrayView1<f64>,
        action: ArrayView1<f64>,
        params: ParameterView<'_>,
        t: usize,
    ) -> f64 {
        self.calls.lock().unwrap().push(ValueCall {
            params: Parameters::new(params.theta.to_owned(), params.w.to_owned(), params.v.to_owned()),
            t,
        });
        self.inner.action_value(state, action, params, t)
    }

    fn gradients(&self, transition: &Transition<'_>, params: ParameterView<'_>) -> Gradients {
        self.inner.gradients(transition, params)
    }

    fn simulate(
        &self,
        theta: ArrayView1<f64>,
        initial_state: ArrayView1<f64>,
        noise: Option<ArrayView2<f64>>,
    ) -> Result<Trajectory> {
        self.inner.simulate(theta, initial_state, noise)
    }

    fn exploration(&self, scale: &NoiseScale, rng: &mut dyn RngCore) -> Result<Array2<f64>> {
        self.inner.exploration(scale, rng)
    }

    fn reward(&self, state: ArrayView1<f64>, action: ArrayView1<f64>, t: usize) -> f64 {
        self.inner.reward(state, action, t)
    }
}
