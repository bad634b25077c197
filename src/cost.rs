//! Episode cost evaluator
//!
//! The cost of a trajectory is its negated total reward. Rewards at different
//! time steps are independent, so they are evaluated in parallel; the
//! reduction afterwards is a plain ordered sum, which keeps the result
//! identical from run to run.

use ndarray::parallel::prelude::*;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::error::Result;
use crate::problem::{ControlProblem, Trajectory};

/// `J = -Σₜ reward(xₜ, uₜ, t)` over every row of the trajectory
pub fn episode_cost<F>(trajectory: &Trajectory, reward: F) -> f64
where
    F: Fn(ArrayView1<f64>, ArrayView1<f64>, usize) -> f64 + Sync,
{
    let states = trajectory.states.view();
    let actions = trajectory.actions.view();

    let rewards: Vec<f64> = (0..trajectory.len())
        .into_par_iter()
        .map(|t| reward(states.row(t), actions.row(t), t))
        .collect();

    -rewards.iter().sum::<f64>()
}

/// Episode cost of a trajectory under the problem's own reward
pub fn trajectory_cost<P: ControlProblem + ?Sized>(problem: &P, trajectory: &Trajectory) -> f64 {
    episode_cost(trajectory, |s, a, t| problem.reward(s, a, t))
}

/// Noise-free evaluation cost of policy Θ from each row of `initial_states`.
///
/// Rollouts are independent and run in parallel. The first failing rollout's
/// error is returned.
pub fn batch_cost<P: ControlProblem + ?Sized>(
    problem: &P,
    theta: ArrayView1<f64>,
    initial_states: ArrayView2<f64>,
) -> Result<Array1<f64>> {
    let costs: Result<Vec<f64>> = initial_states
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|x0| {
            let trajectory = problem.simulate(theta, x0, None)?;
            Ok(trajectory_cost(problem, &trajectory))
        })
        .collect();

    Ok(Array1::from_vec(costs?))
}
