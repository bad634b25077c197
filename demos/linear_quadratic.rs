/***
# Stabilize a double integrator.

* The state is position and velocity; the action is an acceleration.
* The policy is linear state feedback u = Θ·x.
* The critic is compatible with that policy: a quadratic value term in
  (p², p·v, v²) plus an advantage term w·(u − Θ·x)·x.
* Every critic update mode is trained from the same start and the best
  evaluation cost of each is printed.
***/

use dpg::algorithms::DpgTrainer;
use dpg::config::{CriticUpdate, DpgBuilder, NoiseScale};
use dpg::error::Result;
use dpg::metrics::{EvaluationReport, TrainingHistory, TrainingObserver};
use dpg::noise;
use dpg::problem::{ControlProblem, Gradients, Trajectory, Transition};
use dpg::state::{ParameterView, Parameters};
use ndarray::{array, Array1, Array2, ArrayView1, ArrayView2};
use rand::RngCore;

const DT: f64 = 0.1;
const HORIZON: usize = 50;

struct DoubleIntegrator;

fn features(s: ArrayView1<f64>) -> Array1<f64> {
    array![s[0] * s[0], s[0] * s[1], s[1] * s[1]]
}

impl ControlProblem for DoubleIntegrator {
    fn policy(&self, state: ArrayView1<f64>, theta: ArrayView1<f64>, _t: usize) -> Array1<f64> {
        array![theta.dot(&state)]
    }

    fn action_value(
        &self,
        state: ArrayView1<f64>,
        action: ArrayView1<f64>,
        params: ParameterView<'_>,
        _t: usize,
    ) -> f64 {
        let advantage = action[0] - params.theta.dot(&state);
        params.v.dot(&features(state)) + advantage * params.w.dot(&state)
    }

    fn gradients(&self, transition: &Transition<'_>, params: ParameterView<'_>) -> Gradients {
        let s = transition.state;
        let advantage = transition.action[0] - params.theta.dot(&s);
        Gradients {
            dq_da: array![params.w.dot(&s)],
            dq_dw: &s * advantage,
            dq_dv: features(s),
            dmu_dtheta: s.to_owned().insert_axis(ndarray::Axis(1)),
        }
    }

    fn simulate(
        &self,
        theta: ArrayView1<f64>,
        initial_state: ArrayView1<f64>,
        noise: Option<ArrayView2<f64>>,
    ) -> Result<Trajectory> {
        let mut states = Array2::zeros((HORIZON, 2));
        let mut actions = Array2::zeros((HORIZON, 1));
        let mut x = initial_state.to_owned();
        for t in 0..HORIZON {
            let u = theta.dot(&x) + noise.map_or(0.0, |n| n[[t, 0]]);
            states.row_mut(t).assign(&x);
            actions[[t, 0]] = u;
            x = array![x[0] + DT * x[1], x[1] + DT * u];
        }
        Trajectory::new(states, actions)
    }

    fn exploration(&self, scale: &NoiseScale, mut rng: &mut dyn RngCore) -> Result<Array2<f64>> {
        noise::gaussian_trace(scale, HORIZON, 1, &mut rng)
    }

    fn reward(&self, state: ArrayView1<f64>, action: ArrayView1<f64>, _t: usize) -> f64 {
        -(state[0] * state[0] + 0.1 * state[1] * state[1] + 0.01 * action[0] * action[0])
    }
}

/// Prints every evaluation as it happens
struct Printer;

impl TrainingObserver for Printer {
    fn on_evaluation(&mut self, report: &EvaluationReport) {
        println!(
            "  iteration {:5}  cost {:10.4}  best {:10.4}{}",
            report.iteration,
            report.cost,
            report.best_cost,
            if report.improved { "  *" } else { "" }
        );
    }
}

fn main() -> Result<()> {
    let x0 = array![1.0, 0.0];

    for mode in [CriticUpdate::Gradient, CriticUpdate::Rls, CriticUpdate::Kalman] {
        let config = DpgBuilder::new(1)
            .critic_update(mode)
            .noise(0.5)
            .step_sizes(0.02, 0.05, 0.05)
            .gamma(0.95)
            .tau(0.05)
            .iters(1000)
            .hold_actor(20)
            .step_reduction(250, 0.5)
            .eval_interval(100)
            .seed(2024)
            .build()?;

        println!("critic update: {}", mode);
        let initial = Parameters::new(array![0.0, 0.0], array![0.0, 0.0], array![0.0, 0.0, 0.0]);
        let mut history = TrainingHistory::new();
        let result = DpgTrainer::new(config, &DoubleIntegrator)?.train(
            initial,
            x0.view(),
            &mut (Printer, &mut history),
        )?;

        let evaluations = history.evaluation_statistics();
        let training = history.cost_statistics();
        println!(
            "  best cost {:.4} with gain [{:.3}, {:.3}], {} divergence(s)",
            result.best_cost, result.best.theta[0], result.best.theta[1], result.divergences
        );
        println!(
            "  evaluation mean {:.4}, training cost mean {:.4} (min {:.4})\n",
            evaluations.mean, training.mean, training.min
        );
    }
    Ok(())
}
