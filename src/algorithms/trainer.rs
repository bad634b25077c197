use ndarray::{Array1, ArrayView1};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::checkpoint::{Checkpoint, Verdict};
use super::critic::{CriticGradients, CriticState};
use crate::config::DpgConfig;
use crate::cost;
use crate::error::{DpgError, Result};
use crate::linalg;
use crate::metrics::{
    DivergenceReport, EvaluationReport, FinishReport, GradientNorms, IterationReport, LogObserver,
    StartReport, TrainingObserver,
};
use crate::noise;
use crate::optimizer::{RmsNormalizer, StepSchedule, StepSizes};
use crate::problem::{ControlProblem, Trajectory, Transition};
use crate::state::Parameters;

/// Outcome of a DPG run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DpgResult {
    /// One entry per iteration: the training rollout's cost, replaced by the
    /// noise-free evaluation cost at evaluation iterations
    pub costs: Array1<f64>,
    /// Parameters with the lowest evaluation cost seen
    pub best: Parameters,
    pub best_cost: f64,
    /// `(iteration, cost)` for every evaluation
    pub evaluations: Vec<(usize, f64)>,
    pub divergences: usize,
}

/// Deterministic policy gradient actor-critic trainer
///
/// Iterations run strictly in sequence: each rollout uses the parameters
/// produced by the previous one. The trainer owns its random number
/// generator, so two trainers built from the same seeded configuration
/// produce identical runs.
pub struct DpgTrainer<'p, P: ControlProblem + ?Sized> {
    config: DpgConfig,
    problem: &'p P,
    rng: StdRng,
}

impl<'p, P: ControlProblem + ?Sized> DpgTrainer<'p, P> {
    /// Validates `config`; nothing is simulated before this succeeds.
    pub fn new(config: DpgConfig, problem: &'p P) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(DpgTrainer { config, problem, rng })
    }

    /// Replace the generator used for start perturbation and exploration.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &DpgConfig {
        &self.config
    }

    /// Run `config.iters` iterations from `initial`, starting rollouts near `x0`.
    pub fn train<O: TrainingObserver + ?Sized>(
        &mut self,
        initial: Parameters,
        x0: ArrayView1<f64>,
        observer: &mut O,
    ) -> Result<DpgResult> {
        let DpgTrainer { config, problem, rng } = self;
        let config: &DpgConfig = config;
        let problem: &P = *problem;
        let tuning = &config.tuning;

        let mut live = initial;
        let mut target = live.clone();
        let mut checkpoint = Checkpoint::new(&live, tuning.divergence_ratio);
        let mut critic = CriticState::new(config, &live);
        let mut actor_rms = RmsNormalizer::new(live.theta.len(), tuning.rms_decay, tuning.rms_epsilon);
        let mut steps = StepSizes::new(config.alpha_theta, config.alpha_w, config.alpha_v, config.alpha_u);
        let schedule = StepSchedule::new(config.stepreduce_interval, config.stepreduce_factor);
        let mut exploration_scale = config.sigma_beta.clone();

        let mut costs = Array1::<f64>::zeros(config.iters);
        let mut evaluations = Vec::new();
        let mut divergences = 0;

        observer.on_start(&StartReport {
            critic_update: critic.mode(),
            iters: config.iters,
            hold_actor: config.hold_actor,
        });

        for iteration in 1..=config.iters {
            let start = noise::perturb(x0, tuning.perturbation_variance, &mut *rng)?;
            let exploration = problem.exploration(&exploration_scale, &mut *rng)?;
            let trajectory = problem.simulate(live.theta.view(), start.view(), Some(exploration.view()))?;
            check_trajectory(&trajectory, config.action_dim)?;
            let horizon = trajectory.len();

            let mut actor_gradient = Array1::<f64>::zeros(live.theta.len());
            let mut critic_gradients = CriticGradients::zeros(&live);
            let mut cost = 0.0;

            for t in 0..horizon - 1 {
                let state = trajectory.states.row(t);
                let next_state = trajectory.states.row(t + 1);
                let action = trajectory.actions.row(t);
                let next_action = problem.policy(next_state, live.theta.view(), t);

                let reward = problem.reward(state, action, t);
                cost -= reward;

                let transition = Transition {
                    state,
                    next_state,
                    action,
                    next_action: next_action.view(),
                    t,
                };
                let grads = problem.gradients(&transition, live.view());
                grads.check(live.view(), config.action_dim)?;
                actor_gradient += &grads.actor_direction();

                // Bootstrap through the target networks only
                let bootstrap = reward
                    + config.gamma * problem.action_value(next_state, next_action.view(), target.view(), t);

                critic.observe(
                    &mut live,
                    bootstrap,
                    &grads,
                    |params| problem.action_value(state, action, params.view(), t),
                    &mut critic_gradients,
                )?;
            }
            costs[iteration - 1] = cost;

            if iteration > config.hold_actor {
                actor_rms.ascend(&mut live.theta, &actor_gradient, steps.actor / horizon as f64);
            }
            critic.apply(&mut live, &critic_gradients, &steps, horizon);

            target.track(&live, config.tau);
            schedule.apply(iteration, &mut steps);

            if iteration == 1 || iteration % tuning.eval_interval == 0 {
                let rollout = problem.simulate(live.theta.view(), x0, None)?;
                let eval_cost = cost::trajectory_cost(problem, &rollout);
                costs[iteration - 1] = eval_cost;
                evaluations.push((iteration, eval_cost));

                let verdict = checkpoint.assess(eval_cost, &live);
                let (critic_w, critic_v) = critic_gradients.norms();
                observer.on_evaluation(&EvaluationReport {
                    iteration,
                    cost: eval_cost,
                    best_cost: checkpoint.best_cost(),
                    improved: verdict == Verdict::Improved,
                    gradient_norms: GradientNorms {
                        actor: actor_gradient.dot(&actor_gradient).sqrt(),
                        critic_w,
                        critic_v,
                    },
                    steps,
                    noise: exploration_scale.magnitude(),
                    covariance_trace: critic.covariance().map(|cov| linalg::trace(cov.view())),
                });

                if verdict == Verdict::Diverged {
                    steps.scale(1.0 / tuning.divergence_step_divisor);
                    exploration_scale = exploration_scale.shrink(tuning.divergence_noise_divisor);
                    live = checkpoint.best().clone();
                    divergences += 1;

                    observer.on_divergence(&DivergenceReport {
                        iteration,
                        cost: eval_cost,
                        best_cost: checkpoint.best_cost(),
                        steps,
                        noise: exploration_scale.clone(),
                    });
                }
            }

            observer.on_iteration(&IterationReport {
                iteration,
                cost: costs[iteration - 1],
                params: &live,
                steps,
            });
        }

        let min_evaluation_cost = evaluations
            .iter()
            .map(|&(_, c)| c)
            .fold(f64::INFINITY, f64::min);
        observer.on_finish(&FinishReport {
            iterations: config.iters,
            min_evaluation_cost,
            min_cost: costs.iter().cloned().fold(f64::INFINITY, f64::min),
            divergences,
        });

        Ok(DpgResult {
            costs,
            best_cost: checkpoint.best_cost(),
            best: checkpoint.into_best(),
            evaluations,
            divergences,
        })
    }
}

fn check_trajectory(trajectory: &Trajectory, action_dim: usize) -> Result<()> {
    if trajectory.is_empty() {
        return Err(DpgError::Collaborator("simulate returned an empty trajectory".to_string()));
    }
    if trajectory.states.nrows() != trajectory.actions.nrows() {
        return Err(DpgError::dimension_mismatch(
            format!("{} action rows", trajectory.states.nrows()),
            format!("{}", trajectory.actions.nrows()),
        ));
    }
    DpgError::check_len("action trajectory width", action_dim, trajectory.action_dim())
}

/// Run DPG with progress sent to the `log` facade.
///
/// Returns the cost history and the best parameters found.
pub fn dpg<P: ControlProblem + ?Sized>(
    config: &DpgConfig,
    problem: &P,
    initial: Parameters,
    x0: ArrayView1<f64>,
) -> Result<DpgResult> {
    let mut trainer = DpgTrainer::new(config.clone(), problem)?;
    trainer.train(initial, x0, &mut LogObserver)
}
