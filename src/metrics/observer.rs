use serde::{Deserialize, Serialize};

use crate::config::{CriticUpdate, NoiseScale};
use crate::optimizer::StepSizes;
use crate::state::Parameters;

/// Emitted once before the first iteration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartReport {
    pub critic_update: CriticUpdate,
    pub iters: usize,
    pub hold_actor: usize,
}

/// Emitted at the end of every iteration
#[derive(Clone, Debug)]
pub struct IterationReport<'a> {
    pub iteration: usize,
    /// Entry of the cost history for this iteration
    pub cost: f64,
    /// Live parameters after all of this iteration's updates
    pub params: &'a Parameters,
    pub steps: StepSizes,
}

/// Euclidean norms of the gradients accumulated over one trajectory
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GradientNorms {
    pub actor: f64,
    /// Zero in the recursive critic modes
    pub critic_w: f64,
    /// Zero in the recursive critic modes
    pub critic_v: f64,
}

/// Emitted at every noise-free evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub iteration: usize,
    pub cost: f64,
    /// Best evaluation cost after this evaluation
    pub best_cost: f64,
    pub improved: bool,
    pub gradient_norms: GradientNorms,
    pub steps: StepSizes,
    pub noise: f64,
    /// Trace of the RLS/Kalman covariance, if that mode is active
    pub covariance_trace: Option<f64>,
}

/// Emitted when an evaluation triggers rollback
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DivergenceReport {
    pub iteration: usize,
    pub cost: f64,
    pub best_cost: f64,
    /// Step sizes after the reduction
    pub steps: StepSizes,
    /// Exploration scale after the reduction
    pub noise: NoiseScale,
}

/// Emitted once after the last iteration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinishReport {
    pub iterations: usize,
    pub min_evaluation_cost: f64,
    /// Minimum over the whole cost history, training rollouts included
    pub min_cost: f64,
    pub divergences: usize,
}

/// Hooks invoked by the training loop at well-defined points.
///
/// All methods default to doing nothing; `()` is the silent observer.
pub trait TrainingObserver {
    fn on_start(&mut self, _report: &StartReport) {}
    fn on_iteration(&mut self, _report: &IterationReport<'_>) {}
    fn on_evaluation(&mut self, _report: &EvaluationReport) {}
    fn on_divergence(&mut self, _report: &DivergenceReport) {}
    fn on_finish(&mut self, _report: &FinishReport) {}
}

impl TrainingObserver for () {}

impl<A: TrainingObserver, B: TrainingObserver> TrainingObserver for (A, B) {
    fn on_start(&mut self, report: &StartReport) {
        self.0.on_start(report);
        self.1.on_start(report);
    }

    fn on_iteration(&mut self, report: &IterationReport<'_>) {
        self.0.on_iteration(report);
        self.1.on_iteration(report);
    }

    fn on_evaluation(&mut self, report: &EvaluationReport) {
        self.0.on_evaluation(report);
        self.1.on_evaluation(report);
    }

    fn on_divergence(&mut self, report: &DivergenceReport) {
        self.0.on_divergence(report);
        self.1.on_divergence(report);
    }

    fn on_finish(&mut self, report: &FinishReport) {
        self.0.on_finish(report);
        self.1.on_finish(report);
    }
}

impl<O: TrainingObserver + ?Sized> TrainingObserver for &mut O {
    fn on_start(&mut self, report: &StartReport) {
        (**self).on_start(report);
    }

    fn on_iteration(&mut self, report: &IterationReport<'_>) {
        (**self).on_iteration(report);
    }

    fn on_evaluation(&mut self, report: &EvaluationReport) {
        (**self).on_evaluation(report);
    }

    fn on_divergence(&mut self, report: &DivergenceReport) {
        (**self).on_divergence(report);
    }

    fn on_finish(&mut self, report: &FinishReport) {
        (**self).on_finish(report);
    }
}

/// Reports progress through the `log` facade
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl TrainingObserver for LogObserver {
    fn on_start(&mut self, report: &StartReport) {
        log::info!(
            "dpg: starting {} iterations, critic update = {}, actor held for {}",
            report.iters,
            report.critic_update,
            report.hold_actor
        );
    }

    fn on_iteration(&mut self, report: &IterationReport<'_>) {
        log::debug!("dpg: iteration {} cost {:.6}", report.iteration, report.cost);
    }

    fn on_evaluation(&mut self, report: &EvaluationReport) {
        log::info!(
            "dpg: iteration {} evaluation cost {:.6} (best {:.6}) |dtheta| {:.3e} |dw| {:.3e} |dv| {:.3e}",
            report.iteration,
            report.cost,
            report.best_cost,
            report.gradient_norms.actor,
            report.gradient_norms.critic_w,
            report.gradient_norms.critic_v
        );
    }

    fn on_divergence(&mut self, report: &DivergenceReport) {
        log::warn!(
            "dpg: iteration {} diverged (cost {:.6} vs best {:.6}); rolling back, actor step now {:.3e}, noise {:.3e}",
            report.iteration,
            report.cost,
            report.best_cost,
            report.steps.actor,
            report.noise.magnitude()
        );
    }

    fn on_finish(&mut self, report: &FinishReport) {
        log::info!(
            "dpg: done after {} iterations, min evaluation cost {:.6}, min cost {:.6}, {} divergence(s)",
            report.iterations,
            report.min_evaluation_cost,
            report.min_cost,
            report.divergences
        );
    }
}
