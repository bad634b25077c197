use serde::{Deserialize, Serialize};

use super::observer::{
    DivergenceReport, EvaluationReport, FinishReport, IterationReport, StartReport,
    TrainingObserver,
};
use super::statistics::Statistics;
use crate::state::Parameters;

/// Records every event of a run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub start: Option<StartReport>,
    /// One entry per iteration
    pub iteration_costs: Vec<f64>,
    /// Live parameters after each iteration; only filled when enabled
    pub parameters: Vec<Parameters>,
    pub evaluations: Vec<EvaluationReport>,
    pub divergences: Vec<DivergenceReport>,
    pub finish: Option<FinishReport>,
    record_parameters: bool,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also keep a copy of the live parameters after every iteration.
    pub fn with_parameters() -> Self {
        TrainingHistory {
            record_parameters: true,
            ..Self::default()
        }
    }

    pub fn evaluation_costs(&self) -> Vec<f64> {
        self.evaluations.iter().map(|e| e.cost).collect()
    }

    /// Best cost as seen after each evaluation
    pub fn best_costs(&self) -> Vec<f64> {
        self.evaluations.iter().map(|e| e.best_cost).collect()
    }

    pub fn evaluation_statistics(&self) -> Statistics {
        Statistics::from_slice(&self.evaluation_costs())
    }

    pub fn cost_statistics(&self) -> Statistics {
        Statistics::from_slice(&self.iteration_costs)
    }
}

impl TrainingObserver for TrainingHistory {
    fn on_start(&mut self, report: &StartReport) {
        self.start = Some(report.clone());
    }

    fn on_iteration(&mut self, report: &IterationReport<'_>) {
        self.iteration_costs.push(report.cost);
        if self.record_parameters {
            self.parameters.push(report.params.clone());
        }
    }

    fn on_evaluation(&mut self, report: &EvaluationReport) {
        self.evaluations.push(report.clone());
    }

    fn on_divergence(&mut self, report: &DivergenceReport) {
        self.divergences.push(report.clone());
    }

    fn on_finish(&mut self, report: &FinishReport) {
        self.finish = Some(report.clone());
    }
}
