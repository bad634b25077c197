//! # Training observability
//!
//! The training loop performs no I/O of its own. Progress is pushed to a
//! [`TrainingObserver`] at start, after each iteration, at each evaluation,
//! on divergence and at completion.
//!
//! - [`LogObserver`] forwards to the `log` facade
//! - [`TrainingHistory`] keeps every report for later inspection
//! - `()` discards everything

pub mod history;
pub mod observer;
pub mod statistics;

pub use history::TrainingHistory;
pub use observer::{
    DivergenceReport, EvaluationReport, FinishReport, GradientNorms, IterationReport,
    LogObserver, StartReport, TrainingObserver,
};
pub use statistics::Statistics;
