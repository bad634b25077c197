//! # DPG - Deterministic Policy Gradient for continuous control
//!
//! An actor-critic optimizer for continuous-control problems. Given a
//! parametric policy (the actor, parameters Θ) and a parametric action-value
//! approximator (the critic, parameter blocks `w` and `v`), it repeatedly
//! rolls out exploratory trajectories, updates both, tracks slowly moving
//! target copies for stable bootstrapping, and keeps the best parameters seen
//! at periodic noise-free evaluations.
//!
//! ## Key Features
//!
//! - **Three critic strategies**: batched stochastic gradient, recursive
//!   least squares, Kalman filtering
//! - **Adaptive steps**: per-parameter RMS-normalized updates
//! - **Target networks**: exponential tracking at rate τ
//! - **Recovery**: divergence detection with rollback to the best snapshot
//! - **Pluggable problems**: dynamics, policy, critic, noise and reward come
//!   from the caller through [`problem::ControlProblem`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dpg::algorithms::dpg;
//! use dpg::config::{CriticUpdate, DpgBuilder};
//! use dpg::problem::ControlProblem;
//! use dpg::state::Parameters;
//! use ndarray::array;
//!
//! fn optimize<P: ControlProblem>(problem: &P) -> dpg::error::Result<Parameters> {
//!     let config = DpgBuilder::new(1)
//!         .critic_update(CriticUpdate::Kalman)
//!         .step_sizes(0.5, 0.5, 0.5)
//!         .iters(2000)
//!         .build()?;
//!
//!     let initial = Parameters::new(array![0.0], array![0.0], array![0.0]);
//!     let result = dpg(&config, problem, initial, array![1.0].view())?;
//!     Ok(result.best)
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`algorithms`] - The training loop, critic strategies and checkpointing
//! - [`config`] - Hyperparameters, builder and JSON loading
//! - [`cost`] - Episode cost evaluator
//! - [`error`] - Error types and result handling
//! - [`estimators`] - Recursive least squares and Kalman updates
//! - [`linalg`] - Small dense helpers
//! - [`metrics`] - Observer hooks, logging and run history
//! - [`noise`] - Gaussian exploration and start-state perturbation
//! - [`optimizer`] - RMS-normalized steps and step-size schedule
//! - [`problem`] - The collaborator interface
//! - [`state`] - Parameter vectors and target tracking

pub mod algorithms;
pub mod config;
pub mod cost;
pub mod error;
pub mod estimators;
pub mod linalg;
pub mod metrics;
pub mod noise;
pub mod optimizer;
pub mod problem;
pub mod state;

#[cfg(test)]
mod tests;
