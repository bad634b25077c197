//! # Deterministic Policy Gradient
//!
//! The training loop and the pieces it is built from.
//!
//! ## Per-iteration procedure
//!
//! 1. Perturb the nominal start state and sample exploration noise
//! 2. Roll out a trajectory with the current actor
//! 3. For every transition: accumulate the actor gradient, form the
//!    bootstrap target through the target networks and hand it to the critic
//! 4. Apply RMS-normalized steps (the actor only after `hold_actor`
//!    iterations; the critic only in gradient mode)
//! 5. Track the target networks and decay the step sizes on schedule
//! 6. Periodically evaluate without noise, checkpoint improvements and roll
//!    back on divergence
//!
//! ## Critic strategies
//!
//! | Mode | Update | Carries |
//! |------|--------|---------|
//! | `Gradient` | batched, after the trajectory | running squared gradients |
//! | `Rls` | online, every transition | covariance over `[v; w]` |
//! | `Kalman` | online, every transition | covariance, R2, R12 |
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use dpg::algorithms::DpgTrainer;
//! use dpg::config::{CriticUpdate, DpgBuilder};
//! use dpg::metrics::TrainingHistory;
//! use dpg::problem::ControlProblem;
//! use dpg::state::Parameters;
//! use ndarray::array;
//!
//! fn run<P: ControlProblem>(problem: &P) -> dpg::error::Result<()> {
//!     let config = DpgBuilder::new(1)
//!         .critic_update(CriticUpdate::Rls)
//!         .iters(500)
//!         .seed(42)
//!         .build()?;
//!
//!     let initial = Parameters::new(array![1.0], array![0.0], array![0.0]);
//!     let mut history = TrainingHistory::new();
//!     let result = DpgTrainer::new(config, problem)?.train(initial, array![1.0].view(), &mut history)?;
//!
//!     println!("best cost {}", result.best_cost);
//!     Ok(())
//! }
//! ```

pub mod checkpoint;
pub mod critic;
pub mod trainer;

pub use self::checkpoint::{Checkpoint, Verdict};
pub use self::critic::{CovarianceGuard, CriticGradients, CriticState};
pub use self::trainer::{dpg, DpgResult, DpgTrainer};
