//! # Step-size machinery
//!
//! - [`RmsNormalizer`]: per-parameter RMS-normalized ascent used for the
//!   actor and for the critic in gradient mode
//! - [`StepSizes`] / [`StepSchedule`]: the live step sizes and their
//!   periodic decay

pub mod rms;
pub mod schedule;

pub use rms::RmsNormalizer;
pub use schedule::{StepSchedule, StepSizes};
