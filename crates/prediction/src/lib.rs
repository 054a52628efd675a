//! Completion prediction for in-flight operations.
//!
//! Heuristic factor scoring against historical completions: owner track
//! record, progress velocity, stall time, and dependency health feed a
//! per-operation completion estimate with confidence and risk output.

#![warn(missing_docs)]

mod advice;
mod engine;
mod factors;

pub use engine::{progress_velocity, PredictionEngine};
pub use factors::PredictionFactors;
