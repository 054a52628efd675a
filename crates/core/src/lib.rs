//! Vantage core data models.
//!
//! This crate defines the planning entities consumed and produced by the
//! prediction and analytics engines.

#![warn(missing_docs)]

// Core identities
mod id;

// Operations and their prediction output
mod operation;

// Initiatives and milestones
mod initiative;

// Re-exports
pub use id::*;

// Operation
pub use operation::{
    ConfidenceLevel, Complexity, Operation, OperationPrediction, OperationStatus, ParseError,
    Priority, ProgressEntry, StatusEntry,
};

// Initiative & Milestone
pub use initiative::{Initiative, Milestone, MilestoneStatus};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
