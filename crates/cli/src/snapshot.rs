//! Snapshot loading.
//!
//! The engines consume read-only, in-memory collections; the snapshot file
//! is how the application layer hands them over on the command line.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vantage_core::{Initiative, Operation};

/// Errors that can occur while loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A point-in-time export of the planning data the engines consume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// All operations
    #[serde(default)]
    pub operations: Vec<Operation>,

    /// All initiatives with their milestones
    #[serde(default)]
    pub initiatives: Vec<Initiative>,
}

impl Snapshot {
    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
