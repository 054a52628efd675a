//! Operation model - the trackable unit of strategic work.

use serde::{Deserialize, Serialize};

use crate::id::OperationId;
use crate::Time;

/// An operation is a unit of strategic work with an owner, a deadline,
/// and a recorded progress/status history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Unique identifier
    pub id: OperationId,

    /// Operation title
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Owner identifier (person or team responsible)
    pub owner: String,

    /// Current status
    pub status: OperationStatus,

    /// Priority
    pub priority: Priority,

    /// Complexity; `None` is treated as [`Complexity::Medium`] everywhere
    pub complexity: Option<Complexity>,

    /// Percentage complete (0-100)
    pub progress: u8,

    /// Deadline
    pub due_date: Time,

    /// Creation timestamp
    pub created_at: Time,

    /// Last update timestamp
    pub updated_at: Time,

    /// When the operation was completed, if it was
    pub completed_date: Option<Time>,

    /// Free-text dependency references, matched against other operations'
    /// titles by case-insensitive containment
    pub dependencies: Vec<String>,

    /// Status transitions, oldest first; always at least one entry once created
    pub status_history: Vec<StatusEntry>,

    /// Progress samples, oldest first; timestamps non-decreasing
    pub progress_history: Vec<ProgressEntry>,

    /// Latest prediction attached by the prediction engine
    pub prediction: Option<OperationPrediction>,
}

impl Operation {
    /// Complexity with the documented Medium default applied.
    pub fn complexity_or_default(&self) -> Complexity {
        self.complexity.unwrap_or(Complexity::Medium)
    }
}

/// Operation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationStatus {
    /// Not yet started
    NotStarted,
    /// Actively being worked
    InProgress,
    /// Blocked on something external
    Blocked,
    /// Finished
    Completed,
    /// Parked deliberately
    OnHold,
}

impl OperationStatus {
    /// Whether this status halts dependent work (blocked or parked).
    pub fn halts_dependents(self) -> bool {
        matches!(self, Self::Blocked | Self::OnHold)
    }
}

impl std::str::FromStr for OperationStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "notstarted" | "not-started" => Ok(Self::NotStarted),
            "inprogress" | "in-progress" => Ok(Self::InProgress),
            "blocked" => Ok(Self::Blocked),
            "completed" => Ok(Self::Completed),
            "onhold" | "on-hold" => Ok(Self::OnHold),
            _ => Err(ParseError::Status(s.to_string())),
        }
    }
}

/// Operation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Can wait
    Low,
    /// Normal
    Medium,
    /// Important
    High,
    /// Drop everything else
    Critical,
}

impl Priority {
    /// Factor score used by the prediction engine.
    pub fn score(self) -> f64 {
        match self {
            Self::Critical => 1.0,
            Self::High => 0.8,
            Self::Medium => 0.6,
            Self::Low => 0.4,
        }
    }

    /// Duration multiplier: urgent work gets a compressed estimate.
    pub fn duration_multiplier(self) -> f64 {
        match self {
            Self::Critical => 0.7,
            Self::High => 0.8,
            Self::Medium => 1.0,
            Self::Low => 1.3,
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseError::Priority(s.to_string())),
        }
    }
}

/// Operation complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Complexity {
    /// Straightforward
    Low,
    /// Typical
    Medium,
    /// Involved
    High,
}

impl Complexity {
    /// Factor score. Inverted scale: a higher score means lower complexity.
    pub fn score(self) -> f64 {
        match self {
            Self::High => 0.3,
            Self::Medium => 0.6,
            Self::Low => 0.9,
        }
    }

    /// Baseline effort in days before priority and factor adjustments.
    pub fn base_days(self) -> f64 {
        match self {
            Self::Low => 3.0,
            Self::Medium => 7.0,
            Self::High => 14.0,
        }
    }
}

impl std::str::FromStr for Complexity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseError::Complexity(s.to_string())),
        }
    }
}

/// Errors from parsing enum strings supplied by callers.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Unrecognized operation status
    #[error("unknown operation status: {0}")]
    Status(String),

    /// Unrecognized priority
    #[error("unknown priority: {0}")]
    Priority(String),

    /// Unrecognized complexity
    #[error("unknown complexity: {0}")]
    Complexity(String),
}

/// A recorded status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Status entered
    pub status: OperationStatus,

    /// When it was entered
    pub timestamp: Time,
}

/// A recorded progress sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// Percentage complete at the time (0-100)
    pub progress: u8,

    /// When the sample was taken
    pub timestamp: Time,
}

/// Qualitative trust rating attached to a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    /// Strong signal from history and similar work
    High,
    /// Some signal
    Medium,
    /// Little to go on
    Low,
}

/// Forward-looking estimate for an in-flight operation.
///
/// Recomputed on every prediction call; never persisted independently of the
/// operation it annotates. Absent for completed operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationPrediction {
    /// Estimated completion date
    pub estimated_completion_date: Time,

    /// Qualitative confidence in the estimate
    pub confidence_level: ConfidenceLevel,

    /// Conditions putting the schedule at risk
    pub risk_factors: Vec<String>,

    /// Suggested corrective actions
    pub recommendations: Vec<String>,

    /// Progress gained per day, percent (never negative)
    pub progress_velocity: f64,

    /// Whole days of work remaining
    pub days_remaining: i64,

    /// Probability of finishing by the due date, percent (5-95)
    pub probability_on_time: u8,

    /// Up to five completed operations with the same shape
    pub similar_operations: Vec<OperationId>,

    /// When this prediction was computed
    pub last_updated: Time,
}
