//! Initiative and milestone models.

use serde::{Deserialize, Serialize};

use crate::id::{InitiativeId, MilestoneId};
use crate::Time;

/// A larger strategic goal, realized through an ordered list of milestones.
///
/// The initiative exclusively owns its milestones; milestone order is
/// insertion order and doubles as the sequence order for critical-path
/// purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Initiative {
    /// Unique identifier
    pub id: InitiativeId,

    /// Initiative title
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Milestones in sequence order
    pub milestones: Vec<Milestone>,

    /// Creation timestamp
    pub created_at: Time,
}

/// A dated checkpoint belonging to an initiative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// Unique identifier
    pub id: MilestoneId,

    /// Milestone title
    pub title: String,

    /// Deadline
    pub due_date: Time,

    /// Current status
    pub status: MilestoneStatus,

    /// Percentage complete (0-100)
    pub progress: u8,

    /// Who is driving this milestone, if anyone
    pub assignee_id: Option<String>,

    /// Creation timestamp
    pub created_at: Time,

    /// When the milestone was completed, if it was
    pub completed_at: Option<Time>,
}

impl Milestone {
    /// Whether the milestone is completed.
    pub fn is_completed(&self) -> bool {
        self.status == MilestoneStatus::Completed
    }

    /// Whether the milestone is past due and still not completed.
    pub fn is_overdue(&self, now: Time) -> bool {
        self.due_date < now && !self.is_completed()
    }
}

/// Milestone status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MilestoneStatus {
    /// Not yet started
    NotStarted,
    /// Actively being worked
    InProgress,
    /// Finished
    Completed,
    /// Explicitly flagged as running late
    Delayed,
}
