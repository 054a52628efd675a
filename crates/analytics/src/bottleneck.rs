//! Bottleneck detection: delayed or overdue milestones scored by impact.

use serde::Serialize;
use vantage_core::{MilestoneId, MilestoneStatus, Time};

use crate::engine::MilestoneSummary;

/// Impact score ceiling.
const MAX_IMPACT: f64 = 10.0;

/// Impact above which a bottleneck warrants escalation.
const ESCALATION_IMPACT: f64 = 7.0;

/// A delayed or overdue milestone scored by schedule impact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bottleneck {
    /// Milestone identifier
    pub milestone_id: MilestoneId,

    /// Milestone title
    pub title: String,

    /// Owning initiative's title
    pub initiative_title: String,

    /// Whole days past due, floored at zero
    pub delay_days: i64,

    /// Schedule impact in [0, 10]
    pub impact_score: f64,

    /// What appears to be holding the milestone up
    pub blockers: Vec<String>,

    /// Suggested corrective actions
    pub recommendations: Vec<String>,
}

/// Score every delayed or overdue milestone, worst impact first.
pub(crate) fn detect(milestones: &[MilestoneSummary], now: Time) -> Vec<Bottleneck> {
    let mut bottlenecks: Vec<Bottleneck> = milestones
        .iter()
        .filter(|m| m.status == MilestoneStatus::Delayed || m.is_overdue(now))
        .map(|m| analyze(m, now))
        .collect();

    bottlenecks.sort_by(|a, b| b.impact_score.total_cmp(&a.impact_score));
    bottlenecks
}

fn analyze(milestone: &MilestoneSummary, now: Time) -> Bottleneck {
    let delay_days = (now - milestone.due_date).num_days().max(0);
    let impact_score = impact(delay_days, milestone.progress);

    Bottleneck {
        milestone_id: milestone.id,
        title: milestone.title.clone(),
        initiative_title: milestone.initiative_title.clone(),
        delay_days,
        impact_score,
        blockers: blockers(milestone),
        recommendations: recommendations(milestone, impact_score),
    }
}

/// Half a point per delay day (capped at 5), remaining work at 0.03 per
/// percent, and an urgency bonus for week-plus delays; capped at 10.
fn impact(delay_days: i64, progress: u8) -> f64 {
    let urgency = if delay_days > 7 {
        2.0
    } else if delay_days > 3 {
        1.0
    } else {
        0.0
    };
    let remaining = f64::from(100u8.saturating_sub(progress));
    ((delay_days as f64 * 0.5).min(5.0) + remaining * 0.03 + urgency).min(MAX_IMPACT)
}

fn blockers(milestone: &MilestoneSummary) -> Vec<String> {
    let mut blockers = Vec::new();

    if milestone.progress < 25 {
        blockers.push("Work has barely started; likely a planning or scoping gap".to_string());
    }
    if milestone.status == MilestoneStatus::Delayed {
        blockers.push("Milestone is explicitly marked as delayed".to_string());
    }
    if milestone.assignee_id.is_none() {
        blockers.push("No owner assigned to drive this milestone".to_string());
    }

    blockers
}

fn recommendations(milestone: &MilestoneSummary, impact_score: f64) -> Vec<String> {
    let mut recs = Vec::new();

    if impact_score > ESCALATION_IMPACT {
        recs.push("Escalate to leadership and reallocate resources".to_string());
    }
    if milestone.progress < 50 {
        recs.push("Break the milestone into smaller deliverables and hold daily check-ins".to_string());
    }
    if milestone.assignee_id.is_none() {
        recs.push("Assign a dedicated owner".to_string());
    }
    recs.push("Review the milestone timeline and adjust downstream plans".to_string());

    recs
}
