//! Deadline and resourcing risk assessment.

use std::collections::BTreeMap;

use chrono::Duration;
use serde::Serialize;
use vantage_core::{Initiative, MilestoneStatus, Time};

use crate::engine::{MilestoneRef, MilestoneSummary};

/// Look-ahead for deadline risk bucketing, in days.
const RISK_WINDOW_DAYS: i64 = 30;

/// Look-ahead for critical deadlines, in days.
const DEADLINE_WINDOW_DAYS: i64 = 7;

/// Critical deadlines reported.
const DEADLINE_LIMIT: usize = 5;

/// Active milestones per assignee before flagging overload.
const ASSIGNEE_CAPACITY: usize = 5;

/// Share of delayed milestones that flags an initiative.
const DELAYED_SHARE_THRESHOLD: f64 = 0.3;

/// Near-term deadline and resourcing risks across the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Due within 30 days with progress below 25%
    pub high_risk: Vec<MilestoneRef>,

    /// Due within 30 days with progress in 25-74%
    pub medium_risk: Vec<MilestoneRef>,

    /// Due within 30 days with progress at 75% or better
    pub low_risk: Vec<MilestoneRef>,

    /// Open milestones due within a week (overdue included), soonest first
    pub critical_deadlines: Vec<MilestoneRef>,

    /// Overloaded assignees and unassigned-work flags
    pub resource_constraints: Vec<String>,

    /// Initiatives with an outsized share of delayed milestones
    pub dependency_risks: Vec<String>,
}

pub(crate) fn assess(
    milestones: &[MilestoneSummary],
    initiatives: &[Initiative],
    now: Time,
) -> RiskAssessment {
    let risk_cutoff = now + Duration::days(RISK_WINDOW_DAYS);
    let mut high_risk = Vec::new();
    let mut medium_risk = Vec::new();
    let mut low_risk = Vec::new();

    for milestone in milestones {
        if milestone.is_completed() || milestone.due_date < now || milestone.due_date > risk_cutoff
        {
            continue;
        }
        let entry = MilestoneRef::from(milestone);
        match milestone.progress {
            p if p < 25 => high_risk.push(entry),
            p if p < 75 => medium_risk.push(entry),
            _ => low_risk.push(entry),
        }
    }

    RiskAssessment {
        high_risk,
        medium_risk,
        low_risk,
        critical_deadlines: critical_deadlines(milestones, now),
        resource_constraints: resource_constraints(milestones),
        dependency_risks: dependency_risks(initiatives),
    }
}

/// Open milestones due before the week is out, overdue ones included;
/// soonest due date first.
fn critical_deadlines(milestones: &[MilestoneSummary], now: Time) -> Vec<MilestoneRef> {
    let cutoff = now + Duration::days(DEADLINE_WINDOW_DAYS);
    let mut deadlines: Vec<&MilestoneSummary> = milestones
        .iter()
        .filter(|m| !m.is_completed() && m.due_date <= cutoff)
        .collect();

    deadlines.sort_by_key(|m| m.due_date);
    deadlines
        .into_iter()
        .take(DEADLINE_LIMIT)
        .map(MilestoneRef::from)
        .collect()
}

fn resource_constraints(milestones: &[MilestoneSummary]) -> Vec<String> {
    let mut active_by_assignee: BTreeMap<&str, usize> = BTreeMap::new();
    let mut unassigned = 0usize;

    for milestone in milestones.iter().filter(|m| !m.is_completed()) {
        match milestone.assignee_id.as_deref() {
            Some(assignee) => *active_by_assignee.entry(assignee).or_default() += 1,
            None => unassigned += 1,
        }
    }

    let mut constraints: Vec<String> = active_by_assignee
        .into_iter()
        .filter(|(_, count)| *count > ASSIGNEE_CAPACITY)
        .map(|(assignee, count)| format!("{assignee} is carrying {count} active milestones"))
        .collect();

    if unassigned > 0 {
        constraints.push(format!("{unassigned} active milestones have no assignee"));
    }

    constraints
}

fn dependency_risks(initiatives: &[Initiative]) -> Vec<String> {
    let mut risks = Vec::new();

    for initiative in initiatives {
        let total = initiative.milestones.len();
        if total == 0 {
            continue;
        }
        let delayed = initiative
            .milestones
            .iter()
            .filter(|m| m.status == MilestoneStatus::Delayed)
            .count();
        let share = delayed as f64 / total as f64;
        if share > DELAYED_SHARE_THRESHOLD {
            risks.push(format!(
                "Initiative '{}' has {:.0}% of its milestones delayed",
                initiative.title,
                share * 100.0
            ));
        }
    }

    risks
}
