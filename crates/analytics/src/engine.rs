//! Analytics aggregation over all initiatives.

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::debug;
use vantage_core::{Initiative, InitiativeId, Milestone, MilestoneId, MilestoneStatus, Time};

use crate::bottleneck::{self, Bottleneck};
use crate::insight::{self, MilestoneInsight};
use crate::metrics::{self, PerformanceMetrics};
use crate::risk::{self, RiskAssessment};
use crate::trend::{self, TrendPoint};

/// How far ahead "upcoming" looks, in days.
const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Critical-path entries reported.
const CRITICAL_PATH_LIMIT: usize = 5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// A milestone flattened out of its initiative, tagged with the parent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneSummary {
    /// Milestone identifier
    pub id: MilestoneId,

    /// Milestone title
    pub title: String,

    /// Owning initiative
    pub initiative_id: InitiativeId,

    /// Owning initiative's title
    pub initiative_title: String,

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

    /// Completion timestamp, if completed
    pub completed_at: Option<Time>,
}

impl MilestoneSummary {
    pub(crate) fn from_milestone(milestone: &Milestone, initiative: &Initiative) -> Self {
        Self {
            id: milestone.id,
            title: milestone.title.clone(),
            initiative_id: initiative.id,
            initiative_title: initiative.title.clone(),
            due_date: milestone.due_date,
            status: milestone.status,
            progress: milestone.progress,
            assignee_id: milestone.assignee_id.clone(),
            created_at: milestone.created_at,
            completed_at: milestone.completed_at,
        }
    }

    /// Whether the milestone is completed.
    pub fn is_completed(&self) -> bool {
        self.status == MilestoneStatus::Completed
    }

    /// Whether the milestone is past due and still not completed.
    pub fn is_overdue(&self, now: Time) -> bool {
        self.due_date < now && !self.is_completed()
    }
}

/// A lightweight milestone reference used in ranked lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneRef {
    /// Milestone identifier
    pub id: MilestoneId,

    /// Milestone title
    pub title: String,

    /// Owning initiative's title
    pub initiative_title: String,

    /// Deadline
    pub due_date: Time,

    /// Percentage complete (0-100)
    pub progress: u8,
}

impl From<&MilestoneSummary> for MilestoneRef {
    fn from(summary: &MilestoneSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title.clone(),
            initiative_title: summary.initiative_title.clone(),
            due_date: summary.due_date,
            progress: summary.progress,
        }
    }
}

/// Aggregate analytics over every milestone in the portfolio.
///
/// A pure derivation: recomputed in full on every call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneAnalytics {
    /// Milestones across all initiatives
    pub total_milestones: usize,

    /// Completed milestones
    pub completed_milestones: usize,

    /// Past due and not completed
    pub overdue_milestones: usize,

    /// Due within the next week and not completed
    pub upcoming_milestones: usize,

    /// Completed share, percent (0 when there are no milestones)
    pub completion_rate: f64,

    /// Mean days from creation to completion over completed milestones
    pub average_completion_days: f64,

    /// Most schedule-critical open milestones, up to five
    pub critical_path: Vec<MilestoneRef>,

    /// Delayed/overdue milestones scored by impact, worst first
    pub bottlenecks: Vec<Bottleneck>,

    /// Portfolio delivery metrics
    pub performance: PerformanceMetrics,

    /// Last six calendar months of creation/completion history
    pub trend: Vec<TrendPoint>,

    /// Deadline and resourcing risk assessment
    pub risk: RiskAssessment,

    /// When this analytics run was computed
    pub generated_at: Time,
}

/// Portfolio analytics engine.
///
/// Stateless: every call recomputes from the initiatives supplied, so two
/// calls over the same input and the same clock yield identical output.
#[derive(Debug, Clone, Copy, Default)]
pub struct MilestoneAnalyticsEngine;

impl MilestoneAnalyticsEngine {
    /// Create an analytics engine.
    pub fn new() -> Self {
        Self
    }

    /// Aggregate analytics for all milestones across `initiatives`.
    pub fn generate_analytics(&self, initiatives: &[Initiative]) -> MilestoneAnalytics {
        self.generate_analytics_at(initiatives, Utc::now())
    }

    /// [`generate_analytics`](Self::generate_analytics) with an explicit
    /// clock, so callers and tests can hold "now" constant.
    pub fn generate_analytics_at(
        &self,
        initiatives: &[Initiative],
        now: Time,
    ) -> MilestoneAnalytics {
        let milestones = flatten(initiatives);

        let total = milestones.len();
        let completed = milestones.iter().filter(|m| m.is_completed()).count();
        let overdue = milestones.iter().filter(|m| m.is_overdue(now)).count();
        let upcoming_cutoff = now + Duration::days(UPCOMING_WINDOW_DAYS);
        let upcoming = milestones
            .iter()
            .filter(|m| !m.is_completed() && m.due_date >= now && m.due_date <= upcoming_cutoff)
            .count();

        let completion_rate = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let analytics = MilestoneAnalytics {
            total_milestones: total,
            completed_milestones: completed,
            overdue_milestones: overdue,
            upcoming_milestones: upcoming,
            completion_rate,
            average_completion_days: average_completion_days(&milestones),
            critical_path: critical_path(&milestones),
            bottlenecks: bottleneck::detect(&milestones, now),
            performance: metrics::compute(&milestones, now),
            trend: trend::compute(&milestones, now),
            risk: risk::assess(&milestones, initiatives, now),
            generated_at: now,
        };

        debug!(
            total,
            completed,
            overdue,
            bottlenecks = analytics.bottlenecks.len(),
            "generated milestone analytics"
        );

        analytics
    }

    /// Derive prioritized human-readable insights from an analytics run.
    pub fn generate_insights(&self, analytics: &MilestoneAnalytics) -> Vec<MilestoneInsight> {
        insight::generate(analytics)
    }
}

/// Fractional days from `from` to `to`; negative when `to` is earlier.
pub(crate) fn days_between(from: Time, to: Time) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

fn flatten(initiatives: &[Initiative]) -> Vec<MilestoneSummary> {
    initiatives
        .iter()
        .flat_map(|initiative| {
            initiative
                .milestones
                .iter()
                .map(|milestone| MilestoneSummary::from_milestone(milestone, initiative))
        })
        .collect()
}

fn average_completion_days(milestones: &[MilestoneSummary]) -> f64 {
    let durations: Vec<f64> = milestones
        .iter()
        .filter(|m| m.is_completed())
        .filter_map(|m| m.completed_at.map(|done| days_between(m.created_at, done)))
        .collect();

    if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<f64>() / durations.len() as f64
    }
}

/// Open milestones ranked by schedule weight: due-date epoch millis scaled
/// by remaining work. Earlier-due milestones sort first.
fn critical_path(milestones: &[MilestoneSummary]) -> Vec<MilestoneRef> {
    let mut open: Vec<&MilestoneSummary> =
        milestones.iter().filter(|m| !m.is_completed()).collect();
    open.sort_by(|a, b| schedule_weight(a).total_cmp(&schedule_weight(b)));
    open.into_iter()
        .take(CRITICAL_PATH_LIMIT)
        .map(MilestoneRef::from)
        .collect()
}

fn schedule_weight(milestone: &MilestoneSummary) -> f64 {
    let remaining = f64::from(100u8.saturating_sub(milestone.progress));
    milestone.due_date.timestamp_millis() as f64 * (remaining * 0.01)
}
