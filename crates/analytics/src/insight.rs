//! Human-readable insights derived from an analytics run.

use serde::Serialize;

use crate::engine::MilestoneAnalytics;

/// Completion rate below which the portfolio gets a warning.
const LOW_COMPLETION_RATE: f64 = 70.0;

/// Completion rate above which the portfolio gets a success note.
const HIGH_COMPLETION_RATE: f64 = 90.0;

/// Bottleneck impact above which a warning fires.
const SEVERE_IMPACT: f64 = 7.0;

/// Completion-rate drop (in points, across three trend buckets) that flags
/// a declining trend.
const TREND_DROP_POINTS: f64 = 10.0;

/// Resource utilization below which spare capacity is called out.
const LOW_UTILIZATION: f64 = 60.0;

/// Insight tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// Things are going well
    Success,
    /// Worth knowing, no action needed
    Info,
    /// Needs attention
    Warning,
    /// Needs action now
    Error,
}

/// Insight urgency; sorts high first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightPriority {
    /// Act now
    High,
    /// Act soon
    Medium,
    /// Background
    Low,
}

/// A prioritized, human-readable observation about the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneInsight {
    /// Tone
    pub kind: InsightKind,

    /// Urgency
    pub priority: InsightPriority,

    /// Short headline
    pub title: String,

    /// Supporting detail
    pub detail: String,
}

/// Apply the fixed thresholds to an analytics run, highest priority first.
pub(crate) fn generate(analytics: &MilestoneAnalytics) -> Vec<MilestoneInsight> {
    let mut insights = Vec::new();

    if analytics.completion_rate < LOW_COMPLETION_RATE {
        insights.push(MilestoneInsight {
            kind: InsightKind::Warning,
            priority: InsightPriority::High,
            title: "Completion rate below target".to_string(),
            detail: format!(
                "Only {:.0}% of milestones are completed; the working target is {:.0}%",
                analytics.completion_rate, LOW_COMPLETION_RATE
            ),
        });
    }

    if analytics.completion_rate > HIGH_COMPLETION_RATE {
        insights.push(MilestoneInsight {
            kind: InsightKind::Success,
            priority: InsightPriority::Low,
            title: "Portfolio is closing out well".to_string(),
            detail: format!(
                "{:.0}% of milestones are completed",
                analytics.completion_rate
            ),
        });
    }

    if analytics.overdue_milestones > 0 {
        insights.push(MilestoneInsight {
            kind: InsightKind::Error,
            priority: InsightPriority::High,
            title: "Overdue milestones need attention".to_string(),
            detail: format!(
                "{} milestone(s) are past their due date",
                analytics.overdue_milestones
            ),
        });
    }

    // Bottlenecks arrive sorted worst-first.
    if let Some(worst) = analytics.bottlenecks.first() {
        if worst.impact_score > SEVERE_IMPACT {
            let severe = analytics
                .bottlenecks
                .iter()
                .filter(|b| b.impact_score > SEVERE_IMPACT)
                .count();
            insights.push(MilestoneInsight {
                kind: InsightKind::Warning,
                priority: InsightPriority::High,
                title: "Severe bottleneck detected".to_string(),
                detail: format!(
                    "{} bottleneck(s) with impact above {:.0}; worst is '{}' at {:.1}",
                    severe, SEVERE_IMPACT, worst.title, worst.impact_score
                ),
            });
        }
    }

    if let Some(drop) = trend_drop(analytics) {
        insights.push(MilestoneInsight {
            kind: InsightKind::Warning,
            priority: InsightPriority::Medium,
            title: "Completion rate is declining".to_string(),
            detail: format!("Down {drop:.0} points over the last three months"),
        });
    }

    if analytics.performance.resource_utilization < LOW_UTILIZATION {
        insights.push(MilestoneInsight {
            kind: InsightKind::Info,
            priority: InsightPriority::Low,
            title: "Capacity is available".to_string(),
            detail: format!(
                "Resource utilization is at {:.0}%",
                analytics.performance.resource_utilization
            ),
        });
    }

    insights.sort_by_key(|insight| insight.priority);
    insights
}

/// Completion-rate drop across the last three trend buckets, when it
/// exceeds the threshold.
fn trend_drop(analytics: &MilestoneAnalytics) -> Option<f64> {
    let trend = &analytics.trend;
    if trend.len() < 3 {
        return None;
    }
    let window = &trend[trend.len() - 3..];
    let drop = window[0].completion_rate - window[2].completion_rate;
    (drop > TREND_DROP_POINTS).then_some(drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MilestoneAnalyticsEngine;
    use chrono::{Duration, TimeZone, Utc};
    use vantage_core::{
        Initiative, InitiativeId, Milestone, MilestoneId, MilestoneStatus, Time,
    };

    fn base() -> Time {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn milestone(status: MilestoneStatus, due_offset_days: i64, progress: u8) -> Milestone {
        Milestone {
            id: MilestoneId::new(),
            title: "Checkpoint".to_string(),
            due_date: base() + Duration::days(due_offset_days),
            status,
            progress,
            assignee_id: Some("sasha".to_string()),
            created_at: base() - Duration::days(45),
            completed_at: (status == MilestoneStatus::Completed)
                .then(|| base() - Duration::days(40)),
        }
    }

    fn analytics_for(milestones: Vec<Milestone>) -> MilestoneAnalytics {
        let initiative = Initiative {
            id: InitiativeId::new(),
            title: "Expansion".to_string(),
            description: String::new(),
            milestones,
            created_at: base() - Duration::days(90),
        };
        MilestoneAnalyticsEngine::new().generate_analytics_at(&[initiative], base())
    }

    #[test]
    fn struggling_portfolio_raises_warning_and_error() {
        let analytics = analytics_for(vec![
            milestone(MilestoneStatus::InProgress, -10, 10),
            milestone(MilestoneStatus::InProgress, 10, 30),
        ]);
        let insights = generate(&analytics);

        assert!(insights
            .iter()
            .any(|i| i.kind == InsightKind::Warning && i.title.contains("Completion rate")));
        assert!(insights
            .iter()
            .any(|i| i.kind == InsightKind::Error && i.title.contains("Overdue")));
        // High-priority insights lead the list.
        assert_eq!(insights[0].priority, InsightPriority::High);
    }

    #[test]
    fn healthy_portfolio_reads_as_success() {
        let analytics = analytics_for(vec![
            milestone(MilestoneStatus::Completed, -10, 100),
            milestone(MilestoneStatus::Completed, -20, 100),
        ]);
        let insights = generate(&analytics);

        assert!(insights
            .iter()
            .any(|i| i.kind == InsightKind::Success));
        assert!(!insights.iter().any(|i| i.kind == InsightKind::Error));
    }

    #[test]
    fn severe_bottleneck_fires_high_priority_warning() {
        let analytics = analytics_for(vec![milestone(MilestoneStatus::InProgress, -10, 10)]);
        assert!(analytics.bottlenecks[0].impact_score > SEVERE_IMPACT);

        let insights = generate(&analytics);
        assert!(insights
            .iter()
            .any(|i| i.title.contains("Severe bottleneck")
                && i.priority == InsightPriority::High));
    }

    #[test]
    fn low_utilization_is_informational() {
        let analytics = analytics_for(vec![milestone(MilestoneStatus::NotStarted, 20, 0)]);
        let insights = generate(&analytics);
        let info = insights
            .iter()
            .find(|i| i.kind == InsightKind::Info)
            .unwrap();
        assert_eq!(info.priority, InsightPriority::Low);
        assert!(info.detail.contains("utilization"));
    }

    #[test]
    fn declining_trend_is_detected_from_the_last_three_buckets() {
        let mut analytics = analytics_for(vec![]);
        for (i, rate) in [80.0, 80.0, 80.0, 60.0, 50.0, 40.0].into_iter().enumerate() {
            analytics.trend[i].completion_rate = rate;
        }
        assert!(trend_drop(&analytics).is_some());

        let insights = generate(&analytics);
        assert!(insights
            .iter()
            .any(|i| i.title.contains("declining") && i.priority == InsightPriority::Medium));
    }

    #[test]
    fn steady_trend_stays_quiet() {
        let analytics = analytics_for(vec![]);
        assert!(trend_drop(&analytics).is_none());
    }

    #[test]
    fn insights_sort_high_to_low() {
        let analytics = analytics_for(vec![
            milestone(MilestoneStatus::InProgress, -10, 10),
            milestone(MilestoneStatus::NotStarted, 20, 0),
        ]);
        let insights = generate(&analytics);
        let priorities: Vec<InsightPriority> = insights.iter().map(|i| i.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
    }
}
