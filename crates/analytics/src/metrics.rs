//! Portfolio delivery metrics.

use serde::Serialize;
use vantage_core::Time;

use crate::engine::MilestoneSummary;

/// Derived delivery metrics over the whole portfolio.
///
/// Every score is a percentage in [0, 100]; ratios over an empty portfolio
/// read as zero rather than dividing by nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// Share of milestones not currently overdue
    pub on_time_delivery: f64,

    /// Mean whole days past due across overdue milestones
    pub average_delay_days: f64,

    /// Mean progress scaled by 1.2, capped at 100
    pub productivity_score: f64,

    /// Mirrors on-time delivery
    pub quality_score: f64,

    /// 100 minus two points per average delay day, floored at 0
    pub team_efficiency: f64,

    /// Mean progress plus ten points per completed milestone, capped at 100
    pub resource_utilization: f64,
}

pub(crate) fn compute(milestones: &[MilestoneSummary], now: Time) -> PerformanceMetrics {
    let total = milestones.len();
    let completed = milestones.iter().filter(|m| m.is_completed()).count();
    let delays: Vec<i64> = milestones
        .iter()
        .filter(|m| m.is_overdue(now))
        .map(|m| (now - m.due_date).num_days().max(0))
        .collect();

    let on_time_delivery = if total > 0 {
        (total - delays.len()) as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    let average_delay_days = if delays.is_empty() {
        0.0
    } else {
        delays.iter().sum::<i64>() as f64 / delays.len() as f64
    };
    let average_progress = if total > 0 {
        milestones.iter().map(|m| f64::from(m.progress)).sum::<f64>() / total as f64
    } else {
        0.0
    };

    PerformanceMetrics {
        on_time_delivery,
        average_delay_days,
        productivity_score: (average_progress * 1.2).min(100.0),
        quality_score: on_time_delivery,
        team_efficiency: (100.0 - average_delay_days * 2.0).max(0.0),
        resource_utilization: (average_progress + completed as f64 * 10.0).min(100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use vantage_core::{InitiativeId, MilestoneId, MilestoneStatus};

    fn base() -> Time {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn summary(status: MilestoneStatus, due_offset_days: i64, progress: u8) -> MilestoneSummary {
        MilestoneSummary {
            id: MilestoneId::new(),
            title: "Checkpoint".to_string(),
            initiative_id: InitiativeId::new(),
            initiative_title: "Expansion".to_string(),
            due_date: base() + Duration::days(due_offset_days),
            status,
            progress,
            assignee_id: None,
            created_at: base() - Duration::days(45),
            completed_at: None,
        }
    }

    #[test]
    fn empty_portfolio_reads_as_zeroes() {
        let metrics = compute(&[], base());
        assert_eq!(metrics.on_time_delivery, 0.0);
        assert_eq!(metrics.average_delay_days, 0.0);
        assert_eq!(metrics.productivity_score, 0.0);
        assert_eq!(metrics.team_efficiency, 100.0);
        assert_eq!(metrics.resource_utilization, 0.0);
    }

    #[test]
    fn mixed_portfolio_metrics() {
        let milestones = vec![
            summary(MilestoneStatus::Completed, -20, 100),
            summary(MilestoneStatus::InProgress, -10, 40),
            summary(MilestoneStatus::InProgress, -4, 40),
            summary(MilestoneStatus::NotStarted, 20, 0),
        ];

        let metrics = compute(&milestones, base());
        // Two of four are overdue.
        assert_eq!(metrics.on_time_delivery, 50.0);
        assert_eq!(metrics.quality_score, 50.0);
        assert_eq!(metrics.average_delay_days, 7.0);
        assert_eq!(metrics.team_efficiency, 86.0);
        // Mean progress 45, one completed milestone.
        assert!((metrics.productivity_score - 54.0).abs() < 1e-9);
        assert_eq!(metrics.resource_utilization, 55.0);
    }

    #[test]
    fn scores_cap_at_one_hundred() {
        let milestones: Vec<MilestoneSummary> = (0..12)
            .map(|_| summary(MilestoneStatus::Completed, 10, 100))
            .collect();

        let metrics = compute(&milestones, base());
        assert_eq!(metrics.productivity_score, 100.0);
        assert_eq!(metrics.resource_utilization, 100.0);
        assert_eq!(metrics.on_time_delivery, 100.0);
    }

    #[test]
    fn heavy_delays_floor_efficiency_at_zero() {
        let milestones = vec![summary(MilestoneStatus::InProgress, -120, 10)];
        let metrics = compute(&milestones, base());
        assert_eq!(metrics.team_efficiency, 0.0);
    }
}
