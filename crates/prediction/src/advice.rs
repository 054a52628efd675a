//! Risk factors and recommendations derived from factor scores.

use vantage_core::{Operation, OperationStatus, Priority};

use crate::factors::PredictionFactors;

/// Schedule risks, in fixed order; any subset can apply.
pub(crate) fn risk_factors(
    operation: &Operation,
    factors: &PredictionFactors,
    days_until_due: f64,
) -> Vec<String> {
    let mut risks = Vec::new();

    if factors.owner_performance < 0.5 {
        risks.push("Owner's recent operations have a history of delays".to_string());
    }
    if factors.progress_pattern < 0.3 {
        risks.push("Progress velocity is well below plan".to_string());
    }
    if factors.time_in_current_status > 0.7 {
        risks.push("Operation has stalled in its current status".to_string());
    }
    if factors.dependency_risk > 0.5 {
        risks.push("High dependency risk: upstream work is blocked or on hold".to_string());
    }
    if operation.progress < 20 && days_until_due < 7.0 {
        risks.push("Low progress with the deadline approaching".to_string());
    }
    if operation.status == OperationStatus::Blocked {
        risks.push("Operation is currently blocked".to_string());
    }

    risks
}

/// Corrective actions matching whichever risks fired.
pub(crate) fn recommendations(
    operation: &Operation,
    factors: &PredictionFactors,
    days_until_due: f64,
) -> Vec<String> {
    let mut recs = Vec::new();

    if factors.progress_pattern < 0.3 {
        recs.push("Break the remaining work into smaller increments and track progress daily".to_string());
    }
    if factors.time_in_current_status > 0.7 {
        recs.push("Review the operation for unreported blockers; it has not moved recently".to_string());
    }
    if factors.dependency_risk > 0.5 {
        recs.push("Resolve blocked upstream dependencies before committing to the current date".to_string());
    }
    if operation.progress < 20 && days_until_due < 7.0 {
        recs.push("Re-scope the deliverable or renegotiate the due date".to_string());
    }
    if operation.status == OperationStatus::Blocked {
        recs.push("Identify and clear the active blocker before the schedule slips further".to_string());
    }
    if factors.owner_performance < 0.5 {
        recs.push("Pair the owner with additional support or consider reassignment".to_string());
    }
    if operation.priority == Priority::Critical && factors.progress_pattern < 0.5 {
        recs.push("Escalate: critical-priority work is moving slower than planned".to_string());
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use vantage_core::{Operation, OperationId, Time};

    fn base() -> Time {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    fn operation(status: OperationStatus, priority: Priority, progress: u8) -> Operation {
        Operation {
            id: OperationId::new(),
            title: "Regional rollout".to_string(),
            description: String::new(),
            owner: "kim".to_string(),
            status,
            priority,
            complexity: None,
            progress,
            due_date: base() + Duration::days(14),
            created_at: base() - Duration::days(14),
            updated_at: base(),
            completed_date: None,
            dependencies: Vec::new(),
            status_history: Vec::new(),
            progress_history: Vec::new(),
            prediction: None,
        }
    }

    fn neutral_factors() -> PredictionFactors {
        PredictionFactors {
            priority: 0.6,
            complexity: 0.6,
            owner_performance: 0.7,
            progress_pattern: 0.5,
            time_in_current_status: 0.0,
            dependency_risk: 0.0,
        }
    }

    #[test]
    fn healthy_operation_has_no_risks() {
        let op = operation(OperationStatus::InProgress, Priority::Medium, 50);
        assert!(risk_factors(&op, &neutral_factors(), 14.0).is_empty());
        assert!(recommendations(&op, &neutral_factors(), 14.0).is_empty());
    }

    #[test]
    fn blocked_operation_is_flagged() {
        let op = operation(OperationStatus::Blocked, Priority::Medium, 50);
        let risks = risk_factors(&op, &neutral_factors(), 14.0);
        assert!(risks.iter().any(|r| r.contains("currently blocked")));
    }

    #[test]
    fn every_threshold_fires_once() {
        let op = operation(OperationStatus::Blocked, Priority::Medium, 10);
        let factors = PredictionFactors {
            owner_performance: 0.3,
            progress_pattern: 0.1,
            time_in_current_status: 1.0,
            dependency_risk: 1.0,
            ..neutral_factors()
        };
        let risks = risk_factors(&op, &factors, 3.0);
        assert_eq!(risks.len(), 6);
    }

    #[test]
    fn critical_slow_work_escalates() {
        let op = operation(OperationStatus::InProgress, Priority::Critical, 50);
        let factors = PredictionFactors {
            progress_pattern: 0.4,
            ..neutral_factors()
        };
        let recs = recommendations(&op, &factors, 14.0);
        assert!(recs.iter().any(|r| r.starts_with("Escalate")));

        let medium = operation(OperationStatus::InProgress, Priority::Medium, 50);
        assert!(recommendations(&medium, &factors, 14.0).is_empty());
    }

    #[test]
    fn struggling_owner_gets_support() {
        let op = operation(OperationStatus::InProgress, Priority::Medium, 50);
        let factors = PredictionFactors {
            owner_performance: 0.4,
            ..neutral_factors()
        };
        let recs = recommendations(&op, &factors, 14.0);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("support"));
    }
}
