//! Factor scoring for operation predictions.

use serde::Serialize;
use vantage_core::{Operation, Time};

/// Neutral pattern score used when the history window is too thin to read.
const DEFAULT_PROGRESS_PATTERN: f64 = 0.5;

/// Progress samples examined for the pattern factor.
const PATTERN_WINDOW: usize = 3;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Factor scores feeding one prediction.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PredictionFactors {
    /// Priority score (Critical 1.0 down to Low 0.4)
    pub priority: f64,

    /// Complexity score; inverted scale, higher means simpler work
    pub complexity: f64,

    /// Owner's on-time track record in [0.3, 1.0]; 0.7 for unseen owners
    pub owner_performance: f64,

    /// Recent progress velocity normalized into [0.1, 1.0]; 0.5 neutral
    pub progress_pattern: f64,

    /// Days spent in the current status, normalized by a week and capped at 1
    pub time_in_current_status: f64,

    /// Fraction of matched dependency operations that are blocked or on hold
    pub dependency_risk: f64,
}

impl PredictionFactors {
    pub(crate) fn compute(
        operation: &Operation,
        all_operations: &[Operation],
        owner_performance: f64,
        now: Time,
    ) -> Self {
        Self {
            priority: operation.priority.score(),
            complexity: operation.complexity_or_default().score(),
            owner_performance,
            progress_pattern: progress_pattern(operation),
            time_in_current_status: time_in_current_status(operation, now),
            dependency_risk: dependency_risk(operation, all_operations),
        }
    }
}

/// Fractional days from `from` to `to`; negative when `to` is earlier.
pub(crate) fn days_between(from: Time, to: Time) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Mean day-over-day velocity across the last three progress samples,
/// divided by 10 and clamped into [0.1, 1.0].
///
/// The pattern needs a full three-sample window with at least one pair of
/// samples separated by positive elapsed time; otherwise the neutral default
/// applies.
fn progress_pattern(operation: &Operation) -> f64 {
    let history = &operation.progress_history;
    if history.len() < PATTERN_WINDOW {
        return DEFAULT_PROGRESS_PATTERN;
    }

    let recent = &history[history.len() - PATTERN_WINDOW..];
    let mut velocities = Vec::new();
    for pair in recent.windows(2) {
        let days = days_between(pair[0].timestamp, pair[1].timestamp);
        if days > 0.0 {
            velocities.push((f64::from(pair[1].progress) - f64::from(pair[0].progress)) / days);
        }
    }

    if velocities.is_empty() {
        return DEFAULT_PROGRESS_PATTERN;
    }

    let mean = velocities.iter().sum::<f64>() / velocities.len() as f64;
    (mean / 10.0).clamp(0.1, 1.0)
}

/// Days spent in the current status, normalized by a week and capped at 1.
fn time_in_current_status(operation: &Operation, now: Time) -> f64 {
    match operation.status_history.last() {
        Some(entry) => (days_between(entry.timestamp, now) / 7.0).clamp(0.0, 1.0),
        None => 0.0,
    }
}

/// Fraction of dependency-matched operations currently blocked or on hold.
///
/// Dependencies are free text; an operation matches when its title contains
/// any dependency string, case-insensitively.
fn dependency_risk(operation: &Operation, all_operations: &[Operation]) -> f64 {
    if operation.dependencies.is_empty() {
        return 0.0;
    }

    let needles: Vec<String> = operation
        .dependencies
        .iter()
        .map(|d| d.to_lowercase())
        .collect();

    let mut matched = 0usize;
    let mut halted = 0usize;
    for candidate in all_operations {
        let title = candidate.title.to_lowercase();
        if needles.iter().any(|needle| title.contains(needle)) {
            matched += 1;
            if candidate.status.halts_dependents() {
                halted += 1;
            }
        }
    }

    if matched == 0 {
        0.0
    } else {
        halted as f64 / matched as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use vantage_core::{
        OperationId, OperationStatus, Priority, ProgressEntry, StatusEntry,
    };

    fn base() -> Time {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    fn operation(title: &str, status: OperationStatus) -> Operation {
        Operation {
            id: OperationId::new(),
            title: title.to_string(),
            description: String::new(),
            owner: "sam".to_string(),
            status,
            priority: Priority::Medium,
            complexity: None,
            progress: 30,
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

    fn sample(progress: u8, at: Time) -> ProgressEntry {
        ProgressEntry {
            progress,
            timestamp: at,
        }
    }

    #[test]
    fn pattern_defaults_below_three_samples() {
        let mut op = operation("Vendor audit", OperationStatus::InProgress);
        assert_eq!(progress_pattern(&op), 0.5);

        op.progress_history = vec![
            sample(40, base() - Duration::days(1)),
            sample(50, base()),
        ];
        assert_eq!(progress_pattern(&op), 0.5);
    }

    #[test]
    fn pattern_averages_pairwise_velocity() {
        let mut op = operation("Vendor audit", OperationStatus::InProgress);
        // 5 %/day then 3 %/day -> mean 4 -> 0.4 after normalization
        op.progress_history = vec![
            sample(10, base() - Duration::days(2)),
            sample(15, base() - Duration::days(1)),
            sample(18, base()),
        ];
        assert!((progress_pattern(&op) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn pattern_skips_zero_elapsed_pairs() {
        let mut op = operation("Vendor audit", OperationStatus::InProgress);
        let t = base();
        op.progress_history = vec![sample(10, t), sample(20, t), sample(30, t)];
        assert_eq!(progress_pattern(&op), 0.5);

        // One usable pair at 8 %/day alongside a same-instant pair
        op.progress_history = vec![
            sample(10, t - Duration::days(1)),
            sample(18, t),
            sample(20, t),
        ];
        assert!((progress_pattern(&op) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn pattern_clamps_extremes() {
        let mut op = operation("Vendor audit", OperationStatus::InProgress);
        // 30 %/day -> clamped to 1.0
        op.progress_history = vec![
            sample(10, base() - Duration::days(2)),
            sample(40, base() - Duration::days(1)),
            sample(70, base()),
        ];
        assert_eq!(progress_pattern(&op), 1.0);

        // Regressing progress -> clamped to the 0.1 floor
        op.progress_history = vec![
            sample(70, base() - Duration::days(2)),
            sample(40, base() - Duration::days(1)),
            sample(10, base()),
        ];
        assert_eq!(progress_pattern(&op), 0.1);
    }

    #[test]
    fn time_in_status_caps_at_one_week() {
        let mut op = operation("Vendor audit", OperationStatus::InProgress);
        assert_eq!(time_in_current_status(&op, base()), 0.0);

        op.status_history = vec![StatusEntry {
            status: OperationStatus::InProgress,
            timestamp: base() - Duration::days(14),
        }];
        assert_eq!(time_in_current_status(&op, base()), 1.0);

        op.status_history = vec![StatusEntry {
            status: OperationStatus::InProgress,
            timestamp: base() - Duration::hours(24),
        }];
        let score = time_in_current_status(&op, base());
        assert!((score - 1.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn dependency_risk_counts_halted_matches() {
        let mut op = operation("Launch readiness", OperationStatus::InProgress);
        op.dependencies = vec!["data migration".to_string()];

        let all = vec![
            operation("Data Migration Phase 1", OperationStatus::Blocked),
            operation("Data migration phase 2", OperationStatus::InProgress),
            operation("Unrelated work", OperationStatus::OnHold),
        ];

        assert!((dependency_risk(&op, &all) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn dependency_risk_zero_without_deps_or_matches() {
        let mut op = operation("Launch readiness", OperationStatus::InProgress);
        let all = vec![operation("Other", OperationStatus::Blocked)];
        assert_eq!(dependency_risk(&op, &all), 0.0);

        op.dependencies = vec!["nothing matches this".to_string()];
        assert_eq!(dependency_risk(&op, &all), 0.0);
    }
}
