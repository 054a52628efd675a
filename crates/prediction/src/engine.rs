//! The prediction engine: train on completed history, score what's in flight.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use tracing::debug;
use vantage_core::{
    ConfidenceLevel, Operation, OperationId, OperationPrediction, OperationStatus, Time,
};

use crate::advice;
use crate::factors::{self, PredictionFactors};

/// Performance score assumed for owners with no completed history.
const DEFAULT_OWNER_SCORE: f64 = 0.7;

/// Owner scores are clamped into this band so one bad quarter never zeroes
/// an owner out of the model.
const OWNER_SCORE_MIN: f64 = 0.3;
const OWNER_SCORE_MAX: f64 = 1.0;

/// Assumed velocity (%/day) when neither live nor historical data exists.
const FALLBACK_VELOCITY: f64 = 2.0;

/// Floor on the velocity divisor; keeps days-remaining finite.
const MIN_VELOCITY_DIVISOR: f64 = 0.5;

/// Cap on similar-operation references per prediction.
const MAX_SIMILAR: usize = 5;

/// Heuristic completion predictor for in-flight operations.
///
/// Holds the completed-operation history and a per-owner performance cache,
/// both rebuilt by [`train`](Self::train). The cache is instance state, not
/// thread-safe under concurrent train/predict; callers must retrain whenever
/// the completed-operation population changes - the engine never refreshes
/// itself, and a stale cache biases predictions.
#[derive(Debug, Default)]
pub struct PredictionEngine {
    historical: Vec<Operation>,
    owner_performance: HashMap<String, f64>,
}

impl PredictionEngine {
    /// Create an untrained engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the historical snapshot and the owner performance cache from
    /// the completed operations in `operations`.
    pub fn train(&mut self, operations: &[Operation]) {
        self.historical = operations
            .iter()
            .filter(|op| op.status == OperationStatus::Completed)
            .cloned()
            .collect();

        let mut per_owner: HashMap<String, (usize, usize)> = HashMap::new();
        for op in &self.historical {
            let (total, on_time) = per_owner.entry(op.owner.clone()).or_default();
            *total += 1;
            if op.completed_date.is_some_and(|done| done <= op.due_date) {
                *on_time += 1;
            }
        }

        self.owner_performance = per_owner
            .into_iter()
            .map(|(owner, (total, on_time))| {
                let rate = on_time as f64 / total as f64;
                (owner, rate.clamp(OWNER_SCORE_MIN, OWNER_SCORE_MAX))
            })
            .collect();

        debug!(
            completed = self.historical.len(),
            owners = self.owner_performance.len(),
            "trained prediction model"
        );
    }

    /// Cached on-time performance score for an owner; [`DEFAULT_OWNER_SCORE`]
    /// when the owner has no completed history.
    pub fn owner_score(&self, owner: &str) -> f64 {
        self.owner_performance
            .get(owner)
            .copied()
            .unwrap_or(DEFAULT_OWNER_SCORE)
    }

    /// Predict completion for `operation`. Returns `None` for completed
    /// operations, which need no prediction.
    pub fn predict(
        &self,
        operation: &Operation,
        all_operations: &[Operation],
    ) -> Option<OperationPrediction> {
        self.predict_at(operation, all_operations, Utc::now())
    }

    /// [`predict`](Self::predict) with an explicit clock, so callers and
    /// tests can hold "now" constant.
    pub fn predict_at(
        &self,
        operation: &Operation,
        all_operations: &[Operation],
        now: Time,
    ) -> Option<OperationPrediction> {
        if operation.status == OperationStatus::Completed {
            return None;
        }

        let owner_performance = self.owner_score(&operation.owner);
        let factors = PredictionFactors::compute(operation, all_operations, owner_performance, now);
        let similar_operations = self.similar_operations(operation);
        let progress_velocity = progress_velocity(operation);
        let days_remaining = self.days_remaining(operation, progress_velocity);
        let days_until_due = factors::days_between(now, operation.due_date);

        let prediction = OperationPrediction {
            estimated_completion_date: now + Duration::days(days_remaining),
            confidence_level: confidence_level(&factors, similar_operations.len()),
            risk_factors: advice::risk_factors(operation, &factors, days_until_due),
            recommendations: advice::recommendations(operation, &factors, days_until_due),
            progress_velocity,
            days_remaining,
            probability_on_time: probability_on_time(days_remaining, days_until_due),
            similar_operations,
            last_updated: now,
        };

        debug!(
            operation = %operation.id,
            days_remaining,
            confidence = ?prediction.confidence_level,
            probability = prediction.probability_on_time,
            "predicted completion"
        );

        Some(prediction)
    }

    /// Factor-based effort estimate in whole days, independent of recorded
    /// progress: base days by complexity, compressed or stretched by
    /// priority, owner track record, velocity pattern, dependency health,
    /// and stall time. Never below one day.
    pub fn estimate_days(&self, operation: &Operation, all_operations: &[Operation]) -> i64 {
        self.estimate_days_at(operation, all_operations, Utc::now())
    }

    /// [`estimate_days`](Self::estimate_days) with an explicit clock.
    pub fn estimate_days_at(
        &self,
        operation: &Operation,
        all_operations: &[Operation],
        now: Time,
    ) -> i64 {
        let factors = PredictionFactors::compute(
            operation,
            all_operations,
            self.owner_score(&operation.owner),
            now,
        );
        compose_estimate(operation, &factors)
    }

    /// Up to [`MAX_SIMILAR`] completed operations sharing owner, priority,
    /// and (defaulted) complexity with `operation`.
    fn similar_operations(&self, operation: &Operation) -> Vec<OperationId> {
        self.historical
            .iter()
            .filter(|h| {
                h.id != operation.id
                    && h.owner == operation.owner
                    && h.priority == operation.priority
                    && h.complexity_or_default() == operation.complexity_or_default()
            })
            .take(MAX_SIMILAR)
            .map(|h| h.id)
            .collect()
    }

    /// Whole days until the remaining progress burns down, ceiling-rounded.
    /// Falls back to the historical velocity of similarly shaped operations
    /// when the live velocity is unusable, with a floored divisor.
    fn days_remaining(&self, operation: &Operation, velocity: f64) -> i64 {
        let remaining = f64::from(100u8.saturating_sub(operation.progress));
        if velocity > 0.0 {
            (remaining / velocity).ceil() as i64
        } else {
            let fallback = self.fallback_velocity(operation);
            (remaining / fallback.max(MIN_VELOCITY_DIVISOR)).ceil() as i64
        }
    }

    /// Mean velocity (100 / mean days-to-complete) over completed operations
    /// sharing priority and complexity. `updated_at` stands in when a
    /// completed operation never recorded its `completed_date`.
    fn fallback_velocity(&self, operation: &Operation) -> f64 {
        let durations: Vec<f64> = self
            .historical
            .iter()
            .filter(|h| {
                h.priority == operation.priority
                    && h.complexity_or_default() == operation.complexity_or_default()
            })
            .map(|h| factors::days_between(h.created_at, h.completed_date.unwrap_or(h.updated_at)))
            .collect();

        if durations.is_empty() {
            return FALLBACK_VELOCITY;
        }

        let mean_days = durations.iter().sum::<f64>() / durations.len() as f64;
        if mean_days > 0.0 {
            100.0 / mean_days
        } else {
            FALLBACK_VELOCITY
        }
    }
}

/// Percent progress gained per day between the two most recent progress
/// samples. Zero with fewer than two samples or non-positive elapsed time;
/// never negative.
pub fn progress_velocity(operation: &Operation) -> f64 {
    let history = &operation.progress_history;
    if history.len() < 2 {
        return 0.0;
    }

    let prev = &history[history.len() - 2];
    let last = &history[history.len() - 1];
    let days = factors::days_between(prev.timestamp, last.timestamp);
    if days <= 0.0 {
        return 0.0;
    }

    ((f64::from(last.progress) - f64::from(prev.progress)) / days).max(0.0)
}

/// Sequential factor adjustments over the complexity/priority baseline.
fn compose_estimate(operation: &Operation, factors: &PredictionFactors) -> i64 {
    let mut days =
        operation.complexity_or_default().base_days() * operation.priority.duration_multiplier();

    // Strong owners shrink the estimate, weak owners stretch it.
    days *= 2.0 - factors.owner_performance;

    if factors.progress_pattern > 0.7 {
        days *= 0.8;
    } else if factors.progress_pattern < 0.3 {
        days *= 1.3;
    }

    days *= 1.0 + factors.dependency_risk * 0.5;

    if factors.time_in_current_status > 0.7 {
        days *= 1.2;
    }

    (days.round() as i64).max(1)
}

fn confidence_score(factors: &PredictionFactors, similar_count: usize) -> f64 {
    factors.owner_performance * 0.3
        + (factors.progress_pattern - 0.5).abs() * 0.4
        + (similar_count as f64 / 3.0).min(1.0) * 0.3
}

fn confidence_level(factors: &PredictionFactors, similar_count: usize) -> ConfidenceLevel {
    let score = confidence_score(factors, similar_count);
    if score > 0.7 {
        ConfidenceLevel::High
    } else if score > 0.4 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// On pace: 60 plus five points per surplus day, capped at 95. Behind: 60
/// minus ten points per late day, floored at 5.
fn probability_on_time(days_remaining: i64, days_until_due: f64) -> u8 {
    let surplus = days_until_due - days_remaining as f64;
    let probability = if surplus >= 0.0 {
        (60.0 + surplus * 5.0).min(95.0)
    } else {
        (60.0 + surplus * 10.0).max(5.0)
    };
    probability.round() as u8
}
