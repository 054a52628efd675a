//! Monthly creation/completion trend buckets.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use vantage_core::Time;

use crate::engine::MilestoneSummary;

/// Calendar months covered by the trend series.
const TREND_MONTHS: i64 = 6;

/// One calendar month of milestone history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Bucket month, `YYYY-MM`
    pub month: String,

    /// Milestones created in the month
    pub created: usize,

    /// Of those, completed within the same month
    pub completed: usize,

    /// Of those, due before the month's end and still not completed
    pub overdue: usize,

    /// Completed share of the month's created milestones, percent
    pub completion_rate: f64,
}

/// The last six calendar months, oldest first, current month last.
pub(crate) fn compute(milestones: &[MilestoneSummary], now: Time) -> Vec<TrendPoint> {
    (0..TREND_MONTHS)
        .rev()
        .map(|months_back| bucket(milestones, now, months_back))
        .collect()
}

fn bucket(milestones: &[MilestoneSummary], now: Time, months_back: i64) -> TrendPoint {
    let (year, month) = shift_month(now.year(), now.month(), months_back);
    let start = month_start(year, month);
    let (next_year, next_month) = shift_month(year, month, -1);
    let end = month_start(next_year, next_month);

    let created: Vec<&MilestoneSummary> = milestones
        .iter()
        .filter(|m| m.created_at >= start && m.created_at < end)
        .collect();
    let completed = created
        .iter()
        .filter(|m| m.completed_at.is_some_and(|done| done >= start && done < end))
        .count();
    let overdue = created
        .iter()
        .filter(|m| m.due_date < end && !m.is_completed())
        .count();

    let completion_rate = if created.is_empty() {
        0.0
    } else {
        completed as f64 / created.len() as f64 * 100.0
    };

    TrendPoint {
        month: format!("{year:04}-{month:02}"),
        created: created.len(),
        completed,
        overdue,
        completion_rate,
    }
}

/// Calendar month `months_back` before (or, negative, after) year/month.
fn shift_month(year: i32, month: u32, months_back: i64) -> (i32, u32) {
    let total = i64::from(year) * 12 + i64::from(month) - 1 - months_back;
    (
        total.div_euclid(12) as i32,
        (total.rem_euclid(12) + 1) as u32,
    )
}

fn month_start(year: i32, month: u32) -> Time {
    // month is always in 1..=12 by construction
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}
