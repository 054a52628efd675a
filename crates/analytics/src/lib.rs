//! Portfolio-level milestone analytics.
//!
//! Aggregates every milestone across all initiatives into completion
//! statistics, bottleneck scores, delivery metrics, monthly trends, and a
//! deadline/resourcing risk assessment, then distills prioritized
//! human-readable insights from the result.

#![warn(missing_docs)]

mod bottleneck;
mod engine;
mod insight;
mod metrics;
mod risk;
mod trend;

pub use bottleneck::Bottleneck;
pub use engine::{MilestoneAnalytics, MilestoneAnalyticsEngine, MilestoneRef, MilestoneSummary};
pub use insight::{InsightKind, InsightPriority, MilestoneInsight};
pub use metrics::PerformanceMetrics;
pub use risk::RiskAssessment;
pub use trend::TrendPoint;
