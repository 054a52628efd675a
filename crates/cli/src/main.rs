//! Vantage CLI - completion prediction and milestone analytics over a
//! portfolio snapshot.

mod snapshot;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use vantage_analytics::{InsightKind, InsightPriority, MilestoneAnalyticsEngine};
use vantage_core::{ConfidenceLevel, Operation, OperationId, OperationPrediction, OperationStatus};
use vantage_prediction::PredictionEngine;

use snapshot::Snapshot;

#[derive(Parser)]
#[command(name = "vantage")]
#[command(about = "Strategic portfolio prediction and analytics", long_about = None)]
struct Cli {
    /// Path to the portfolio snapshot JSON file
    #[arg(long, default_value = "portfolio.json")]
    snapshot: std::path::PathBuf,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict completion for open operations
    Predict {
        /// Operation ID (predicts every open operation when omitted)
        #[arg(long)]
        operation: Option<String>,
    },
    /// List operations
    List {
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
    },
    /// Print portfolio analytics as JSON
    Analytics,
    /// Print prioritized portfolio insights
    Insights,
    /// Show operation counts by status
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let snapshot = Snapshot::load(&cli.snapshot)?;
    info!(
        operations = snapshot.operations.len(),
        initiatives = snapshot.initiatives.len(),
        "loaded snapshot"
    );

    match cli.command {
        Commands::Predict { operation } => {
            let mut engine = PredictionEngine::new();
            engine.train(&snapshot.operations);

            match operation {
                Some(id) => {
                    let operation_id: OperationId = id
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid operation ID"))?;
                    let Some(op) = snapshot.operations.iter().find(|o| o.id == operation_id)
                    else {
                        println!("Operation not found");
                        return Ok(());
                    };
                    match engine.predict(op, &snapshot.operations) {
                        Some(prediction) => {
                            let estimate = engine.estimate_days(op, &snapshot.operations);
                            print_prediction(op, &prediction, estimate);
                        }
                        None => println!("Operation is completed; nothing to predict"),
                    }
                }
                None => {
                    for op in &snapshot.operations {
                        if let Some(prediction) = engine.predict(op, &snapshot.operations) {
                            let estimate = engine.estimate_days(op, &snapshot.operations);
                            print_prediction(op, &prediction, estimate);
                        }
                    }
                }
            }
        }
        Commands::List { status } => {
            let filter = status
                .map(|s| s.parse::<OperationStatus>())
                .transpose()?;
            let operations: Vec<&Operation> = snapshot
                .operations
                .iter()
                .filter(|op| filter.map_or(true, |wanted| op.status == wanted))
                .collect();

            println!("Operations ({})", operations.len());
            for op in operations {
                println!(
                    "  {} | {} | {} | {}% - {}",
                    op.id,
                    format_status(op.status),
                    op.owner,
                    op.progress,
                    op.title,
                );
            }
        }
        Commands::Analytics => {
            let engine = MilestoneAnalyticsEngine::new();
            let analytics = engine.generate_analytics(&snapshot.initiatives);
            println!("{}", serde_json::to_string_pretty(&analytics)?);
        }
        Commands::Insights => {
            let engine = MilestoneAnalyticsEngine::new();
            let analytics = engine.generate_analytics(&snapshot.initiatives);
            let insights = engine.generate_insights(&analytics);

            if insights.is_empty() {
                println!("No insights; the portfolio looks steady");
            }
            for insight in insights {
                println!(
                    "[{}] {} {}: {}",
                    format_priority(insight.priority),
                    format_kind(insight.kind),
                    insight.title,
                    insight.detail,
                );
            }
        }
        Commands::Status => {
            let by_status: std::collections::HashMap<_, usize> = snapshot
                .operations
                .iter()
                .fold(std::collections::HashMap::new(), |mut acc, op| {
                    *acc.entry(op.status).or_insert(0) += 1;
                    acc
                });

            println!("Portfolio status");
            for status in &[
                OperationStatus::NotStarted,
                OperationStatus::InProgress,
                OperationStatus::Blocked,
                OperationStatus::OnHold,
                OperationStatus::Completed,
            ] {
                if let Some(count) = by_status.get(status) {
                    println!("  {}: {}", format_status(*status), count);
                }
            }
        }
    }

    Ok(())
}

fn print_prediction(op: &Operation, prediction: &OperationPrediction, estimate_days: i64) {
    println!("{} | {} - {}", op.id, format_status(op.status), op.title);
    println!(
        "  Estimated completion: {}",
        prediction.estimated_completion_date.format("%Y-%m-%d")
    );
    println!("  Days remaining: {}", prediction.days_remaining);
    println!("  Effort estimate: {} days", estimate_days);
    println!("  Velocity: {:.1}%/day", prediction.progress_velocity);
    println!(
        "  Confidence: {}",
        format_confidence(prediction.confidence_level)
    );
    println!("  On-time probability: {}%", prediction.probability_on_time);
    if !prediction.similar_operations.is_empty() {
        println!("  Similar operations: {}", prediction.similar_operations.len());
    }
    for risk in &prediction.risk_factors {
        println!("  Risk: {risk}");
    }
    for rec in &prediction.recommendations {
        println!("  Recommendation: {rec}");
    }
}

fn format_status(status: OperationStatus) -> &'static str {
    match status {
        OperationStatus::NotStarted => "NOT_STARTED",
        OperationStatus::InProgress => "IN_PROGRESS",
        OperationStatus::Blocked => "BLOCKED",
        OperationStatus::Completed => "COMPLETED",
        OperationStatus::OnHold => "ON_HOLD",
    }
}

fn format_confidence(level: ConfidenceLevel) -> &'static str {
    match level {
        ConfidenceLevel::High => "HIGH",
        ConfidenceLevel::Medium => "MEDIUM",
        ConfidenceLevel::Low => "LOW",
    }
}

fn format_priority(priority: InsightPriority) -> &'static str {
    match priority {
        InsightPriority::High => "HIGH",
        InsightPriority::Medium => "MEDIUM",
        InsightPriority::Low => "LOW",
    }
}

fn format_kind(kind: InsightKind) -> &'static str {
    match kind {
        InsightKind::Success => "success",
        InsightKind::Info => "info",
        InsightKind::Warning => "warning",
        InsightKind::Error => "error",
    }
}
