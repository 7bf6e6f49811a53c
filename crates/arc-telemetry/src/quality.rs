//! Aggregate quality metrics over recorded executions.

use std::collections::BTreeMap;

use arc_core::entities::{LaneOutcomeRecord, TelemetryRecord};
use arc_core::enums::{Lane, TaskOutcome};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-task execution counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TaskStats {
    pub succeeded: u32,
    pub failed: u32,
    pub skipped: u32,
    pub mean_duration_ms: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct QualityMetrics {
    pub total_executions: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub skipped: u32,
    /// Succeeded / (succeeded + failed). Skipped executions are excluded.
    pub success_rate: f64,
    pub mean_duration_ms: f64,
    pub p95_duration_ms: u64,
    pub per_task: BTreeMap<String, TaskStats>,
    /// Lane run counts keyed by terminal status.
    pub runs_by_status: BTreeMap<String, u32>,
    /// Mean NEW fraction of published Lane A output.
    pub mean_selected_new_fraction: Option<f64>,
}

#[allow(clippy::cast_precision_loss)]
fn mean(total: u64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total as f64 / count as f64 }
}

/// Nearest-rank percentile over sorted durations.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn percentile(sorted: &[u64], p: f64) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

pub(crate) fn compute(tasks: &[TelemetryRecord], outcomes: &[LaneOutcomeRecord]) -> QualityMetrics {
    let mut metrics = QualityMetrics {
        total_executions: u32::try_from(tasks.len()).unwrap_or(u32::MAX),
        ..QualityMetrics::default()
    };

    let mut durations: Vec<u64> = Vec::with_capacity(tasks.len());
    let mut per_task_durations: BTreeMap<&str, (u64, usize)> = BTreeMap::new();
    for record in tasks {
        let stats = metrics.per_task.entry(record.task_id.clone()).or_default();
        match record.outcome {
            TaskOutcome::Succeeded => {
                metrics.succeeded += 1;
                stats.succeeded += 1;
            }
            TaskOutcome::Failed => {
                metrics.failed += 1;
                stats.failed += 1;
            }
            TaskOutcome::Skipped => {
                metrics.skipped += 1;
                stats.skipped += 1;
                continue;
            }
        }
        durations.push(record.duration_ms);
        let entry = per_task_durations.entry(&record.task_id).or_insert((0, 0));
        entry.0 += record.duration_ms;
        entry.1 += 1;
    }

    for (task_id, (total, count)) in per_task_durations {
        if let Some(stats) = metrics.per_task.get_mut(task_id) {
            stats.mean_duration_ms = mean(total, count);
        }
    }

    let attempted = metrics.succeeded + metrics.failed;
    if attempted > 0 {
        metrics.success_rate = f64::from(metrics.succeeded) / f64::from(attempted);
    }
    metrics.mean_duration_ms = mean(durations.iter().sum(), durations.len());
    durations.sort_unstable();
    metrics.p95_duration_ms = percentile(&durations, 0.95);

    let mut fractions = Vec::new();
    for outcome in outcomes {
        *metrics
            .runs_by_status
            .entry(outcome.status.as_str().to_string())
            .or_default() += 1;
        if outcome.lane == Lane::LaneA {
            if let Some(fraction) = outcome.selected_new_fraction {
                fractions.push(fraction);
            }
        }
    }
    if !fractions.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let n = fractions.len() as f64;
        metrics.mean_selected_new_fraction = Some(fractions.iter().sum::<f64>() / n);
    }

    metrics
}
