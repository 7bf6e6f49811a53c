use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Lane, RunStatus, TaskOutcome};

/// One task execution (enrichment call, research task, or dependent stage).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TelemetryRecord {
    pub id: String,
    pub run_id: String,
    pub lane: Lane,
    pub task_id: String,
    #[serde(default)]
    pub idea_id: Option<String>,
    pub outcome: TaskOutcome,
    pub duration_ms: u64,
    #[serde(default)]
    pub error: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Pipeline-level outcome of one lane run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LaneOutcomeRecord {
    pub id: String,
    pub run_id: String,
    pub lane: Lane,
    pub run_date: NaiveDate,
    pub status: RunStatus,
    /// Fraction of Lane A output classified NEW (Lane A only).
    #[serde(default)]
    pub selected_new_fraction: Option<f64>,
    /// Run summary payload (metrics object of the lane).
    #[serde(default)]
    pub summary: serde_json::Value,
    #[serde(default)]
    pub error: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
