//! In-memory telemetry store with an optional JSONL trail.
//!
//! Records are appended to `{trail_dir}/telemetry.jsonl` and
//! `{trail_dir}/outcomes.jsonl` with `serde_jsonlines::append_json_lines`, one
//! line per record. Reopening a trail directory reloads both files so
//! aggregates span processes.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use arc_core::entities::{LaneOutcomeRecord, TelemetryRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::TelemetryError;
use crate::quality::{self, QualityMetrics};
use crate::sink::TelemetrySink;

const TASKS_FILE: &str = "telemetry.jsonl";
const OUTCOMES_FILE: &str = "outcomes.jsonl";

#[derive(Default)]
struct Records {
    tasks: Vec<TelemetryRecord>,
    outcomes: Vec<LaneOutcomeRecord>,
}

/// Append-only telemetry log.
pub struct TelemetryStore {
    records: Mutex<Records>,
    trail_dir: Option<PathBuf>,
}

impl TelemetryStore {
    /// A store that keeps records in memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            records: Mutex::new(Records::default()),
            trail_dir: None,
        }
    }

    /// Open (creating if needed) a trail directory and reload its records.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::Io` if the directory cannot be created or an
    /// existing trail file cannot be parsed.
    pub fn open(trail_dir: impl Into<PathBuf>) -> Result<Self, TelemetryError> {
        let trail_dir = trail_dir.into();
        std::fs::create_dir_all(&trail_dir).map_err(|source| TelemetryError::Io {
            path: trail_dir.display().to_string(),
            source,
        })?;

        let records = Records {
            tasks: read_lines(&trail_dir.join(TASKS_FILE))?,
            outcomes: read_lines(&trail_dir.join(OUTCOMES_FILE))?,
        };
        tracing::debug!(
            trail_dir = %trail_dir.display(),
            tasks = records.tasks.len(),
            outcomes = records.outcomes.len(),
            "telemetry trail loaded"
        );

        Ok(Self {
            records: Mutex::new(records),
            trail_dir: Some(trail_dir),
        })
    }

    /// The trail directory, if this store persists.
    #[must_use]
    pub fn trail_dir(&self) -> Option<&Path> {
        self.trail_dir.as_deref()
    }

    #[must_use]
    pub fn tasks(&self) -> Vec<TelemetryRecord> {
        self.lock().tasks.clone()
    }

    #[must_use]
    pub fn outcomes(&self) -> Vec<LaneOutcomeRecord> {
        self.lock().outcomes.clone()
    }

    /// Aggregate quality metrics over everything recorded so far.
    #[must_use]
    pub fn quality_metrics(&self) -> QualityMetrics {
        let records = self.lock();
        quality::compute(&records.tasks, &records.outcomes)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn append<T: Serialize>(&self, file: &str, record: &T) {
        let Some(dir) = &self.trail_dir else {
            return;
        };
        let path = dir.join(file);
        if let Err(error) = serde_jsonlines::append_json_lines(&path, [record]) {
            tracing::warn!(path = %path.display(), %error, "failed to append telemetry record");
        }
    }
}

impl TelemetrySink for TelemetryStore {
    fn record_task(&self, record: TelemetryRecord) {
        self.append(TASKS_FILE, &record);
        self.lock().tasks.push(record);
    }

    fn record_outcome(&self, record: LaneOutcomeRecord) {
        self.append(OUTCOMES_FILE, &record);
        self.lock().outcomes.push(record);
    }
}

fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, TelemetryError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let io_err = |source| TelemetryError::Io {
        path: path.display().to_string(),
        source,
    };
    serde_jsonlines::json_lines(path)
        .map_err(io_err)?
        .collect::<Result<Vec<T>, _>>()
        .map_err(io_err)
}
