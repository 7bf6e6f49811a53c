//! Per-lane run ledger keyed on `(lane, run_date)`.

use arc_core::enums::{Lane, RunStatus};
use arc_core::errors::AdapterError;
use arc_core::ports::RunLedger;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ArcStore;
use crate::error::DatabaseError;
use crate::helpers::{
    format_date, get_opt_string, parse_date, parse_datetime, parse_enum, parse_optional_datetime,
};

/// One ledger row, as shown by `arc history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RunEntry {
    pub lane: Lane,
    pub run_date: NaiveDate,
    pub run_id: String,
    pub status: RunStatus,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

fn row_to_run(row: &libsql::Row) -> Result<RunEntry, DatabaseError> {
    Ok(RunEntry {
        lane: parse_enum(&row.get::<String>(0)?)?,
        run_date: parse_date(&row.get::<String>(1)?)?,
        run_id: row.get::<String>(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        error: get_opt_string(row, 4)?,
        started_at: parse_datetime(&row.get::<String>(5)?)?,
        finished_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
    })
}

impl ArcStore {
    /// Claim the slot in one statement. A `failed` or `skipped` slot is
    /// reclaimed; `running` and `completed` slots are left alone.
    pub async fn claim_run(
        &self,
        lane: Lane,
        run_date: NaiveDate,
        run_id: &str,
    ) -> Result<bool, DatabaseError> {
        let changed = self
            .conn
            .execute(
                "INSERT INTO lane_runs (lane, run_date, run_id, status, started_at)
                 VALUES (?1, ?2, ?3, 'running', ?4)
                 ON CONFLICT(lane, run_date) DO UPDATE SET
                     run_id = excluded.run_id,
                     status = 'running',
                     error = NULL,
                     started_at = excluded.started_at,
                     finished_at = NULL
                 WHERE lane_runs.status IN ('failed', 'skipped')",
                libsql::params![
                    lane.as_str(),
                    format_date(run_date),
                    run_id,
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(changed > 0)
    }

    pub async fn close_run(
        &self,
        lane: Lane,
        run_date: NaiveDate,
        status: RunStatus,
        error: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .conn
            .execute(
                "UPDATE lane_runs SET status = ?1, error = ?2, finished_at = ?3
                 WHERE lane = ?4 AND run_date = ?5",
                libsql::params![
                    status.as_str(),
                    error,
                    Utc::now().to_rfc3339(),
                    lane.as_str(),
                    format_date(run_date)
                ],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::InvalidState(format!(
                "no {lane} run claimed for {run_date}"
            )));
        }
        Ok(())
    }

    pub async fn get_run(
        &self,
        lane: Lane,
        run_date: NaiveDate,
    ) -> Result<Option<RunEntry>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT lane, run_date, run_id, status, error, started_at, finished_at
                 FROM lane_runs WHERE lane = ?1 AND run_date = ?2",
                [lane.as_str().to_string(), format_date(run_date)],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_run(&row)?)),
            None => Ok(None),
        }
    }

    /// Most recent runs across both lanes, newest date first.
    pub async fn recent_runs(&self, limit: u32) -> Result<Vec<RunEntry>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT lane, run_date, run_id, status, error, started_at, finished_at
                 FROM lane_runs ORDER BY run_date DESC, lane LIMIT ?1",
                [i64::from(limit)],
            )
            .await?;
        let mut runs = Vec::new();
        while let Some(row) = rows.next().await? {
            runs.push(row_to_run(&row)?);
        }
        Ok(runs)
    }
}

#[async_trait]
impl RunLedger for ArcStore {
    async fn begin_run(
        &self,
        lane: Lane,
        run_date: NaiveDate,
        run_id: &str,
    ) -> Result<bool, AdapterError> {
        Ok(self.claim_run(lane, run_date, run_id).await?)
    }

    async fn finish_run(
        &self,
        lane: Lane,
        run_date: NaiveDate,
        status: RunStatus,
        error: Option<&str>,
    ) -> Result<(), AdapterError> {
        Ok(self.close_run(lane, run_date, status, error).await?)
    }
}
