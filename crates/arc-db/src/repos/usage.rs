//! Lane B admissions, the source of daily and weekly quota usage.

use arc_core::entities::UsageSnapshot;
use arc_core::errors::AdapterError;
use arc_core::ports::UsageSource;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::ArcStore;
use crate::error::DatabaseError;
use crate::helpers::format_date;

impl ArcStore {
    /// Admissions between `start` and `end` inclusive. Each idea counts once
    /// per day.
    pub async fn usage_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<UsageSnapshot, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT idea_id FROM research_admissions WHERE day BETWEEN ?1 AND ?2 ORDER BY day, admitted_at, idea_id",
                [format_date(start), format_date(end)],
            )
            .await?;
        let mut used = 0u32;
        let mut completed_ids: Vec<String> = Vec::new();
        while let Some(row) = rows.next().await? {
            used += 1;
            let id = row.get::<String>(0)?;
            if !completed_ids.contains(&id) {
                completed_ids.push(id);
            }
        }
        Ok(UsageSnapshot {
            used,
            completed_ids,
        })
    }

    /// Record that `idea_id` consumed quota on `day`. Re-recording the same
    /// idea on the same day is ignored.
    pub async fn insert_admission(
        &self,
        idea_id: &str,
        day: NaiveDate,
        run_id: &str,
    ) -> Result<bool, DatabaseError> {
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO research_admissions (idea_id, day, run_id, admitted_at)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![idea_id, format_date(day), run_id, Utc::now().to_rfc3339()],
            )
            .await?;
        Ok(inserted > 0)
    }
}

#[async_trait]
impl UsageSource for ArcStore {
    async fn daily_usage(&self, day: NaiveDate) -> Result<UsageSnapshot, AdapterError> {
        Ok(self.usage_between(day, day).await?)
    }

    async fn weekly_usage(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<UsageSnapshot, AdapterError> {
        Ok(self.usage_between(start, end).await?)
    }

    async fn record_admission(
        &self,
        idea_id: &str,
        day: NaiveDate,
        run_id: &str,
    ) -> Result<(), AdapterError> {
        if !self.insert_admission(idea_id, day, run_id).await? {
            tracing::debug!(idea_id, %day, "admission already recorded");
        }
        Ok(())
    }
}
