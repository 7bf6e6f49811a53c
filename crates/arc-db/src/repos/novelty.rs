//! Novelty state: one row per ticker, incremented by a single upsert.

use arc_core::entities::{NoveltyState, SeenContext};
use arc_core::errors::AdapterError;
use arc_core::ports::NoveltyStore;
use async_trait::async_trait;
use chrono::Utc;

use crate::ArcStore;
use crate::error::DatabaseError;
use crate::helpers::{format_date, from_json, get_u32, parse_date, to_json};

fn row_to_state(row: &libsql::Row) -> Result<NoveltyState, DatabaseError> {
    Ok(NoveltyState {
        ticker: row.get::<String>(0)?,
        last_seen: parse_date(&row.get::<String>(1)?)?,
        seen_count: get_u32(row, 2)?,
        last_tags: from_json(&row.get::<String>(3)?)?,
    })
}

impl ArcStore {
    pub async fn get_novelty(&self, ticker: &str) -> Result<Option<NoveltyState>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT ticker, last_seen, seen_count, last_tags FROM novelty_state WHERE ticker = ?1",
                [ticker],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_state(&row)?)),
            None => Ok(None),
        }
    }

    /// Increment the sighting count and move `last_seen` forward. A replay
    /// of an older date never moves `last_seen` backwards.
    pub async fn upsert_seen(&self, ticker: &str, context: &SeenContext) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO novelty_state (ticker, last_seen, seen_count, last_tags, last_run_id, last_idea_id, updated_at)
                 VALUES (?1, ?2, 1, ?3, ?4, ?5, ?6)
                 ON CONFLICT(ticker) DO UPDATE SET
                     last_seen = max(novelty_state.last_seen, excluded.last_seen),
                     seen_count = novelty_state.seen_count + 1,
                     last_tags = excluded.last_tags,
                     last_run_id = excluded.last_run_id,
                     last_idea_id = excluded.last_idea_id,
                     updated_at = excluded.updated_at",
                libsql::params![
                    ticker,
                    format_date(context.seen_on),
                    to_json(&context.tags)?,
                    context.run_id.as_str(),
                    context.idea_id.as_deref(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl NoveltyStore for ArcStore {
    async fn novelty_state(&self, ticker: &str) -> Result<Option<NoveltyState>, AdapterError> {
        Ok(self.get_novelty(ticker).await?)
    }

    async fn record_seen(&self, ticker: &str, context: &SeenContext) -> Result<(), AdapterError> {
        Ok(self.upsert_seen(ticker, context).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn seen(day: u32, tags: &[&str]) -> SeenContext {
        SeenContext {
            seen_on: NaiveDate::from_ymd_opt(2026, 6, day).unwrap(),
            run_id: format!("run-{day}"),
            idea_id: Some(format!("idea-{day}")),
            tags: tags.iter().map(ToString::to_string).collect(),
        }
    }

    #[tokio::test]
    async fn unseen_ticker_has_no_state() {
        let store = ArcStore::open_local(":memory:").await.unwrap();
        assert_eq!(store.novelty_state("ACME").await.unwrap(), None);
    }

    #[tokio::test]
    async fn record_seen_increments_and_tracks_latest() {
        let store = ArcStore::open_local(":memory:").await.unwrap();
        store.record_seen("ACME", &seen(1, &["value"])).await.unwrap();
        store.record_seen("ACME", &seen(4, &["quality", "catalyst"])).await.unwrap();

        let state = store.novelty_state("ACME").await.unwrap().unwrap();
        assert_eq!(state.seen_count, 2);
        assert_eq!(state.last_seen, NaiveDate::from_ymd_opt(2026, 6, 4).unwrap());
        assert_eq!(state.last_tags, vec!["quality", "catalyst"]);
    }

    #[tokio::test]
    async fn older_replay_does_not_rewind_last_seen() {
        let store = ArcStore::open_local(":memory:").await.unwrap();
        store.record_seen("ACME", &seen(5, &[])).await.unwrap();
        store.record_seen("ACME", &seen(2, &[])).await.unwrap();

        let state = store.novelty_state("ACME").await.unwrap().unwrap();
        assert_eq!(state.seen_count, 2);
        assert_eq!(state.last_seen, NaiveDate::from_ymd_opt(2026, 6, 5).unwrap());
    }

    #[tokio::test]
    async fn tickers_are_independent() {
        let store = ArcStore::open_local(":memory:").await.unwrap();
        store.record_seen("ACME", &seen(1, &[])).await.unwrap();
        store.record_seen("BOLT", &seen(1, &[])).await.unwrap();
        store.record_seen("BOLT", &seen(2, &[])).await.unwrap();
        assert_eq!(store.novelty_state("ACME").await.unwrap().unwrap().seen_count, 1);
        assert_eq!(store.novelty_state("BOLT").await.unwrap().unwrap().seen_count, 2);
    }
}
