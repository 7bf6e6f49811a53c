//! # arc-db
//!
//! libSQL persistence for the ARC pipeline.
//!
//! [`ArcStore`] owns an embedded libSQL database and implements every
//! persistence port the engines consume: novelty state, idea cards, packet
//! versions and briefs, Lane B admission usage, and the per-lane run ledger.
//! Nested entities are stored as JSON next to the scalar columns used for
//! filtering, ordering, and uniqueness.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

use error::DatabaseError;
use libsql::Builder;

pub use repos::runs::RunEntry;

/// Central database handle.
pub struct ArcStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl ArcStore {
    /// Open a local database at `path` (`":memory:"` for tests).
    ///
    /// Runs migrations on every open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let store = Self { db, conn };
        store.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(store)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_local_creates_schema() {
        let store = ArcStore::open_local(":memory:").await.unwrap();
        let tables = [
            "novelty_state",
            "idea_cards",
            "research_packets",
            "decision_briefs",
            "research_admissions",
            "lane_runs",
        ];
        for table in &tables {
            let mut rows = store
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            assert!(rows.next().await.unwrap().is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let store = ArcStore::open_local(":memory:").await.unwrap();
        store.run_migrations().await.unwrap();
        store.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arc.db");
        let path = path.to_str().unwrap();
        {
            let store = ArcStore::open_local(path).await.unwrap();
            store
                .conn()
                .execute(
                    "INSERT INTO lane_runs (lane, run_date, run_id, status, started_at)
                     VALUES ('lane_a', '2026-06-01', 'run-1', 'completed', '2026-06-01 07:00:00')",
                    (),
                )
                .await
                .unwrap();
        }
        let store = ArcStore::open_local(path).await.unwrap();
        let mut rows = store
            .conn()
            .query("SELECT COUNT(*) FROM lane_runs", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }
}
