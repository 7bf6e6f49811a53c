//! Database error types for arc-db.

use arc_core::errors::AdapterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unusable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB, illegal transition).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A stored JSON column could not be (de)serialized.
    #[error("JSON column error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

impl From<DatabaseError> for AdapterError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::LibSql(_) | DatabaseError::Migration(_) => {
                Self::Unavailable(err.to_string())
            }
            _ => Self::InvalidResponse(err.to_string()),
        }
    }
}
