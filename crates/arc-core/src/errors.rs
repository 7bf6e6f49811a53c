//! Cross-cutting error types for ARC.
//!
//! This module defines errors that can originate from any crate in the system.
//! Domain-specific errors (e.g., `DiscoveryError`, `DatabaseError`) are defined in
//! their respective crates. The CLI converges all of them into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any ARC crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure reported by an external collaborator (data provider, language model,
/// persistence layer, notifier).
///
/// The engines never let these end the process: item-level failures are
/// recorded and skipped, run-level failures mark the run failed.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The collaborator could not be reached or refused the request.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// The collaborator answered but the payload was unusable.
    #[error("invalid collaborator response: {0}")]
    InvalidResponse(String),

    /// The call exceeded its time budget.
    #[error("timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
