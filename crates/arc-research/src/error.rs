use arc_core::errors::{AdapterError, CoreError};

/// Errors raised by the research engines and the Lane B run.
///
/// Research-task failures are not errors: they are recorded on the packet.
/// These variants cover the cases that end a run.
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    #[error("failed to load research usage: {0}")]
    Usage(#[source] AdapterError),

    #[error("failed to load promotable ideas: {0}")]
    Ideas(#[source] AdapterError),

    #[error("failed to persist research output: {0}")]
    Persist(#[source] AdapterError),

    #[error("run ledger unavailable: {0}")]
    Ledger(#[source] AdapterError),

    #[error("packet for {idea_id} cannot follow a packet for {previous_idea_id}")]
    VersionMismatch {
        idea_id: String,
        previous_idea_id: String,
    },

    #[error("failed to serialize packet content: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Invariant(#[from] CoreError),
}
