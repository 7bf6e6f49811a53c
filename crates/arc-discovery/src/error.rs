//! Discovery error types.
//!
//! Item-level collaborator failures (one enrichment call) never surface here;
//! they are recorded on the run report. These variants end a run.

use arc_core::errors::{AdapterError, CoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The universe provider failed outright.
    #[error("universe fetch failed: {0}")]
    UniverseFetch(#[source] AdapterError),

    /// The universe provider returned no members.
    #[error("universe is empty")]
    EmptyUniverse,

    /// The novelty state store could not be read or written.
    #[error("novelty store failed: {0}")]
    NoveltyStore(#[source] AdapterError),

    /// Selected ideas could not be persisted.
    #[error("persisting ideas failed: {0}")]
    Persist(#[source] AdapterError),

    /// The run ledger could not be reached.
    #[error("run ledger failed: {0}")]
    Ledger(#[source] AdapterError),

    /// A pipeline invariant was violated (e.g. ranking an ungated draft).
    #[error(transparent)]
    Invariant(#[from] CoreError),
}
