//! In-memory collaborators for Lane A tests.
