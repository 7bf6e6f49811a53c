//! In-memory collaborators for research tests.
