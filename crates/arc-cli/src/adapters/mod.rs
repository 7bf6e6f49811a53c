//! Collaborators wired in by the `arc` binary.
//!
//! Market data, enrichment, and research are read from a fixture directory
//! so runs are reproducible offline:
//!
//! ```text
//! {fixtures}/universe.json         [UniverseMember]
//! {fixtures}/drafts.json           [IdeaDraft]
//! {fixtures}/research/{TICKER}.json  ResearchFixture
//! ```

pub mod fixtures;
pub mod notifier;

pub use fixtures::{FileEnricher, FileResearch, FileUniverse, ResearchFixture, TaskFixture};
pub use notifier::LogNotifier;
