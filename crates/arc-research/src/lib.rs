//! Lane B: quota-bounded deep research on promoted ideas.
//!
//! - [`quota`]: daily and weekly admission caps
//! - [`scheduler`]: bounded parallel task execution, then synthesis and monitoring
//! - [`progress`]: per-idea `N + 2` step reporting
//! - [`packet`]: packet assembly, completion scoring, decision briefs
//! - [`versioning`]: immutable packet versions with field-level diffs
//! - [`lane_b`]: the research run that ties them together

pub mod error;
pub mod lane_b;
pub mod packet;
pub mod progress;
pub mod quota;
pub mod scheduler;
pub mod versioning;

mod test_support;

pub use error::ResearchError;
pub use lane_b::{IdeaResearchSummary, LaneBDeps, LaneBOptions, LaneBOrchestrator, LaneBRunReport};
pub use packet::{CompletionChecker, assemble, build_brief};
pub use progress::{NoopProgress, ProgressObserver, ProgressTracker};
pub use quota::{QuotaManager, business_week};
pub use scheduler::{CancelFlag, ResearchExecution, ResearchScheduler};
pub use versioning::PacketVersioner;
