//! Entity structs for all ARC pipeline objects.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip and schema export. Numeric snapshots use `f64`, so most entities
//! derive `PartialEq` only.

mod draft;
mod gate;
mod idea;
mod packet;
mod quota;
mod research;
mod task;
mod telemetry;
mod universe;

pub use draft::{Catalyst, IdeaDraft, MetricsSnapshot, RiskFlags, ScoreComponents};
pub use gate::{GateOutcome, GateResults};
pub use idea::{IdeaCard, PromotedIdea};
pub use packet::{
    CompletionReport, DecisionBrief, FieldChange, PacketContent, ResearchPacket, SizingGuidance,
};
pub use quota::{Admission, QuotaCheck, QuotaState, UsageSnapshot};
pub use research::{
    EvidenceRef, Kpi, MonitoringResult, ResearchTaskResult, Scenario, SynthesisResult, TaskFailure,
};
pub use task::TaskDefinition;
pub use telemetry::{LaneOutcomeRecord, TelemetryRecord};
pub use universe::{NoveltyAnnotation, NoveltyState, SeenContext, UniverseMember};
