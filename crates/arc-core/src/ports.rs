//! Collaborator ports consumed by the discovery and research engines.
//!
//! Every port is an object-safe `async_trait` held as `Arc<dyn Port>`. The
//! engines never construct collaborators themselves; the composition root
//! (the `arc` binary, or a test) wires concrete implementations in.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::{
    DecisionBrief, IdeaCard, IdeaDraft, MonitoringResult, NoveltyState, PromotedIdea,
    ResearchPacket, ResearchTaskResult, SeenContext, SynthesisResult, UniverseMember,
    UsageSnapshot,
};
use crate::enums::{Lane, RunStatus};
use crate::errors::AdapterError;

/// Source of tradable instruments. Opaque to the core.
#[async_trait]
pub trait UniverseProvider: Send + Sync {
    async fn fetch_universe(&self) -> Result<Vec<UniverseMember>, AdapterError>;
}

/// Per-instrument sighting history.
#[async_trait]
pub trait NoveltyStore: Send + Sync {
    /// `None` when the instrument has never been selected.
    async fn novelty_state(&self, ticker: &str) -> Result<Option<NoveltyState>, AdapterError>;

    /// Record that `ticker` was selected into an output. Implementations must
    /// apply the increment atomically.
    async fn record_seen(&self, ticker: &str, context: &SeenContext) -> Result<(), AdapterError>;
}

/// Turns a shortlisted instrument into a structured idea draft.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, member: &UniverseMember) -> Result<IdeaDraft, AdapterError>;
}

/// Persistence for idea cards.
#[async_trait]
pub trait IdeaStore: Send + Sync {
    async fn save_ideas(&self, cards: &[IdeaCard]) -> Result<(), AdapterError>;

    /// Cards still in `new` status, best rank first, most recent run first.
    async fn promotable_ideas(&self) -> Result<Vec<IdeaCard>, AdapterError>;

    async fn mark_promoted(&self, idea_id: &str) -> Result<(), AdapterError>;

    async fn ideas_for_date(&self, run_date: NaiveDate) -> Result<Vec<IdeaCard>, AdapterError>;
}

/// Research task runner and the two dependent stages.
#[async_trait]
pub trait ResearchAdapter: Send + Sync {
    async fn run_task(
        &self,
        task_id: &str,
        idea: &PromotedIdea,
    ) -> Result<ResearchTaskResult, AdapterError>;

    async fn synthesize(
        &self,
        idea: &PromotedIdea,
        results: &[ResearchTaskResult],
    ) -> Result<SynthesisResult, AdapterError>;

    async fn plan_monitoring(
        &self,
        idea: &PromotedIdea,
        synthesis: &SynthesisResult,
        results: &[ResearchTaskResult],
    ) -> Result<MonitoringResult, AdapterError>;
}

/// Append-only persistence for packet versions and decision briefs.
#[async_trait]
pub trait PacketStore: Send + Sync {
    async fn latest_packet(&self, idea_id: &str) -> Result<Option<ResearchPacket>, AdapterError>;

    /// Store a new version. Must refuse to overwrite an existing version.
    async fn save_packet(&self, packet: &ResearchPacket) -> Result<(), AdapterError>;

    async fn save_brief(&self, brief: &DecisionBrief) -> Result<(), AdapterError>;

    /// Every stored version for an idea, oldest first.
    async fn packet_history(&self, idea_id: &str) -> Result<Vec<ResearchPacket>, AdapterError>;
}

/// Lane B usage as seen by the persistence layer.
#[async_trait]
pub trait UsageSource: Send + Sync {
    async fn daily_usage(&self, day: NaiveDate) -> Result<UsageSnapshot, AdapterError>;

    async fn weekly_usage(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<UsageSnapshot, AdapterError>;

    async fn record_admission(
        &self,
        idea_id: &str,
        day: NaiveDate,
        run_id: &str,
    ) -> Result<(), AdapterError>;
}

/// Delivery of run output to humans.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_ideas(&self, cards: &[IdeaCard]) -> Result<(), AdapterError>;

    async fn notify_briefs(&self, briefs: &[DecisionBrief]) -> Result<(), AdapterError>;
}

/// Idempotency ledger keyed on lane and run date.
#[async_trait]
pub trait RunLedger: Send + Sync {
    /// Claim the `(lane, run_date)` slot. Returns `false` when a run for that
    /// slot is already running or completed; a failed run may be claimed again.
    async fn begin_run(
        &self,
        lane: Lane,
        run_date: NaiveDate,
        run_id: &str,
    ) -> Result<bool, AdapterError>;

    async fn finish_run(
        &self,
        lane: Lane,
        run_date: NaiveDate,
        status: RunStatus,
        error: Option<&str>,
    ) -> Result<(), AdapterError>;
}
