//! Status enums, classifications, and lifecycle states for ARC.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// NoveltyClass
// ---------------------------------------------------------------------------

/// Novelty classification of a universe member for one discovery run.
///
/// Ordering matters: the shortlist drains `New`, then `Reappearance`, then
/// `Repeat`, never interleaving across classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoveltyClass {
    New,
    Reappearance,
    Repeat,
}

impl NoveltyClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Reappearance => "reappearance",
            Self::Repeat => "repeat",
        }
    }
}

impl fmt::Display for NoveltyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// InvestmentStyle
// ---------------------------------------------------------------------------

/// Declared investment style of an idea. Drives style-specific gate thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentStyle {
    QualityCompounder,
    GarpGrowth,
    SpecialSituation,
    Turnaround,
}

impl InvestmentStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QualityCompounder => "quality_compounder",
            Self::GarpGrowth => "garp_growth",
            Self::SpecialSituation => "special_situation",
            Self::Turnaround => "turnaround",
        }
    }
}

impl fmt::Display for InvestmentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IdeaStatus
// ---------------------------------------------------------------------------

/// Status of a persisted idea card.
///
/// ```text
/// new → promoted
///     → parked → new
///              → rejected
///     → rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    New,
    Promoted,
    Parked,
    Rejected,
}

impl IdeaStatus {
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::New => &[Self::Promoted, Self::Parked, Self::Rejected],
            Self::Parked => &[Self::New, Self::Rejected],
            Self::Promoted | Self::Rejected => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Promoted => "promoted",
            Self::Parked => "parked",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LaneAStep
// ---------------------------------------------------------------------------

/// Step of the Lane A discovery state machine.
///
/// ```text
/// fetching_universe → shortlisting → enriching → gating → ranking
///   → selecting → persisting → notifying → done
/// (any non-terminal step) → failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LaneAStep {
    FetchingUniverse,
    Shortlisting,
    Enriching,
    Gating,
    Ranking,
    Selecting,
    Persisting,
    Notifying,
    Done,
    Failed,
}

impl LaneAStep {
    /// The eight working steps, in execution order.
    pub const SEQUENCE: [Self; 8] = [
        Self::FetchingUniverse,
        Self::Shortlisting,
        Self::Enriching,
        Self::Gating,
        Self::Ranking,
        Self::Selecting,
        Self::Persisting,
        Self::Notifying,
    ];

    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::FetchingUniverse => &[Self::Shortlisting, Self::Failed],
            Self::Shortlisting => &[Self::Enriching, Self::Failed],
            Self::Enriching => &[Self::Gating, Self::Failed],
            Self::Gating => &[Self::Ranking, Self::Failed],
            Self::Ranking => &[Self::Selecting, Self::Failed],
            Self::Selecting => &[Self::Persisting, Self::Failed],
            Self::Persisting => &[Self::Notifying, Self::Failed],
            Self::Notifying => &[Self::Done, Self::Failed],
            Self::Done | Self::Failed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchingUniverse => "fetching_universe",
            Self::Shortlisting => "shortlisting",
            Self::Enriching => "enriching",
            Self::Gating => "gating",
            Self::Ranking => "ranking",
            Self::Selecting => "selecting",
            Self::Persisting => "persisting",
            Self::Notifying => "notifying",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for LaneAStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RunStatus
// ---------------------------------------------------------------------------

/// Terminal or in-flight status of a lane run.
///
/// ```text
/// running → completed
///         → failed → running (next cycle retry)
/// skipped (idempotency check refused the run)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
    Skipped,
}

impl RunStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Running => &[Self::Completed, Self::Failed],
            Self::Failed => &[Self::Running],
            Self::Completed | Self::Skipped => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Lane
// ---------------------------------------------------------------------------

/// Pipeline lane a run or task definition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    LaneA,
    LaneB,
    Portfolio,
    Monitoring,
    Utility,
}

impl Lane {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LaneA => "lane_a",
            Self::LaneB => "lane_b",
            Self::Portfolio => "portfolio",
            Self::Monitoring => "monitoring",
            Self::Utility => "utility",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskTier
// ---------------------------------------------------------------------------

/// Catalog tier of a task definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskTier {
    Core,
    Supporting,
    Optional,
    Experimental,
    Deprecated,
}

impl TaskTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Supporting => "supporting",
            Self::Optional => "optional",
            Self::Experimental => "experimental",
            Self::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for TaskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskTrigger
// ---------------------------------------------------------------------------

/// Condition under which a task definition becomes eligible for selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskTrigger {
    Always,
    LaneAPromotion,
    GatePass,
    SignalThreshold,
    ManualOnly,
}

impl TaskTrigger {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::LaneAPromotion => "lane_a_promotion",
            Self::GatePass => "gate_pass",
            Self::SignalThreshold => "signal_threshold",
            Self::ManualOnly => "manual_only",
        }
    }
}

impl fmt::Display for TaskTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GateId
// ---------------------------------------------------------------------------

/// Admission gates, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GateId {
    DataSufficiency,
    Coherence,
    EdgeClaim,
    DownsideShape,
    StyleFit,
}

impl GateId {
    /// All gates in fixed evaluation order.
    pub const ALL: [Self; 5] = [
        Self::DataSufficiency,
        Self::Coherence,
        Self::EdgeClaim,
        Self::DownsideShape,
        Self::StyleFit,
    ];

    /// Gate number (0-4) in the battery.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::DataSufficiency => 0,
            Self::Coherence => 1,
            Self::EdgeClaim => 2,
            Self::DownsideShape => 3,
            Self::StyleFit => 4,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DataSufficiency => "data_sufficiency",
            Self::Coherence => "coherence",
            Self::EdgeClaim => "edge_claim",
            Self::DownsideShape => "downside_shape",
            Self::StyleFit => "style_fit",
        }
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OverrideReason
// ---------------------------------------------------------------------------

/// Binary risk flag that fails the downside-shape gate outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OverrideReason {
    LeverageRiskDominant,
    LiquidityRiskDominant,
    RegulatoryCliffDominant,
}

impl OverrideReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeverageRiskDominant => "leverage_risk_dominant",
            Self::LiquidityRiskDominant => "liquidity_risk_dominant",
            Self::RegulatoryCliffDominant => "regulatory_cliff_dominant",
        }
    }
}

impl fmt::Display for OverrideReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Recommendation carried by a synthesis result and its decision brief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Buy,
    Watch,
    Pass,
}

impl Verdict {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Watch => "watch",
            Self::Pass => "pass",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PacketStatus
// ---------------------------------------------------------------------------

/// Completion status of a research packet version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PacketStatus {
    /// All required sections present.
    Complete,
    /// Synthesis and monitoring ran but required sections are missing.
    Incomplete,
    /// Synthesis or monitoring failed, or the run was cancelled.
    Failed,
}

impl PacketStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Incomplete => "incomplete",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PacketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskOutcome
// ---------------------------------------------------------------------------

/// Outcome of a single recorded task execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    Succeeded,
    Failed,
    Skipped,
}

impl TaskOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// QuotaWindow
// ---------------------------------------------------------------------------

/// Calendar window a quota counter is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuotaWindow {
    Daily,
    Weekly,
}

impl QuotaWindow {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for QuotaWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
