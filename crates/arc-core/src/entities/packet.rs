use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{MonitoringResult, ResearchTaskResult, SynthesisResult, TaskFailure};
use crate::enums::{PacketStatus, Verdict};

/// Checklist verdict for a packet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CompletionReport {
    /// Completeness in 0..=100.
    pub score: u8,
    /// Every required section and field is present.
    pub complete: bool,
    /// Complete and meets the stricter evidentiary bar for committee review.
    pub ic_bundle_eligible: bool,
    /// Checklist entries that were not satisfied.
    pub missing: Vec<String>,
    /// Grounded evidence references / all evidence references.
    pub evidence_grounding_ratio: f64,
}

/// The content of one packet version: task outputs plus the two dependent stages.
///
/// Timestamps of the version itself live on [`ResearchPacket`] so that an
/// unchanged re-run diffs empty.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PacketContent {
    pub idea_id: String,
    pub ticker: String,
    pub task_results: BTreeMap<String, ResearchTaskResult>,
    #[serde(default)]
    pub failed_tasks: Vec<TaskFailure>,
    #[serde(default)]
    pub synthesis: Option<SynthesisResult>,
    #[serde(default)]
    pub monitoring: Option<MonitoringResult>,
    #[serde(default)]
    pub stage_errors: Vec<String>,
    /// Packet confidence after degradation for failed tasks.
    pub confidence: f64,
    /// Some independent tasks failed and synthesis ran on a subset.
    pub degraded: bool,
    pub status: PacketStatus,
    #[serde(default)]
    pub completion: CompletionReport,
}

impl PacketContent {
    /// Top-level keys of the serialized content, in declaration order.
    pub const FIELDS: &'static [&'static str] = &[
        "idea_id",
        "ticker",
        "task_results",
        "failed_tasks",
        "synthesis",
        "monitoring",
        "stage_errors",
        "confidence",
        "degraded",
        "status",
        "completion",
    ];
}

/// One field-level change between two packet versions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FieldChange {
    pub field: String,
    pub before: serde_json::Value,
    pub after: serde_json::Value,
}

/// An immutable, versioned research packet.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ResearchPacket {
    pub id: String,
    pub idea_id: String,
    pub version: u32,
    pub previous_id: Option<String>,
    pub content: PacketContent,
    pub diff: Vec<FieldChange>,
    pub created_at: DateTime<Utc>,
}

impl ResearchPacket {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.content.completion.complete
    }
}

/// Position sizing guidance attached to a decision brief.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SizingGuidance {
    /// Maximum position as a percentage of portfolio NAV.
    pub max_position_pct: f64,
    /// Conviction factor in 0.0..=1.0 applied to the configured maximum.
    pub conviction: f64,
    pub rationale: String,
}

/// Read-only summary of a complete packet. Produced once per packet version.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DecisionBrief {
    pub id: String,
    pub idea_id: String,
    pub packet_id: String,
    pub packet_version: u32,
    pub ticker: String,
    pub verdict: Verdict,
    pub expected_value: f64,
    pub thesis_summary: String,
    pub sizing: SizingGuidance,
    pub key_risks: Vec<String>,
    pub ic_bundle_eligible: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn field_list_matches_serialized_keys() {
        let content = PacketContent {
            idea_id: "idea-1".into(),
            ticker: "ACME".into(),
            task_results: BTreeMap::new(),
            failed_tasks: Vec::new(),
            synthesis: None,
            monitoring: None,
            stage_errors: Vec::new(),
            confidence: 0.0,
            degraded: false,
            status: PacketStatus::Failed,
            completion: CompletionReport::default(),
        };
        let value = serde_json::to_value(&content).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        let mut fields = PacketContent::FIELDS.to_vec();
        keys.sort_unstable();
        fields.sort_unstable();
        assert_eq!(keys, fields);
    }
}
