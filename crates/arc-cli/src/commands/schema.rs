use arc_core::entities::{
    DecisionBrief, IdeaCard, IdeaDraft, LaneOutcomeRecord, QuotaCheck, ResearchPacket,
    TaskDefinition, TelemetryRecord, UniverseMember,
};
use arc_db::RunEntry;
use arc_discovery::LaneARunReport;
use arc_research::LaneBRunReport;
use arc_selector::Selection;
use arc_telemetry::QualityMetrics;
use schemars::{Schema, schema_for};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

pub const ENTITIES: &[&str] = &[
    "idea_card",
    "idea_draft",
    "universe_member",
    "research_packet",
    "decision_brief",
    "task_definition",
    "selection",
    "lane_a_report",
    "lane_b_report",
    "quality_metrics",
    "telemetry_record",
    "lane_outcome",
    "run_entry",
    "quota_check",
];

fn schema(entity: &str) -> Option<Schema> {
    let schema = match entity {
        "idea_card" => schema_for!(IdeaCard),
        "idea_draft" => schema_for!(IdeaDraft),
        "universe_member" => schema_for!(UniverseMember),
        "research_packet" => schema_for!(ResearchPacket),
        "decision_brief" => schema_for!(DecisionBrief),
        "task_definition" => schema_for!(TaskDefinition),
        "selection" => schema_for!(Selection),
        "lane_a_report" => schema_for!(LaneARunReport),
        "lane_b_report" => schema_for!(LaneBRunReport),
        "quality_metrics" => schema_for!(QualityMetrics),
        "telemetry_record" => schema_for!(TelemetryRecord),
        "lane_outcome" => schema_for!(LaneOutcomeRecord),
        "run_entry" => schema_for!(RunEntry),
        "quota_check" => schema_for!(QuotaCheck),
        _ => return None,
    };
    Some(schema)
}

/// Handle `arc schema`. Always JSON.
pub fn handle(args: &SchemaArgs, _flags: &GlobalFlags) -> anyhow::Result<()> {
    let entity = args.entity.trim().to_ascii_lowercase().replace('-', "_");
    let Some(schema) = schema(&entity) else {
        anyhow::bail!(
            "unknown entity '{}'; expected one of: {}",
            args.entity,
            ENTITIES.join(", ")
        );
    };
    output(&schema, crate::cli::OutputFormat::Json)
}
