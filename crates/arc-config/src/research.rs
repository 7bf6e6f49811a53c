//! Lane B (deep research) settings: scheduler, completion checklist, briefs.

use arc_core::entities::PacketContent;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_concurrency() -> usize {
    3
}

const fn default_task_timeout_secs() -> u64 {
    300
}

fn default_tasks() -> Vec<String> {
    [
        "business_overview_report",
        "competitive_analysis",
        "financial_statement_analysis",
        "capital_allocation_analysis",
        "management_quality_assessment",
        "valuation_analysis",
        "risk_assessment",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

const fn default_min_grounding_ratio() -> f64 {
    0.6
}

const fn default_min_ic_confidence() -> f64 {
    0.5
}

const fn default_probability_tolerance() -> f64 {
    0.02
}

const fn default_max_position_pct() -> f64 {
    5.0
}

fn default_diffable_fields() -> Vec<String> {
    [
        "task_results",
        "failed_tasks",
        "synthesis",
        "monitoring",
        "stage_errors",
        "confidence",
        "degraded",
        "status",
        "completion",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResearchConfig {
    /// Maximum independent research tasks in flight per idea.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Time budget for one independent task.
    #[serde(default = "default_task_timeout_secs")]
    pub task_timeout_secs: u64,

    /// Independent research tasks run for every promoted idea.
    #[serde(default = "default_tasks")]
    pub tasks: Vec<String>,

    /// Grounded / total evidence references required for IC eligibility.
    #[serde(default = "default_min_grounding_ratio")]
    pub min_grounding_ratio: f64,

    /// Packet confidence required for IC eligibility.
    #[serde(default = "default_min_ic_confidence")]
    pub min_ic_confidence: f64,

    /// Allowed deviation of the scenario probability mass from 1.0.
    #[serde(default = "default_probability_tolerance")]
    pub probability_tolerance: f64,

    /// Position cap, in percent of NAV, for a full-conviction buy.
    #[serde(default = "default_max_position_pct")]
    pub max_position_pct: f64,

    /// Top-level packet fields compared between versions.
    #[serde(default = "default_diffable_fields")]
    pub diffable_fields: Vec<String>,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            task_timeout_secs: default_task_timeout_secs(),
            tasks: default_tasks(),
            min_grounding_ratio: default_min_grounding_ratio(),
            min_ic_confidence: default_min_ic_confidence(),
            probability_tolerance: default_probability_tolerance(),
            max_position_pct: default_max_position_pct(),
            diffable_fields: default_diffable_fields(),
        }
    }
}

impl ResearchConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::invalid(
                "research.concurrency",
                "must be at least 1",
            ));
        }
        if self.task_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "research.task_timeout_secs",
                "must be positive",
            ));
        }
        if self.tasks.is_empty() {
            return Err(ConfigError::invalid(
                "research.tasks",
                "at least one research task is required",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_grounding_ratio) {
            return Err(ConfigError::invalid(
                "research.min_grounding_ratio",
                "must be in [0, 1]",
            ));
        }
        if self.max_position_pct <= 0.0 {
            return Err(ConfigError::invalid(
                "research.max_position_pct",
                "must be positive",
            ));
        }
        if let Some(unknown) = self
            .diffable_fields
            .iter()
            .find(|f| !PacketContent::FIELDS.contains(&f.as_str()))
        {
            return Err(ConfigError::invalid(
                "research.diffable_fields",
                format!(
                    "unknown packet field {unknown:?}, expected one of {}",
                    PacketContent::FIELDS.join(", ")
                ),
            ));
        }
        Ok(())
    }
}
