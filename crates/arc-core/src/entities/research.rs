use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Verdict;

/// A pointer to the evidence backing a finding.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EvidenceRef {
    pub source: String,
    #[serde(default)]
    pub locator: Option<String>,
    /// Whether the reference was verified against retrieved source data
    /// (as opposed to model recall).
    #[serde(default)]
    pub grounded: bool,
}

/// Output of one independent research task.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ResearchTaskResult {
    pub task_id: String,
    pub content: serde_json::Value,
    #[serde(default)]
    pub evidence: Vec<EvidenceRef>,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub implications: Vec<String>,
    /// Confidence in 0.0..=1.0.
    pub confidence: f64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl ResearchTaskResult {
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        u64::try_from((self.completed_at - self.started_at).num_milliseconds()).unwrap_or(0)
    }
}

/// A task that failed, timed out, or was cancelled before producing output.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskFailure {
    pub task_id: String,
    pub error: String,
    pub duration_ms: u64,
}

/// One leg of the bull/base/bear scenario set.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Scenario {
    pub probability: f64,
    /// Expected total return as a fraction (0.25 = +25%).
    pub target_return: f64,
    pub narrative: String,
}

/// Output of the synthesis stage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SynthesisResult {
    pub thesis: String,
    pub bull: Scenario,
    pub base: Scenario,
    pub bear: Scenario,
    pub expected_value: f64,
    pub recommendation: Verdict,
    pub confidence: f64,
}

impl SynthesisResult {
    /// Probability-weighted return across the three scenarios.
    #[must_use]
    pub fn weighted_return(&self) -> f64 {
        self.bull.probability * self.bull.target_return
            + self.base.probability * self.base.target_return
            + self.bear.probability * self.bear.target_return
    }

    /// Sum of the three scenario probabilities.
    #[must_use]
    pub fn probability_mass(&self) -> f64 {
        self.bull.probability + self.base.probability + self.bear.probability
    }
}

/// A metric tracked after promotion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Kpi {
    pub name: String,
    pub target: String,
    #[serde(default)]
    pub cadence: Option<String>,
}

/// Output of the monitoring-plan stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MonitoringResult {
    pub kpis: Vec<Kpi>,
    pub invalidation_triggers: Vec<String>,
    #[serde(default)]
    pub historical_parallels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(probability: f64, target_return: f64) -> Scenario {
        Scenario {
            probability,
            target_return,
            narrative: String::new(),
        }
    }

    #[test]
    fn weighted_return_sums_legs() {
        let synthesis = SynthesisResult {
            thesis: "t".into(),
            bull: scenario(0.25, 0.6),
            base: scenario(0.5, 0.2),
            bear: scenario(0.25, -0.4),
            expected_value: 0.15,
            recommendation: Verdict::Buy,
            confidence: 0.8,
        };
        assert!((synthesis.weighted_return() - 0.15).abs() < 1e-9);
        assert!((synthesis.probability_mass() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn duration_is_never_negative() {
        let now = Utc::now();
        let result = ResearchTaskResult {
            task_id: "valuation_analysis".into(),
            content: serde_json::Value::Null,
            evidence: vec![],
            key_findings: vec![],
            implications: vec![],
            confidence: 0.5,
            started_at: now,
            completed_at: now - chrono::Duration::seconds(5),
        };
        assert_eq!(result.duration_ms(), 0);
    }
}
