use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Lane, TaskTier, TaskTrigger};

const fn default_tier() -> TaskTier {
    TaskTier::Core
}

const fn default_trigger() -> TaskTrigger {
    TaskTrigger::Always
}

/// Static description of a selectable unit of work, loaded once per process.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TaskDefinition {
    pub id: String,
    pub lane: Lane,
    pub stage: String,
    /// Declared expected value in 0.0..=1.0.
    pub expected_value_score: f64,
    /// Declared expected cost in (0.0, 1.0].
    pub expected_cost_score: f64,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default = "default_tier")]
    pub tier: TaskTier,
    #[serde(default = "default_trigger")]
    pub trigger: TaskTrigger,
    /// Minimum signal strength for `signal_threshold` triggers.
    #[serde(default)]
    pub min_signal: Option<f64>,
    #[serde(default)]
    pub description: String,
}

impl TaskDefinition {
    /// Declared value divided by declared cost.
    #[must_use]
    pub fn value_cost_ratio(&self) -> f64 {
        self.expected_value_score / self.expected_cost_score.max(f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_and_defaults() {
        let task: TaskDefinition = serde_json::from_value(serde_json::json!({
            "id": "valuation_analysis",
            "lane": "lane_b",
            "stage": "research",
            "expected_value_score": 0.9,
            "expected_cost_score": 0.45
        }))
        .unwrap();
        assert_eq!(task.tier, TaskTier::Core);
        assert_eq!(task.trigger, TaskTrigger::Always);
        assert!(task.dependencies.is_empty());
        assert!((task.value_cost_ratio() - 2.0).abs() < 1e-9);
    }
}
