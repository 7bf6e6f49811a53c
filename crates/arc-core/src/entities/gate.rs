use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{GateId, OverrideReason};

/// Result of a single gate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GateOutcome {
    pub gate: GateId,
    pub passed: bool,
    /// Human-readable diagnostics for numeric failures (which field, which limit).
    #[serde(default)]
    pub details: Vec<String>,
    /// Set only when a binary risk flag failed the gate.
    #[serde(default)]
    pub override_reason: Option<OverrideReason>,
}

impl GateOutcome {
    #[must_use]
    pub const fn pass(gate: GateId) -> Self {
        Self {
            gate,
            passed: true,
            details: Vec::new(),
            override_reason: None,
        }
    }

    #[must_use]
    pub const fn fail(gate: GateId, details: Vec<String>) -> Self {
        Self {
            gate,
            passed: false,
            details,
            override_reason: None,
        }
    }

    #[must_use]
    pub fn overridden(gate: GateId, reason: OverrideReason) -> Self {
        Self {
            gate,
            passed: false,
            details: vec![format!("binary override: {reason}")],
            override_reason: Some(reason),
        }
    }
}

/// One outcome per gate, in evaluation order. Immutable once attached to a draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GateResults {
    pub outcomes: Vec<GateOutcome>,
}

impl GateResults {
    /// True when every gate passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| o.passed)
    }

    /// Outcomes that failed, in evaluation order.
    pub fn failures(&self) -> impl Iterator<Item = &GateOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    #[must_use]
    pub fn outcome(&self, gate: GateId) -> Option<&GateOutcome> {
        self.outcomes.iter().find(|o| o.gate == gate)
    }

    /// The first binary override reason recorded, if any.
    #[must_use]
    pub fn override_reason(&self) -> Option<OverrideReason> {
        self.outcomes.iter().find_map(|o| o.override_reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_set_does_not_pass() {
        assert!(!GateResults::default().passed());
    }

    #[test]
    fn failures_and_override_are_reported() {
        let results = GateResults {
            outcomes: vec![
                GateOutcome::pass(GateId::DataSufficiency),
                GateOutcome::overridden(GateId::DownsideShape, OverrideReason::LeverageRiskDominant),
                GateOutcome::fail(GateId::StyleFit, vec!["ebit_margin below floor".into()]),
            ],
        };
        assert!(!results.passed());
        let failed: Vec<GateId> = results.failures().map(|o| o.gate).collect();
        assert_eq!(failed, vec![GateId::DownsideShape, GateId::StyleFit]);
        assert_eq!(
            results.override_reason(),
            Some(OverrideReason::LeverageRiskDominant)
        );
        assert!(results.outcome(GateId::Coherence).is_none());
    }
}
