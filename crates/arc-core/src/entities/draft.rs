use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{GateResults, NoveltyAnnotation};
use crate::enums::InvestmentStyle;
use crate::errors::CoreError;

/// Quantitative snapshot attached to a draft by the enrichment adapter.
///
/// Every metric is optional: numeric gates only check metrics that are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MetricsSnapshot {
    #[serde(default)]
    pub net_debt_to_ebitda: Option<f64>,
    #[serde(default)]
    pub ebit_margin: Option<f64>,
    #[serde(default)]
    pub ev_to_ebit: Option<f64>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub fcf_yield: Option<f64>,
    #[serde(default)]
    pub roic: Option<f64>,
    #[serde(default)]
    pub revenue_growth: Option<f64>,
}

/// Binary risk flags. Any `true` flag fails the downside-shape gate outright.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RiskFlags {
    #[serde(default)]
    pub leverage_risk_dominant: bool,
    #[serde(default)]
    pub liquidity_risk_dominant: bool,
    #[serde(default)]
    pub regulatory_cliff_dominant: bool,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// An event expected to move the thesis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Catalyst {
    pub description: String,
    #[serde(default)]
    pub expected_window: Option<String>,
}

/// Raw sub-scores produced during enrichment, before normalisation.
///
/// Novelty is not part of this struct: the ranking engine receives it
/// separately so that admission can never depend on it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScoreComponents {
    #[serde(default)]
    pub edge_clarity: f64,
    #[serde(default)]
    pub business_quality: f64,
    #[serde(default)]
    pub financial_resilience: f64,
    #[serde(default)]
    pub valuation_tension: f64,
    #[serde(default)]
    pub catalyst_clarity: f64,
    #[serde(default)]
    pub information_integrity: f64,
}

/// A candidate idea before admission.
///
/// Produced by the enrichment adapter; the core annotates it with novelty,
/// gate results, and a rank score. Only selected drafts become [`IdeaCard`]s.
///
/// [`IdeaCard`]: super::IdeaCard
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct IdeaDraft {
    pub ticker: String,
    pub company_name: String,
    pub style: InvestmentStyle,
    pub hypothesis: String,
    pub mechanism: String,
    #[serde(default)]
    pub edge_types: Vec<String>,
    #[serde(default)]
    pub metrics: MetricsSnapshot,
    #[serde(default)]
    pub risk_flags: RiskFlags,
    #[serde(default)]
    pub catalysts: Vec<Catalyst>,
    #[serde(default)]
    pub signposts: Vec<String>,
    #[serde(default)]
    pub score: Option<ScoreComponents>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub novelty: Option<NoveltyAnnotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate_results: Option<GateResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_score: Option<f64>,
}

impl IdeaDraft {
    /// Attach the gate result set. A draft carries exactly one.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if results were already attached.
    pub fn attach_gate_results(&mut self, results: GateResults) -> Result<(), CoreError> {
        if self.gate_results.is_some() {
            return Err(CoreError::Validation(format!(
                "draft {} already carries a gate result set",
                self.ticker
            )));
        }
        self.gate_results = Some(results);
        Ok(())
    }

    /// Whether gates were evaluated and all passed.
    #[must_use]
    pub fn passed_gates(&self) -> bool {
        self.gate_results.as_ref().is_some_and(GateResults::passed)
    }
}
