//! Admission gate thresholds.
//!
//! Gate order and override semantics are fixed; only the numbers here are
//! tunable.

use arc_core::enums::InvestmentStyle;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_min_hypothesis_chars() -> usize {
    40
}

const fn default_min_mechanism_chars() -> usize {
    40
}

const fn default_min_signposts() -> usize {
    1
}

const fn default_min_catalysts() -> usize {
    1
}

const fn default_min_mechanism_ratio() -> f64 {
    0.5
}

fn default_valid_edge_types() -> Vec<String> {
    [
        "variant_perception",
        "structural",
        "behavioral",
        "informational",
        "analytical",
        "time_arbitrage",
        "catalyst",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Numeric limits applied per investment style by the downside-shape and
/// style-fit gates. `None` disables a check.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct StyleLimits {
    #[serde(default)]
    pub max_net_debt_to_ebitda: Option<f64>,
    #[serde(default)]
    pub min_ebit_margin: Option<f64>,
    #[serde(default)]
    pub max_ev_to_ebit: Option<f64>,
    #[serde(default)]
    pub max_pe_ratio: Option<f64>,
}

fn default_quality_compounder() -> StyleLimits {
    StyleLimits {
        max_net_debt_to_ebitda: Some(2.5),
        min_ebit_margin: Some(0.15),
        max_ev_to_ebit: Some(30.0),
        max_pe_ratio: Some(40.0),
    }
}

fn default_garp_growth() -> StyleLimits {
    StyleLimits {
        max_net_debt_to_ebitda: Some(3.0),
        min_ebit_margin: Some(0.08),
        max_ev_to_ebit: Some(25.0),
        max_pe_ratio: Some(30.0),
    }
}

fn default_special_situation() -> StyleLimits {
    StyleLimits {
        max_net_debt_to_ebitda: Some(4.0),
        min_ebit_margin: None,
        max_ev_to_ebit: Some(15.0),
        max_pe_ratio: None,
    }
}

fn default_turnaround() -> StyleLimits {
    StyleLimits {
        max_net_debt_to_ebitda: Some(5.0),
        min_ebit_margin: None,
        max_ev_to_ebit: Some(12.0),
        max_pe_ratio: None,
    }
}

/// Per-style limits, one table per investment style.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StyleTable {
    #[serde(default = "default_quality_compounder")]
    pub quality_compounder: StyleLimits,
    #[serde(default = "default_garp_growth")]
    pub garp_growth: StyleLimits,
    #[serde(default = "default_special_situation")]
    pub special_situation: StyleLimits,
    #[serde(default = "default_turnaround")]
    pub turnaround: StyleLimits,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            quality_compounder: default_quality_compounder(),
            garp_growth: default_garp_growth(),
            special_situation: default_special_situation(),
            turnaround: default_turnaround(),
        }
    }
}

impl StyleTable {
    #[must_use]
    pub const fn limits_for(&self, style: InvestmentStyle) -> &StyleLimits {
        match style {
            InvestmentStyle::QualityCompounder => &self.quality_compounder,
            InvestmentStyle::GarpGrowth => &self.garp_growth,
            InvestmentStyle::SpecialSituation => &self.special_situation,
            InvestmentStyle::Turnaround => &self.turnaround,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatesConfig {
    #[serde(default = "default_min_hypothesis_chars")]
    pub min_hypothesis_chars: usize,

    #[serde(default = "default_min_mechanism_chars")]
    pub min_mechanism_chars: usize,

    #[serde(default = "default_min_signposts")]
    pub min_signposts: usize,

    #[serde(default = "default_min_catalysts")]
    pub min_catalysts: usize,

    /// Mechanism length / hypothesis length must exceed this.
    #[serde(default = "default_min_mechanism_ratio")]
    pub min_mechanism_ratio: f64,

    /// Edge tags accepted by the edge-claim gate.
    #[serde(default = "default_valid_edge_types")]
    pub valid_edge_types: Vec<String>,

    #[serde(default)]
    pub styles: StyleTable,
}

impl Default for GatesConfig {
    fn default() -> Self {
        Self {
            min_hypothesis_chars: default_min_hypothesis_chars(),
            min_mechanism_chars: default_min_mechanism_chars(),
            min_signposts: default_min_signposts(),
            min_catalysts: default_min_catalysts(),
            min_mechanism_ratio: default_min_mechanism_ratio(),
            valid_edge_types: default_valid_edge_types(),
            styles: StyleTable::default(),
        }
    }
}

impl GatesConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.valid_edge_types.is_empty() {
            return Err(ConfigError::invalid(
                "gates.valid_edge_types",
                "at least one edge type is required",
            ));
        }
        if self.min_mechanism_ratio < 0.0 {
            return Err(ConfigError::invalid(
                "gates.min_mechanism_ratio",
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_limits_resolve_per_style() {
        let config = GatesConfig::default();
        let turnaround = config.styles.limits_for(InvestmentStyle::Turnaround);
        assert_eq!(turnaround.max_net_debt_to_ebitda, Some(5.0));
        assert!(turnaround.min_ebit_margin.is_none());

        let compounder = config.styles.limits_for(InvestmentStyle::QualityCompounder);
        assert_eq!(compounder.min_ebit_margin, Some(0.15));
    }

    #[test]
    fn empty_edge_set_is_invalid() {
        let config = GatesConfig {
            valid_edge_types: vec![],
            ..GatesConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
