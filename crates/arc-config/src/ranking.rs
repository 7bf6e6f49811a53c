//! Ranking weights and normalisation denominators.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Weights of the seven ranking components. Must sum to 1.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct RankingWeights {
    pub edge_clarity: f64,
    pub business_quality: f64,
    pub financial_resilience: f64,
    pub valuation_tension: f64,
    pub catalyst_clarity: f64,
    pub information_integrity: f64,
    pub novelty: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            edge_clarity: 0.15,
            business_quality: 0.10,
            financial_resilience: 0.10,
            valuation_tension: 0.10,
            catalyst_clarity: 0.05,
            information_integrity: 0.05,
            novelty: 0.45,
        }
    }
}

impl RankingWeights {
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.edge_clarity
            + self.business_quality
            + self.financial_resilience
            + self.valuation_tension
            + self.catalyst_clarity
            + self.information_integrity
            + self.novelty
    }

    fn all(&self) -> [f64; 7] {
        [
            self.edge_clarity,
            self.business_quality,
            self.financial_resilience,
            self.valuation_tension,
            self.catalyst_clarity,
            self.information_integrity,
            self.novelty,
        ]
    }
}

/// Fixed denominators mapping each raw sub-score onto 0..=1.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct ScoreScale {
    pub edge_clarity: f64,
    pub business_quality: f64,
    pub financial_resilience: f64,
    pub valuation_tension: f64,
    pub catalyst_clarity: f64,
    pub information_integrity: f64,
    pub novelty: f64,
}

impl Default for ScoreScale {
    fn default() -> Self {
        Self {
            edge_clarity: 5.0,
            business_quality: 5.0,
            financial_resilience: 5.0,
            valuation_tension: 5.0,
            catalyst_clarity: 5.0,
            information_integrity: 5.0,
            novelty: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub weights: RankingWeights,
    #[serde(default)]
    pub scale: ScoreScale,
}

impl RankingConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.weights.all().iter().any(|w| *w < 0.0) {
            return Err(ConfigError::invalid(
                "ranking.weights",
                "weights must be non-negative",
            ));
        }
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::invalid(
                "ranking.weights",
                format!("weights must sum to 1.0, got {sum:.4}"),
            ));
        }
        let scale = self.scale;
        let denominators = [
            scale.edge_clarity,
            scale.business_quality,
            scale.financial_resilience,
            scale.valuation_tension,
            scale.catalyst_clarity,
            scale.information_integrity,
            scale.novelty,
        ];
        if denominators.iter().any(|d| *d <= 0.0) {
            return Err(ConfigError::invalid(
                "ranking.scale",
                "denominators must be positive",
            ));
        }
        Ok(())
    }
}
