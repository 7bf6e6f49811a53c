//! Ranking engine.
//!
//! Every sub-score is normalised onto 0..=1 with a fixed denominator, then
//! combined as a strict weighted sum. Novelty carries a large weight but only
//! orders the daily list; admission is decided by the gates alone.

use arc_config::{RankingConfig, RankingWeights, ScoreScale};
use arc_core::entities::{IdeaDraft, ScoreComponents};
use arc_core::errors::CoreError;

use crate::error::DiscoveryError;

#[derive(Debug, Clone)]
pub struct RankingEngine {
    weights: RankingWeights,
    scale: ScoreScale,
}

impl RankingEngine {
    #[must_use]
    pub const fn new(config: &RankingConfig) -> Self {
        Self {
            weights: config.weights,
            scale: config.scale,
        }
    }

    /// Weighted sum of the seven normalised components.
    #[must_use]
    pub fn rank_score(&self, components: &ScoreComponents, novelty_score: f64) -> f64 {
        let w = &self.weights;
        let s = &self.scale;
        w.edge_clarity * normalise(components.edge_clarity, s.edge_clarity)
            + w.business_quality * normalise(components.business_quality, s.business_quality)
            + w.financial_resilience
                * normalise(components.financial_resilience, s.financial_resilience)
            + w.valuation_tension * normalise(components.valuation_tension, s.valuation_tension)
            + w.catalyst_clarity * normalise(components.catalyst_clarity, s.catalyst_clarity)
            + w.information_integrity
                * normalise(components.information_integrity, s.information_integrity)
            + w.novelty * normalise(novelty_score, s.novelty)
    }

    /// Score and order gated drafts, best first. Ties break by ticker.
    ///
    /// Drafts without score components rank on novelty alone.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::Invariant` if a draft has no gate result set.
    pub fn rank(&self, mut drafts: Vec<IdeaDraft>) -> Result<Vec<IdeaDraft>, DiscoveryError> {
        for draft in &mut drafts {
            if draft.gate_results.is_none() {
                return Err(CoreError::Validation(format!(
                    "draft {} reached ranking without gate results",
                    draft.ticker
                ))
                .into());
            }
            let components = draft.score.unwrap_or_default();
            let novelty = draft.novelty.map_or(0.0, |n| n.score);
            draft.rank_score = Some(self.rank_score(&components, novelty));
        }
        drafts.sort_by(|a, b| {
            b.rank_score
                .unwrap_or_default()
                .total_cmp(&a.rank_score.unwrap_or_default())
                .then_with(|| a.ticker.cmp(&b.ticker))
        });
        Ok(drafts)
    }
}

fn normalise(value: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / denominator).clamp(0.0, 1.0)
}
