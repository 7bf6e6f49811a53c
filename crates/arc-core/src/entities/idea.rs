use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{
    Catalyst, GateResults, IdeaDraft, MetricsSnapshot, NoveltyAnnotation, RiskFlags,
    ScoreComponents,
};
use crate::enums::{IdeaStatus, InvestmentStyle};
use crate::errors::CoreError;

/// A selected idea: the persisted output of Lane A.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct IdeaCard {
    pub id: String,
    pub ticker: String,
    pub company_name: String,
    pub style: InvestmentStyle,
    pub hypothesis: String,
    pub mechanism: String,
    pub edge_types: Vec<String>,
    pub catalysts: Vec<Catalyst>,
    pub signposts: Vec<String>,
    pub metrics: MetricsSnapshot,
    pub risk_flags: RiskFlags,
    pub score: Option<ScoreComponents>,
    pub gate_results: GateResults,
    pub novelty: NoveltyAnnotation,
    pub rank_score: f64,
    pub status: IdeaStatus,
    pub run_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IdeaCard {
    /// Build a card from a fully annotated draft.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when the draft is missing its gate
    /// results, novelty annotation, or rank score.
    pub fn from_draft(
        draft: IdeaDraft,
        id: String,
        run_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let missing = |field: &str| {
            CoreError::Validation(format!("draft {} has no {field}", draft.ticker))
        };
        let gate_results = draft.gate_results.clone().ok_or_else(|| missing("gate results"))?;
        let novelty = draft.novelty.ok_or_else(|| missing("novelty annotation"))?;
        let rank_score = draft.rank_score.ok_or_else(|| missing("rank score"))?;

        Ok(Self {
            id,
            ticker: draft.ticker,
            company_name: draft.company_name,
            style: draft.style,
            hypothesis: draft.hypothesis,
            mechanism: draft.mechanism,
            edge_types: draft.edge_types,
            catalysts: draft.catalysts,
            signposts: draft.signposts,
            metrics: draft.metrics,
            risk_flags: draft.risk_flags,
            score: draft.score,
            gate_results,
            novelty,
            rank_score,
            status: IdeaStatus::New,
            run_date,
            created_at: now,
            updated_at: now,
        })
    }
}

/// The subset of an accepted idea needed to start deep research. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PromotedIdea {
    pub idea_id: String,
    pub ticker: String,
    pub company_name: String,
    pub style: InvestmentStyle,
    pub hypothesis: String,
    pub mechanism: String,
    pub edge_types: Vec<String>,
    pub catalysts: Vec<Catalyst>,
    pub signposts: Vec<String>,
    pub promoted_at: DateTime<Utc>,
}

impl PromotedIdea {
    #[must_use]
    pub fn from_card(card: &IdeaCard, promoted_at: DateTime<Utc>) -> Self {
        Self {
            idea_id: card.id.clone(),
            ticker: card.ticker.clone(),
            company_name: card.company_name.clone(),
            style: card.style,
            hypothesis: card.hypothesis.clone(),
            mechanism: card.mechanism.clone(),
            edge_types: card.edge_types.clone(),
            catalysts: card.catalysts.clone(),
            signposts: card.signposts.clone(),
            promoted_at,
        }
    }
}
