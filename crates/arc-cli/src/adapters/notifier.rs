use arc_core::entities::{DecisionBrief, IdeaCard};
use arc_core::errors::AdapterError;
use arc_core::ports::Notifier;
use async_trait::async_trait;

/// Delivers run output as structured log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_ideas(&self, cards: &[IdeaCard]) -> Result<(), AdapterError> {
        for card in cards {
            tracing::info!(
                idea_id = %card.id,
                ticker = %card.ticker,
                rank_score = card.rank_score,
                novelty = %card.novelty.class,
                "new idea"
            );
        }
        Ok(())
    }

    async fn notify_briefs(&self, briefs: &[DecisionBrief]) -> Result<(), AdapterError> {
        for brief in briefs {
            tracing::info!(
                idea_id = %brief.idea_id,
                ticker = %brief.ticker,
                verdict = %brief.verdict,
                max_position_pct = brief.sizing.max_position_pct,
                "decision brief"
            );
        }
        Ok(())
    }
}
