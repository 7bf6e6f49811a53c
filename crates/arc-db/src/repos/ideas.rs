//! Idea cards. The full card is stored as JSON; `status` and `updated_at`
//! live in their own columns and win over the JSON copy on read.

use arc_core::entities::IdeaCard;
use arc_core::enums::IdeaStatus;
use arc_core::errors::AdapterError;
use arc_core::ports::IdeaStore;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::ArcStore;
use crate::error::DatabaseError;
use crate::helpers::{format_date, from_json, parse_datetime, parse_enum, to_json};

const CARD_COLUMNS: &str = "body, status, updated_at";

fn row_to_card(row: &libsql::Row) -> Result<IdeaCard, DatabaseError> {
    let mut card: IdeaCard = from_json(&row.get::<String>(0)?)?;
    card.status = parse_enum(&row.get::<String>(1)?)?;
    card.updated_at = parse_datetime(&row.get::<String>(2)?)?;
    Ok(card)
}

impl ArcStore {
    /// Insert cards in one transaction. Re-saving an existing id is an error.
    pub async fn insert_ideas(&self, cards: &[IdeaCard]) -> Result<(), DatabaseError> {
        let tx = self.conn.transaction().await?;
        for card in cards {
            tx.execute(
                "INSERT INTO idea_cards (id, ticker, run_date, status, rank_score, body, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                libsql::params![
                    card.id.as_str(),
                    card.ticker.as_str(),
                    format_date(card.run_date),
                    card.status.as_str(),
                    card.rank_score,
                    to_json(card)?,
                    card.created_at.to_rfc3339(),
                    card.updated_at.to_rfc3339()
                ],
            )
            .await?;
        }
        tx.commit().await?;
        tracing::debug!(count = cards.len(), "idea cards saved");
        Ok(())
    }

    pub async fn get_idea(&self, id: &str) -> Result<IdeaCard, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {CARD_COLUMNS} FROM idea_cards WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_card(&row)
    }

    async fn cards_where(
        &self,
        clause: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<IdeaCard>, DatabaseError> {
        let mut rows = self
            .conn
            .query(&format!("SELECT {CARD_COLUMNS} FROM idea_cards {clause}"), params)
            .await?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next().await? {
            cards.push(row_to_card(&row)?);
        }
        Ok(cards)
    }

    /// Move an idea to `next` if its state machine allows it. Setting the
    /// current status again is a no-op.
    pub async fn set_idea_status(&self, id: &str, next: IdeaStatus) -> Result<(), DatabaseError> {
        let current = self.get_idea(id).await?.status;
        if current == next {
            return Ok(());
        }
        if !current.can_transition_to(next) {
            return Err(DatabaseError::InvalidState(format!(
                "idea {id} cannot move from {current} to {next}"
            )));
        }
        self.conn
            .execute(
                "UPDATE idea_cards SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
                libsql::params![next.as_str(), Utc::now().to_rfc3339(), id, current.as_str()],
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl IdeaStore for ArcStore {
    async fn save_ideas(&self, cards: &[IdeaCard]) -> Result<(), AdapterError> {
        Ok(self.insert_ideas(cards).await?)
    }

    async fn promotable_ideas(&self) -> Result<Vec<IdeaCard>, AdapterError> {
        Ok(self
            .cards_where(
                "WHERE status = 'new' ORDER BY rank_score DESC, run_date DESC, id",
                (),
            )
            .await?)
    }

    async fn mark_promoted(&self, idea_id: &str) -> Result<(), AdapterError> {
        Ok(self.set_idea_status(idea_id, IdeaStatus::Promoted).await?)
    }

    async fn ideas_for_date(&self, run_date: NaiveDate) -> Result<Vec<IdeaCard>, AdapterError> {
        Ok(self
            .cards_where(
                "WHERE run_date = ?1 ORDER BY rank_score DESC, id",
                [format_date(run_date)],
            )
            .await?)
    }
}
