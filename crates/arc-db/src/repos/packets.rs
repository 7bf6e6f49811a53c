//! Append-only packet versions and decision briefs.

use arc_core::entities::{DecisionBrief, ResearchPacket};
use arc_core::errors::AdapterError;
use arc_core::ports::PacketStore;
use async_trait::async_trait;

use crate::ArcStore;
use crate::error::DatabaseError;
use crate::helpers::{from_json, get_opt_string, get_u32, parse_datetime, to_json};

const PACKET_COLUMNS: &str = "id, idea_id, version, previous_id, content, diff, created_at";

fn row_to_packet(row: &libsql::Row) -> Result<ResearchPacket, DatabaseError> {
    Ok(ResearchPacket {
        id: row.get::<String>(0)?,
        idea_id: row.get::<String>(1)?,
        version: get_u32(row, 2)?,
        previous_id: get_opt_string(row, 3)?,
        content: from_json(&row.get::<String>(4)?)?,
        diff: from_json(&row.get::<String>(5)?)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl ArcStore {
    /// Insert a packet version. `(idea_id, version)` is unique, so an
    /// existing version is never overwritten.
    pub async fn insert_packet(&self, packet: &ResearchPacket) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO research_packets (id, idea_id, version, previous_id, status, content, diff, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                libsql::params![
                    packet.id.as_str(),
                    packet.idea_id.as_str(),
                    i64::from(packet.version),
                    packet.previous_id.as_deref(),
                    packet.content.status.as_str(),
                    to_json(&packet.content)?,
                    to_json(&packet.diff)?,
                    packet.created_at.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| {
                DatabaseError::Query(format!(
                    "insert packet {} v{}: {e}",
                    packet.idea_id, packet.version
                ))
            })?;
        tracing::debug!(idea_id = %packet.idea_id, version = packet.version, "packet stored");
        Ok(())
    }

    async fn packets_for(
        &self,
        idea_id: &str,
        order: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ResearchPacket>, DatabaseError> {
        let limit = limit.map(|n| format!(" LIMIT {n}")).unwrap_or_default();
        let mut rows = self
            .conn
            .query(
                &format!(
                    "SELECT {PACKET_COLUMNS} FROM research_packets WHERE idea_id = ?1 ORDER BY version {order}{limit}"
                ),
                [idea_id],
            )
            .await?;
        let mut packets = Vec::new();
        while let Some(row) = rows.next().await? {
            packets.push(row_to_packet(&row)?);
        }
        Ok(packets)
    }

    pub async fn insert_brief(&self, brief: &DecisionBrief) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO decision_briefs (id, idea_id, packet_id, ticker, verdict, body, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    brief.id.as_str(),
                    brief.idea_id.as_str(),
                    brief.packet_id.as_str(),
                    brief.ticker.as_str(),
                    brief.verdict.as_str(),
                    to_json(brief)?,
                    brief.created_at.to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// Briefs for an idea, newest first.
    pub async fn briefs_for(&self, idea_id: &str) -> Result<Vec<DecisionBrief>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT body FROM decision_briefs WHERE idea_id = ?1 ORDER BY created_at DESC, id DESC",
                [idea_id],
            )
            .await?;
        let mut briefs = Vec::new();
        while let Some(row) = rows.next().await? {
            briefs.push(from_json(&row.get::<String>(0)?)?);
        }
        Ok(briefs)
    }
}

#[async_trait]
impl PacketStore for ArcStore {
    async fn latest_packet(&self, idea_id: &str) -> Result<Option<ResearchPacket>, AdapterError> {
        Ok(self.packets_for(idea_id, "DESC", Some(1)).await?.into_iter().next())
    }

    async fn save_packet(&self, packet: &ResearchPacket) -> Result<(), AdapterError> {
        Ok(self.insert_packet(packet).await?)
    }

    async fn save_brief(&self, brief: &DecisionBrief) -> Result<(), AdapterError> {
        Ok(self.insert_brief(brief).await?)
    }

    async fn packet_history(&self, idea_id: &str) -> Result<Vec<ResearchPacket>, AdapterError> {
        Ok(self.packets_for(idea_id, "ASC", None).await?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::repos::fixtures::{brief, packet};

    async fn store() -> ArcStore {
        ArcStore::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn no_packets_yet() {
        let store = store().await;
        assert_eq!(store.latest_packet("idea-1").await.unwrap(), None);
        assert!(store.packet_history("idea-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn latest_is_highest_version_and_history_is_ordered() {
        let store = store().await;
        let v1 = packet("idea-1", 1, None);
        let v2 = packet("idea-1", 2, Some(&v1.id));
        store.save_packet(&v1).await.unwrap();
        store.save_packet(&v2).await.unwrap();
        store.save_packet(&packet("idea-2", 1, None)).await.unwrap();

        assert_eq!(store.latest_packet("idea-1").await.unwrap(), Some(v2.clone()));
        let history = store.packet_history("idea-1").await.unwrap();
        assert_eq!(history, vec![v1, v2]);
    }

    #[tokio::test]
    async fn existing_version_is_never_overwritten() {
        let store = store().await;
        let original = packet("idea-1", 1, None);
        store.save_packet(&original).await.unwrap();

        let mut rewrite = packet("idea-1", 1, None);
        rewrite.id = "pkt-other".into();
        rewrite.content.confidence = 0.1;
        let err = store.save_packet(&rewrite).await.unwrap_err();
        assert!(err.to_string().contains("v1"));

        let stored = store.latest_packet("idea-1").await.unwrap().unwrap();
        assert!((stored.content.confidence - 0.7).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn brief_requires_stored_packet() {
        let store = store().await;
        let orphan = brief(&packet("idea-1", 1, None));
        assert!(store.save_brief(&orphan).await.is_err());
    }

    #[tokio::test]
    async fn briefs_round_trip() {
        let store = store().await;
        let v1 = packet("idea-1", 1, None);
        store.save_packet(&v1).await.unwrap();
        let b = brief(&v1);
        store.save_brief(&b).await.unwrap();
        assert_eq!(store.briefs_for("idea-1").await.unwrap(), vec![b]);
    }
}
