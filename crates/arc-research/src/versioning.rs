//! Immutable packet versioning.
//!
//! A new version never touches its predecessor: it gets a fresh id, the next
//! version number, a pointer back, and a field-level diff limited to the
//! configured top-level fields of [`PacketContent`].

use arc_core::entities::{FieldChange, PacketContent, ResearchPacket};
use arc_core::ids::{PREFIX_PACKET, generate_id};
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::ResearchError;

#[derive(Debug, Clone)]
pub struct PacketVersioner {
    diffable_fields: Vec<String>,
}

impl PacketVersioner {
    #[must_use]
    pub const fn new(diffable_fields: Vec<String>) -> Self {
        Self { diffable_fields }
    }

    /// Wrap `content` as the version after `previous` (or as version 1).
    ///
    /// # Errors
    ///
    /// Returns `ResearchError::VersionMismatch` when `previous` belongs to a
    /// different idea, and `ResearchError::Serialize` if either content
    /// cannot be represented as JSON.
    pub fn create_version(
        &self,
        content: PacketContent,
        previous: Option<&ResearchPacket>,
        now: DateTime<Utc>,
    ) -> Result<ResearchPacket, ResearchError> {
        let (version, previous_id, diff) = match previous {
            None => (1, None, Vec::new()),
            Some(prev) => {
                if prev.idea_id != content.idea_id {
                    return Err(ResearchError::VersionMismatch {
                        idea_id: content.idea_id,
                        previous_idea_id: prev.idea_id.clone(),
                    });
                }
                let diff = self.diff(&prev.content, &content)?;
                (prev.version + 1, Some(prev.id.clone()), diff)
            }
        };

        let packet = ResearchPacket {
            id: generate_id(PREFIX_PACKET),
            idea_id: content.idea_id.clone(),
            version,
            previous_id,
            content,
            diff,
            created_at: now,
        };
        tracing::debug!(
            idea_id = %packet.idea_id,
            version = packet.version,
            changed = packet.diff.len(),
            "packet version created"
        );
        Ok(packet)
    }

    /// Changed diffable fields, in configured order.
    ///
    /// # Errors
    ///
    /// Returns `ResearchError::Serialize` if either side cannot be serialized.
    pub fn diff(
        &self,
        before: &PacketContent,
        after: &PacketContent,
    ) -> Result<Vec<FieldChange>, ResearchError> {
        let before = serde_json::to_value(before)?;
        let after = serde_json::to_value(after)?;
        Ok(self
            .diffable_fields
            .iter()
            .filter_map(|field| {
                let old = before.get(field).cloned().unwrap_or(Value::Null);
                let new = after.get(field).cloned().unwrap_or(Value::Null);
                (old != new).then(|| FieldChange {
                    field: field.clone(),
                    before: old,
                    after: new,
                })
            })
            .collect())
    }
}
