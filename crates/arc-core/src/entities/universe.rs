use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::NoveltyClass;

/// A tradable instrument supplied by the universe provider.
///
/// The `novelty` annotation is computed fresh on every discovery run and is
/// never persisted; history lives in the novelty state store.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct UniverseMember {
    pub ticker: String,
    pub name: String,
    pub region: String,
    pub sector: String,
    /// Market capitalisation in USD, when known.
    #[serde(default)]
    pub market_cap_usd: Option<f64>,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub novelty: Option<NoveltyAnnotation>,
}

/// Per-run novelty classification attached to a universe member.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NoveltyAnnotation {
    pub score: f64,
    pub class: NoveltyClass,
    pub is_exploration: bool,
}

/// Sighting history for one instrument, owned by the novelty state store.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NoveltyState {
    pub ticker: String,
    pub last_seen: NaiveDate,
    pub seen_count: u32,
    #[serde(default)]
    pub last_tags: Vec<String>,
}

impl NoveltyState {
    /// Whole days between the last sighting and `today` (never negative).
    #[must_use]
    pub fn days_since_seen(&self, today: NaiveDate) -> i64 {
        (today - self.last_seen).num_days().max(0)
    }
}

/// Context recorded alongside a sighting when a member is selected.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SeenContext {
    pub seen_on: NaiveDate,
    pub run_id: String,
    pub idea_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_since_seen_clamps_future_sightings() {
        let state = NoveltyState {
            ticker: "ACME".into(),
            last_seen: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            seen_count: 1,
            last_tags: vec![],
        };
        let earlier = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let later = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        assert_eq!(state.days_since_seen(earlier), 0);
        assert_eq!(state.days_since_seen(later), 10);
    }
}
