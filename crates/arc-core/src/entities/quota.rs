use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::QuotaWindow;

/// Consumption against a hard cap for one calendar window.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuotaState {
    pub window: QuotaWindow,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub used: u32,
    pub cap: u32,
}

impl QuotaState {
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.cap.saturating_sub(self.used)
    }

    /// Whether `day` falls inside this window (inclusive on both ends).
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.period_start <= day && day <= self.period_end
    }
}

/// Read-only snapshot returned by a quota check.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuotaCheck {
    pub daily: QuotaState,
    pub weekly: QuotaState,
    /// Admissions already made today.
    pub used: u32,
    /// Admissions still possible right now (min of both windows).
    pub remaining: u32,
}

/// Result of an admission request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Admission {
    pub requested: u32,
    pub admitted: u32,
    /// Caps were bypassed by an explicit manual override.
    pub overridden: bool,
    pub daily_remaining: u32,
    pub weekly_remaining: u32,
    /// Why fewer than `requested` were admitted.
    pub limited_by: Option<QuotaWindow>,
}

impl Admission {
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.admitted == 0 && self.requested > 0
    }
}

/// Usage reported by the persistence layer for one window.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UsageSnapshot {
    pub used: u32,
    pub completed_ids: Vec<String>,
}
