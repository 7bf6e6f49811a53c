//! Novelty shortlist configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_shortlist_size() -> usize {
    120
}

const fn default_exploration_fraction() -> f64 {
    0.10
}

const fn default_new_threshold_days() -> i64 {
    90
}

const fn default_penalty_threshold_days() -> i64 {
    30
}

const fn default_unseen_score() -> f64 {
    1.0
}

const fn default_new_score() -> f64 {
    0.9
}

const fn default_reappearance_min_score() -> f64 {
    0.4
}

const fn default_reappearance_max_score() -> f64 {
    0.8
}

const fn default_repeat_min_score() -> f64 {
    0.05
}

const fn default_repeat_max_score() -> f64 {
    0.3
}

const fn default_repeat_penalty() -> f64 {
    0.1
}

const fn default_max_repeat_count() -> u32 {
    3
}

const fn default_min_score() -> f64 {
    0.01
}

/// Thresholds and scores for NEW / REAPPEARANCE / REPEAT classification.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NoveltyConfig {
    /// Shortlist size `K`, exploration slots included.
    #[serde(default = "default_shortlist_size")]
    pub shortlist_size: usize,

    /// Fraction `e` of `K` reserved for uniform random exploration.
    #[serde(default = "default_exploration_fraction")]
    pub exploration_fraction: f64,

    /// Days since last sighting at which a member counts as NEW again.
    #[serde(default = "default_new_threshold_days")]
    pub new_threshold_days: i64,

    /// Days since last sighting below which a member is a REPEAT.
    #[serde(default = "default_penalty_threshold_days")]
    pub penalty_threshold_days: i64,

    /// Score of a member with no sighting history.
    #[serde(default = "default_unseen_score")]
    pub unseen_score: f64,

    /// Score of a member seen long enough ago to be NEW again.
    #[serde(default = "default_new_score")]
    pub new_score: f64,

    /// REAPPEARANCE score at `penalty_threshold_days`.
    #[serde(default = "default_reappearance_min_score")]
    pub reappearance_min_score: f64,

    /// REAPPEARANCE score approaching `new_threshold_days`.
    #[serde(default = "default_reappearance_max_score")]
    pub reappearance_max_score: f64,

    /// REPEAT score for a member seen today.
    #[serde(default = "default_repeat_min_score")]
    pub repeat_min_score: f64,

    /// REPEAT score approaching `penalty_threshold_days`.
    #[serde(default = "default_repeat_max_score")]
    pub repeat_max_score: f64,

    /// Extra penalty for REPEAT members seen more than `max_repeat_count` times.
    #[serde(default = "default_repeat_penalty")]
    pub repeat_penalty: f64,

    #[serde(default = "default_max_repeat_count")]
    pub max_repeat_count: u32,

    /// Floor applied to every novelty score.
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Fixed seed for exploration sampling. Unset means fresh entropy per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for NoveltyConfig {
    fn default() -> Self {
        Self {
            shortlist_size: default_shortlist_size(),
            exploration_fraction: default_exploration_fraction(),
            new_threshold_days: default_new_threshold_days(),
            penalty_threshold_days: default_penalty_threshold_days(),
            unseen_score: default_unseen_score(),
            new_score: default_new_score(),
            reappearance_min_score: default_reappearance_min_score(),
            reappearance_max_score: default_reappearance_max_score(),
            repeat_min_score: default_repeat_min_score(),
            repeat_max_score: default_repeat_max_score(),
            repeat_penalty: default_repeat_penalty(),
            max_repeat_count: default_max_repeat_count(),
            min_score: default_min_score(),
            seed: None,
        }
    }
}

impl NoveltyConfig {
    /// Number of exploration slots, `round(K * e)`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn exploration_slots(&self) -> usize {
        (self.shortlist_size as f64 * self.exploration_fraction).round() as usize
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.exploration_fraction) {
            return Err(ConfigError::invalid(
                "novelty.exploration_fraction",
                "must be in [0, 1)",
            ));
        }
        if self.penalty_threshold_days < 0 || self.penalty_threshold_days >= self.new_threshold_days {
            return Err(ConfigError::invalid(
                "novelty.penalty_threshold_days",
                "must be non-negative and below novelty.new_threshold_days",
            ));
        }
        if self.repeat_min_score > self.repeat_max_score {
            return Err(ConfigError::invalid(
                "novelty.repeat_min_score",
                "must not exceed novelty.repeat_max_score",
            ));
        }
        if self.reappearance_min_score > self.reappearance_max_score {
            return Err(ConfigError::invalid(
                "novelty.reappearance_min_score",
                "must not exceed novelty.reappearance_max_score",
            ));
        }
        if self.min_score < 0.0 || self.min_score > self.unseen_score {
            return Err(ConfigError::invalid(
                "novelty.min_score",
                "must be between 0 and novelty.unseen_score",
            ));
        }
        Ok(())
    }
}
