//! Lane A (daily discovery) settings.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_top_n() -> usize {
    30
}

const fn default_notify() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LaneAConfig {
    /// Number of ranked, gated ideas published per run.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Send the published ideas to the notifier.
    #[serde(default = "default_notify")]
    pub notify: bool,
}

impl Default for LaneAConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            notify: default_notify(),
        }
    }
}

impl LaneAConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::invalid("lane_a.top_n", "must be positive"));
        }
        Ok(())
    }
}
