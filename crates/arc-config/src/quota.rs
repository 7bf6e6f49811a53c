//! Lane B admission caps.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_daily_cap() -> u32 {
    3
}

const fn default_weekly_cap() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuotaConfig {
    /// Ideas admitted to deep research per calendar day.
    #[serde(default = "default_daily_cap")]
    pub daily_cap: u32,

    /// Ideas admitted per Monday-Friday business week.
    #[serde(default = "default_weekly_cap")]
    pub weekly_cap: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_cap: default_daily_cap(),
            weekly_cap: default_weekly_cap(),
        }
    }
}

impl QuotaConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.daily_cap > self.weekly_cap {
            return Err(ConfigError::invalid(
                "quota.daily_cap",
                "must not exceed quota.weekly_cap",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_above_weekly_rejected() {
        let config = QuotaConfig {
            daily_cap: 20,
            weekly_cap: 10,
        };
        assert!(config.validate().is_err());
        assert!(QuotaConfig::default().validate().is_ok());
    }
}
