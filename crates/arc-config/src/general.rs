//! General application configuration.

use serde::{Deserialize, Serialize};

fn default_database_path() -> String {
    String::from(".arc/arc.db")
}

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Local libSQL database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            default_limit: default_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.database_path, ".arc/arc.db");
        assert_eq!(config.default_limit, 20);
    }
}
