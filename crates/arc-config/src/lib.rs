//! # arc-config
//!
//! Layered configuration loading for ARC using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ARC_*` prefix, `__` as separator)
//! 2. An explicit file passed with `--config`
//! 3. Project-level `.arc/config.toml`
//! 4. User-level `~/.config/arc/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ARC_QUOTA__DAILY_CAP` -> `quota.daily_cap`,
//! `ARC_NOVELTY__SHORTLIST_SIZE` -> `novelty.shortlist_size`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use arc_config::ArcConfig;
//!
//! let config = ArcConfig::load_with_dotenv().expect("config");
//! println!("daily cap: {}", config.quota.daily_cap);
//! ```

mod error;
mod gates;
mod general;
mod lane_a;
mod novelty;
mod quota;
mod ranking;
mod research;
mod selector;
mod telemetry;

pub use error::ConfigError;
pub use gates::{GatesConfig, StyleLimits, StyleTable};
pub use general::GeneralConfig;
pub use lane_a::LaneAConfig;
pub use novelty::NoveltyConfig;
pub use quota::QuotaConfig;
pub use ranking::{RankingConfig, RankingWeights, ScoreScale};
pub use research::ResearchConfig;
pub use selector::SelectorConfig;
pub use telemetry::TelemetryConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ArcConfig {
    #[serde(default)]
    pub novelty: NoveltyConfig,
    #[serde(default)]
    pub gates: GatesConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub lane_a: LaneAConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default)]
    pub research: ResearchConfig,
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl ArcConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Load configuration with an extra TOML file layered above the project
    /// file and below the environment.
    pub fn load_with_file(path: &Path) -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::from_figment(&Self::figment_with(Some(path)))
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        Self::figment_with(None)
    }

    fn figment_with(extra: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".arc/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Explicit file
        if let Some(path) = extra {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("ARC_").split("__"))
    }

    /// Extract from a figment and validate.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject internally inconsistent values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.novelty.validate()?;
        self.gates.validate()?;
        self.ranking.validate()?;
        self.lane_a.validate()?;
        self.quota.validate()?;
        self.research.validate()?;
        self.selector.validate()?;
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("arc").join("config.toml"))
    }

    /// Load `.env` from the workspace root, falling back to the current
    /// directory. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ArcConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.research.concurrency, 3);
        assert_eq!(config.lane_a.top_n, 30);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config = ArcConfig::from_figment(&ArcConfig::figment())
                .map_err(|e| e.to_string())?;
            assert_eq!(config.general.default_limit, 20);
            assert_eq!(config.quota.daily_cap, 3);
            Ok(())
        });
    }
}
