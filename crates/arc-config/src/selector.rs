//! Task selector budget and catalog location.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_budget() -> f64 {
    6.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectorConfig {
    /// Ceiling on the summed `expected_cost_score` of a selection.
    #[serde(default = "default_budget")]
    pub budget: f64,

    /// Allow `experimental` tasks to be selected.
    #[serde(default)]
    pub allow_experimental: bool,

    /// Custom catalog file (TOML or JSON). Empty means the built-in catalog.
    #[serde(default)]
    pub catalog_path: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            allow_experimental: false,
            catalog_path: String::new(),
        }
    }
}

impl SelectorConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(ConfigError::invalid(
                "selector.budget",
                "must be a finite, non-negative number",
            ));
        }
        Ok(())
    }
}
