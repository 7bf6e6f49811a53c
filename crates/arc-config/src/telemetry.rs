//! Telemetry trail settings.

use serde::{Deserialize, Serialize};

const fn default_enabled() -> bool {
    true
}

fn default_trail_dir() -> String {
    String::from(".arc/trail")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    /// Append telemetry and outcome records to JSONL files.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Directory holding `telemetry.jsonl` and `outcomes.jsonl`.
    #[serde(default = "default_trail_dir")]
    pub trail_dir: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            trail_dir: default_trail_dir(),
        }
    }
}
