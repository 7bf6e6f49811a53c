use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use arc_config::ArcConfig;
use arc_db::ArcStore;
use arc_discovery::{LaneADeps, LaneAOrchestrator};
use arc_research::{LaneBDeps, LaneBOrchestrator, ProgressObserver};
use arc_telemetry::TelemetryStore;

use crate::adapters::{FileEnricher, FileResearch, FileUniverse, LogNotifier};

/// Shared application resources initialized once per invocation.
pub struct AppContext {
    pub config: ArcConfig,
    pub store: Arc<ArcStore>,
    pub telemetry: Arc<TelemetryStore>,
}

impl AppContext {
    pub async fn init(config: ArcConfig) -> anyhow::Result<Self> {
        let db_path = Path::new(&config.general.database_path);
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let store = ArcStore::open_local(&config.general.database_path)
            .await
            .with_context(|| format!("failed to open database {}", db_path.display()))?;

        let telemetry = if config.telemetry.enabled {
            TelemetryStore::open(&config.telemetry.trail_dir)
                .context("failed to open telemetry trail")?
        } else {
            TelemetryStore::in_memory()
        };

        Ok(Self {
            config,
            store: Arc::new(store),
            telemetry: Arc::new(telemetry),
        })
    }

    pub fn lane_a(&self, fixtures: &Path) -> LaneAOrchestrator {
        let deps = LaneADeps {
            universe: Arc::new(FileUniverse::new(fixtures)),
            novelty: self.store.clone(),
            enricher: Arc::new(FileEnricher::new(fixtures)),
            ideas: self.store.clone(),
            notifier: Arc::new(LogNotifier),
            ledger: self.store.clone(),
            telemetry: self.telemetry.clone(),
        };
        LaneAOrchestrator::new(deps, &self.config)
    }

    pub fn lane_b(&self, fixtures: &Path, progress: Arc<dyn ProgressObserver>) -> LaneBOrchestrator {
        let deps = LaneBDeps {
            ideas: self.store.clone(),
            research: Arc::new(FileResearch::new(fixtures)),
            packets: self.store.clone(),
            usage: self.store.clone(),
            notifier: Arc::new(LogNotifier),
            ledger: self.store.clone(),
            telemetry: self.telemetry.clone(),
        };
        LaneBOrchestrator::new(deps, &self.config, progress)
    }
}
