use std::path::Path;

use arc_config::ArcConfig;

use crate::cli::GlobalFlags;

/// Load configuration: `--config` layers an explicit file over the usual
/// sources, otherwise a project `.env` is read first.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<ArcConfig> {
    let config = match flags.config.as_deref() {
        Some(path) => ArcConfig::load_with_file(Path::new(path))?,
        None => ArcConfig::load_with_dotenv()?,
    };
    tracing::debug!(
        database = %config.general.database_path,
        telemetry = config.telemetry.enabled,
        "configuration loaded"
    );
    Ok(config)
}
