use crate::cli::GlobalFlags;
use crate::cli::root_commands::TelemetryArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `arc telemetry`.
pub fn handle(args: &TelemetryArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if ctx.telemetry.trail_dir().is_none() {
        tracing::warn!("telemetry.enabled is false; only this process's records are visible");
    }
    if args.outcomes {
        output(&ctx.telemetry.outcomes(), flags.format)
    } else {
        output(&ctx.telemetry.quality_metrics(), flags.format)
    }
}
