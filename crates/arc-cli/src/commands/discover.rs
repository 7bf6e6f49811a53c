use std::path::Path;

use arc_core::enums::RunStatus;
use arc_discovery::LaneARunReport;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DiscoverArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `arc discover`.
pub async fn handle(args: &DiscoverArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = run(args, ctx).await;
    output(&report, flags.format)?;
    if report.status == RunStatus::Failed {
        anyhow::bail!(
            "discovery run {} failed: {}",
            report.run_id,
            report.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

pub async fn run(args: &DiscoverArgs, ctx: &AppContext) -> LaneARunReport {
    let date = super::run_date(args.date);
    let orchestrator = ctx.lane_a(Path::new(&args.fixtures.fixtures));
    orchestrator.run(date).await
}
