use std::path::Path;
use std::sync::Arc;

use arc_core::enums::RunStatus;
use arc_research::{CancelFlag, LaneBOptions, LaneBRunReport};
use arc_selector::{SelectionRequest, TaskCatalog, TaskSelector};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ResearchArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::BarObserver;

const RESEARCH_STAGE: &str = "research";

/// Handle `arc research`.
pub async fn handle(args: &ResearchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let cancel = CancelFlag::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, cancelling research run");
                cancel.cancel();
            }
        })
    };

    let report = run(args, ctx, cancel, Arc::new(BarObserver::new())).await;
    watcher.abort();
    let report = report?;

    output(&report, flags.format)?;
    if report.status == RunStatus::Failed {
        anyhow::bail!(
            "research run {} failed: {}",
            report.run_id,
            report.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

pub async fn run(
    args: &ResearchArgs,
    ctx: &AppContext,
    cancel: CancelFlag,
    progress: Arc<BarObserver>,
) -> anyhow::Result<LaneBRunReport> {
    let tasks = if args.select {
        Some(selected_tasks(ctx)?)
    } else {
        args.tasks.clone()
    };
    let options = LaneBOptions {
        force: args.force,
        max_ideas: args.max,
        tasks,
        cancel,
    };
    let orchestrator = ctx.lane_b(Path::new(&args.fixtures.fixtures), progress);
    Ok(orchestrator.run(super::run_date(args.date), &options).await)
}

/// Research tasks chosen by the value/cost selector, in execution order.
fn selected_tasks(ctx: &AppContext) -> anyhow::Result<Vec<String>> {
    let catalog = TaskCatalog::from_config(&ctx.config.selector)?;
    let request = SelectionRequest::from_config(&ctx.config.selector).with_stage(RESEARCH_STAGE);
    let selection = TaskSelector::new(&catalog).select(&request);
    for rejection in &selection.rejected {
        tracing::debug!(task = %rejection.task_id, reason = %rejection.reason, "task not selected");
    }
    if selection.selected.is_empty() {
        anyhow::bail!(
            "no research task fits budget {:.2}; raise selector.budget",
            request.budget
        );
    }
    tracing::info!(
        tasks = selection.selected.len(),
        cost = selection.total_cost,
        value = selection.total_value,
        "research tasks selected"
    );
    Ok(selection.ids())
}
