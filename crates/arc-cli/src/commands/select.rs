use arc_config::ArcConfig;
use arc_selector::{Selection, SelectionRequest, TaskCatalog, TaskSelector};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SelectArgs;
use crate::output::output;

/// Handle `arc select`. Needs configuration but no database.
pub fn handle(args: &SelectArgs, config: &ArcConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let selection = run(args, config)?;
    output(&selection, flags.format)
}

pub fn run(args: &SelectArgs, config: &ArcConfig) -> anyhow::Result<Selection> {
    let catalog = TaskCatalog::from_config(&config.selector)?;
    let mut request = SelectionRequest::from_config(&config.selector).excluding(&args.exclude);
    if let Some(budget) = args.budget {
        anyhow::ensure!(budget.is_finite() && budget >= 0.0, "--budget must be a non-negative number");
        request.budget = budget;
    }
    if let Some(stage) = &args.stage {
        request = request.with_stage(stage);
    }
    request.signal = args.signal;
    request.manual = args.manual;
    request.allow_experimental |= args.experimental;
    Ok(TaskSelector::new(&catalog).select(&request))
}
