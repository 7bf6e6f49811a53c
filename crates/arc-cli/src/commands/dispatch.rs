use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Discover(args) => commands::discover::handle(&args, ctx, flags).await,
        Commands::Research(args) => commands::research::handle(&args, ctx, flags).await,
        Commands::Quota(args) => commands::quota::handle(&args, ctx, flags).await,
        Commands::History { action } => commands::history::handle(&action, ctx, flags).await,
        Commands::Telemetry(args) => commands::telemetry::handle(&args, ctx, flags),
        Commands::Select(_) | Commands::Schema(_) => {
            unreachable!("select/schema are pre-dispatched in main")
        }
    }
}
