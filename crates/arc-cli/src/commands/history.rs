use arc_core::ports::{IdeaStore, PacketStore};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::HistoryCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `arc history`.
pub async fn handle(
    action: &HistoryCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let store = &*ctx.store;
    match action {
        HistoryCommands::Runs { limit } => {
            let limit = limit.unwrap_or(ctx.config.general.default_limit);
            output(&store.recent_runs(limit).await?, flags.format)
        }
        HistoryCommands::Ideas { date } => {
            let date = super::run_date(*date);
            output(&store.ideas_for_date(date).await?, flags.format)
        }
        HistoryCommands::Packets { idea_id } => {
            output(&store.packet_history(idea_id).await?, flags.format)
        }
        HistoryCommands::Briefs { idea_id } => {
            output(&store.briefs_for(idea_id).await?, flags.format)
        }
    }
}
