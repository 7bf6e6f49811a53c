use arc_core::entities::QuotaCheck;
use arc_research::QuotaManager;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::QuotaArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `arc quota`.
pub async fn handle(args: &QuotaArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let check = check(args, ctx).await?;
    output(&check, flags.format)
}

pub async fn check(args: &QuotaArgs, ctx: &AppContext) -> anyhow::Result<QuotaCheck> {
    let day = super::run_date(args.date);
    let quota = QuotaManager::new(ctx.config.quota.clone(), day);
    quota.load_usage(&*ctx.store, day).await?;
    Ok(quota.check_quota(day))
}
