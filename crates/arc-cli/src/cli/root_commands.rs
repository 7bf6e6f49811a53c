use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run Lane A discovery for a date.
    Discover(DiscoverArgs),
    /// Run Lane B deep research on promoted ideas.
    Research(ResearchArgs),
    /// Show daily and weekly research quota.
    Quota(QuotaArgs),
    /// Select research tasks by value per cost within a budget.
    Select(SelectArgs),
    /// Inspect stored runs, ideas, packets, and briefs.
    History {
        #[command(subcommand)]
        action: HistoryCommands,
    },
    /// Aggregate task and run quality metrics.
    Telemetry(TelemetryArgs),
    /// Dump the JSON schema for an entity.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct FixtureArgs {
    /// Directory with universe, draft, and research fixture files.
    #[arg(long, default_value = ".arc/fixtures")]
    pub fixtures: String,
}

#[derive(Clone, Debug, Args)]
pub struct DiscoverArgs {
    /// Run date (YYYY-MM-DD). Defaults to today (UTC).
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[command(flatten)]
    pub fixtures: FixtureArgs,
}

#[derive(Clone, Debug, Args)]
pub struct ResearchArgs {
    /// Run date (YYYY-MM-DD). Defaults to today (UTC).
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Admit past the daily and weekly caps.
    #[arg(long)]
    pub force: bool,
    /// Research at most this many ideas.
    #[arg(long)]
    pub max: Option<u32>,
    /// Pick research tasks with the value/cost selector instead of the configured list.
    #[arg(long, conflicts_with = "tasks")]
    pub select: bool,
    /// Explicit comma-separated research task list.
    #[arg(long, value_delimiter = ',')]
    pub tasks: Option<Vec<String>>,
    #[command(flatten)]
    pub fixtures: FixtureArgs,
}

#[derive(Clone, Debug, Args)]
pub struct QuotaArgs {
    /// Day to check (YYYY-MM-DD). Defaults to today (UTC).
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Args)]
pub struct SelectArgs {
    /// Cost budget. Defaults to `selector.budget`.
    #[arg(long)]
    pub budget: Option<f64>,
    /// Only consider tasks of this stage as candidates.
    #[arg(long)]
    pub stage: Option<String>,
    /// Signal strength for signal-triggered tasks (0-1).
    #[arg(long, default_value_t = 0.0)]
    pub signal: f64,
    /// Unlock manual-only tasks.
    #[arg(long)]
    pub manual: bool,
    /// Allow experimental tasks.
    #[arg(long)]
    pub experimental: bool,
    /// Comma-separated task ids to exclude.
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum HistoryCommands {
    /// Recent Lane A and Lane B runs.
    Runs {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Idea cards selected on a date.
    Ideas {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Every packet version for an idea, oldest first.
    Packets { idea_id: String },
    /// Decision briefs for an idea, newest first.
    Briefs { idea_id: String },
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryArgs {
    /// List lane outcome records instead of aggregate metrics.
    #[arg(long)]
    pub outcomes: bool,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Entity name, e.g. `idea_card`, `research_packet`, `decision_brief`.
    pub entity: String,
}
