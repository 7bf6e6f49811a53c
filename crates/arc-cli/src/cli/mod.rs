use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `arc` binary.
#[derive(Debug, Parser)]
#[command(name = "arc", version, about = "ARC - investment idea discovery and research")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only, no progress bars)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra config file layered over the user and project config
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use clap::{CommandFactory, Parser};

    use super::root_commands::HistoryCommands;
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_and_after_subcommand() {
        let cli = Cli::try_parse_from(["arc", "--format", "table", "quota", "--verbose"])
            .expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Quota(_)));
    }

    #[test]
    fn research_flags() {
        let cli = Cli::try_parse_from([
            "arc", "research", "--date", "2026-06-03", "--force", "--max", "2", "--tasks",
            "valuation_analysis,risk_assessment",
        ])
        .expect("cli should parse");
        let Commands::Research(args) = cli.command else {
            panic!("expected research");
        };
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2026, 6, 3));
        assert!(args.force);
        assert_eq!(args.max, Some(2));
        assert_eq!(
            args.tasks,
            Some(vec!["valuation_analysis".to_string(), "risk_assessment".to_string()])
        );
        assert_eq!(args.fixtures.fixtures, ".arc/fixtures");
    }

    #[test]
    fn select_and_tasks_conflict() {
        let parsed = Cli::try_parse_from(["arc", "research", "--select", "--tasks", "a"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["arc", "discover", "--date", "June 3rd"]).is_err());
    }

    #[test]
    fn history_packets_takes_an_idea_id() {
        let cli = Cli::try_parse_from(["arc", "history", "packets", "idea-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::History {
                action: HistoryCommands::Packets { ref idea_id }
            } if idea_id == "idea-1"
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["arc", "--format", "xml", "quota"]).is_err());
    }
}
