use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `dbcat` binary.
#[derive(Debug, Parser)]
#[command(name = "dbcat", version, about = "dbcat - metadata catalog for data sources")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding catalog.toml and the embedded catalog
    #[arg(long, global = true)]
    pub app_dir: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            app_dir: self.app_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};

    use super::subcommands::{SearchArgs, SourceCommands, TaskCommands};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "dbcat",
            "--format",
            "raw",
            "--app-dir",
            "/tmp/dbcat",
            "--verbose",
            "source",
            "list",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert_eq!(cli.global_flags().app_dir.as_deref(), Some(Path::new("/tmp/dbcat")));
        assert!(matches!(
            cli.command,
            Commands::Source {
                action: SourceCommands::List
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["dbcat", "init", "--quiet", "--format", "json"])
            .expect("cli should parse");
        assert!(cli.quiet);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Init));
    }

    #[test]
    fn output_format_rejects_table() {
        assert!(Cli::try_parse_from(["dbcat", "--format", "table", "init"]).is_err());
    }

    #[test]
    fn table_search_with_ancestors_and_resolve() {
        let cli = Cli::try_parse_from([
            "dbcat",
            "table",
            "search",
            "page%",
            "--source",
            "test",
            "--schema",
            "def%",
            "--resolve",
        ])
        .expect("cli should parse");

        let Commands::Table { action } = cli.command else {
            panic!("expected table command");
        };
        let SearchArgs {
            pattern,
            source,
            schema,
            table,
            resolve,
        } = action.into_search();
        assert_eq!(pattern, "page%");
        assert_eq!(source.as_deref(), Some("test"));
        assert_eq!(schema.as_deref(), Some("def%"));
        assert_eq!(table, None);
        assert!(resolve);
    }

    #[test]
    fn task_add_requires_app_and_message() {
        assert!(Cli::try_parse_from(["dbcat", "task", "add", "--app", "piicatcher"]).is_err());

        let cli = Cli::try_parse_from([
            "dbcat",
            "task",
            "add",
            "--app",
            "piicatcher",
            "--status",
            "1",
            "--message",
            "Database scanned",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Task {
                action: TaskCommands::Add { status: 1, .. }
            }
        ));
    }

    #[test]
    fn lineage_list_accepts_repeated_jobs() {
        let cli = Cli::try_parse_from([
            "dbcat", "lineage", "list", "--job", "a", "--job", "b",
        ])
        .expect("cli should parse");
        let Commands::Lineage { action } = cli.command else {
            panic!("expected lineage command");
        };
        let super::subcommands::LineageCommands::List { job } = action;
        assert_eq!(job, vec!["a".to_string(), "b".to_string()]);
    }
}
