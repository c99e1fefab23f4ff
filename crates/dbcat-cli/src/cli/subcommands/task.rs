use clap::Subcommand;

/// Task commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Record a task for an application.
    Add {
        #[arg(long)]
        app: String,
        #[arg(long, default_value_t = 0)]
        status: i64,
        #[arg(long)]
        message: String,
    },
    /// Show the most recent task of an application.
    Latest {
        #[arg(long)]
        app: String,
    },
}
