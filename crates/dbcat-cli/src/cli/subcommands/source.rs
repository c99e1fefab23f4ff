use std::path::PathBuf;

use clap::Subcommand;

/// Source commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SourceCommands {
    /// Register every source in a TOML connection list.
    Add {
        /// File with one `[[connections]]` table per source.
        #[arg(long)]
        file: PathBuf,
    },
    /// List registered sources.
    List,
    /// Find sources by LIKE pattern.
    Search { pattern: String },
}
