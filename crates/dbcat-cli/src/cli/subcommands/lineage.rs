use clap::Subcommand;

/// Lineage commands.
#[derive(Clone, Debug, Subcommand)]
pub enum LineageCommands {
    /// List lineage edges, optionally only those produced by the named jobs.
    List {
        /// Job name; repeat for several.
        #[arg(long)]
        job: Vec<String>,
    },
}
