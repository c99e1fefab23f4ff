use clap::{Args, Subcommand};

/// LIKE-pattern search below the source level.
#[derive(Clone, Debug, Args)]
pub struct SearchArgs {
    /// Pattern for the object's own name (`%` any run, `_` one char).
    pub pattern: String,
    /// Restrict to sources matching this pattern.
    #[arg(long)]
    pub source: Option<String>,
    /// Restrict to schemata matching this pattern.
    #[arg(long)]
    pub schema: Option<String>,
    /// Restrict to tables matching this pattern (column search only).
    #[arg(long)]
    pub table: Option<String>,
    /// Require exactly one match.
    #[arg(long)]
    pub resolve: bool,
}

/// Schema commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SchemaCommands {
    /// Find schemata by LIKE pattern.
    Search(SearchArgs),
}

/// Table commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TableCommands {
    /// Find tables by LIKE pattern.
    Search(SearchArgs),
}

/// Column commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ColumnCommands {
    /// Find columns by LIKE pattern.
    Search(SearchArgs),
}

impl SchemaCommands {
    #[must_use]
    pub fn into_search(self) -> SearchArgs {
        let Self::Search(args) = self;
        args
    }
}

impl TableCommands {
    #[must_use]
    pub fn into_search(self) -> SearchArgs {
        let Self::Search(args) = self;
        args
    }
}

impl ColumnCommands {
    #[must_use]
    pub fn into_search(self) -> SearchArgs {
        let Self::Search(args) = self;
        args
    }
}
