use clap::Subcommand;

use crate::cli::subcommands::{
    ColumnCommands, LineageCommands, SchemaCommands, SourceCommands, TableCommands, TaskCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the catalog tables (idempotent).
    Init,
    /// Data sources.
    Source {
        #[command(subcommand)]
        action: SourceCommands,
    },
    /// Schemata.
    Schema {
        #[command(subcommand)]
        action: SchemaCommands,
    },
    /// Tables.
    Table {
        #[command(subcommand)]
        action: TableCommands,
    },
    /// Columns.
    Column {
        #[command(subcommand)]
        action: ColumnCommands,
    },
    /// Column lineage.
    Lineage {
        #[command(subcommand)]
        action: LineageCommands,
    },
    /// Application run records.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
}
