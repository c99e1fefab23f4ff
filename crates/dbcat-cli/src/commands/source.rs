use anyhow::Context;
use dbcat_config::ConnectionsFile;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SourceCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `dbcat source`.
pub async fn handle(
    action: SourceCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let catalog = &ctx.catalog;
    match action {
        SourceCommands::Add { file } => {
            let list = ConnectionsFile::load(&file)
                .with_context(|| format!("failed to read connections from {}", file.display()))?;
            let added = catalog
                .managed_session(|| async {
                    catalog
                        .commit_scope(|| async { catalog.add_sources(list.connections).await })
                        .await
                })
                .await?;
            output(&added, flags.format)
        }
        SourceCommands::List => {
            let sources = catalog
                .managed_session(|| async { catalog.get_sources().await })
                .await?;
            output(&sources, flags.format)
        }
        SourceCommands::Search { pattern } => {
            let sources = catalog
                .managed_session(|| async { catalog.search_sources(&pattern).await })
                .await?;
            output(&sources, flags.format)
        }
    }
}
