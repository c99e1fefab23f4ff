use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Init => commands::init::handle(ctx, flags).await,
        Commands::Source { action } => commands::source::handle(action, ctx, flags).await,
        Commands::Schema { action } => {
            commands::search::handle_schema(&action.into_search(), ctx, flags).await
        }
        Commands::Table { action } => {
            commands::search::handle_table(&action.into_search(), ctx, flags).await
        }
        Commands::Column { action } => {
            commands::search::handle_column(&action.into_search(), ctx, flags).await
        }
        Commands::Lineage { action } => commands::lineage::handle(action, ctx, flags).await,
        Commands::Task { action } => commands::task::handle(action, ctx, flags).await,
    }
}
