use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `dbcat task`.
pub async fn handle(
    action: TaskCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let catalog = &ctx.catalog;
    match action {
        TaskCommands::Add {
            app,
            status,
            message,
        } => {
            let task = catalog
                .managed_session(|| async {
                    catalog
                        .commit_scope(|| async { catalog.add_task(&app, status, &message).await })
                        .await
                })
                .await?;
            output(&task, flags.format)
        }
        TaskCommands::Latest { app } => {
            let task = catalog
                .managed_session(|| async { catalog.get_latest_task(&app).await })
                .await?;
            output(&task, flags.format)
        }
    }
}
