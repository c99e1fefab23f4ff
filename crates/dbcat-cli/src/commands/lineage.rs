use crate::cli::GlobalFlags;
use crate::cli::subcommands::LineageCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `dbcat lineage`.
pub async fn handle(
    action: LineageCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let catalog = &ctx.catalog;
    let LineageCommands::List { job } = action;
    let edges = catalog
        .managed_session(|| async {
            if job.is_empty() {
                return catalog.get_column_lineages(None).await;
            }
            let mut job_ids = Vec::with_capacity(job.len());
            for name in &job {
                job_ids.push(catalog.get_job(name).await?.id);
            }
            catalog.get_column_lineages(Some(job_ids.as_slice())).await
        })
        .await?;
    output(&edges, flags.format)
}
