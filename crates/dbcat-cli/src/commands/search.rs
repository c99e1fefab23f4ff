use crate::cli::GlobalFlags;
use crate::cli::subcommands::SearchArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `dbcat schema search`.
pub async fn handle_schema(
    args: &SearchArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let catalog = &ctx.catalog;
    let schemata = catalog
        .managed_session(|| async {
            catalog
                .search_schema(args.source.as_deref(), &args.pattern)
                .await
        })
        .await?;
    if args.resolve {
        match schemata.as_slice() {
            [one] => return output(one, flags.format),
            [] => anyhow::bail!("no schema matches '{}'", args.pattern),
            many => anyhow::bail!(
                "ambiguous schema pattern '{}': {} matches",
                args.pattern,
                many.len()
            ),
        }
    }
    output(&schemata, flags.format)
}

/// Handle `dbcat table search`.
pub async fn handle_table(
    args: &SearchArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let catalog = &ctx.catalog;
    let (source, schema) = (args.source.as_deref(), args.schema.as_deref());
    if args.resolve {
        let table = catalog
            .managed_session(|| async { catalog.search_table(source, schema, &args.pattern).await })
            .await?;
        return output(&table, flags.format);
    }
    let tables = catalog
        .managed_session(|| async { catalog.search_tables(source, schema, &args.pattern).await })
        .await?;
    output(&tables, flags.format)
}

/// Handle `dbcat column search`.
pub async fn handle_column(
    args: &SearchArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let catalog = &ctx.catalog;
    let (source, schema, table) = (
        args.source.as_deref(),
        args.schema.as_deref(),
        args.table.as_deref(),
    );
    if args.resolve {
        let column = catalog
            .managed_session(|| async {
                catalog
                    .search_column(source, schema, table, &args.pattern)
                    .await
            })
            .await?;
        return output(&column, flags.format);
    }
    let columns = catalog
        .managed_session(|| async {
            catalog
                .search_columns(source, schema, table, &args.pattern)
                .await
        })
        .await?;
    output(&columns, flags.format)
}
