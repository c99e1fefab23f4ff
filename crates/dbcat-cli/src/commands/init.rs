use dbcat_config::StoreConfig;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `dbcat init`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.catalog.init_db().await?;
    let store = match &ctx.config.store {
        StoreConfig::Embedded(cfg) => json!({"kind": "embedded", "path": cfg.path}),
        StoreConfig::Networked(cfg) => json!({"kind": "networked", "url": cfg.url()}),
    };
    output(
        &json!({
            "app_dir": ctx.app_dir,
            "store": store,
            "initialized": true,
        }),
        flags.format,
    )
}
