use std::path::PathBuf;

use anyhow::Context;
use dbcat_config::CatalogConfig;
use dbcat_db::Catalog;

use crate::cli::GlobalFlags;

/// Everything a command handler needs: where the catalog lives and a handle
/// to it.
pub struct AppContext {
    pub app_dir: PathBuf,
    pub config: CatalogConfig,
    pub catalog: Catalog,
}

impl AppContext {
    /// Resolve the app dir, load layered config, and open the catalog.
    pub async fn init(flags: &GlobalFlags) -> anyhow::Result<Self> {
        let app_dir = match flags.app_dir.clone() {
            Some(dir) => dir,
            None => CatalogConfig::default_app_dir()
                .context("no platform config directory; pass --app-dir")?,
        };
        tracing::debug!(app_dir = %app_dir.display(), "resolved app directory");
        let config = CatalogConfig::load_with_dotenv(&app_dir)
            .with_context(|| format!("failed to load config from {}", app_dir.display()))?;
        if !app_dir.join(dbcat_config::CONFIG_FILE_NAME).exists() {
            tracing::debug!("no catalog.toml in app directory; using defaults and environment");
        }
        let catalog = dbcat_db::open_catalog(&config)
            .await
            .context("failed to open catalog")?;
        Ok(Self {
            app_dir,
            config,
            catalog,
        })
    }
}
