//! # dbcat-config
//!
//! Layered configuration loading for dbcat using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DBCAT_*` prefix, `__` as separator)
//! 2. `<app_dir>/catalog.toml`
//! 3. Built-in defaults: an embedded store at `<app_dir>/catalog.db`
//!
//! # Environment Variable Mapping
//!
//! `DBCAT_STORE__KIND=networked` -> `store.kind`, `DBCAT_STORE__HOST` ->
//! `store.host`, and so on.
//!
//! # Usage
//!
//! ```no_run
//! use dbcat_config::CatalogConfig;
//!
//! let app_dir = CatalogConfig::default_app_dir().expect("config dir");
//! let config = CatalogConfig::load(&app_dir).expect("config");
//! println!("{:?}", config.store);
//! ```

mod connections;
mod error;
mod store;

pub use connections::ConnectionsFile;
pub use error::ConfigError;
pub use store::{EmbeddedStoreConfig, NetworkedStoreConfig, StoreConfig};

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// File name of the embedded catalog inside the app directory.
pub const DB_FILE_NAME: &str = "catalog.db";

/// File name of the optional config file inside the app directory.
pub const CONFIG_FILE_NAME: &str = "catalog.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogConfig {
    pub store: StoreConfig,
}

impl CatalogConfig {
    /// Defaults for an app directory: embedded store at `<app_dir>/catalog.db`.
    #[must_use]
    pub fn for_app_dir(app_dir: &Path) -> Self {
        Self {
            store: StoreConfig::embedded(app_dir.join(DB_FILE_NAME)),
        }
    }

    /// Embedded store at `path`, optionally encrypted with `secret`.
    #[must_use]
    pub fn embedded(path: impl Into<PathBuf>, secret: Option<String>) -> Self {
        Self {
            store: StoreConfig::Embedded(EmbeddedStoreConfig {
                path: path.into(),
                secret,
            }),
        }
    }

    /// Load configuration for `app_dir` from all sources.
    ///
    /// Does NOT call `dotenvy` -- use [`load_with_dotenv`](Self::load_with_dotenv)
    /// if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or merged,
    /// or `ConfigError::InvalidValue` if the resulting store config is unusable.
    pub fn load(app_dir: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(app_dir).extract()?;
        config.store.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_with_dotenv(app_dir: &Path) -> Result<Self, ConfigError> {
        let _ = dotenvy::from_path(app_dir.join(".env"));
        let _ = dotenvy::dotenv();
        Self::load(app_dir)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers.
    #[must_use]
    pub fn figment(app_dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::for_app_dir(app_dir)));

        let file = app_dir.join(CONFIG_FILE_NAME);
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }

        figment.merge(Env::prefixed("DBCAT_").split("__"))
    }

    /// Platform config directory joined with `dbcat`.
    #[must_use]
    pub fn default_app_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dbcat"))
    }
}
