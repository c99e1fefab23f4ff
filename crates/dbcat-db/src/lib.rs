//! # dbcat-db
//!
//! libSQL storage for the dbcat metadata catalog.
//!
//! A [`Catalog`] owns a database handle (an embedded file or a remote libSQL
//! server) and the [`PiiRegistry`] used to resolve stored PII tags. All
//! operations run inside an ambient session, see [`session`]:
//!
//! ```no_run
//! # async fn demo() -> Result<(), dbcat_db::CatalogError> {
//! use dbcat_config::CatalogConfig;
//!
//! let catalog = dbcat_db::open_catalog(&CatalogConfig::embedded("catalog.db", None)).await?;
//! catalog.init_db().await?;
//! catalog
//!     .managed_session(|| async {
//!         let sources = catalog.get_sources().await?;
//!         println!("{} sources", sources.len());
//!         Ok(())
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod session;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dbcat_config::{CatalogConfig, EmbeddedStoreConfig, NetworkedStoreConfig, StoreConfig};
use dbcat_core::pii::PiiRegistry;
use libsql::Builder;

pub use error::CatalogError;
pub use repos::column::ColumnFilter;
pub use session::Session;

static NEXT_CATALOG_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to one metadata catalog.
///
/// Cheap to share by reference; sessions open their own connections.
pub struct Catalog {
    id: u64,
    db: libsql::Database,
    pii: Arc<PiiRegistry>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog").field("id", &self.id).finish_non_exhaustive()
    }
}

impl Catalog {
    /// Open the store described by `config` with the built-in PII types.
    ///
    /// Does not create the schema; call [`init_db`](Self::init_db).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Config` for an unusable config, or
    /// `CatalogError::Store` if the database cannot be opened.
    pub async fn open(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Self::open_with_registry(config, PiiRegistry::with_builtins()).await
    }

    /// Like [`open`](Self::open), resolving PII tags through `registry`.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub async fn open_with_registry(
        config: &CatalogConfig,
        registry: PiiRegistry,
    ) -> Result<Self, CatalogError> {
        config.store.validate()?;
        let db = match &config.store {
            StoreConfig::Embedded(cfg) => open_embedded(cfg).await?,
            StoreConfig::Networked(cfg) => open_networked(cfg).await?,
        };
        let id = NEXT_CATALOG_ID.fetch_add(1, Ordering::Relaxed);
        tracing::info!(catalog = id, pii_types = registry.iter().count(), "catalog opened");
        Ok(Self {
            id,
            db,
            pii: Arc::new(registry),
        })
    }

    /// Create the catalog tables if they do not exist. Idempotent.
    ///
    /// Always runs on its own connection, so the tables persist even when
    /// called inside a session that is later rolled back.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Migration` if a statement fails.
    pub async fn init_db(&self) -> Result<(), CatalogError> {
        let conn = self.connect().await?;
        migrations::run(&conn).await?;
        tracing::info!(catalog = self.id, "catalog schema ready");
        Ok(())
    }

    /// Registry used to resolve stored PII tags.
    #[must_use]
    pub fn pii_registry(&self) -> &PiiRegistry {
        &self.pii
    }

    /// Fresh connection with foreign keys enforced.
    pub(crate) async fn connect(&self) -> Result<libsql::Connection, CatalogError> {
        let conn = self.db.connect()?;
        // Must be set per connection in SQLite
        conn.execute("PRAGMA foreign_keys = ON", ()).await?;
        Ok(conn)
    }
}

/// Open the store described by `config` with the built-in PII types.
///
/// # Errors
///
/// Same as [`Catalog::open`].
pub async fn open_catalog(config: &CatalogConfig) -> Result<Catalog, CatalogError> {
    Catalog::open(config).await
}

async fn open_embedded(cfg: &EmbeddedStoreConfig) -> Result<libsql::Database, CatalogError> {
    if let Some(parent) = cfg.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    tracing::debug!(path = %cfg.path.display(), encrypted = cfg.secret.is_some(), "opening embedded catalog");

    let builder = Builder::new_local(&cfg.path);

    #[cfg(feature = "encryption")]
    let builder = match cfg.secret.as_deref() {
        None => builder,
        Some("") => return Err(CatalogError::Invalid("encryption secret is empty".into())),
        Some(secret) => builder.encryption_config(libsql::EncryptionConfig::new(
            libsql::Cipher::Aes256Cbc,
            bytes::Bytes::copy_from_slice(secret.as_bytes()),
        )),
    };

    #[cfg(not(feature = "encryption"))]
    if cfg.secret.is_some() {
        return Err(CatalogError::Invalid(
            "embedded store secret requires the `encryption` feature".into(),
        ));
    }

    Ok(builder.build().await?)
}

async fn open_networked(cfg: &NetworkedStoreConfig) -> Result<libsql::Database, CatalogError> {
    let url = cfg.url();
    tracing::debug!(url = %url, user = cfg.user.as_deref().unwrap_or(""), "opening networked catalog");
    Ok(Builder::new_remote(url, cfg.auth_token()).build().await?)
}
