//! Backing store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default port of a libSQL server (`sqld`).
const fn default_port() -> u16 {
    8080
}

/// Which store backs the catalog.
///
/// Tagged by `kind` so a TOML file or `DBCAT_STORE__KIND` can switch variants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Single-file embedded store.
    Embedded(EmbeddedStoreConfig),
    /// Remote libSQL server.
    Networked(NetworkedStoreConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmbeddedStoreConfig {
    /// Path of the database file.
    pub path: PathBuf,

    /// At-rest encryption secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkedStoreConfig {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Server namespace holding the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Reported in diagnostics only; the server authenticates by token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Sent as the auth token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default)]
    pub tls: bool,
}

impl NetworkedStoreConfig {
    /// Server URL, with the namespace (if any) as the leading host label.
    #[must_use]
    pub fn url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        match self.database.as_deref() {
            Some(db) if !db.is_empty() => format!("{scheme}://{db}.{}:{}", self.host, self.port),
            _ => format!("{scheme}://{}:{}", self.host, self.port),
        }
    }

    #[must_use]
    pub fn auth_token(&self) -> String {
        self.password.clone().unwrap_or_default()
    }
}

impl StoreConfig {
    #[must_use]
    pub fn embedded(path: impl Into<PathBuf>) -> Self {
        Self::Embedded(EmbeddedStoreConfig {
            path: path.into(),
            secret: None,
        })
    }

    /// Check that the required fields of the selected variant are present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Embedded(cfg) if cfg.path.as_os_str().is_empty() => {
                Err(ConfigError::InvalidValue {
                    field: "store.path".into(),
                    reason: "embedded store needs a file path".into(),
                })
            }
            Self::Networked(cfg) if cfg.host.is_empty() => Err(ConfigError::InvalidValue {
                field: "store.host".into(),
                reason: "networked store needs a host".into(),
            }),
            Self::Networked(cfg) if cfg.port == 0 => Err(ConfigError::InvalidValue {
                field: "store.port".into(),
                reason: "port must be non-zero".into(),
            }),
            _ => Ok(()),
        }
    }
}
