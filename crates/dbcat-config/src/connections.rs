//! Bulk connection lists.
//!
//! A connection list is a TOML file with one `[[connections]]` table per
//! source. Each table carries `name`, `source_type`, and the fields of that
//! source type; unknown fields are rejected.

use std::collections::HashSet;
use std::path::Path;

use dbcat_core::connection::SourceDefinition;
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionsFile {
    #[serde(default)]
    pub connections: Vec<SourceDefinition>,
}

impl ConnectionsFile {
    /// Read and parse a connection list from disk.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise the
    /// errors of [`ConnectionsFile::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse a connection list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML or invalid entries and
    /// `ConfigError::InvalidValue` when two entries share a name.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: Self = toml::from_str(text)?;
        let mut seen = HashSet::new();
        for def in &file.connections {
            if !seen.insert(def.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "connections.name".into(),
                    reason: format!("duplicate connection name '{}'", def.name),
                });
            }
        }
        Ok(file)
    }
}
