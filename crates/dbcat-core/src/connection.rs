//! Typed connection attributes for every supported source type.
//!
//! Each source type has a fixed attribute struct. Fields a type needs to be
//! usable at all are plain `String`s; everything else is optional. Unknown
//! fields are rejected at deserialization time, so a typo in a connection
//! list surfaces as an error naming the field instead of being dropped.
//!
//! `SourceConnection` is internally tagged by `source_type`, which makes the
//! stored JSON and the bulk definition format share one shape:
//!
//! ```toml
//! [[connections]]
//! name = "pg"
//! source_type = "postgres"
//! uri = "db.internal"
//! database = "analytics"
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SourceType;
use crate::errors::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SqliteConnection {
    pub path: String,
}

/// Attributes shared by the classic host/port relational engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RelationalConnection {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OracleConnection {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BigqueryConnection {
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<String>,
}

/// Glue sources are addressed through ambient AWS credentials only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GlueConnection {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SnowflakeConnection {
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AthenaConnection {
    pub region_name: String,
    pub s3_staging_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_access_key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_secret_access_key: Option<String>,
}

/// Connection attributes of a source, tagged by its `source_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "source_type", rename_all = "snake_case")]
pub enum SourceConnection {
    Sqlite(SqliteConnection),
    Postgres(RelationalConnection),
    Mysql(RelationalConnection),
    Redshift(RelationalConnection),
    Bigquery(BigqueryConnection),
    Glue(GlueConnection),
    Snowflake(SnowflakeConnection),
    Athena(AthenaConnection),
    Oracle(OracleConnection),
    Sqlserver(RelationalConnection),
}

impl SourceConnection {
    #[must_use]
    pub const fn source_type(&self) -> SourceType {
        match self {
            Self::Sqlite(_) => SourceType::Sqlite,
            Self::Postgres(_) => SourceType::Postgres,
            Self::Mysql(_) => SourceType::Mysql,
            Self::Redshift(_) => SourceType::Redshift,
            Self::Bigquery(_) => SourceType::Bigquery,
            Self::Glue(_) => SourceType::Glue,
            Self::Snowflake(_) => SourceType::Snowflake,
            Self::Athena(_) => SourceType::Athena,
            Self::Oracle(_) => SourceType::Oracle,
            Self::Sqlserver(_) => SourceType::Sqlserver,
        }
    }

    /// Username, when the source type carries one.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Postgres(c) | Self::Mysql(c) | Self::Redshift(c) | Self::Sqlserver(c) => {
                c.username.as_deref()
            }
            Self::Oracle(c) => c.username.as_deref(),
            Self::Bigquery(c) => c.username.as_deref(),
            Self::Snowflake(c) => c.username.as_deref(),
            Self::Sqlite(_) | Self::Glue(_) | Self::Athena(_) => None,
        }
    }

    /// Parse the JSON object stored in the catalog back into a typed value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the object does not match the
    /// attribute struct of its `source_type`.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value).map_err(|e| CoreError::Validation(e.to_string()))
    }

    /// Serialize to the JSON object stored in the catalog.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        // Every variant is a plain struct of strings; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// One entry of a bulk connection list: a source name plus its connection.
///
/// Deserialized from a flat map (`name`, `source_type`, type fields) so the
/// definition reads naturally in TOML or JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
#[serde(into = "serde_json::Map<String, serde_json::Value>")]
pub struct SourceDefinition {
    pub name: String,
    pub connection: SourceConnection,
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for SourceDefinition {
    type Error = CoreError;

    fn try_from(mut map: serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let name = match map.remove("name") {
            Some(serde_json::Value::String(name)) if !name.is_empty() => name,
            Some(_) => {
                return Err(CoreError::Validation(
                    "connection 'name' must be a non-empty string".into(),
                ));
            }
            None => {
                return Err(CoreError::Validation(
                    "connection is missing field 'name'".into(),
                ));
            }
        };
        let connection = SourceConnection::from_json(serde_json::Value::Object(map))
            .map_err(|e| CoreError::Validation(format!("connection '{name}': {e}")))?;
        Ok(Self { name, connection })
    }
}

impl From<SourceDefinition> for serde_json::Map<String, serde_json::Value> {
    fn from(def: SourceDefinition) -> Self {
        let mut map = match def.connection.to_json() {
            serde_json::Value::Object(map) => map,
            _ => Self::new(),
        };
        map.insert("name".into(), serde_json::Value::String(def.name));
        map
    }
}
