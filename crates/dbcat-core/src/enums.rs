//! Source types and execution status enums for dbcat.
//!
//! All enums use `snake_case` serialization and expose `as_str()` for the
//! representation stored in SQL.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// SourceType
// ---------------------------------------------------------------------------

/// Kind of external data source registered in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Sqlite,
    Postgres,
    Mysql,
    Redshift,
    Bigquery,
    Glue,
    Snowflake,
    Athena,
    Oracle,
    Sqlserver,
}

impl SourceType {
    pub const ALL: [Self; 10] = [
        Self::Sqlite,
        Self::Postgres,
        Self::Mysql,
        Self::Redshift,
        Self::Bigquery,
        Self::Glue,
        Self::Snowflake,
        Self::Athena,
        Self::Oracle,
        Self::Sqlserver,
    ];

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Redshift => "redshift",
            Self::Bigquery => "bigquery",
            Self::Glue => "glue",
            Self::Snowflake => "snowflake",
            Self::Athena => "athena",
            Self::Oracle => "oracle",
            Self::Sqlserver => "sqlserver",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| CoreError::UnknownSourceType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// JobExecutionStatus
// ---------------------------------------------------------------------------

/// Outcome of a single job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobExecutionStatus {
    Success,
    Failure,
}

impl JobExecutionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for JobExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
