use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::connection::SourceConnection;
use crate::enums::SourceType;
use crate::fqdn::Fqdn;

/// A registered data source (database, warehouse, metastore).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Source {
    pub id: i64,
    pub name: String,
    pub connection: SourceConnection,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Source {
    #[must_use]
    pub const fn source_type(&self) -> SourceType {
        self.connection.source_type()
    }

    #[must_use]
    pub fn fqdn(&self) -> Fqdn {
        Fqdn::new([self.name.as_str()])
    }
}

/// Pointer from a source to the schema used when none is named.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DefaultSchema {
    pub source_id: i64,
    pub schema_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
