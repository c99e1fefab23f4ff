use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::fqdn::Fqdn;

/// A table (or view) inside a schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Table {
    pub id: i64,
    pub schema_id: i64,
    pub name: String,
    pub source_name: String,
    pub schema_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Table {
    #[must_use]
    pub fn fqdn(&self) -> Fqdn {
        Fqdn::new([
            self.source_name.as_str(),
            self.schema_name.as_str(),
            self.name.as_str(),
        ])
    }
}
