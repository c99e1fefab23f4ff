use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::fqdn::Fqdn;

/// A namespace inside a source.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Schema {
    pub id: i64,
    pub source_id: i64,
    pub name: String,
    pub source_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schema {
    #[must_use]
    pub fn fqdn(&self) -> Fqdn {
        Fqdn::new([self.source_name.as_str(), self.name.as_str()])
    }
}
