use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::fqdn::Fqdn;
use crate::pii::PiiType;

/// A column of a table, with its optional PII classification.
///
/// `pii_type` and `pii_plugin` are always written together.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Column {
    pub id: i64,
    pub table_id: i64,
    pub name: String,
    pub data_type: String,
    pub sort_order: i64,
    pub pii_type: Option<PiiType>,
    pub pii_plugin: Option<String>,
    pub source_name: String,
    pub schema_name: String,
    pub table_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Column {
    #[must_use]
    pub fn fqdn(&self) -> Fqdn {
        Fqdn::new([
            self.source_name.as_str(),
            self.schema_name.as_str(),
            self.table_name.as_str(),
            self.name.as_str(),
        ])
    }
}
