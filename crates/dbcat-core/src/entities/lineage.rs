use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Directed edge `source_id -> target_id` between two columns, produced by a
/// job execution.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ColumnLineage {
    pub id: i64,
    pub source_id: i64,
    pub target_id: i64,
    pub job_execution_id: i64,
    pub context: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
