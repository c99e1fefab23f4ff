//! Schema migration runner.
//!
//! Embeds the SQL migration files at compile time. All statements use
//! `IF NOT EXISTS`, so running them again is a no-op.

use crate::error::CatalogError;

/// Catalog hierarchy, default-schema pointers, jobs, lineage, tasks.
const MIGRATION_001: &str = include_str!("../migrations/001_catalog.sql");

/// Run all embedded migrations in sequence on `conn`.
pub(crate) async fn run(conn: &libsql::Connection) -> Result<(), CatalogError> {
    conn.execute_batch(MIGRATION_001)
        .await
        .map_err(|e| CatalogError::Migration(format!("001_catalog: {e}")))?;
    Ok(())
}
