//! Column lineage repository.

use dbcat_core::entities::{Column, ColumnLineage};

use crate::Catalog;
use crate::error::CatalogError;
use crate::helpers::{format_datetime, now, parse_datetime, parse_json, placeholders};

const SELECT_COLS: &str =
    "cl.id, cl.source_id, cl.target_id, cl.job_execution_id, cl.context, cl.created_at, cl.updated_at";

fn row_to_lineage(row: &libsql::Row) -> Result<ColumnLineage, CatalogError> {
    Ok(ColumnLineage {
        id: row.get(0)?,
        source_id: row.get(1)?,
        target_id: row.get(2)?,
        job_execution_id: row.get(3)?,
        context: parse_json(&row.get::<String>(4)?)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl Catalog {
    /// Record that `source` feeds `target` in the given job execution.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Conflict` if the same edge was already recorded
    /// for that execution, `CatalogError::NotFound` if the execution or either
    /// column does not exist.
    pub async fn add_column_lineage(
        &self,
        source: &Column,
        target: &Column,
        job_execution_id: i64,
        context: serde_json::Value,
    ) -> Result<ColumnLineage, CatalogError> {
        let session = self.session()?;
        let now = now();
        let key = format!("{} -> {} (execution {job_execution_id})", source.fqdn(), target.fqdn());
        session
            .execute(
                "INSERT INTO column_lineage
                     (source_id, target_id, job_execution_id, context, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                libsql::params![
                    source.id,
                    target.id,
                    job_execution_id,
                    context.to_string(),
                    format_datetime(&now)
                ],
            )
            .await
            .map_err(|e| CatalogError::from_write(e, "column lineage", &key))?;

        Ok(ColumnLineage {
            id: session.conn().last_insert_rowid(),
            source_id: source.id,
            target_id: target.id,
            job_execution_id,
            context,
            created_at: now,
            updated_at: now,
        })
    }

    /// Lineage edges, oldest first.
    ///
    /// With `job_ids`, only edges produced by some execution of one of those
    /// jobs; `Some(&[])` yields nothing.
    pub async fn get_column_lineages(
        &self,
        job_ids: Option<&[i64]>,
    ) -> Result<Vec<ColumnLineage>, CatalogError> {
        let session = self.session()?;
        let (sql, params) = match job_ids {
            None => (
                format!("SELECT {SELECT_COLS} FROM column_lineage cl ORDER BY cl.id"),
                Vec::new(),
            ),
            Some([]) => return Ok(Vec::new()),
            Some(ids) => (
                format!(
                    "SELECT {SELECT_COLS} FROM column_lineage cl
                     JOIN job_executions je ON je.id = cl.job_execution_id
                     WHERE je.job_id IN ({})
                     ORDER BY cl.id",
                    placeholders(1, ids.len())
                ),
                ids.iter().map(|id| libsql::Value::from(*id)).collect::<Vec<_>>(),
            ),
        };
        let mut rows = session
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut edges = Vec::new();
        while let Some(row) = rows.next().await? {
            edges.push(row_to_lineage(&row)?);
        }
        Ok(edges)
    }

    /// Delete the listed edges; returns how many were removed.
    pub async fn delete_column_lineages(&self, ids: &[i64]) -> Result<u64, CatalogError> {
        let session = self.session()?;
        if ids.is_empty() {
            return Ok(0);
        }
        let params: Vec<libsql::Value> = ids.iter().map(|id| (*id).into()).collect();
        let affected = session
            .execute(
                &format!(
                    "DELETE FROM column_lineage WHERE id IN ({})",
                    placeholders(1, ids.len())
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        Ok(affected)
    }
}
