//! Schema repository.

use dbcat_core::entities::{Schema, Source};

use crate::Catalog;
use crate::error::CatalogError;
use crate::helpers::{format_datetime, now, parse_datetime};

pub(crate) const SELECT_FROM: &str = "SELECT sc.id, sc.source_id, sc.name, s.name, sc.created_at, sc.updated_at
     FROM schemata sc
     JOIN sources s ON s.id = sc.source_id";

pub(crate) fn row_to_schema(row: &libsql::Row) -> Result<Schema, CatalogError> {
    Ok(Schema {
        id: row.get(0)?,
        source_id: row.get(1)?,
        name: row.get(2)?,
        source_name: row.get(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl Catalog {
    /// Add a schema under `source`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Conflict` if `source` already has a schema named
    /// `name`, `CatalogError::NotFound` if `source` was deleted.
    pub async fn add_schema(&self, name: &str, source: &Source) -> Result<Schema, CatalogError> {
        let session = self.session()?;
        if name.is_empty() {
            return Err(CatalogError::Invalid("schema name is empty".into()));
        }
        let now = now();
        let key = format!("{}.{name}", source.name);
        session
            .execute(
                "INSERT INTO schemata (source_id, name, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)",
                libsql::params![source.id, name, format_datetime(&now)],
            )
            .await
            .map_err(|e| CatalogError::from_write(e, "schema", &key))?;

        Ok(Schema {
            id: session.conn().last_insert_rowid(),
            source_id: source.id,
            name: name.to_string(),
            source_name: source.name.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Look up a schema by `(source_name, schema_name)`.
    pub async fn get_schema(&self, source_name: &str, name: &str) -> Result<Schema, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(
                &format!("{SELECT_FROM} WHERE s.name = ?1 AND sc.name = ?2"),
                libsql::params![source_name, name],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CatalogError::not_found("schema", format!("{source_name}.{name}")))?;
        row_to_schema(&row)
    }

    pub async fn get_schema_by_id(&self, id: i64) -> Result<Schema, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(&format!("{SELECT_FROM} WHERE sc.id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CatalogError::not_found("schema", format!("id {id}")))?;
        row_to_schema(&row)
    }

    /// Schemata of `source`, in insertion order.
    pub async fn get_schemata(&self, source: &Source) -> Result<Vec<Schema>, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(
                &format!("{SELECT_FROM} WHERE sc.source_id = ?1 ORDER BY sc.id"),
                [source.id],
            )
            .await?;
        let mut schemata = Vec::new();
        while let Some(row) = rows.next().await? {
            schemata.push(row_to_schema(&row)?);
        }
        Ok(schemata)
    }
}
