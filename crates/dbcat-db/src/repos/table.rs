//! Table repository.

use dbcat_core::entities::{Schema, Table};

use crate::Catalog;
use crate::error::CatalogError;
use crate::helpers::{format_datetime, now, parse_datetime};

pub(crate) const SELECT_FROM: &str = "SELECT t.id, t.schema_id, t.name, s.name, sc.name, t.created_at, t.updated_at
     FROM tables t
     JOIN schemata sc ON sc.id = t.schema_id
     JOIN sources s ON s.id = sc.source_id";

pub(crate) fn row_to_table(row: &libsql::Row) -> Result<Table, CatalogError> {
    Ok(Table {
        id: row.get(0)?,
        schema_id: row.get(1)?,
        name: row.get(2)?,
        source_name: row.get(3)?,
        schema_name: row.get(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl Catalog {
    /// Add a table under `schema`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Conflict` if `schema` already has a table named
    /// `name`.
    pub async fn add_table(&self, name: &str, schema: &Schema) -> Result<Table, CatalogError> {
        let session = self.session()?;
        if name.is_empty() {
            return Err(CatalogError::Invalid("table name is empty".into()));
        }
        let now = now();
        let key = format!("{}.{name}", schema.fqdn());
        session
            .execute(
                "INSERT INTO tables (schema_id, name, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)",
                libsql::params![schema.id, name, format_datetime(&now)],
            )
            .await
            .map_err(|e| CatalogError::from_write(e, "table", &key))?;

        Ok(Table {
            id: session.conn().last_insert_rowid(),
            schema_id: schema.id,
            name: name.to_string(),
            source_name: schema.source_name.clone(),
            schema_name: schema.name.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_table(
        &self,
        source_name: &str,
        schema_name: &str,
        name: &str,
    ) -> Result<Table, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(
                &format!("{SELECT_FROM} WHERE s.name = ?1 AND sc.name = ?2 AND t.name = ?3"),
                libsql::params![source_name, schema_name, name],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| {
            CatalogError::not_found("table", format!("{source_name}.{schema_name}.{name}"))
        })?;
        row_to_table(&row)
    }

    pub async fn get_table_by_id(&self, id: i64) -> Result<Table, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(&format!("{SELECT_FROM} WHERE t.id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CatalogError::not_found("table", format!("id {id}")))?;
        row_to_table(&row)
    }

    /// Tables of `schema`, in insertion order.
    pub async fn get_tables(&self, schema: &Schema) -> Result<Vec<Table>, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(
                &format!("{SELECT_FROM} WHERE t.schema_id = ?1 ORDER BY t.id"),
                [schema.id],
            )
            .await?;
        let mut tables = Vec::new();
        while let Some(row) = rows.next().await? {
            tables.push(row_to_table(&row)?);
        }
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use dbcat_core::connection::{GlueConnection, SourceConnection};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::test_catalog;

    async fn glue_schema(catalog: &Catalog, name: &str) -> Result<Schema, CatalogError> {
        let source = catalog
            .add_source(name, SourceConnection::Glue(GlueConnection {}))
            .await?;
        catalog.add_schema("db", &source).await
    }

    #[tokio::test]
    async fn tables_are_listed_per_schema() {
        let (catalog, _dir) = test_catalog().await;
        catalog
            .managed_session(|| async {
                let lake = glue_schema(&catalog, "lake").await?;
                let other = glue_schema(&catalog, "other").await?;
                let events = catalog.add_table("events", &lake).await?;
                let users = catalog.add_table("users", &lake).await?;
                catalog.add_table("events", &other).await?;

                assert_eq!(catalog.get_tables(&lake).await?, vec![events.clone(), users]);
                assert_eq!(catalog.get_table("lake", "db", "events").await?, events);
                assert_eq!(
                    catalog.get_table_by_id(events.id).await?.fqdn().to_string(),
                    "lake.db.events"
                );
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_table_is_not_found() {
        let (catalog, _dir) = test_catalog().await;
        catalog
            .managed_session(|| async {
                glue_schema(&catalog, "lake").await?;
                let err = catalog.get_table("lake", "db", "nope").await.unwrap_err();
                assert!(matches!(err, CatalogError::NotFound { entity: "table", .. }));
                assert!(catalog.get_table_by_id(-1).await.unwrap_err().is_not_found());
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn duplicate_table_conflicts() {
        let (catalog, _dir) = test_catalog().await;
        catalog
            .managed_session(|| async {
                let lake = glue_schema(&catalog, "lake").await?;
                catalog.add_table("events", &lake).await?;
                let err = catalog.add_table("events", &lake).await.unwrap_err();
                assert!(
                    matches!(err, CatalogError::Conflict { entity: "table", ref key } if key == "lake.db.events"),
                    "{err}"
                );
                Ok(())
            })
            .await
            .unwrap();
    }
}
