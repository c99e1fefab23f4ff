//! Column repository: insertion, lookup, filtered listing, drift updates,
//! PII tagging.

use chrono::{DateTime, Utc};
use dbcat_core::entities::{Column, Table};
use dbcat_core::pii::{PiiRegistry, PiiType};

use crate::Catalog;
use crate::error::CatalogError;
use crate::helpers::{format_datetime, get_opt_string, now, parse_datetime, placeholders};

pub(crate) const SELECT_FROM: &str = "SELECT c.id, c.table_id, c.name, c.data_type, c.sort_order, c.pii_type, c.pii_plugin,
            s.name, sc.name, t.name, c.created_at, c.updated_at
     FROM columns c
     JOIN tables t ON t.id = c.table_id
     JOIN schemata sc ON sc.id = t.schema_id
     JOIN sources s ON s.id = sc.source_id";

pub(crate) fn row_to_column(row: &libsql::Row, pii: &PiiRegistry) -> Result<Column, CatalogError> {
    let pii_type = match get_opt_string(row, 5)? {
        None => None,
        Some(type_id) => Some(pii.resolve(&type_id).cloned().ok_or_else(|| {
            CatalogError::Decode(format!("unregistered PII type '{type_id}'"))
        })?),
    };
    Ok(Column {
        id: row.get(0)?,
        table_id: row.get(1)?,
        name: row.get(2)?,
        data_type: row.get(3)?,
        sort_order: row.get(4)?,
        pii_type,
        pii_plugin: get_opt_string(row, 6)?,
        source_name: row.get(7)?,
        schema_name: row.get(8)?,
        table_name: row.get(9)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        updated_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

/// Narrows [`Catalog::get_columns_for_table`].
#[derive(Debug, Clone, Default)]
pub struct ColumnFilter {
    /// Only columns with one of these names. `Some(vec![])` matches nothing.
    pub names: Option<Vec<String>>,
    /// Only columns updated strictly after this instant.
    pub newer_than: Option<DateTime<Utc>>,
}

impl ColumnFilter {
    #[must_use]
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: Some(names.into_iter().map(Into::into).collect()),
            newer_than: None,
        }
    }

    #[must_use]
    pub fn newer_than(instant: DateTime<Utc>) -> Self {
        Self {
            names: None,
            newer_than: Some(instant),
        }
    }
}

impl Catalog {
    /// Add a column to `table` at position `sort_order`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Conflict` if `table` already has a column named
    /// `name`.
    pub async fn add_column(
        &self,
        name: &str,
        data_type: &str,
        sort_order: i64,
        table: &Table,
    ) -> Result<Column, CatalogError> {
        let session = self.session()?;
        if name.is_empty() {
            return Err(CatalogError::Invalid("column name is empty".into()));
        }
        let now = now();
        let key = format!("{}.{name}", table.fqdn());
        session
            .execute(
                "INSERT INTO columns (table_id, name, data_type, sort_order, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                libsql::params![table.id, name, data_type, sort_order, format_datetime(&now)],
            )
            .await
            .map_err(|e| CatalogError::from_write(e, "column", &key))?;

        Ok(Column {
            id: session.conn().last_insert_rowid(),
            table_id: table.id,
            name: name.to_string(),
            data_type: data_type.to_string(),
            sort_order,
            pii_type: None,
            pii_plugin: None,
            source_name: table.source_name.clone(),
            schema_name: table.schema_name.clone(),
            table_name: table.name.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_column(
        &self,
        source_name: &str,
        schema_name: &str,
        table_name: &str,
        name: &str,
    ) -> Result<Column, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(
                &format!(
                    "{SELECT_FROM} WHERE s.name = ?1 AND sc.name = ?2 AND t.name = ?3 AND c.name = ?4"
                ),
                libsql::params![source_name, schema_name, table_name, name],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| {
            CatalogError::not_found(
                "column",
                format!("{source_name}.{schema_name}.{table_name}.{name}"),
            )
        })?;
        row_to_column(&row, self.pii_registry())
    }

    pub async fn get_column_by_id(&self, id: i64) -> Result<Column, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(&format!("{SELECT_FROM} WHERE c.id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CatalogError::not_found("column", format!("id {id}")))?;
        row_to_column(&row, self.pii_registry())
    }

    /// Columns of `table` ordered by `sort_order`, narrowed by `filter`.
    pub async fn get_columns_for_table(
        &self,
        table: &Table,
        filter: &ColumnFilter,
    ) -> Result<Vec<Column>, CatalogError> {
        let session = self.session()?;
        if filter.names.as_ref().is_some_and(Vec::is_empty) {
            return Ok(Vec::new());
        }

        let mut sql = format!("{SELECT_FROM} WHERE c.table_id = ?1");
        let mut params: Vec<libsql::Value> = vec![table.id.into()];

        if let Some(ref names) = filter.names {
            sql.push_str(&format!(
                " AND c.name IN ({})",
                placeholders(params.len() + 1, names.len())
            ));
            params.extend(names.iter().map(|n| libsql::Value::from(n.clone())));
        }
        if let Some(ref instant) = filter.newer_than {
            params.push(format_datetime(instant).into());
            sql.push_str(&format!(" AND c.updated_at > ?{}", params.len()));
        }
        sql.push_str(" ORDER BY c.sort_order, c.id");

        let mut rows = session
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut columns = Vec::new();
        while let Some(row) = rows.next().await? {
            columns.push(row_to_column(&row, self.pii_registry())?);
        }
        Ok(columns)
    }

    /// Record a changed type or position for an existing column.
    ///
    /// `updated_at` never moves backwards, so `newer_than` filters pick up the
    /// change.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the column no longer exists.
    pub async fn update_column(
        &self,
        column: &Column,
        data_type: &str,
        sort_order: i64,
    ) -> Result<Column, CatalogError> {
        let session = self.session()?;
        let affected = session
            .execute(
                "UPDATE columns
                 SET data_type = ?1, sort_order = ?2, updated_at = MAX(updated_at, ?3)
                 WHERE id = ?4",
                libsql::params![data_type, sort_order, format_datetime(&now()), column.id],
            )
            .await?;
        if affected == 0 {
            return Err(CatalogError::not_found("column", column.fqdn().to_string()));
        }
        tracing::debug!(column = %column.fqdn(), data_type, sort_order, "column updated");
        self.get_column_by_id(column.id).await
    }

    /// Tag `column` with a PII classification found by `pii_plugin`.
    ///
    /// The tag and the plugin are written together; the last writer wins.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` if `pii_type` is not registered with
    /// this catalog, `CatalogError::NotFound` if the column no longer exists.
    pub async fn set_column_pii_type(
        &self,
        column: &Column,
        pii_type: &PiiType,
        pii_plugin: &str,
    ) -> Result<Column, CatalogError> {
        self.session()?;
        if !self.pii_registry().contains(pii_type) {
            return Err(CatalogError::Invalid(format!(
                "PII type '{}' is not registered",
                pii_type.type_id
            )));
        }
        self.write_pii(column, Some(pii_type.type_id.as_str()), Some(pii_plugin))
            .await
    }

    /// Remove the PII classification of `column`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the column no longer exists.
    pub async fn clear_column_pii_type(&self, column: &Column) -> Result<Column, CatalogError> {
        self.write_pii(column, None, None).await
    }

    async fn write_pii(
        &self,
        column: &Column,
        type_id: Option<&str>,
        plugin: Option<&str>,
    ) -> Result<Column, CatalogError> {
        let session = self.session()?;
        let affected = session
            .execute(
                "UPDATE columns
                 SET pii_type = ?1, pii_plugin = ?2, updated_at = MAX(updated_at, ?3)
                 WHERE id = ?4",
                libsql::params![type_id, plugin, format_datetime(&now()), column.id],
            )
            .await?;
        if affected == 0 {
            return Err(CatalogError::not_found("column", column.fqdn().to_string()));
        }
        tracing::debug!(column = %column.fqdn(), pii_type = type_id.unwrap_or(""), "column PII type written");
        self.get_column_by_id(column.id).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dbcat_core::connection::{SourceConnection, SqliteConnection};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::test_catalog;

    async fn people_table(catalog: &Catalog) -> Result<Table, CatalogError> {
        let source = catalog
            .add_source("hr", SourceConnection::Sqlite(SqliteConnection { path: "/tmp/hr".into() }))
            .await?;
        let schema = catalog.add_schema("main", &source).await?;
        catalog.add_table("people", &schema).await
    }

    #[tokio::test]
    async fn columns_come_back_in_sort_order() {
        let (catalog, _dir) = test_catalog().await;
        catalog
            .managed_session(|| async {
                let table = people_table(&catalog).await?;
                catalog.add_column("email", "TEXT", 2, &table).await?;
                catalog.add_column("id", "INTEGER", 0, &table).await?;
                catalog.add_column("name", "TEXT", 1, &table).await?;

                let names: Vec<_> = catalog
                    .get_columns_for_table(&table, &ColumnFilter::default())
                    .await?
                    .into_iter()
                    .map(|c| c.name)
                    .collect();
                assert_eq!(names, vec!["id", "name", "email"]);

                let picked = catalog
                    .get_columns_for_table(&table, &ColumnFilter::names(["email", "missing"]))
                    .await?;
                assert_eq!(picked.len(), 1);
                assert_eq!(picked[0].fqdn().to_string(), "hr.main.people.email");

                let none = catalog
                    .get_columns_for_table(&table, &ColumnFilter::names(Vec::<String>::new()))
                    .await?;
                assert!(none.is_empty());
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn pii_tag_roundtrips_and_clears() {
        let (catalog, _dir) = test_catalog().await;
        catalog
            .managed_session(|| async {
                let table = people_table(&catalog).await?;
                let email = catalog.add_column("email", "TEXT", 0, &table).await?;
                let tag = PiiType::new("Email", "email");

                tokio::time::sleep(Duration::from_millis(2)).await;
                let tagged = catalog
                    .set_column_pii_type(&email, &tag, "regex")
                    .await?;
                assert_eq!(tagged.pii_type, Some(tag));
                assert_eq!(tagged.pii_plugin.as_deref(), Some("regex"));
                assert!(tagged.updated_at > email.updated_at);

                let cleared = catalog.clear_column_pii_type(&tagged).await?;
                assert_eq!(cleared.pii_type, None);
                assert_eq!(cleared.pii_plugin, None);
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn drift_update_shows_up_in_newer_than() {
        let (catalog, _dir) = test_catalog().await;
        catalog
            .managed_session(|| async {
                let table = people_table(&catalog).await?;
                let id = catalog.add_column("id", "INTEGER", 0, &table).await?;
                let name = catalog.add_column("name", "VARCHAR(20)", 1, &table).await?;

                tokio::time::sleep(Duration::from_millis(2)).await;
                let before = now();
                tokio::time::sleep(Duration::from_millis(2)).await;

                let widened = catalog.update_column(&name, "TEXT", 1).await?;
                assert_eq!(widened.data_type, "TEXT");
                assert!(widened.updated_at > before);
                assert_eq!(widened.created_at, name.created_at);

                let changed = catalog
                    .get_columns_for_table(&table, &ColumnFilter::newer_than(before))
                    .await?;
                assert_eq!(changed, vec![widened]);
                assert_eq!(catalog.get_column_by_id(id.id).await?, id);
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn updating_a_deleted_column_is_not_found() {
        let (catalog, _dir) = test_catalog().await;
        catalog
            .managed_session(|| async {
                let table = people_table(&catalog).await?;
                let col = catalog.add_column("id", "INTEGER", 0, &table).await?;
                let source = catalog.get_source("hr").await?;
                catalog.delete_source(&source).await?;

                let err = catalog.update_column(&col, "BIGINT", 0).await.unwrap_err();
                assert!(err.is_not_found(), "{err}");
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unregistered_pii_type_is_rejected() {
        let (catalog, _dir) = test_catalog().await;
        catalog
            .managed_session(|| async {
                let table = people_table(&catalog).await?;
                let col = catalog.add_column("iban", "TEXT", 0, &table).await?;
                let err = catalog
                    .set_column_pii_type(&col, &PiiType::new("Iban", "iban"), "custom")
                    .await
                    .unwrap_err();
                assert!(matches!(err, CatalogError::Invalid(_)));
                Ok(())
            })
            .await
            .unwrap();
    }
}
