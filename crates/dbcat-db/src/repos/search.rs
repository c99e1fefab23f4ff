//! Fuzzy search and resolution over the catalog hierarchy.
//!
//! Patterns use SQL `LIKE` syntax: `%` matches any run of characters, `_`
//! exactly one. Matching is ASCII case-insensitive. `None` for an ancestor
//! pattern means "any". Results come back in insertion (id) order.
//!
//! The `search_table`/`search_column` resolvers demand exactly one match and
//! report `AmbiguousMatch` otherwise, even when one candidate matches the
//! pattern literally.

use dbcat_core::entities::{Column, Schema, Source, Table};

use crate::Catalog;
use crate::error::CatalogError;
use crate::repos::{column, schema, source, table};

/// `WHERE` clause builder for optional LIKE filters.
#[derive(Default)]
struct LikeFilter {
    clauses: Vec<String>,
    params: Vec<libsql::Value>,
}

impl LikeFilter {
    fn like(mut self, column: &str, pattern: Option<&str>) -> Self {
        if let Some(p) = pattern {
            self.params.push(p.to_string().into());
            self.clauses
                .push(format!("{column} LIKE ?{}", self.params.len()));
        }
        self
    }

    fn sql(&self, select_from: &str, order_by: &str) -> String {
        if self.clauses.is_empty() {
            format!("{select_from} ORDER BY {order_by}")
        } else {
            format!(
                "{select_from} WHERE {} ORDER BY {order_by}",
                self.clauses.join(" AND ")
            )
        }
    }
}

fn exactly_one<T>(mut found: Vec<T>, entity: &'static str, pattern: String) -> Result<T, CatalogError> {
    match found.len() {
        0 => Err(CatalogError::NotFound { entity, key: pattern }),
        1 => Ok(found.remove(0)),
        count => Err(CatalogError::AmbiguousMatch {
            entity,
            pattern,
            count,
        }),
    }
}

fn describe(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .map(|p| p.unwrap_or("%"))
        .collect::<Vec<_>>()
        .join(".")
}

impl Catalog {
    pub async fn search_sources(&self, source_like: &str) -> Result<Vec<Source>, CatalogError> {
        let session = self.session()?;
        let filter = LikeFilter::default().like("s.name", Some(source_like));
        let sql = filter.sql(
            &format!("SELECT {} FROM sources s", source::SELECT_COLS),
            "s.id",
        );
        let mut rows = session
            .query(&sql, libsql::params_from_iter(filter.params))
            .await?;
        let mut found = Vec::new();
        while let Some(row) = rows.next().await? {
            found.push(source::row_to_source(&row)?);
        }
        Ok(found)
    }

    pub async fn search_schema(
        &self,
        source_like: Option<&str>,
        schema_like: &str,
    ) -> Result<Vec<Schema>, CatalogError> {
        let session = self.session()?;
        let filter = LikeFilter::default()
            .like("s.name", source_like)
            .like("sc.name", Some(schema_like));
        let sql = filter.sql(schema::SELECT_FROM, "sc.id");
        let mut rows = session
            .query(&sql, libsql::params_from_iter(filter.params))
            .await?;
        let mut found = Vec::new();
        while let Some(row) = rows.next().await? {
            found.push(schema::row_to_schema(&row)?);
        }
        Ok(found)
    }

    pub async fn search_tables(
        &self,
        source_like: Option<&str>,
        schema_like: Option<&str>,
        table_like: &str,
    ) -> Result<Vec<Table>, CatalogError> {
        let session = self.session()?;
        let filter = LikeFilter::default()
            .like("s.name", source_like)
            .like("sc.name", schema_like)
            .like("t.name", Some(table_like));
        let sql = filter.sql(table::SELECT_FROM, "t.id");
        let mut rows = session
            .query(&sql, libsql::params_from_iter(filter.params))
            .await?;
        let mut found = Vec::new();
        while let Some(row) = rows.next().await? {
            found.push(table::row_to_table(&row)?);
        }
        Ok(found)
    }

    pub async fn search_columns(
        &self,
        source_like: Option<&str>,
        schema_like: Option<&str>,
        table_like: Option<&str>,
        column_like: &str,
    ) -> Result<Vec<Column>, CatalogError> {
        let session = self.session()?;
        let filter = LikeFilter::default()
            .like("s.name", source_like)
            .like("sc.name", schema_like)
            .like("t.name", table_like)
            .like("c.name", Some(column_like));
        let sql = filter.sql(column::SELECT_FROM, "c.id");
        let mut rows = session
            .query(&sql, libsql::params_from_iter(filter.params))
            .await?;
        let mut found = Vec::new();
        while let Some(row) = rows.next().await? {
            found.push(column::row_to_column(&row, self.pii_registry())?);
        }
        Ok(found)
    }

    /// Resolve a table pattern to exactly one table.
    ///
    /// # Errors
    ///
    /// `CatalogError::NotFound` on zero matches, `CatalogError::AmbiguousMatch`
    /// on more than one.
    pub async fn search_table(
        &self,
        source_like: Option<&str>,
        schema_like: Option<&str>,
        table_like: &str,
    ) -> Result<Table, CatalogError> {
        let found = self
            .search_tables(source_like, schema_like, table_like)
            .await?;
        exactly_one(
            found,
            "table",
            describe(&[source_like, schema_like, Some(table_like)]),
        )
    }

    /// Resolve a column pattern to exactly one column.
    ///
    /// # Errors
    ///
    /// Same as [`search_table`](Self::search_table).
    pub async fn search_column(
        &self,
        source_like: Option<&str>,
        schema_like: Option<&str>,
        table_like: Option<&str>,
        column_like: &str,
    ) -> Result<Column, CatalogError> {
        let found = self
            .search_columns(source_like, schema_like, table_like, column_like)
            .await?;
        exactly_one(
            found,
            "column",
            describe(&[source_like, schema_like, table_like, Some(column_like)]),
        )
    }
}
