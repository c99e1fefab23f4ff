//! Source repository: registration, lookup, default schema, deletion.

use dbcat_core::connection::{SourceConnection, SourceDefinition};
use dbcat_core::entities::{DefaultSchema, Schema, Source};

use crate::Catalog;
use crate::error::CatalogError;
use crate::helpers::{format_datetime, now, parse_datetime, parse_json};

pub(crate) const SELECT_COLS: &str = "s.id, s.name, s.connection, s.created_at, s.updated_at";

pub(crate) fn row_to_source(row: &libsql::Row) -> Result<Source, CatalogError> {
    let name: String = row.get(1)?;
    let connection = SourceConnection::from_json(parse_json(&row.get::<String>(2)?)?)
        .map_err(|e| CatalogError::Decode(format!("connection of source '{name}': {e}")))?;
    Ok(Source {
        id: row.get(0)?,
        name,
        connection,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
        updated_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl Catalog {
    /// Register a source.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Conflict` if the name is taken.
    pub async fn add_source(
        &self,
        name: &str,
        connection: SourceConnection,
    ) -> Result<Source, CatalogError> {
        let session = self.session()?;
        if name.is_empty() {
            return Err(CatalogError::Invalid("source name is empty".into()));
        }
        let now = now();
        let ts = format_datetime(&now);
        let json = serde_json::to_string(&connection.to_json())
            .map_err(|e| CatalogError::Invalid(e.to_string()))?;

        session
            .execute(
                "INSERT INTO sources (name, source_type, connection, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                libsql::params![name, connection.source_type().as_str(), json, ts],
            )
            .await
            .map_err(|e| CatalogError::from_write(e, "source", name))?;
        tracing::debug!(source = name, source_type = %connection.source_type(), "source added");

        Ok(Source {
            id: session.conn().last_insert_rowid(),
            name: name.to_string(),
            connection,
            created_at: now,
            updated_at: now,
        })
    }

    /// Register every definition in order. Stops at the first failure; the
    /// sources added before it stay pending in the session.
    ///
    /// # Errors
    ///
    /// Same as [`add_source`](Self::add_source).
    pub async fn add_sources(
        &self,
        definitions: Vec<SourceDefinition>,
    ) -> Result<Vec<Source>, CatalogError> {
        let mut added = Vec::with_capacity(definitions.len());
        for def in definitions {
            added.push(self.add_source(&def.name, def.connection).await?);
        }
        Ok(added)
    }

    pub async fn get_source(&self, name: &str) -> Result<Source, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(
                &format!("SELECT {SELECT_COLS} FROM sources s WHERE s.name = ?1"),
                [name],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CatalogError::not_found("source", name))?;
        row_to_source(&row)
    }

    pub async fn get_source_by_id(&self, id: i64) -> Result<Source, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(
                &format!("SELECT {SELECT_COLS} FROM sources s WHERE s.id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CatalogError::not_found("source", format!("id {id}")))?;
        row_to_source(&row)
    }

    /// All sources, in registration order.
    pub async fn get_sources(&self) -> Result<Vec<Source>, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(&format!("SELECT {SELECT_COLS} FROM sources s ORDER BY s.id"), ())
            .await?;
        let mut sources = Vec::new();
        while let Some(row) = rows.next().await? {
            sources.push(row_to_source(&row)?);
        }
        Ok(sources)
    }

    /// Point `source` at `schema` as its default, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` if `schema` belongs to another source,
    /// `CatalogError::NotFound` if either no longer exists.
    pub async fn update_source_default_schema(
        &self,
        source: &Source,
        schema: &Schema,
    ) -> Result<DefaultSchema, CatalogError> {
        let session = self.session()?;
        if schema.source_id != source.id {
            return Err(CatalogError::Invalid(format!(
                "schema '{}' does not belong to source '{}'",
                schema.fqdn(),
                source.name
            )));
        }
        let ts = format_datetime(&now());
        session
            .execute(
                "INSERT INTO default_schema (source_id, schema_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)
                 ON CONFLICT(source_id) DO UPDATE SET
                     schema_id = excluded.schema_id,
                     updated_at = MAX(default_schema.updated_at, excluded.updated_at)",
                libsql::params![source.id, schema.id, ts.as_str()],
            )
            .await
            .map_err(|e| CatalogError::from_write(e, "default schema", &schema.fqdn().to_string()))?;
        session
            .execute(
                "UPDATE sources SET updated_at = MAX(updated_at, ?1) WHERE id = ?2",
                libsql::params![ts.as_str(), source.id],
            )
            .await?;

        self.get_default_schema(source)
            .await?
            .ok_or_else(|| CatalogError::not_found("default schema", source.name.clone()))
    }

    /// The default-schema pointer of `source`, if one was set.
    pub async fn get_default_schema(
        &self,
        source: &Source,
    ) -> Result<Option<DefaultSchema>, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(
                "SELECT source_id, schema_id, created_at, updated_at
                 FROM default_schema WHERE source_id = ?1",
                [source.id],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        Ok(Some(DefaultSchema {
            source_id: row.get(0)?,
            schema_id: row.get(1)?,
            created_at: parse_datetime(&row.get::<String>(2)?)?,
            updated_at: parse_datetime(&row.get::<String>(3)?)?,
        }))
    }

    /// Delete `source` and everything beneath it, including its jobs and
    /// their lineage.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the source no longer exists.
    pub async fn delete_source(&self, source: &Source) -> Result<(), CatalogError> {
        let session = self.session()?;
        let affected = session
            .execute("DELETE FROM sources WHERE id = ?1", [source.id])
            .await?;
        if affected == 0 {
            return Err(CatalogError::not_found("source", source.name.clone()));
        }
        tracing::debug!(source = %source.name, "source deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use dbcat_core::connection::{GlueConnection, RelationalConnection};
    use dbcat_core::enums::SourceType;
    use pretty_assertions::assert_eq;

    use crate::error::CatalogError;
    use crate::test_support::helpers::test_catalog;

    use super::*;

    fn pg() -> SourceConnection {
        SourceConnection::Postgres(RelationalConnection {
            uri: "db_uri".into(),
            port: Some("db_port".into()),
            username: Some("db_user".into()),
            password: Some("db_password".into()),
            database: Some("db_database".into()),
        })
    }

    #[tokio::test]
    async fn add_then_get_roundtrips_connection() {
        let (catalog, _dir) = test_catalog().await;
        catalog
            .managed_session(|| async {
                let added = catalog.add_source("pg", pg()).await?;
                let fetched = catalog.get_source("pg").await?;
                assert_eq!(fetched, added);
                assert_eq!(fetched.source_type(), SourceType::Postgres);
                assert_eq!(catalog.get_source_by_id(added.id).await?, added);
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let (catalog, _dir) = test_catalog().await;
        catalog
            .managed_session(|| async {
                catalog.add_source("gl", SourceConnection::Glue(GlueConnection {})).await?;
                let err = catalog
                    .add_source("gl", SourceConnection::Glue(GlueConnection {}))
                    .await
                    .unwrap_err();
                assert!(err.is_conflict(), "{err}");
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_source_is_not_found() {
        let (catalog, _dir) = test_catalog().await;
        let err = catalog
            .managed_session(|| async { catalog.get_source("nope").await })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { entity: "source", .. }));
    }

    #[tokio::test]
    async fn lookups_need_a_session() {
        let (catalog, _dir) = test_catalog().await;
        let err = catalog.get_sources().await.unwrap_err();
        assert!(matches!(err, CatalogError::NoActiveSession));
    }
}
