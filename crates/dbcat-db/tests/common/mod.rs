//! Shared fixture for dbcat-db integration tests: a small wiki-analytics
//! catalog loaded the way an ingestion tool would (lookup, add on miss).

#![allow(dead_code)]

use dbcat_config::CatalogConfig;
use dbcat_core::connection::{SourceConnection, SqliteConnection};
use dbcat_db::{Catalog, CatalogError};
use tempfile::TempDir;

pub const SOURCE: &str = "test";
pub const SCHEMA: &str = "default";

/// `(table, [(column, data_type)])`, columns in sort order.
pub const TABLES: &[(&str, &[(&str, &str)])] = &[
    (
        "pagecounts",
        &[
            ("group", "STRING"),
            ("page_title", "STRING"),
            ("views", "BIGINT"),
            ("bytes_sent", "BIGINT"),
        ],
    ),
    (
        "page",
        &[
            ("page_id", "BIGINT"),
            ("page_title", "STRING"),
            ("page_latest", "BIGINT"),
        ],
    ),
    (
        "redirect",
        &[("rd_from", "BIGINT"), ("rd_title", "STRING")],
    ),
    (
        "page_lookup_nonredirect",
        &[
            ("redirect_id", "BIGINT"),
            ("redirect_title", "STRING"),
            ("true_title", "STRING"),
            ("page_id", "BIGINT"),
            ("page_version", "BIGINT"),
        ],
    ),
    (
        "page_lookup_redirect",
        &[
            ("redirect_id", "BIGINT"),
            ("redirect_title", "STRING"),
            ("true_title", "STRING"),
            ("page_id", "BIGINT"),
            ("page_version", "BIGINT"),
        ],
    ),
    (
        "page_lookup",
        &[
            ("redirect_id", "BIGINT"),
            ("redirect_title", "STRING"),
            ("true_title", "STRING"),
            ("page_id", "BIGINT"),
            ("page_version", "BIGINT"),
        ],
    ),
    (
        "filtered_pagecounts",
        &[
            ("group", "STRING"),
            ("page_title", "STRING"),
            ("views", "BIGINT"),
            ("bytes_sent", "BIGINT"),
        ],
    ),
    (
        "normalized_pagecounts",
        &[
            ("page_id", "BIGINT"),
            ("page_title", "STRING"),
            ("page_url", "STRING"),
            ("views", "BIGINT"),
            ("bytes_sent", "BIGINT"),
        ],
    ),
];

/// Fresh, initialized catalog in a temp dir.
pub async fn empty_catalog() -> (Catalog, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = CatalogConfig::for_app_dir(dir.path());
    let catalog = dbcat_db::open_catalog(&config).await.unwrap();
    catalog.init_db().await.unwrap();
    (catalog, dir)
}

/// Catalog with [`TABLES`] loaded and committed.
pub async fn loaded_catalog() -> (Catalog, TempDir) {
    let (catalog, dir) = empty_catalog().await;
    scan(&catalog).await.unwrap();
    (catalog, dir)
}

/// Get-or-create every level of the fixture, then commit.
pub async fn scan(catalog: &Catalog) -> Result<(), CatalogError> {
    catalog
        .managed_session(|| async {
            catalog
                .commit_scope(|| async {
                    let source = match catalog.get_source(SOURCE).await {
                        Ok(source) => source,
                        Err(e) if e.is_not_found() => {
                            let connection = SourceConnection::Sqlite(SqliteConnection {
                                path: "/tmp/wiki.db".into(),
                            });
                            catalog.add_source(SOURCE, connection).await?
                        }
                        Err(e) => return Err(e),
                    };
                    let schema = match catalog.get_schema(SOURCE, SCHEMA).await {
                        Ok(schema) => schema,
                        Err(e) if e.is_not_found() => catalog.add_schema(SCHEMA, &source).await?,
                        Err(e) => return Err(e),
                    };
                    for (table_name, columns) in TABLES {
                        let table = match catalog.get_table(SOURCE, SCHEMA, table_name).await {
                            Ok(table) => table,
                            Err(e) if e.is_not_found() => {
                                catalog.add_table(table_name, &schema).await?
                            }
                            Err(e) => return Err(e),
                        };
                        for (index, (column_name, data_type)) in columns.iter().enumerate() {
                            match catalog
                                .get_column(SOURCE, SCHEMA, table_name, column_name)
                                .await
                            {
                                Ok(_) => {}
                                Err(e) if e.is_not_found() => {
                                    let sort_order = i64::try_from(index).unwrap();
                                    catalog
                                        .add_column(column_name, data_type, sort_order, &table)
                                        .await?;
                                }
                                Err(e) => return Err(e),
                            }
                        }
                    }
                    Ok(())
                })
                .await
        })
        .await
}
