//! Reading, looking up, and tagging the catalog hierarchy.

mod common;

use chrono::Duration;
use dbcat_core::fqdn::Fqdn;
use dbcat_core::pii::PiiType;
use dbcat_db::{CatalogError, ColumnFilter};
use pretty_assertions::assert_eq;

use common::{SCHEMA, SOURCE, loaded_catalog, scan};

#[tokio::test]
async fn read_catalog() {
    let (catalog, _dir) = loaded_catalog().await;
    catalog
        .managed_session(|| async {
            let sources = catalog.get_sources().await?;
            assert_eq!(sources.len(), 1);
            let source = &sources[0];
            assert_eq!(source.name, "test");
            assert!(source.created_at <= source.updated_at);

            let schemata = catalog.get_schemata(source).await?;
            assert_eq!(schemata.len(), 1);
            assert_eq!(schemata[0].name, "default");
            assert_eq!(catalog.get_tables(&schemata[0]).await?.len(), 8);

            let table = catalog.get_table(SOURCE, SCHEMA, "normalized_pagecounts").await?;
            let columns = catalog
                .get_columns_for_table(&table, &ColumnFilter::default())
                .await?;
            let shape: Vec<_> = columns
                .iter()
                .map(|c| (c.name.as_str(), c.data_type.as_str(), c.sort_order))
                .collect();
            assert_eq!(
                shape,
                vec![
                    ("page_id", "BIGINT", 0),
                    ("page_title", "STRING", 1),
                    ("page_url", "STRING", 2),
                    ("views", "BIGINT", 3),
                    ("bytes_sent", "BIGINT", 4),
                ]
            );
            assert!(columns.iter().all(|c| c.created_at <= c.updated_at));
            Ok(())
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn lookups_by_name_and_id_agree() {
    let (catalog, _dir) = loaded_catalog().await;
    catalog
        .managed_session(|| async {
            let source = catalog.get_source(SOURCE).await?;
            assert_eq!(source.fqdn(), Fqdn::from(["test"]));
            assert_eq!(catalog.get_source_by_id(source.id).await?, source);

            let schema = catalog.get_schema(SOURCE, SCHEMA).await?;
            assert_eq!(schema.fqdn(), Fqdn::from(["test", "default"]));
            assert_eq!(catalog.get_schema_by_id(schema.id).await?, schema);

            let table = catalog.get_table(SOURCE, SCHEMA, "page").await?;
            assert_eq!(table.fqdn(), Fqdn::from(["test", "default", "page"]));
            assert_eq!(catalog.get_table_by_id(table.id).await?, table);

            let column = catalog
                .get_column(SOURCE, SCHEMA, "page", "page_title")
                .await?;
            assert_eq!(
                column.fqdn(),
                Fqdn::from(["test", "default", "page", "page_title"])
            );
            assert_eq!(catalog.get_column_by_id(column.id).await?, column);
            Ok(())
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn missing_objects_are_not_found() {
    let (catalog, _dir) = loaded_catalog().await;
    catalog
        .managed_session(|| async {
            let err = catalog.get_table(SOURCE, SCHEMA, "blah").await.unwrap_err();
            assert!(
                matches!(err, CatalogError::NotFound { entity: "table", ref key } if key == "test.default.blah")
            );
            assert!(catalog.get_column_by_id(-1).await.unwrap_err().is_not_found());
            assert!(catalog.get_schema("nope", SCHEMA).await.unwrap_err().is_not_found());
            Ok(())
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn column_subset_and_time_filter() {
    let (catalog, _dir) = loaded_catalog().await;
    catalog
        .managed_session(|| async {
            let table = catalog.get_table(SOURCE, SCHEMA, "page").await?;
            let all = catalog
                .get_columns_for_table(&table, &ColumnFilter::default())
                .await?;
            assert_eq!(all.len(), 3);

            let picked = catalog
                .get_columns_for_table(&table, &ColumnFilter::names(["page_latest", "page_id"]))
                .await?;
            let names: Vec<_> = picked.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, vec!["page_id", "page_latest"]);

            let single = catalog
                .get_columns_for_table(&table, &ColumnFilter::names(["page_id"]))
                .await?;
            assert_eq!(single.len(), 1);

            let updated_at = all[0].updated_at;
            let before = ColumnFilter::newer_than(updated_at - Duration::minutes(1));
            let after = ColumnFilter::newer_than(updated_at + Duration::minutes(1));
            assert_eq!(catalog.get_columns_for_table(&table, &before).await?.len(), 3);
            assert!(catalog.get_columns_for_table(&table, &after).await?.is_empty());
            Ok(())
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn rescanning_is_idempotent() {
    let (catalog, _dir) = loaded_catalog().await;
    scan(&catalog).await.unwrap();
    scan(&catalog).await.unwrap();
    catalog
        .managed_session(|| async {
            let sources = catalog.get_sources().await?;
            assert_eq!(sources.len(), 1);
            let schemata = catalog.get_schemata(&sources[0]).await?;
            assert_eq!(schemata.len(), 1);
            let tables = catalog.get_tables(&schemata[0]).await?;
            assert_eq!(tables.len(), 8);
            let page = catalog.get_table(SOURCE, SCHEMA, "page").await?;
            let columns = catalog
                .get_columns_for_table(&page, &ColumnFilter::default())
                .await?;
            assert_eq!(columns.len(), 3);
            Ok(())
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn default_schema_pointer() {
    let (catalog, _dir) = loaded_catalog().await;
    catalog
        .managed_session(|| async {
            let source = catalog.get_source(SOURCE).await?;
            let schema = catalog.get_schema(SOURCE, SCHEMA).await?;

            let inserted = catalog.update_source_default_schema(&source, &schema).await?;
            let fetched = catalog
                .get_default_schema(&source)
                .await?
                .expect("default schema set");
            assert_eq!(fetched, inserted);
            assert_eq!(fetched.source_id, source.id);
            assert_eq!(fetched.schema_id, schema.id);
            assert!(fetched.updated_at >= fetched.created_at);

            let refreshed = catalog.get_source(SOURCE).await?;
            assert!(refreshed.updated_at >= source.updated_at);
            Ok(())
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn pii_tag_persists_across_sessions() {
    let (catalog, _dir) = loaded_catalog().await;
    let pii_type = PiiType::new("Person", "person");

    let untagged = catalog
        .managed_session(|| async {
            catalog
                .commit_scope(|| async {
                    let column = catalog
                        .get_column(SOURCE, SCHEMA, "page", "page_title")
                        .await?;
                    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
                    catalog
                        .set_column_pii_type(&column, &pii_type, "column_scanner")
                        .await?;
                    Ok(column)
                })
                .await
        })
        .await
        .unwrap();

    catalog
        .managed_session(|| async {
            let column = catalog
                .get_column(SOURCE, SCHEMA, "page", "page_title")
                .await?;
            assert_eq!(column.pii_type.as_ref(), Some(&pii_type));
            assert_eq!(column.pii_plugin.as_deref(), Some("column_scanner"));
            assert!(column.updated_at > untagged.updated_at);
            assert_eq!(column.created_at, untagged.created_at);
            Ok(())
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_source_cascades() {
    let (catalog, _dir) = loaded_catalog().await;
    catalog
        .managed_session(|| async {
            let source = catalog.get_source(SOURCE).await?;
            catalog.delete_source(&source).await?;
            assert!(catalog.get_sources().await?.is_empty());
            assert!(catalog.search_tables(None, None, "%").await?.is_empty());
            assert!(catalog.search_columns(None, None, None, "%").await?.is_empty());
            assert!(catalog.delete_source(&source).await.unwrap_err().is_not_found());
            Ok(())
        })
        .await
        .unwrap();
}
