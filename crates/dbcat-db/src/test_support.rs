//! Shared test utilities for dbcat-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use dbcat_config::CatalogConfig;
    use tempfile::TempDir;

    use crate::Catalog;

    /// Initialized catalog in a fresh temp dir. Keep the `TempDir` alive for
    /// the duration of the test.
    pub async fn test_catalog() -> (Catalog, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig::embedded(dir.path().join("catalog.db"), None);
        let catalog = Catalog::open(&config).await.unwrap();
        catalog.init_db().await.unwrap();
        (catalog, dir)
    }
}
