//! Task repository: per-application run records.

use dbcat_core::entities::Task;

use crate::Catalog;
use crate::error::CatalogError;
use crate::helpers::{format_datetime, now, parse_datetime};

const SELECT_COLS: &str = "id, app_name, status, message, created_at, updated_at";

fn row_to_task(row: &libsql::Row) -> Result<Task, CatalogError> {
    Ok(Task {
        id: row.get(0)?,
        app_name: row.get(1)?,
        status: row.get(2)?,
        message: row.get(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl Catalog {
    pub async fn add_task(
        &self,
        app_name: &str,
        status: i64,
        message: &str,
    ) -> Result<Task, CatalogError> {
        let session = self.session()?;
        if app_name.is_empty() {
            return Err(CatalogError::Invalid("task app name is empty".into()));
        }
        let now = now();
        session
            .execute(
                &format!("INSERT INTO tasks ({SELECT_COLS}) VALUES (NULL, ?1, ?2, ?3, ?4, ?4)"),
                libsql::params![app_name, status, message, format_datetime(&now)],
            )
            .await?;

        Ok(Task {
            id: session.conn().last_insert_rowid(),
            app_name: app_name.to_string(),
            status,
            message: message.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_task_by_id(&self, id: i64) -> Result<Task, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(&format!("SELECT {SELECT_COLS} FROM tasks WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CatalogError::not_found("task", format!("id {id}")))?;
        row_to_task(&row)
    }

    /// Tasks of `app_name`, oldest first.
    pub async fn get_tasks_by_app_name(&self, app_name: &str) -> Result<Vec<Task>, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM tasks WHERE app_name = ?1 ORDER BY created_at, id"
                ),
                [app_name],
            )
            .await?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }

    /// Most recent task of `app_name`; equal timestamps go to the higher id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the application has no tasks.
    pub async fn get_latest_task(&self, app_name: &str) -> Result<Task, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM tasks WHERE app_name = ?1
                     ORDER BY created_at DESC, id DESC LIMIT 1"
                ),
                [app_name],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CatalogError::not_found("task", app_name))?;
        row_to_task(&row)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::error::CatalogError;
    use crate::test_support::helpers::test_catalog;

    #[tokio::test]
    async fn latest_task_is_per_app() {
        let (catalog, _dir) = test_catalog().await;
        catalog
            .managed_session(|| async {
                catalog.add_task("piicatcher", 0, "started").await?;
                let done = catalog.add_task("piicatcher", 1, "database scanned").await?;
                catalog.add_task("other", 1, "unrelated").await?;

                assert_eq!(catalog.get_latest_task("piicatcher").await?, done);
                assert_eq!(catalog.get_tasks_by_app_name("piicatcher").await?.len(), 2);
                assert_eq!(catalog.get_task_by_id(done.id).await?, done);

                let err = catalog.get_latest_task("nobody").await.unwrap_err();
                assert!(matches!(err, CatalogError::NotFound { entity: "task", .. }));
                Ok(())
            })
            .await
            .unwrap();
    }
}
