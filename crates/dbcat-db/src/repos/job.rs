//! Job and job-execution repository.

use chrono::{DateTime, Utc};
use dbcat_core::entities::{Job, JobExecution, Source};
use dbcat_core::enums::JobExecutionStatus;

use crate::Catalog;
use crate::error::CatalogError;
use crate::helpers::{format_datetime, now, parse_datetime, parse_enum, parse_json, placeholders};

const JOB_COLS: &str = "id, name, source_id, context, created_at, updated_at";

const EXECUTION_COLS: &str =
    "je.id, je.job_id, je.started_at, je.ended_at, je.status, je.created_at, je.updated_at";

fn row_to_job(row: &libsql::Row) -> Result<Job, CatalogError> {
    Ok(Job {
        id: row.get(0)?,
        name: row.get(1)?,
        source_id: row.get(2)?,
        context: parse_json(&row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

fn row_to_execution(row: &libsql::Row) -> Result<JobExecution, CatalogError> {
    Ok(JobExecution {
        id: row.get(0)?,
        job_id: row.get(1)?,
        started_at: parse_datetime(&row.get::<String>(2)?)?,
        ended_at: parse_datetime(&row.get::<String>(3)?)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl Catalog {
    /// Register a job that moves data within `source`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Conflict` if a job with `name` exists.
    pub async fn add_job(
        &self,
        name: &str,
        source: &Source,
        context: serde_json::Value,
    ) -> Result<Job, CatalogError> {
        let session = self.session()?;
        if name.is_empty() {
            return Err(CatalogError::Invalid("job name is empty".into()));
        }
        let now = now();
        session
            .execute(
                "INSERT INTO jobs (name, source_id, context, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                libsql::params![name, source.id, context.to_string(), format_datetime(&now)],
            )
            .await
            .map_err(|e| CatalogError::from_write(e, "job", name))?;

        Ok(Job {
            id: session.conn().last_insert_rowid(),
            name: name.to_string(),
            source_id: source.id,
            context,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_job(&self, name: &str) -> Result<Job, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(&format!("SELECT {JOB_COLS} FROM jobs WHERE name = ?1"), [name])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CatalogError::not_found("job", name))?;
        row_to_job(&row)
    }

    pub async fn get_job_by_id(&self, id: i64) -> Result<Job, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(&format!("SELECT {JOB_COLS} FROM jobs WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CatalogError::not_found("job", format!("id {id}")))?;
        row_to_job(&row)
    }

    /// Record one run of `job`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` if the run ends before it starts.
    pub async fn add_job_execution(
        &self,
        job: &Job,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        status: JobExecutionStatus,
    ) -> Result<JobExecution, CatalogError> {
        let session = self.session()?;
        if ended_at < started_at {
            return Err(CatalogError::Invalid(format!(
                "execution of job '{}' ends before it starts",
                job.name
            )));
        }
        let now = now();
        let started = format_datetime(&started_at);
        let ended = format_datetime(&ended_at);
        session
            .execute(
                "INSERT INTO job_executions (job_id, started_at, ended_at, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                libsql::params![job.id, started.as_str(), ended.as_str(), status.as_str(), format_datetime(&now)],
            )
            .await
            .map_err(|e| CatalogError::from_write(e, "job execution", &job.name))?;
        tracing::debug!(job = %job.name, %status, "job execution recorded");

        Ok(JobExecution {
            id: session.conn().last_insert_rowid(),
            job_id: job.id,
            // Round-trip through the stored form so the value matches a re-read.
            started_at: parse_datetime(&started)?,
            ended_at: parse_datetime(&ended)?,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_job_execution_by_id(&self, id: i64) -> Result<JobExecution, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(
                &format!("SELECT {EXECUTION_COLS} FROM job_executions je WHERE je.id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CatalogError::not_found("job execution", format!("id {id}")))?;
        row_to_execution(&row)
    }

    /// Executions of `job`, oldest first.
    pub async fn get_job_executions(&self, job: &Job) -> Result<Vec<JobExecution>, CatalogError> {
        let session = self.session()?;
        let mut rows = session
            .query(
                &format!(
                    "SELECT {EXECUTION_COLS} FROM job_executions je
                     WHERE je.job_id = ?1 ORDER BY je.started_at, je.id"
                ),
                [job.id],
            )
            .await?;
        let mut executions = Vec::new();
        while let Some(row) = rows.next().await? {
            executions.push(row_to_execution(&row)?);
        }
        Ok(executions)
    }

    /// Latest execution of each listed job: greatest `started_at`, ties
    /// broken by the higher id. Jobs that never ran are left out.
    pub async fn get_latest_job_executions(
        &self,
        job_ids: &[i64],
    ) -> Result<Vec<JobExecution>, CatalogError> {
        let session = self.session()?;
        if job_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {EXECUTION_COLS} FROM job_executions je
             WHERE je.job_id IN ({})
               AND je.id = (
                   SELECT x.id FROM job_executions x
                   WHERE x.job_id = je.job_id
                   ORDER BY x.started_at DESC, x.id DESC
                   LIMIT 1
               )
             ORDER BY je.job_id",
            placeholders(1, job_ids.len())
        );
        let params: Vec<libsql::Value> = job_ids.iter().map(|id| (*id).into()).collect();
        let mut rows = session
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut executions = Vec::new();
        while let Some(row) = rows.next().await? {
            executions.push(row_to_execution(&row)?);
        }
        Ok(executions)
    }

    /// Delete `job` with its executions and their lineage edges.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the job no longer exists.
    pub async fn delete_job(&self, job: &Job) -> Result<(), CatalogError> {
        let session = self.session()?;
        let affected = session
            .execute("DELETE FROM jobs WHERE id = ?1", [job.id])
            .await?;
        if affected == 0 {
            return Err(CatalogError::not_found("job", job.name.clone()));
        }
        Ok(())
    }

    /// Delete the listed executions and their lineage edges. Returns the
    /// number of executions removed; unknown ids are skipped.
    pub async fn delete_job_executions(&self, ids: &[i64]) -> Result<u64, CatalogError> {
        let session = self.session()?;
        if ids.is_empty() {
            return Ok(0);
        }
        let params: Vec<libsql::Value> = ids.iter().map(|id| (*id).into()).collect();
        let affected = session
            .execute(
                &format!(
                    "DELETE FROM job_executions WHERE id IN ({})",
                    placeholders(1, ids.len())
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        Ok(affected)
    }
}
