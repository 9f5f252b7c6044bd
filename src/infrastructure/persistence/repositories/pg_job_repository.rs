use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobRepository, JobUnitOfWork, RepositoryError};
use crate::domain::{JobFailure, JobId, JobStatus, ProcessingJob};

const SELECT_COLUMNS: &str = "id, job_type, status, progress, retry_count, max_retries, \
     started_at, completed_at, duration_ms, result_count, last_error, created_at, updated_at";

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}

fn map_row(row: &PgRow) -> Result<ProcessingJob, RepositoryError> {
    let id: Uuid = row.try_get("id").map_err(query_failed)?;
    let status: String = row.try_get("status").map_err(query_failed)?;
    let status = status
        .parse::<JobStatus>()
        .map_err(RepositoryError::QueryFailed)?;
    let retry_count: i32 = row.try_get("retry_count").map_err(query_failed)?;
    let max_retries: i32 = row.try_get("max_retries").map_err(query_failed)?;
    let last_error: Option<Json<JobFailure>> = row.try_get("last_error").map_err(query_failed)?;

    Ok(ProcessingJob {
        id: JobId::from_uuid(id),
        job_type: row.try_get("job_type").map_err(query_failed)?,
        status,
        progress: row.try_get("progress").map_err(query_failed)?,
        retry_count: retry_count.max(0) as u32,
        max_retries: max_retries.max(0) as u32,
        started_at: row.try_get("started_at").map_err(query_failed)?,
        completed_at: row.try_get("completed_at").map_err(query_failed)?,
        duration_ms: row.try_get("duration_ms").map_err(query_failed)?,
        result_count: row.try_get("result_count").map_err(query_failed)?,
        last_error: last_error.map(|j| j.0),
        created_at: row.try_get("created_at").map_err(query_failed)?,
        updated_at: row.try_get("updated_at").map_err(query_failed)?,
    })
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn begin(&self) -> Result<Box<dyn JobUnitOfWork>, RepositoryError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::TransactionFailed(e.to_string()))?;
        Ok(Box::new(PgJobUnitOfWork { tx }))
    }

    #[instrument(skip(self, job), fields(job_id = %job.id.as_uuid()))]
    async fn create(&self, job: &ProcessingJob) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO processing_jobs \
             (id, job_type, status, progress, retry_count, max_retries, started_at, \
              completed_at, duration_ms, result_count, last_error, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(job.id.as_uuid())
        .bind(&job.job_type)
        .bind(job.status.as_str())
        .bind(job.progress)
        .bind(job.retry_count as i32)
        .bind(job.max_retries as i32)
        .bind(job.started_at)
        .bind(job.completed_at)
        .bind(job.duration_ms)
        .bind(job.result_count)
        .bind(job.last_error.as_ref().map(Json))
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid()))]
    async fn get_by_id(&self, id: JobId) -> Result<Option<ProcessingJob>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM processing_jobs WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.as_ref().map(map_row).transpose()
    }

    #[instrument(skip(self), fields(status = %status))]
    async fn list_by_status(
        &self,
        status: JobStatus,
    ) -> Result<Vec<ProcessingJob>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM processing_jobs \
             WHERE status = $1 ORDER BY created_at DESC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.iter().map(map_row).collect()
    }

    #[instrument(skip(self))]
    async fn list_processing_started_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ProcessingJob>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM processing_jobs \
             WHERE status = $1 AND started_at < $2"
        ))
        .bind(JobStatus::Processing.as_str())
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.iter().map(map_row).collect()
    }
}

struct PgJobUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl JobUnitOfWork for PgJobUnitOfWork {
    async fn find_for_update(
        &mut self,
        id: JobId,
    ) -> Result<Option<ProcessingJob>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM processing_jobs WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(query_failed)?;

        row.as_ref().map(map_row).transpose()
    }

    async fn persist(&mut self, job: &ProcessingJob) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE processing_jobs \
             SET status = $1, progress = $2, retry_count = $3, started_at = $4, \
                 completed_at = $5, duration_ms = $6, result_count = $7, last_error = $8, \
                 updated_at = $9 \
             WHERE id = $10",
        )
        .bind(job.status.as_str())
        .bind(job.progress)
        .bind(job.retry_count as i32)
        .bind(job.started_at)
        .bind(job.completed_at)
        .bind(job.duration_ms)
        .bind(job.result_count)
        .bind(job.last_error.as_ref().map(Json))
        .bind(job.updated_at)
        .bind(job.id.as_uuid())
        .execute(&mut *self.tx)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx
            .commit()
            .await
            .map_err(|e| RepositoryError::TransactionFailed(e.to_string()))
    }
}
