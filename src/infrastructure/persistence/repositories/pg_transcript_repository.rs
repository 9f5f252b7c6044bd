use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{RepositoryError, TranscriptRepository, TranscriptUnitOfWork};
use crate::domain::{Transcript, TranscriptId, TranscriptStatus};

const SELECT_COLUMNS: &str = "id, status, queue_job_id, processing_started_at, \
     processing_completed_at, error_message, created_at, updated_at";

pub struct PgTranscriptRepository {
    pool: PgPool,
}

impl PgTranscriptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}

fn map_row(row: &PgRow) -> Result<Transcript, RepositoryError> {
    let id: Uuid = row.try_get("id").map_err(query_failed)?;
    let status: String = row.try_get("status").map_err(query_failed)?;
    let status = status
        .parse::<TranscriptStatus>()
        .map_err(RepositoryError::QueryFailed)?;

    Ok(Transcript {
        id: TranscriptId::from_uuid(id),
        status,
        queue_job_id: row.try_get("queue_job_id").map_err(query_failed)?,
        processing_started_at: row.try_get("processing_started_at").map_err(query_failed)?,
        processing_completed_at: row
            .try_get("processing_completed_at")
            .map_err(query_failed)?,
        error_message: row.try_get("error_message").map_err(query_failed)?,
        created_at: row.try_get("created_at").map_err(query_failed)?,
        updated_at: row.try_get("updated_at").map_err(query_failed)?,
    })
}

#[async_trait]
impl TranscriptRepository for PgTranscriptRepository {
    async fn begin(&self) -> Result<Box<dyn TranscriptUnitOfWork>, RepositoryError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::TransactionFailed(e.to_string()))?;
        Ok(Box::new(PgTranscriptUnitOfWork { tx }))
    }

    #[instrument(skip(self, transcript), fields(transcript_id = %transcript.id.as_uuid()))]
    async fn create(&self, transcript: &Transcript) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO transcripts \
             (id, status, queue_job_id, processing_started_at, processing_completed_at, \
              error_message, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(transcript.id.as_uuid())
        .bind(transcript.status.as_str())
        .bind(transcript.queue_job_id.as_deref())
        .bind(transcript.processing_started_at)
        .bind(transcript.processing_completed_at)
        .bind(transcript.error_message.as_deref())
        .bind(transcript.created_at)
        .bind(transcript.updated_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self), fields(transcript_id = %id.as_uuid()))]
    async fn get_by_id(&self, id: TranscriptId) -> Result<Option<Transcript>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM transcripts WHERE id = $1"
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
        status: TranscriptStatus,
    ) -> Result<Vec<Transcript>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM transcripts \
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
    ) -> Result<Vec<Transcript>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM transcripts \
             WHERE status = $1 AND processing_started_at < $2"
        ))
        .bind(TranscriptStatus::Processing.as_str())
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.iter().map(map_row).collect()
    }
}

struct PgTranscriptUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl TranscriptUnitOfWork for PgTranscriptUnitOfWork {
    async fn find_for_update(
        &mut self,
        id: TranscriptId,
    ) -> Result<Option<Transcript>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM transcripts WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(query_failed)?;

        row.as_ref().map(map_row).transpose()
    }

    async fn persist(&mut self, transcript: &Transcript) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE transcripts \
             SET status = $1, queue_job_id = $2, processing_started_at = $3, \
                 processing_completed_at = $4, error_message = $5, updated_at = $6 \
             WHERE id = $7",
        )
        .bind(transcript.status.as_str())
        .bind(transcript.queue_job_id.as_deref())
        .bind(transcript.processing_started_at)
        .bind(transcript.processing_completed_at)
        .bind(transcript.error_message.as_deref())
        .bind(transcript.updated_at)
        .bind(transcript.id.as_uuid())
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
