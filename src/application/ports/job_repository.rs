use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{JobId, JobStatus, ProcessingJob};

use super::RepositoryError;

/// Persistence port for processing jobs. Mirrors the transcript port; the
/// two entity families live in separate tables and never share a unit of
/// work.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn JobUnitOfWork>, RepositoryError>;

    async fn create(&self, job: &ProcessingJob) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<ProcessingJob>, RepositoryError>;

    async fn list_by_status(&self, status: JobStatus)
        -> Result<Vec<ProcessingJob>, RepositoryError>;

    /// Jobs in `processing` whose start timestamp is older than `cutoff`.
    async fn list_processing_started_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ProcessingJob>, RepositoryError>;
}

#[async_trait]
pub trait JobUnitOfWork: Send {
    async fn find_for_update(
        &mut self,
        id: JobId,
    ) -> Result<Option<ProcessingJob>, RepositoryError>;

    async fn persist(&mut self, job: &ProcessingJob) -> Result<(), RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}
