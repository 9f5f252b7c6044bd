use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::application::ports::{
    JobRepository, JobUnitOfWork, RepositoryError, TranscriptRepository, TranscriptUnitOfWork,
};
use crate::domain::{
    JobId, JobStatus, ProcessingJob, Transcript, TranscriptId, TranscriptStatus,
};

/// In-memory repositories backing tests and scaffold runs. A single async
/// mutex stands in for the database: a unit of work holds the guard until
/// commit or drop, so two transitions on the same store serialize exactly
/// like two transactions would.
pub struct InMemoryTranscriptRepository {
    rows: Arc<Mutex<HashMap<TranscriptId, Transcript>>>,
}

impl InMemoryTranscriptRepository {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryTranscriptRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptRepository for InMemoryTranscriptRepository {
    async fn begin(&self) -> Result<Box<dyn TranscriptUnitOfWork>, RepositoryError> {
        let rows = Arc::clone(&self.rows).lock_owned().await;
        Ok(Box::new(InMemoryTranscriptUnitOfWork { rows }))
    }

    async fn create(&self, transcript: &Transcript) -> Result<(), RepositoryError> {
        self.rows
            .lock()
            .await
            .insert(transcript.id, transcript.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: TranscriptId) -> Result<Option<Transcript>, RepositoryError> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn list_by_status(
        &self,
        status: TranscriptStatus,
    ) -> Result<Vec<Transcript>, RepositoryError> {
        let rows = self.rows.lock().await;
        let mut matching: Vec<Transcript> = rows
            .values()
            .filter(|t| t.status == status)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn list_processing_started_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transcript>, RepositoryError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .values()
            .filter(|t| {
                t.status == TranscriptStatus::Processing
                    && t.processing_started_at.is_some_and(|s| s < cutoff)
            })
            .cloned()
            .collect())
    }
}

struct InMemoryTranscriptUnitOfWork {
    rows: OwnedMutexGuard<HashMap<TranscriptId, Transcript>>,
}

#[async_trait]
impl TranscriptUnitOfWork for InMemoryTranscriptUnitOfWork {
    async fn find_for_update(
        &mut self,
        id: TranscriptId,
    ) -> Result<Option<Transcript>, RepositoryError> {
        Ok(self.rows.get(&id).cloned())
    }

    async fn persist(&mut self, transcript: &Transcript) -> Result<(), RepositoryError> {
        self.rows.insert(transcript.id, transcript.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        // dropping the guard releases the store
        Ok(())
    }
}

pub struct InMemoryJobRepository {
    rows: Arc<Mutex<HashMap<JobId, ProcessingJob>>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryJobRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn begin(&self) -> Result<Box<dyn JobUnitOfWork>, RepositoryError> {
        let rows = Arc::clone(&self.rows).lock_owned().await;
        Ok(Box::new(InMemoryJobUnitOfWork { rows }))
    }

    async fn create(&self, job: &ProcessingJob) -> Result<(), RepositoryError> {
        self.rows.lock().await.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<ProcessingJob>, RepositoryError> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn list_by_status(
        &self,
        status: JobStatus,
    ) -> Result<Vec<ProcessingJob>, RepositoryError> {
        let rows = self.rows.lock().await;
        let mut matching: Vec<ProcessingJob> = rows
            .values()
            .filter(|j| j.status == status)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn list_processing_started_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ProcessingJob>, RepositoryError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .values()
            .filter(|j| {
                j.status == JobStatus::Processing && j.started_at.is_some_and(|s| s < cutoff)
            })
            .cloned()
            .collect())
    }
}

struct InMemoryJobUnitOfWork {
    rows: OwnedMutexGuard<HashMap<JobId, ProcessingJob>>,
}

#[async_trait]
impl JobUnitOfWork for InMemoryJobUnitOfWork {
    async fn find_for_update(
        &mut self,
        id: JobId,
    ) -> Result<Option<ProcessingJob>, RepositoryError> {
        Ok(self.rows.get(&id).cloned())
    }

    async fn persist(&mut self, job: &ProcessingJob) -> Result<(), RepositoryError> {
        self.rows.insert(job.id, job.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        Ok(())
    }
}
