#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use turnstile::application::ports::{
    JobRepository, RepositoryError, StatusChange, StatusChangeBus, StatusChangeListener,
    TranscriptRepository, TranscriptUnitOfWork,
};
use turnstile::application::services::{JobStateMachine, TranscriptStateMachine};
use turnstile::domain::{
    JobStatus, ProcessingJob, Transcript, TranscriptId, TranscriptStatus,
};
use turnstile::infrastructure::persistence::{InMemoryJobRepository, InMemoryTranscriptRepository};

/// Bus listener that records every published change for assertions.
#[derive(Default)]
pub struct RecordedChanges(Mutex<Vec<StatusChange>>);

impl RecordedChanges {
    pub fn take(&self) -> Vec<StatusChange> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl StatusChangeListener for RecordedChanges {
    fn on_status_change(&self, change: &StatusChange) {
        self.0.lock().unwrap().push(change.clone());
    }
}

pub fn recording_bus() -> (Arc<StatusChangeBus>, Arc<RecordedChanges>) {
    let changes = Arc::new(RecordedChanges::default());
    let mut bus = StatusChangeBus::new();
    bus.subscribe(Arc::clone(&changes) as Arc<dyn StatusChangeListener>);
    (Arc::new(bus), changes)
}

pub fn transcript_machine() -> (
    Arc<InMemoryTranscriptRepository>,
    TranscriptStateMachine,
    Arc<RecordedChanges>,
) {
    let repository = Arc::new(InMemoryTranscriptRepository::new());
    let (bus, changes) = recording_bus();
    let machine = TranscriptStateMachine::new(
        Arc::clone(&repository) as Arc<dyn TranscriptRepository>,
        bus,
    );
    (repository, machine, changes)
}

pub fn job_machine() -> (
    Arc<InMemoryJobRepository>,
    JobStateMachine,
    Arc<RecordedChanges>,
) {
    let repository = Arc::new(InMemoryJobRepository::new());
    let (bus, changes) = recording_bus();
    let machine = JobStateMachine::new(Arc::clone(&repository) as Arc<dyn JobRepository>, bus);
    (repository, machine, changes)
}

pub fn transcript_with_status(status: TranscriptStatus) -> Transcript {
    let mut transcript = Transcript::new();
    transcript.status = status;
    if status == TranscriptStatus::Processing {
        transcript.processing_started_at = Some(Utc::now());
        transcript.queue_job_id = Some("job-queue-1".to_string());
    }
    transcript
}

pub fn processing_transcript_started_at(started_at: DateTime<Utc>) -> Transcript {
    let mut transcript = transcript_with_status(TranscriptStatus::Processing);
    transcript.processing_started_at = Some(started_at);
    transcript
}

pub fn job_with_status(status: JobStatus) -> ProcessingJob {
    let mut job = ProcessingJob::new("clean_transcript".to_string());
    job.status = status;
    if status == JobStatus::Processing {
        job.started_at = Some(Utc::now());
    }
    job
}

pub fn processing_job_started_at(started_at: DateTime<Utc>) -> ProcessingJob {
    let mut job = job_with_status(JobStatus::Processing);
    job.started_at = Some(started_at);
    job
}

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(minutes)
}

/// Transcript repository wrapper whose unit of work refuses to persist one
/// poisoned row, for exercising per-entity failure isolation in sweeps.
pub struct PersistFailingRepository {
    pub inner: Arc<InMemoryTranscriptRepository>,
    pub poisoned: TranscriptId,
}

#[async_trait]
impl TranscriptRepository for PersistFailingRepository {
    async fn begin(&self) -> Result<Box<dyn TranscriptUnitOfWork>, RepositoryError> {
        let inner = self.inner.begin().await?;
        Ok(Box::new(PersistFailingUnitOfWork {
            inner,
            poisoned: self.poisoned,
        }))
    }

    async fn create(&self, transcript: &Transcript) -> Result<(), RepositoryError> {
        self.inner.create(transcript).await
    }

    async fn get_by_id(&self, id: TranscriptId) -> Result<Option<Transcript>, RepositoryError> {
        self.inner.get_by_id(id).await
    }

    async fn list_by_status(
        &self,
        status: TranscriptStatus,
    ) -> Result<Vec<Transcript>, RepositoryError> {
        self.inner.list_by_status(status).await
    }

    async fn list_processing_started_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transcript>, RepositoryError> {
        self.inner.list_processing_started_before(cutoff).await
    }
}

struct PersistFailingUnitOfWork {
    inner: Box<dyn TranscriptUnitOfWork>,
    poisoned: TranscriptId,
}

#[async_trait]
impl TranscriptUnitOfWork for PersistFailingUnitOfWork {
    async fn find_for_update(
        &mut self,
        id: TranscriptId,
    ) -> Result<Option<Transcript>, RepositoryError> {
        self.inner.find_for_update(id).await
    }

    async fn persist(&mut self, transcript: &Transcript) -> Result<(), RepositoryError> {
        if transcript.id == self.poisoned {
            return Err(RepositoryError::QueryFailed("disk full".to_string()));
        }
        self.inner.persist(transcript).await
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.inner.commit().await
    }
}
