use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::instrument;

use crate::application::ports::{
    EntityKind, JobRepository, RepositoryError, StatusChange, StatusChangeBus,
};
use crate::domain::{JobEvent, JobEventKind, JobId, JobStatus, ProcessingJob, StatusLifecycle};

use super::{STALE_PROCESSING_ERROR, TransitionError};

pub type JobTransitionError = TransitionError<JobStatus, JobEventKind>;

/// Sole mutation entrypoint for processing-job statuses. Structurally the
/// twin of the transcript machine; the two differ only in their status
/// vocabulary and event bookkeeping.
pub struct JobStateMachine {
    repository: Arc<dyn JobRepository>,
    bus: Arc<StatusChangeBus>,
}

impl JobStateMachine {
    pub fn new(repository: Arc<dyn JobRepository>, bus: Arc<StatusChangeBus>) -> Self {
        Self { repository, bus }
    }

    #[instrument(skip(self, event), fields(job_id = %id.as_uuid(), event = %event.kind()))]
    pub async fn transition(
        &self,
        id: JobId,
        event: JobEvent,
    ) -> Result<ProcessingJob, JobTransitionError> {
        let mut uow = self.repository.begin().await?;
        let mut job = uow
            .find_for_update(id)
            .await?
            .ok_or_else(|| TransitionError::NotFound(id.as_uuid()))?;

        let kind = event.kind();
        if !job.status.can_transition(kind) {
            return Err(TransitionError::InvalidTransition {
                current: job.status,
                event: kind,
                allowed: job.status.allowed_events(),
            });
        }

        let from = job.status;
        let now = Utc::now();
        job.apply(event, now)
            .map_err(|e| TransitionError::RetryLimitExceeded {
                retry_count: e.retry_count,
                max_retries: e.max_retries,
            })?;
        uow.persist(&job).await?;
        uow.commit().await?;

        self.bus.publish(&StatusChange {
            entity: EntityKind::ProcessingJob,
            id: id.as_uuid(),
            event: kind.as_str(),
            from: from.as_str(),
            to: job.status.as_str(),
            occurred_at: now,
        });

        Ok(job)
    }

    pub fn can_transition(status: JobStatus, kind: JobEventKind) -> bool {
        status.can_transition(kind)
    }

    pub fn available_transitions(status: JobStatus) -> &'static [JobEventKind] {
        status.allowed_events()
    }

    pub async fn get(&self, id: JobId) -> Result<Option<ProcessingJob>, RepositoryError> {
        self.repository.get_by_id(id).await
    }

    pub async fn list_by_status(
        &self,
        status: JobStatus,
    ) -> Result<Vec<ProcessingJob>, RepositoryError> {
        self.repository.list_by_status(status).await
    }

    /// Force-fails jobs stuck in `processing` longer than `max_age`.
    #[instrument(skip(self))]
    pub async fn cleanup_stale_processing(
        &self,
        max_age: Duration,
    ) -> Result<usize, RepositoryError> {
        let cutoff = Utc::now() - max_age;
        let stale = self
            .repository
            .list_processing_started_before(cutoff)
            .await?;

        let mut failed = 0;
        for job in stale {
            let event = JobEvent::Fail {
                error: STALE_PROCESSING_ERROR.to_string(),
            };
            match self.transition(job.id, event).await {
                Ok(_) => failed += 1,
                Err(e) => tracing::warn!(
                    job_id = %job.id.as_uuid(),
                    error = %e,
                    "Skipping stale job that could not be failed"
                ),
            }
        }
        Ok(failed)
    }
}
