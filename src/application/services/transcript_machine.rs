use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::instrument;

use crate::application::ports::{
    EntityKind, RepositoryError, StatusChange, StatusChangeBus, TranscriptRepository,
};
use crate::domain::{
    StatusLifecycle, Transcript, TranscriptEvent, TranscriptEventKind, TranscriptId,
    TranscriptStatus,
};

use super::{STALE_PROCESSING_ERROR, TransitionError};

pub type TranscriptTransitionError = TransitionError<TranscriptStatus, TranscriptEventKind>;

/// Sole mutation entrypoint for transcript statuses. Every transition runs
/// its load-validate-mutate sequence inside one unit of work on the
/// repository; committed transitions are published on the bus.
pub struct TranscriptStateMachine {
    repository: Arc<dyn TranscriptRepository>,
    bus: Arc<StatusChangeBus>,
}

impl TranscriptStateMachine {
    pub fn new(repository: Arc<dyn TranscriptRepository>, bus: Arc<StatusChangeBus>) -> Self {
        Self { repository, bus }
    }

    #[instrument(skip(self, event), fields(transcript_id = %id.as_uuid(), event = %event.kind()))]
    pub async fn transition(
        &self,
        id: TranscriptId,
        event: TranscriptEvent,
    ) -> Result<Transcript, TranscriptTransitionError> {
        let mut uow = self.repository.begin().await?;
        let mut transcript = uow
            .find_for_update(id)
            .await?
            .ok_or_else(|| TransitionError::NotFound(id.as_uuid()))?;

        let kind = event.kind();
        if !transcript.status.can_transition(kind) {
            return Err(TransitionError::InvalidTransition {
                current: transcript.status,
                event: kind,
                allowed: transcript.status.allowed_events(),
            });
        }

        let from = transcript.status;
        let now = Utc::now();
        transcript.apply(event, now);
        uow.persist(&transcript).await?;
        uow.commit().await?;

        self.bus.publish(&StatusChange {
            entity: EntityKind::Transcript,
            id: id.as_uuid(),
            event: kind.as_str(),
            from: from.as_str(),
            to: transcript.status.as_str(),
            occurred_at: now,
        });

        Ok(transcript)
    }

    pub fn can_transition(status: TranscriptStatus, kind: TranscriptEventKind) -> bool {
        status.can_transition(kind)
    }

    pub fn available_transitions(status: TranscriptStatus) -> &'static [TranscriptEventKind] {
        status.allowed_events()
    }

    pub async fn get(&self, id: TranscriptId) -> Result<Option<Transcript>, RepositoryError> {
        self.repository.get_by_id(id).await
    }

    pub async fn list_by_status(
        &self,
        status: TranscriptStatus,
    ) -> Result<Vec<Transcript>, RepositoryError> {
        self.repository.list_by_status(status).await
    }

    /// Force-fails transcripts stuck in PROCESSING longer than `max_age`.
    /// Returns how many were transitioned; a transcript that refuses the
    /// transition is logged and skipped so it cannot block the sweep.
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
        for transcript in stale {
            let event = TranscriptEvent::MarkFailed {
                error: STALE_PROCESSING_ERROR.to_string(),
            };
            match self.transition(transcript.id, event).await {
                Ok(_) => failed += 1,
                Err(e) => tracing::warn!(
                    transcript_id = %transcript.id.as_uuid(),
                    error = %e,
                    "Skipping stale transcript that could not be failed"
                ),
            }
        }
        Ok(failed)
    }
}
