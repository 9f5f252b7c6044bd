use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Transcript, TranscriptId, TranscriptStatus};

use super::RepositoryError;

/// Persistence port for transcripts.
///
/// `begin` opens the unit of work every transition runs inside; the read
/// accessors are single-shot queries outside any transaction.
#[async_trait]
pub trait TranscriptRepository: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn TranscriptUnitOfWork>, RepositoryError>;

    async fn create(&self, transcript: &Transcript) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: TranscriptId) -> Result<Option<Transcript>, RepositoryError>;

    async fn list_by_status(
        &self,
        status: TranscriptStatus,
    ) -> Result<Vec<Transcript>, RepositoryError>;

    /// Transcripts in PROCESSING whose start timestamp is older than `cutoff`.
    async fn list_processing_started_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transcript>, RepositoryError>;
}

/// One atomic load-validate-mutate sequence. Dropping without `commit`
/// abandons the transaction.
#[async_trait]
pub trait TranscriptUnitOfWork: Send {
    /// Loads the transcript with a write lock held for the remainder of the
    /// unit of work, so concurrent transitions on the same row serialize.
    async fn find_for_update(
        &mut self,
        id: TranscriptId,
    ) -> Result<Option<Transcript>, RepositoryError>;

    async fn persist(&mut self, transcript: &Transcript) -> Result<(), RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}
