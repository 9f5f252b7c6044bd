mod job_repository;
mod repository_error;
mod status_events;
mod transcript_repository;

pub use job_repository::{JobRepository, JobUnitOfWork};
pub use repository_error::RepositoryError;
pub use status_events::{EntityKind, StatusChange, StatusChangeBus, StatusChangeListener};
pub use transcript_repository::{TranscriptRepository, TranscriptUnitOfWork};
