mod job_event;
mod job_id;
mod job_status;
mod lifecycle;
mod processing_job;
mod transcript;
mod transcript_event;
mod transcript_id;
mod transcript_status;

pub use job_event::{JobEvent, JobEventKind};
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use lifecycle::StatusLifecycle;
pub use processing_job::{DEFAULT_MAX_RETRIES, JobFailure, ProcessingJob, RetryLimitReached};
pub use transcript::Transcript;
pub use transcript_event::{TranscriptEvent, TranscriptEventKind};
pub use transcript_id::TranscriptId;
pub use transcript_status::TranscriptStatus;
