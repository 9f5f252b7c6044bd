mod in_memory_repository;
mod pg_job_repository;
mod pg_transcript_repository;

pub use in_memory_repository::{InMemoryJobRepository, InMemoryTranscriptRepository};
pub use pg_job_repository::PgJobRepository;
pub use pg_transcript_repository::PgTranscriptRepository;
