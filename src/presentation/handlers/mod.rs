mod health;
mod jobs;
mod maintenance;
mod models;
mod transcripts;

pub use health::health_handler;
pub use jobs::{get_job_handler, job_event_handler, list_jobs_handler};
pub use maintenance::sweep_handler;
pub use models::{
    ErrorResponse, InvalidTransitionResponse, JobEventRequest, JobFailureResponse, JobResponse,
    StatusQuery, SweepRequest, SweepResponse, TranscriptEventRequest, TranscriptResponse,
};
pub use transcripts::{get_transcript_handler, list_transcripts_handler, transcript_event_handler};
