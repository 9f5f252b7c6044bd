use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::services::{SweepOutcome, TransitionError};
use crate::domain::{
    JobEvent, JobFailure, ProcessingJob, StatusLifecycle, Transcript, TranscriptEvent,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Diagnostic body for rejected transitions, detailed enough for a UI to
/// show the caller what would have been accepted.
#[derive(Debug, Serialize)]
pub struct InvalidTransitionResponse {
    pub error: String,
    pub current_status: String,
    pub requested_event: String,
    pub allowed_events: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscriptEventRequest {
    StartProcessing { queue_job_id: String },
    MarkCleaned,
    MarkFailed { error: String },
    StartInsightExtraction { queue_job_id: String },
    Retry,
}

impl From<TranscriptEventRequest> for TranscriptEvent {
    fn from(request: TranscriptEventRequest) -> Self {
        match request {
            TranscriptEventRequest::StartProcessing { queue_job_id } => {
                TranscriptEvent::StartProcessing { queue_job_id }
            }
            TranscriptEventRequest::MarkCleaned => TranscriptEvent::MarkCleaned,
            TranscriptEventRequest::MarkFailed { error } => TranscriptEvent::MarkFailed { error },
            TranscriptEventRequest::StartInsightExtraction { queue_job_id } => {
                TranscriptEvent::StartInsightExtraction { queue_job_id }
            }
            TranscriptEventRequest::Retry => TranscriptEvent::Retry,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobEventRequest {
    Start,
    UpdateProgress {
        progress: i32,
    },
    Complete {
        #[serde(default)]
        result_count: Option<i64>,
    },
    Fail {
        error: String,
    },
    Retry,
    Cancel {
        #[serde(default)]
        reason: Option<String>,
    },
}

impl From<JobEventRequest> for JobEvent {
    fn from(request: JobEventRequest) -> Self {
        match request {
            JobEventRequest::Start => JobEvent::Start,
            JobEventRequest::UpdateProgress { progress } => JobEvent::UpdateProgress { progress },
            JobEventRequest::Complete { result_count } => JobEvent::Complete { result_count },
            JobEventRequest::Fail { error } => JobEvent::Fail { error },
            JobEventRequest::Retry => JobEvent::Retry,
            JobEventRequest::Cancel { reason } => JobEvent::Cancel { reason },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub id: String,
    pub status: String,
    pub queue_job_id: Option<String>,
    pub processing_started_at: Option<String>,
    pub processing_completed_at: Option<String>,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub available_events: Vec<String>,
}

impl From<&Transcript> for TranscriptResponse {
    fn from(transcript: &Transcript) -> Self {
        Self {
            id: transcript.id.as_uuid().to_string(),
            status: transcript.status.as_str().to_string(),
            queue_job_id: transcript.queue_job_id.clone(),
            processing_started_at: transcript.processing_started_at.map(|t| t.to_rfc3339()),
            processing_completed_at: transcript.processing_completed_at.map(|t| t.to_rfc3339()),
            error_message: transcript.error_message.clone(),
            created_at: transcript.created_at.to_rfc3339(),
            updated_at: transcript.updated_at.to_rfc3339(),
            available_events: transcript
                .status
                .allowed_events()
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobFailureResponse {
    pub message: String,
    pub timestamp: String,
    pub attempt: u32,
}

impl From<&JobFailure> for JobFailureResponse {
    fn from(failure: &JobFailure) -> Self {
        Self {
            message: failure.message.clone(),
            timestamp: failure.timestamp.to_rfc3339(),
            attempt: failure.attempt,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: String,
    pub job_type: String,
    pub status: String,
    pub progress: i32,
    pub retry_count: u32,
    pub max_retries: u32,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub duration_ms: Option<i64>,
    pub result_count: Option<i64>,
    pub last_error: Option<JobFailureResponse>,
    pub created_at: String,
    pub updated_at: String,
    pub available_events: Vec<String>,
}

impl From<&ProcessingJob> for JobResponse {
    fn from(job: &ProcessingJob) -> Self {
        Self {
            id: job.id.as_uuid().to_string(),
            job_type: job.job_type.clone(),
            status: job.status.as_str().to_string(),
            progress: job.progress,
            retry_count: job.retry_count,
            max_retries: job.max_retries,
            started_at: job.started_at.map(|t| t.to_rfc3339()),
            completed_at: job.completed_at.map(|t| t.to_rfc3339()),
            duration_ms: job.duration_ms,
            result_count: job.result_count,
            last_error: job.last_error.as_ref().map(JobFailureResponse::from),
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
            available_events: job
                .status
                .allowed_events()
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SweepRequest {
    pub max_age_ms: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub transcripts_failed: usize,
    pub jobs_failed: usize,
    pub total: usize,
}

impl From<SweepOutcome> for SweepResponse {
    fn from(outcome: SweepOutcome) -> Self {
        Self {
            transcripts_failed: outcome.transcripts_failed,
            jobs_failed: outcome.jobs_failed,
            total: outcome.total(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

/// Maps a façade error onto the HTTP surface: validation conflicts are 409
/// with full diagnostics, persistence failures surface as 500 unchanged.
pub fn transition_error_response<S, K>(error: TransitionError<S, K>) -> Response
where
    S: fmt::Display + fmt::Debug,
    K: fmt::Display + fmt::Debug + 'static,
{
    match error {
        TransitionError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Entity not found: {}", id),
            }),
        )
            .into_response(),
        TransitionError::InvalidTransition {
            current,
            event,
            allowed,
        } => (
            StatusCode::CONFLICT,
            Json(InvalidTransitionResponse {
                error: format!("Event {} is not allowed from status {}", event, current),
                current_status: current.to_string(),
                requested_event: event.to_string(),
                allowed_events: allowed.iter().map(|k| k.to_string()).collect(),
            }),
        )
            .into_response(),
        TransitionError::RetryLimitExceeded {
            retry_count,
            max_retries,
        } => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("Retry limit reached: {}/{}", retry_count, max_retries),
            }),
        )
            .into_response(),
        TransitionError::Repository(e) => {
            tracing::error!(error = %e, "Transition failed in the repository");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Persistence failure: {}", e),
                }),
            )
                .into_response()
        }
    }
}
