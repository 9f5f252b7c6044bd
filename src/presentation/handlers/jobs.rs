use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::domain::{JobId, JobStatus};
use crate::presentation::state::AppState;

use super::models::{
    ErrorResponse, JobEventRequest, JobResponse, StatusQuery, transition_error_response,
};

#[tracing::instrument(skip(state, body))]
pub async fn job_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<JobEventRequest>,
) -> Response {
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid job ID: {}", id),
                }),
            )
                .into_response();
        }
    };

    match state
        .jobs
        .transition(JobId::from_uuid(uuid), body.into())
        .await
    {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from(&job))).into_response(),
        Err(e) => transition_error_response(e),
    }
}

#[tracing::instrument(skip(state))]
pub async fn get_job_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid job ID: {}", id),
                }),
            )
                .into_response();
        }
    };

    match state.jobs.get(JobId::from_uuid(uuid)).await {
        Ok(Some(job)) => (StatusCode::OK, Json(JobResponse::from(&job))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Job not found: {}", id),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch job: {}", e),
                }),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn list_jobs_handler(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Response {
    let status = match query.status.parse::<JobStatus>() {
        Ok(s) => s,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })).into_response();
        }
    };

    match state.jobs.list_by_status(status).await {
        Ok(jobs) => {
            let response: Vec<JobResponse> = jobs.iter().map(JobResponse::from).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list jobs");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list jobs: {}", e),
                }),
            )
                .into_response()
        }
    }
}
