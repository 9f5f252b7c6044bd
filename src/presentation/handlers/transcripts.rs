use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::domain::{TranscriptId, TranscriptStatus};
use crate::presentation::state::AppState;

use super::models::{
    ErrorResponse, StatusQuery, TranscriptEventRequest, TranscriptResponse,
    transition_error_response,
};

#[tracing::instrument(skip(state, body))]
pub async fn transcript_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<TranscriptEventRequest>,
) -> Response {
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid transcript ID: {}", id),
                }),
            )
                .into_response();
        }
    };

    match state
        .transcripts
        .transition(TranscriptId::from_uuid(uuid), body.into())
        .await
    {
        Ok(transcript) => {
            (StatusCode::OK, Json(TranscriptResponse::from(&transcript))).into_response()
        }
        Err(e) => transition_error_response(e),
    }
}

#[tracing::instrument(skip(state))]
pub async fn get_transcript_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid transcript ID: {}", id),
                }),
            )
                .into_response();
        }
    };

    match state.transcripts.get(TranscriptId::from_uuid(uuid)).await {
        Ok(Some(transcript)) => {
            (StatusCode::OK, Json(TranscriptResponse::from(&transcript))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Transcript not found: {}", id),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch transcript");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch transcript: {}", e),
                }),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn list_transcripts_handler(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Response {
    let status = match query.status.parse::<TranscriptStatus>() {
        Ok(s) => s,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })).into_response();
        }
    };

    match state.transcripts.list_by_status(status).await {
        Ok(transcripts) => {
            let response: Vec<TranscriptResponse> =
                transcripts.iter().map(TranscriptResponse::from).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list transcripts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list transcripts: {}", e),
                }),
            )
                .into_response()
        }
    }
}
