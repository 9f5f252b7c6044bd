use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Duration;

use crate::presentation::state::AppState;

use super::models::{ErrorResponse, SweepRequest, SweepResponse};

/// Sweep entrypoint for the external periodic trigger. The body may
/// override the configured staleness threshold.
#[tracing::instrument(skip(state, body))]
pub async fn sweep_handler(
    State(state): State<AppState>,
    body: Option<Json<SweepRequest>>,
) -> Response {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let max_age = request.max_age_ms.map(Duration::milliseconds);

    match state.sweeper.run_once(max_age).await {
        Ok(outcome) => (StatusCode::OK, Json(SweepResponse::from(outcome))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Stale sweep failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Sweep failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}
