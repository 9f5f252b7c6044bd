use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    get_job_handler, get_transcript_handler, health_handler, job_event_handler,
    list_jobs_handler, list_transcripts_handler, sweep_handler, transcript_event_handler,
};
use crate::presentation::middleware::rate_limit_middleware;
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/transcripts", get(list_transcripts_handler))
        .route("/api/v1/transcripts/{id}", get(get_transcript_handler))
        .route(
            "/api/v1/transcripts/{id}/events",
            post(transcript_event_handler),
        )
        .route("/api/v1/jobs", get(list_jobs_handler))
        .route("/api/v1/jobs/{id}", get(get_job_handler))
        .route("/api/v1/jobs/{id}/events", post(job_event_handler))
        .route("/api/v1/maintenance/sweep", post(sweep_handler));

    if state.settings.rate_limit.enabled {
        router = router.layer(axum::middleware::from_fn_with_state(
            state.rate_limit.clone(),
            rate_limit_middleware,
        ));
    }

    router
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
