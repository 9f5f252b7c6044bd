use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use turnstile::application::ports::StatusChangeBus;
use turnstile::application::services::{JobStateMachine, StaleSweeper, TranscriptStateMachine};
use turnstile::infrastructure::observability::{LogStatusChanges, TracingConfig, init_tracing};
use turnstile::infrastructure::persistence::{PgJobRepository, PgTranscriptRepository, create_pool};
use turnstile::presentation::middleware::{FixedWindowCounter, RateLimit};
use turnstile::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;

    let tracing_config = TracingConfig {
        json_format: settings.logging.json_format,
        ..TracingConfig::default()
    };
    init_tracing(tracing_config, settings.server.port);

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    sqlx::migrate!().run(&pool).await?;

    let mut bus = StatusChangeBus::new();
    bus.subscribe(Arc::new(LogStatusChanges));
    let bus = Arc::new(bus);

    let transcripts = Arc::new(TranscriptStateMachine::new(
        Arc::new(PgTranscriptRepository::new(pool.clone())),
        Arc::clone(&bus),
    ));
    let jobs = Arc::new(JobStateMachine::new(
        Arc::new(PgJobRepository::new(pool.clone())),
        Arc::clone(&bus),
    ));

    let sweeper = Arc::new(StaleSweeper::new(
        Arc::clone(&transcripts),
        Arc::clone(&jobs),
        chrono::Duration::minutes(settings.sweeper.max_age_minutes),
    ));
    if settings.sweeper.enabled {
        tokio::spawn(
            Arc::clone(&sweeper).run(Duration::from_secs(settings.sweeper.interval_secs)),
        );
    }

    let rate_limit = RateLimit::new(
        settings.rate_limit.max_requests,
        Arc::new(FixedWindowCounter::new(Duration::from_secs(
            settings.rate_limit.window_secs,
        ))),
    );

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;

    let state = AppState {
        transcripts,
        jobs,
        sweeper,
        rate_limit,
        settings,
    };
    let router = create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
