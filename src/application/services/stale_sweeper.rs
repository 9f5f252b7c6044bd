use std::sync::Arc;

use chrono::Duration;
use tracing::instrument;

use crate::application::ports::RepositoryError;

use super::{JobStateMachine, TranscriptStateMachine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    pub transcripts_failed: usize,
    pub jobs_failed: usize,
}

impl SweepOutcome {
    pub fn total(&self) -> usize {
        self.transcripts_failed + self.jobs_failed
    }
}

/// Batch remediation for entities stuck in an in-progress status. Each
/// entity is swept through the ordinary transition path, so per-entity
/// failures are isolated and the invariants hold for forced failures too.
pub struct StaleSweeper {
    transcripts: Arc<TranscriptStateMachine>,
    jobs: Arc<JobStateMachine>,
    max_age: Duration,
}

impl StaleSweeper {
    pub fn new(
        transcripts: Arc<TranscriptStateMachine>,
        jobs: Arc<JobStateMachine>,
        max_age: Duration,
    ) -> Self {
        Self {
            transcripts,
            jobs,
            max_age,
        }
    }

    #[instrument(skip(self))]
    pub async fn run_once(
        &self,
        max_age_override: Option<Duration>,
    ) -> Result<SweepOutcome, RepositoryError> {
        let max_age = max_age_override.unwrap_or(self.max_age);
        let transcripts_failed = self.transcripts.cleanup_stale_processing(max_age).await?;
        let jobs_failed = self.jobs.cleanup_stale_processing(max_age).await?;

        let outcome = SweepOutcome {
            transcripts_failed,
            jobs_failed,
        };
        if outcome.total() > 0 {
            tracing::info!(
                transcripts_failed = outcome.transcripts_failed,
                jobs_failed = outcome.jobs_failed,
                "Stale sweep transitioned stuck entities"
            );
        }
        Ok(outcome)
    }

    /// Periodic trigger loop, spawned by the hosting binary. Ticks until
    /// the process exits; a failed sweep is logged and the next tick runs
    /// normally.
    pub async fn run(self: Arc<Self>, interval: std::time::Duration) {
        tracing::info!(interval_secs = interval.as_secs(), "Stale sweeper started");
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = self.run_once(None).await {
                tracing::error!(error = %e, "Stale sweep failed");
            }
        }
    }
}
