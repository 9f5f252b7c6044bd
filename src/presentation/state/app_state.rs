use std::sync::Arc;

use crate::application::services::{JobStateMachine, StaleSweeper, TranscriptStateMachine};
use crate::presentation::config::Settings;
use crate::presentation::middleware::RateLimit;

#[derive(Clone)]
pub struct AppState {
    pub transcripts: Arc<TranscriptStateMachine>,
    pub jobs: Arc<JobStateMachine>,
    pub sweeper: Arc<StaleSweeper>,
    pub rate_limit: RateLimit,
    pub settings: Settings,
}
