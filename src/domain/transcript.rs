use chrono::{DateTime, Utc};

use super::{TranscriptEvent, TranscriptId, TranscriptStatus};

/// A raw transcript moving through the cleaning and insight-extraction
/// pipeline. `queue_job_id` correlates to the background job working on it
/// and is only set while the transcript is in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub id: TranscriptId,
    pub status: TranscriptStatus,
    pub queue_job_id: Option<String>,
    pub processing_started_at: Option<DateTime<Utc>>,
    pub processing_completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transcript {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: TranscriptId::new(),
            status: TranscriptStatus::Raw,
            queue_job_id: None,
            processing_started_at: None,
            processing_completed_at: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a validated event. Callers must have checked the transition
    /// table first; this only performs the bookkeeping for the event.
    pub fn apply(&mut self, event: TranscriptEvent, now: DateTime<Utc>) {
        match event {
            TranscriptEvent::StartProcessing { queue_job_id }
            | TranscriptEvent::StartInsightExtraction { queue_job_id } => {
                self.status = TranscriptStatus::Processing;
                self.queue_job_id = Some(queue_job_id);
                self.processing_started_at = Some(now);
                self.processing_completed_at = None;
                self.error_message = None;
            }
            TranscriptEvent::MarkCleaned => {
                self.status = TranscriptStatus::Cleaned;
                self.processing_completed_at = Some(now);
                self.queue_job_id = None;
            }
            TranscriptEvent::MarkFailed { error } => {
                self.status = TranscriptStatus::Failed;
                self.processing_completed_at = Some(now);
                self.error_message = Some(error);
                self.queue_job_id = None;
            }
            TranscriptEvent::Retry => {
                self.status = TranscriptStatus::Raw;
                self.queue_job_id = None;
                self.processing_started_at = None;
                self.processing_completed_at = None;
                self.error_message = None;
            }
        }
        self.updated_at = now;
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
