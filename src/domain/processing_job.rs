use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{JobEvent, JobId, JobStatus};

pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// One recorded failure of a job, numbered by the attempt that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFailure {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub attempt: u32,
}

/// A background processing job (transcript cleaning, insight extraction).
/// Progress is clamped to [0, 100] on every update; `retry_count` can reach
/// `max_retries` but never exceed it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingJob {
    pub id: JobId,
    pub job_type: String,
    pub status: JobStatus,
    pub progress: i32,
    pub retry_count: u32,
    pub max_retries: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub result_count: Option<i64>,
    pub last_error: Option<JobFailure>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// RETRY was requested with no attempts left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("retry limit reached: {retry_count}/{max_retries}")]
pub struct RetryLimitReached {
    pub retry_count: u32,
    pub max_retries: u32,
}

impl ProcessingJob {
    pub fn new(job_type: String) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            job_type,
            status: JobStatus::Queued,
            progress: 0,
            retry_count: 0,
            max_retries: DEFAULT_MAX_RETRIES,
            started_at: None,
            completed_at: None,
            duration_ms: None,
            result_count: None,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a validated event. Callers must have checked the transition
    /// table first; the retry limit is the one invariant enforced here,
    /// since it depends on the counter rather than the status.
    pub fn apply(&mut self, event: JobEvent, now: DateTime<Utc>) -> Result<(), RetryLimitReached> {
        match event {
            JobEvent::Start => {
                self.status = JobStatus::Processing;
                self.started_at = Some(now);
                self.last_error = None;
            }
            JobEvent::UpdateProgress { progress } => {
                self.progress = progress.clamp(0, 100);
            }
            JobEvent::Complete { result_count } => {
                self.status = JobStatus::Completed;
                self.completed_at = Some(now);
                self.duration_ms = self
                    .started_at
                    .map(|started| (now - started).num_milliseconds());
                if result_count.is_some() {
                    self.result_count = result_count;
                }
            }
            JobEvent::Fail { error } => {
                self.last_error = Some(JobFailure {
                    message: error,
                    timestamp: now,
                    attempt: self.retry_count + 1,
                });
                if self.retry_count < self.max_retries {
                    self.status = JobStatus::Failed;
                } else {
                    self.status = JobStatus::PermanentlyFailed;
                    self.completed_at = Some(now);
                }
            }
            JobEvent::Retry => {
                if self.retry_count >= self.max_retries {
                    return Err(RetryLimitReached {
                        retry_count: self.retry_count,
                        max_retries: self.max_retries,
                    });
                }
                self.retry_count += 1;
                self.progress = 0;
                self.last_error = None;
                self.status = JobStatus::Retrying;
            }
            JobEvent::Cancel { reason } => {
                self.status = JobStatus::Cancelled;
                self.completed_at = Some(now);
                if let Some(reason) = reason {
                    self.last_error = Some(JobFailure {
                        message: reason,
                        timestamp: now,
                        attempt: self.retry_count,
                    });
                }
            }
        }
        self.updated_at = now;
        Ok(())
    }
}
