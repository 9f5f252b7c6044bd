use std::fmt;
use std::str::FromStr;

use super::job_event::JobEventKind;
use super::lifecycle::StatusLifecycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Queued,
    Pending,
    Processing,
    Failed,
    Retrying,
    Completed,
    Cancelled,
    PermanentlyFailed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Failed => "failed",
            JobStatus::Retrying => "retrying",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
            JobStatus::PermanentlyFailed => "permanently_failed",
        }
    }
}

impl StatusLifecycle for JobStatus {
    type EventKind = JobEventKind;

    fn allowed_events(self) -> &'static [JobEventKind] {
        match self {
            JobStatus::Queued | JobStatus::Pending => &[JobEventKind::Start, JobEventKind::Cancel],
            JobStatus::Processing => &[
                JobEventKind::UpdateProgress,
                JobEventKind::Complete,
                JobEventKind::Fail,
                JobEventKind::Cancel,
            ],
            JobStatus::Failed => &[JobEventKind::Retry, JobEventKind::Cancel],
            JobStatus::Retrying => &[JobEventKind::Start],
            JobStatus::Completed | JobStatus::Cancelled | JobStatus::PermanentlyFailed => &[],
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobStatus::Queued),
            "pending" => Ok(JobStatus::Pending),
            "processing" => Ok(JobStatus::Processing),
            "failed" => Ok(JobStatus::Failed),
            "retrying" => Ok(JobStatus::Retrying),
            "completed" => Ok(JobStatus::Completed),
            "cancelled" => Ok(JobStatus::Cancelled),
            "permanently_failed" => Ok(JobStatus::PermanentlyFailed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
