use std::fmt;

/// Events a processing job can receive.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Start,
    UpdateProgress { progress: i32 },
    Complete { result_count: Option<i64> },
    Fail { error: String },
    Retry,
    Cancel { reason: Option<String> },
}

impl JobEvent {
    pub fn kind(&self) -> JobEventKind {
        match self {
            JobEvent::Start => JobEventKind::Start,
            JobEvent::UpdateProgress { .. } => JobEventKind::UpdateProgress,
            JobEvent::Complete { .. } => JobEventKind::Complete,
            JobEvent::Fail { .. } => JobEventKind::Fail,
            JobEvent::Retry => JobEventKind::Retry,
            JobEvent::Cancel { .. } => JobEventKind::Cancel,
        }
    }
}

/// Payload-free twin of [`JobEvent`], used by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobEventKind {
    Start,
    UpdateProgress,
    Complete,
    Fail,
    Retry,
    Cancel,
}

impl JobEventKind {
    pub const ALL: [JobEventKind; 6] = [
        JobEventKind::Start,
        JobEventKind::UpdateProgress,
        JobEventKind::Complete,
        JobEventKind::Fail,
        JobEventKind::Retry,
        JobEventKind::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobEventKind::Start => "START",
            JobEventKind::UpdateProgress => "UPDATE_PROGRESS",
            JobEventKind::Complete => "COMPLETE",
            JobEventKind::Fail => "FAIL",
            JobEventKind::Retry => "RETRY",
            JobEventKind::Cancel => "CANCEL",
        }
    }
}

impl fmt::Display for JobEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
