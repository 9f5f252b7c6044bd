use std::fmt;

/// Events a transcript can receive, one variant per kind with only the
/// fields that kind requires.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEvent {
    StartProcessing { queue_job_id: String },
    MarkCleaned,
    MarkFailed { error: String },
    StartInsightExtraction { queue_job_id: String },
    Retry,
}

impl TranscriptEvent {
    pub fn kind(&self) -> TranscriptEventKind {
        match self {
            TranscriptEvent::StartProcessing { .. } => TranscriptEventKind::StartProcessing,
            TranscriptEvent::MarkCleaned => TranscriptEventKind::MarkCleaned,
            TranscriptEvent::MarkFailed { .. } => TranscriptEventKind::MarkFailed,
            TranscriptEvent::StartInsightExtraction { .. } => {
                TranscriptEventKind::StartInsightExtraction
            }
            TranscriptEvent::Retry => TranscriptEventKind::Retry,
        }
    }
}

/// Payload-free twin of [`TranscriptEvent`], used by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptEventKind {
    StartProcessing,
    MarkCleaned,
    MarkFailed,
    StartInsightExtraction,
    Retry,
}

impl TranscriptEventKind {
    pub const ALL: [TranscriptEventKind; 5] = [
        TranscriptEventKind::StartProcessing,
        TranscriptEventKind::MarkCleaned,
        TranscriptEventKind::MarkFailed,
        TranscriptEventKind::StartInsightExtraction,
        TranscriptEventKind::Retry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptEventKind::StartProcessing => "START_PROCESSING",
            TranscriptEventKind::MarkCleaned => "MARK_CLEANED",
            TranscriptEventKind::MarkFailed => "MARK_FAILED",
            TranscriptEventKind::StartInsightExtraction => "START_INSIGHT_EXTRACTION",
            TranscriptEventKind::Retry => "RETRY",
        }
    }
}

impl fmt::Display for TranscriptEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
