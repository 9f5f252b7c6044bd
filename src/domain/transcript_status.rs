use std::fmt;
use std::str::FromStr;

use super::lifecycle::StatusLifecycle;
use super::transcript_event::TranscriptEventKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptStatus {
    Raw,
    Processing,
    Cleaned,
    Failed,
    Published,
    Archived,
}

impl TranscriptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptStatus::Raw => "RAW",
            TranscriptStatus::Processing => "PROCESSING",
            TranscriptStatus::Cleaned => "CLEANED",
            TranscriptStatus::Failed => "FAILED",
            TranscriptStatus::Published => "PUBLISHED",
            TranscriptStatus::Archived => "ARCHIVED",
        }
    }
}

impl StatusLifecycle for TranscriptStatus {
    type EventKind = TranscriptEventKind;

    fn allowed_events(self) -> &'static [TranscriptEventKind] {
        match self {
            TranscriptStatus::Raw => &[TranscriptEventKind::StartProcessing],
            TranscriptStatus::Processing => &[
                TranscriptEventKind::MarkCleaned,
                TranscriptEventKind::MarkFailed,
            ],
            TranscriptStatus::Cleaned => &[TranscriptEventKind::StartInsightExtraction],
            TranscriptStatus::Failed => &[TranscriptEventKind::Retry],
            TranscriptStatus::Published => &[],
            TranscriptStatus::Archived => &[],
        }
    }
}

impl FromStr for TranscriptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RAW" => Ok(TranscriptStatus::Raw),
            "PROCESSING" => Ok(TranscriptStatus::Processing),
            "CLEANED" => Ok(TranscriptStatus::Cleaned),
            "FAILED" => Ok(TranscriptStatus::Failed),
            "PUBLISHED" => Ok(TranscriptStatus::Published),
            "ARCHIVED" => Ok(TranscriptStatus::Archived),
            _ => Err(format!("Invalid transcript status: {}", s)),
        }
    }
}

impl fmt::Display for TranscriptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
