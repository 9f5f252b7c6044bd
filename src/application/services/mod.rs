mod job_machine;
mod stale_sweeper;
mod transcript_machine;
mod transition_error;

pub use job_machine::{JobStateMachine, JobTransitionError};
pub use stale_sweeper::{StaleSweeper, SweepOutcome};
pub use transcript_machine::{TranscriptStateMachine, TranscriptTransitionError};
pub use transition_error::TransitionError;

/// Error recorded on entities the sweeper force-fails.
pub const STALE_PROCESSING_ERROR: &str = "processing exceeded timeout";
