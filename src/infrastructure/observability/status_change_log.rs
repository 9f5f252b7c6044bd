use crate::application::ports::{StatusChange, StatusChangeListener};

/// Bus subscriber that emits one structured log line per committed
/// transition. Registered at startup alongside any analytics listeners.
pub struct LogStatusChanges;

impl StatusChangeListener for LogStatusChanges {
    fn on_status_change(&self, change: &StatusChange) {
        tracing::info!(
            entity = %change.entity,
            id = %change.id,
            event = change.event,
            from = change.from,
            to = change.to,
            "Status changed"
        );
    }
}
