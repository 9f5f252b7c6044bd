use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Transcript,
    ProcessingJob,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Transcript => "transcript",
            EntityKind::ProcessingJob => "processing_job",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A committed transition, published after the unit of work succeeds.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub entity: EntityKind,
    pub id: Uuid,
    pub event: &'static str,
    pub from: &'static str,
    pub to: &'static str,
    pub occurred_at: DateTime<Utc>,
}

/// Side-effect hook for committed transitions (logging, analytics).
/// Listeners are infallible by signature: a listener cannot fail or undo a
/// transition that already committed.
pub trait StatusChangeListener: Send + Sync {
    fn on_status_change(&self, change: &StatusChange);
}

/// Explicit listener registry. All subscriptions happen at startup, before
/// the bus is shared; there is no runtime discovery.
#[derive(Default)]
pub struct StatusChangeBus {
    listeners: Vec<Arc<dyn StatusChangeListener>>,
}

impl StatusChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Arc<dyn StatusChangeListener>) {
        self.listeners.push(listener);
    }

    pub fn publish(&self, change: &StatusChange) {
        for listener in &self.listeners {
            listener.on_status_change(change);
        }
    }
}
