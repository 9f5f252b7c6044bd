use std::fmt;

use uuid::Uuid;

use crate::application::ports::RepositoryError;

/// Error surface of the state-machine façades, generic over the status and
/// event-kind vocabulary of the entity family.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError<S, K>
where
    S: fmt::Display + fmt::Debug,
    K: fmt::Display + fmt::Debug + 'static,
{
    #[error("entity not found: {0}")]
    NotFound(Uuid),
    #[error("event {event} is not allowed from status {current} (allowed: {allowed:?})")]
    InvalidTransition {
        current: S,
        event: K,
        allowed: &'static [K],
    },
    #[error("retry limit reached: {retry_count}/{max_retries}")]
    RetryLimitExceeded { retry_count: u32, max_retries: u32 },
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
