use std::fmt;

/// Status vocabulary of an entity driven through named events.
///
/// Implementors supply the static transition table via [`allowed_events`];
/// validation and introspection are derived from it. An empty allowed set
/// marks a terminal status.
///
/// [`allowed_events`]: StatusLifecycle::allowed_events
pub trait StatusLifecycle: Copy + Eq + fmt::Display {
    type EventKind: Copy + Eq + fmt::Debug + fmt::Display + 'static;

    /// Event kinds permitted from this status.
    fn allowed_events(self) -> &'static [Self::EventKind];

    fn can_transition(self, kind: Self::EventKind) -> bool {
        self.allowed_events().contains(&kind)
    }

    fn is_terminal(self) -> bool {
        self.allowed_events().is_empty()
    }
}
