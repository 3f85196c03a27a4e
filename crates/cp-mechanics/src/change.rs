//! Planned changes and how collections apply them.

/// The outcome of planning an operation: the events that would change
/// state, plus the message to show the user.
///
/// A change with no events is advisory (for example, raising a trait that
/// is already at the largest size); the message still gets reported but
/// nothing needs to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<E> {
    /// State transitions, in the order they must be applied.
    pub events: Vec<E>,
    /// Human-readable description of the result.
    pub message: String,
}

impl<E> Change<E> {
    /// A change carrying a single event.
    pub fn one(event: E, message: impl Into<String>) -> Self {
        Self {
            events: vec![event],
            message: message.into(),
        }
    }

    /// A change carrying several events.
    pub fn many(events: Vec<E>, message: impl Into<String>) -> Self {
        Self {
            events,
            message: message.into(),
        }
    }

    /// A message with no state change.
    pub fn advisory(message: impl Into<String>) -> Self {
        Self {
            events: Vec::new(),
            message: message.into(),
        }
    }

    /// Whether applying this change would alter state.
    pub fn alters_state(&self) -> bool {
        !self.events.is_empty()
    }

    /// Convert the events into another event type, keeping the message.
    pub fn map<F>(self, f: impl FnMut(E) -> F) -> Change<F> {
        Change {
            events: self.events.into_iter().map(f).collect(),
            message: self.message,
        }
    }
}

/// A collection that can apply its own events.
pub trait Apply {
    /// The event type this collection understands.
    type Event;

    /// Apply one event to the collection.
    fn apply(&mut self, event: &Self::Event);

    /// Apply every event of a change and hand back its message.
    fn apply_change(&mut self, change: Change<Self::Event>) -> String {
        for event in &change.events {
            self.apply(event);
        }
        change.message
    }
}
