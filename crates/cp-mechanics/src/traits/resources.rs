//! Named counters such as plot points and experience.

use crate::change::{Apply, Change};
use crate::error::{TraitError, TraitResult};

/// A change to one counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceEvent {
    /// The counter now holds this amount, inserting it if new.
    Set {
        /// Holder name.
        name: String,
        /// New amount.
        quantity: u32,
    },
    /// The counter is gone.
    Cleared {
        /// Holder name.
        name: String,
    },
}

/// Non-negative counters per holder, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    category: String,
    entries: Vec<(String, u32)>,
}

impl Resources {
    /// An empty set of counters. `category` labels messages, e.g. `plot points`.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            entries: Vec::new(),
        }
    }

    /// The category label.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Current amount for a holder.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, q)| *q)
    }

    /// All counters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(n, q)| (n.as_str(), *q))
    }

    /// Whether there are no counters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plan adding to a counter, creating it if needed.
    pub fn add(&self, name: &str, quantity: u32) -> Change<ResourceEvent> {
        let total = self.get(name).unwrap_or(0).saturating_add(quantity);
        self.set(name, total)
    }

    /// Plan taking from a counter. Asking for more than is held is an
    /// error and leaves the counter as it was.
    pub fn remove(&self, name: &str, quantity: u32) -> TraitResult<Change<ResourceEvent>> {
        let current = self.get(name).ok_or_else(|| self.has_none(name))?;
        if current < quantity {
            return Err(TraitError::HasOnly {
                name: name.to_string(),
                current,
                category: self.category.clone(),
            });
        }
        Ok(self.set(name, current - quantity))
    }

    /// Plan dropping a counter entirely.
    pub fn clear(&self, name: &str) -> TraitResult<Change<ResourceEvent>> {
        self.get(name).ok_or_else(|| self.has_none(name))?;
        Ok(Change::one(
            ResourceEvent::Cleared {
                name: name.to_string(),
            },
            format!("Cleared {} for {name}.", self.category),
        ))
    }

    /// Plan dropping every counter.
    pub fn clear_all(&self) -> Change<ResourceEvent> {
        let events = self
            .entries
            .iter()
            .map(|(name, _)| ResourceEvent::Cleared { name: name.clone() })
            .collect();
        Change::many(events, format!("Cleared all {}.", self.category))
    }

    /// One line per counter, e.g. `Amy: 3`.
    pub fn lines(&self) -> Vec<String> {
        self.iter().map(|(name, q)| format!("{name}: {q}")).collect()
    }

    fn set(&self, name: &str, quantity: u32) -> Change<ResourceEvent> {
        Change::one(
            ResourceEvent::Set {
                name: name.to_string(),
                quantity,
            },
            format!("{name} now has {quantity} {}", self.category),
        )
    }

    fn has_none(&self, name: &str) -> TraitError {
        TraitError::HasNone {
            name: name.to_string(),
            category: self.category.clone(),
        }
    }
}

impl Apply for Resources {
    type Event = ResourceEvent;

    fn apply(&mut self, event: &ResourceEvent) {
        match event {
            ResourceEvent::Set { name, quantity } => {
                match self.entries.iter_mut().find(|(n, _)| n == name) {
                    Some((_, held)) => *held = *quantity,
                    None => self.entries.push((name.clone(), *quantity)),
                }
            }
            ResourceEvent::Cleared { name } => self.entries.retain(|(n, _)| n != name),
        }
    }
}
