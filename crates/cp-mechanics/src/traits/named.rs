//! Named single-die traits such as complications and assets.

use serde::{Deserialize, Serialize};

use crate::change::{Apply, Change};
use crate::dice::Die;
use crate::error::{TraitError, TraitResult};

/// A change to one named trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedEvent {
    /// The trait now has this die, inserting it if new.
    Set {
        /// Trait name.
        name: String,
        /// Its die.
        die: Die,
    },
    /// The trait is gone.
    Removed {
        /// Trait name.
        name: String,
    },
}

/// Named dice of one category, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedDice {
    category: String,
    entries: Vec<(String, Die)>,
}

impl NamedDice {
    /// An empty collection. `category` labels messages, e.g. `complication`.
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

    /// The die for a trait.
    pub fn get(&self, name: &str) -> Option<&Die> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    /// All traits in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Die)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Number of traits.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no traits.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plan adding a trait. A new name is inserted; an existing one is
    /// combined with the incoming die, unless it is already at d12.
    pub fn add(&self, name: &str, die: Die) -> Change<NamedEvent> {
        let Some(existing) = self.get(name) else {
            return Change::one(
                NamedEvent::Set {
                    name: name.to_string(),
                    die,
                },
                format!("New {}: {die} {name}", self.category),
            );
        };
        if existing.is_max() {
            return Change::advisory(format!(
                "{name} is already {existing} and cannot be raised any further."
            ));
        }
        let mut raised = *existing;
        raised.combine(die);
        Change::one(
            NamedEvent::Set {
                name: name.to_string(),
                die: raised,
            },
            format!("Raised {}: {raised} {name}", self.category),
        )
    }

    /// Plan removing a trait.
    pub fn remove(&self, name: &str) -> TraitResult<Change<NamedEvent>> {
        let die = self.require(name)?;
        Ok(Change::one(
            NamedEvent::Removed {
                name: name.to_string(),
            },
            format!("Removed {}: {die} {name}", self.category),
        ))
    }

    /// Plan stepping a trait up one size.
    pub fn step_up(&self, name: &str) -> TraitResult<Change<NamedEvent>> {
        let die = self.require(name)?;
        if die.is_max() {
            return Ok(Change::advisory(format!(
                "{name} is already {die} and cannot be stepped up."
            )));
        }
        let mut stepped = die;
        stepped.step_up();
        Ok(Change::one(
            NamedEvent::Set {
                name: name.to_string(),
                die: stepped,
            },
            format!("Stepped up {}: {stepped} {name}", self.category),
        ))
    }

    /// Plan stepping a trait down one size. Stepping down a d4 removes it.
    pub fn step_down(&self, name: &str) -> TraitResult<Change<NamedEvent>> {
        let die = self.require(name)?;
        if die.is_min() {
            return Ok(Change::one(
                NamedEvent::Removed {
                    name: name.to_string(),
                },
                format!("Stepped down and removed {}: {name}", self.category),
            ));
        }
        let mut stepped = die;
        stepped.step_down();
        Ok(Change::one(
            NamedEvent::Set {
                name: name.to_string(),
                die: stepped,
            },
            format!("Stepped down {}: {stepped} {name}", self.category),
        ))
    }

    /// Plan removing every trait.
    pub fn clear(&self) -> Change<NamedEvent> {
        let events = self
            .entries
            .iter()
            .map(|(name, _)| NamedEvent::Removed { name: name.clone() })
            .collect();
        Change::many(events, format!("Cleared all {}s.", self.category))
    }

    /// One line per trait, e.g. `D8 Broken Arm`.
    pub fn lines(&self) -> Vec<String> {
        self.iter().map(|(name, die)| format!("{die} {name}")).collect()
    }

    fn require(&self, name: &str) -> TraitResult<Die> {
        self.get(name).copied().ok_or_else(|| TraitError::NotFound {
            category: self.category.clone(),
            name: name.to_string(),
        })
    }
}

impl Apply for NamedDice {
    type Event = NamedEvent;

    fn apply(&mut self, event: &NamedEvent) {
        match event {
            NamedEvent::Set { name, die } => {
                match self.entries.iter_mut().find(|(n, _)| n == name) {
                    Some((_, held)) => *held = *die,
                    None => self.entries.push((name.clone(), *die)),
                }
            }
            NamedEvent::Removed { name } => self.entries.retain(|(n, _)| n != name),
        }
    }
}
