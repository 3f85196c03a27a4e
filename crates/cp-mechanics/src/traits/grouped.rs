//! Named dice grouped by character, used for stress.

use crate::change::{Apply, Change};
use crate::dice::Die;
use crate::error::{TraitError, TraitResult};

use super::named::{NamedDice, NamedEvent};

/// A change to a grouped collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupedEvent {
    /// A group now exists, even if it holds nothing yet.
    GroupOpened {
        /// Group name.
        group: String,
    },
    /// A change inside one group. The group is created if it does not exist.
    Named {
        /// Group name.
        group: String,
        /// The change within the group.
        event: NamedEvent,
    },
    /// A whole group was dropped along with its entries.
    GroupCleared {
        /// Group name.
        group: String,
    },
}

/// Per-group named dice, e.g. each character's stress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedNamedDice {
    category: String,
    groups: Vec<(String, NamedDice)>,
}

impl GroupedNamedDice {
    /// An empty collection. `category` labels messages, e.g. `stress`.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            groups: Vec::new(),
        }
    }

    /// The category label.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// One group's dice.
    pub fn group(&self, group: &str) -> Option<&NamedDice> {
        self.groups.iter().find(|(g, _)| g == group).map(|(_, d)| d)
    }

    /// Every group in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NamedDice)> {
        self.groups.iter().map(|(g, d)| (g.as_str(), d))
    }

    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Plan adding a die to a group, creating the group if needed.
    pub fn add(&self, group: &str, name: &str, die: Die) -> Change<GroupedEvent> {
        match self.group(group) {
            Some(dice) => Self::wrap(group, dice.add(name, die)),
            None => {
                let mut change = Self::wrap(group, self.fresh(group).add(name, die));
                change.events.insert(
                    0,
                    GroupedEvent::GroupOpened {
                        group: group.to_string(),
                    },
                );
                change
            }
        }
    }

    /// Plan removing an entry from a group.
    pub fn remove(&self, group: &str, name: &str) -> TraitResult<Change<GroupedEvent>> {
        Ok(Self::wrap(group, self.require(group)?.remove(name)?))
    }

    /// Plan stepping an entry up.
    pub fn step_up(&self, group: &str, name: &str) -> TraitResult<Change<GroupedEvent>> {
        Ok(Self::wrap(group, self.require(group)?.step_up(name)?))
    }

    /// Plan stepping an entry down, removing it from d4.
    pub fn step_down(&self, group: &str, name: &str) -> TraitResult<Change<GroupedEvent>> {
        Ok(Self::wrap(group, self.require(group)?.step_down(name)?))
    }

    /// Plan dropping a whole group.
    pub fn clear(&self, group: &str) -> TraitResult<Change<GroupedEvent>> {
        self.require(group)?;
        Ok(Change::one(
            GroupedEvent::GroupCleared {
                group: group.to_string(),
            },
            format!("Cleared all {} for {group}.", self.category),
        ))
    }

    /// Plan dropping every group.
    pub fn clear_all(&self) -> Change<GroupedEvent> {
        let events = self
            .groups
            .iter()
            .map(|(group, _)| GroupedEvent::GroupCleared {
                group: group.clone(),
            })
            .collect();
        Change::many(events, format!("Cleared all {}.", self.category))
    }

    fn open(&mut self, group: &str) -> usize {
        match self.groups.iter().position(|(g, _)| g == group) {
            Some(index) => index,
            None => {
                let fresh = self.fresh(group);
                self.groups.push((group.to_string(), fresh));
                self.groups.len() - 1
            }
        }
    }

    fn fresh(&self, group: &str) -> NamedDice {
        NamedDice::new(format!("{} for {group}", self.category))
    }

    fn require(&self, group: &str) -> TraitResult<&NamedDice> {
        self.group(group).ok_or_else(|| TraitError::HasNone {
            name: group.to_string(),
            category: self.category.clone(),
        })
    }

    fn wrap(group: &str, change: Change<NamedEvent>) -> Change<GroupedEvent> {
        change.map(|event| GroupedEvent::Named {
            group: group.to_string(),
            event,
        })
    }
}

impl Apply for GroupedNamedDice {
    type Event = GroupedEvent;

    fn apply(&mut self, event: &GroupedEvent) {
        match event {
            GroupedEvent::GroupOpened { group } => {
                self.open(group);
            }
            GroupedEvent::Named { group, event } => {
                let index = self.open(group);
                self.groups[index].1.apply(event);
            }
            GroupedEvent::GroupCleared { group } => self.groups.retain(|(g, _)| g != group),
        }
    }
}
