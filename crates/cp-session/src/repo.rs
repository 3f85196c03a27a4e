//! Mapping between a game's collections and store rows.
//!
//! The row index remembers which row holds which piece of state so that a
//! planned change can be turned into a batch of [`Write`]s. Callers plan on
//! a clone of the index and keep it only once the batch has committed.

use std::collections::HashMap;

use cp_core::{
    CollectionRecord, DieRecord, GameRecord, OptionRecord, ResourceRecord, RowId, Store, Write,
};
use cp_mechanics::{Die, DieSize, GroupedEvent, NamedEvent, PoolEvent, ResourceEvent};

use crate::error::SessionResult;

/// Collection category for complications.
pub(crate) const COMPLICATION: &str = "complication";
/// Collection category for assets.
pub(crate) const ASSET: &str = "asset";
/// Collection category for stress; the group is the character.
pub(crate) const STRESS: &str = "stress";
/// Collection category for dice pools; the group is the pool name.
pub(crate) const POOL: &str = "pool";
/// Resource category for plot points.
pub(crate) const PLOT_POINTS: &str = "plot points";
/// Resource category for experience.
pub(crate) const XP: &str = "xp";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CollectionKey {
    category: String,
    group: Option<String>,
}

impl CollectionKey {
    fn new(category: &str, group: Option<&str>) -> Self {
        Self {
            category: category.to_string(),
            group: group.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DieKey {
    Named(String),
    Size(DieSize),
}

/// Row IDs for everything a game has stored.
#[derive(Debug, Clone, Default)]
pub(crate) struct RowIndex {
    collections: HashMap<CollectionKey, RowId>,
    dice: HashMap<(RowId, DieKey), RowId>,
    resources: HashMap<(String, String), RowId>,
    options: HashMap<String, RowId>,
}

impl RowIndex {
    /// Writes for a change to a named collection such as assets.
    pub(crate) fn named_writes(
        &mut self,
        game: RowId,
        category: &str,
        group: Option<&str>,
        events: &[NamedEvent],
    ) -> Vec<Write> {
        let key = CollectionKey::new(category, group);
        let mut writes = Vec::new();
        for event in events {
            match event {
                NamedEvent::Set { name, die } => {
                    let collection = self.collection(game, &key, &mut writes);
                    let id = self.die_row(collection, DieKey::Named(name.clone()));
                    writes.push(Write::PutDie(die_record(id, Some(name), *die, collection)));
                }
                NamedEvent::Removed { name } => {
                    if let Some(id) = self.drop_die(&key, DieKey::Named(name.clone())) {
                        writes.push(Write::DeleteDie(id));
                    }
                }
            }
        }
        writes
    }

    /// Writes for a change to stress.
    pub(crate) fn grouped_writes(&mut self, game: RowId, events: &[GroupedEvent]) -> Vec<Write> {
        let mut writes = Vec::new();
        for event in events {
            match event {
                GroupedEvent::GroupOpened { group } => {
                    let key = CollectionKey::new(STRESS, Some(group.as_str()));
                    self.collection(game, &key, &mut writes);
                }
                GroupedEvent::Named { group, event } => {
                    let batch = self.named_writes(
                        game,
                        STRESS,
                        Some(group.as_str()),
                        std::slice::from_ref(event),
                    );
                    writes.extend(batch);
                }
                GroupedEvent::GroupCleared { group } => {
                    if let Some(id) = self.drop_collection(STRESS, Some(group.as_str())) {
                        writes.push(Write::DeleteCollection(id));
                    }
                }
            }
        }
        writes
    }

    /// Writes for a change to a dice pool, creating its collection row on
    /// first use even when no dice move.
    pub(crate) fn pool_writes(
        &mut self,
        game: RowId,
        pool: &str,
        events: &[PoolEvent],
    ) -> Vec<Write> {
        let key = CollectionKey::new(POOL, Some(pool));
        let mut writes = Vec::new();
        let collection = self.collection(game, &key, &mut writes);
        for event in events {
            match event {
                PoolEvent::Set(die) => {
                    let id = self.die_row(collection, DieKey::Size(die.size));
                    writes.push(Write::PutDie(die_record(id, None, *die, collection)));
                }
                PoolEvent::Emptied(size) => {
                    if let Some(id) = self.drop_die(&key, DieKey::Size(*size)) {
                        writes.push(Write::DeleteDie(id));
                    }
                }
            }
        }
        writes
    }

    /// Writes removing a pool entirely.
    pub(crate) fn drop_pool(&mut self, pool: &str) -> Vec<Write> {
        self.drop_collection(POOL, Some(pool))
            .map(Write::DeleteCollection)
            .into_iter()
            .collect()
    }

    /// Writes for a change to plot points or experience.
    pub(crate) fn resource_writes(
        &mut self,
        game: RowId,
        category: &str,
        events: &[ResourceEvent],
    ) -> Vec<Write> {
        let mut writes = Vec::new();
        for event in events {
            match event {
                ResourceEvent::Set { name, quantity } => {
                    let id = *self
                        .resources
                        .entry((category.to_string(), name.clone()))
                        .or_insert_with(RowId::new);
                    writes.push(Write::PutResource(ResourceRecord {
                        id,
                        category: category.to_string(),
                        name: name.clone(),
                        quantity: *quantity,
                        game,
                    }));
                }
                ResourceEvent::Cleared { name } => {
                    if let Some(id) = self.resources.remove(&(category.to_string(), name.clone())) {
                        writes.push(Write::DeleteResource(id));
                    }
                }
            }
        }
        writes
    }

    /// Write setting an option.
    pub(crate) fn option_write(&mut self, game: RowId, key: &str, value: &str) -> Write {
        let id = *self
            .options
            .entry(key.to_string())
            .or_insert_with(RowId::new);
        Write::PutOption(OptionRecord {
            id,
            key: key.to_string(),
            value: value.to_string(),
            game,
        })
    }

    /// Writes deleting every collection and resource, leaving options.
    pub(crate) fn clean_writes(&mut self) -> Vec<Write> {
        let collections = self.collections.drain().map(|(_, id)| Write::DeleteCollection(id));
        let resources = self.resources.drain().map(|(_, id)| Write::DeleteResource(id));
        let writes = collections.chain(resources).collect();
        self.dice.clear();
        writes
    }

    fn collection(&mut self, game: RowId, key: &CollectionKey, writes: &mut Vec<Write>) -> RowId {
        if let Some(id) = self.collections.get(key) {
            return *id;
        }
        let id = RowId::new();
        self.collections.insert(key.clone(), id);
        writes.push(Write::PutCollection(CollectionRecord {
            id,
            category: key.category.clone(),
            group: key.group.clone(),
            parent: game,
        }));
        id
    }

    fn die_row(&mut self, collection: RowId, key: DieKey) -> RowId {
        *self.dice.entry((collection, key)).or_insert_with(RowId::new)
    }

    fn drop_die(&mut self, collection: &CollectionKey, key: DieKey) -> Option<RowId> {
        let collection = *self.collections.get(collection)?;
        self.dice.remove(&(collection, key))
    }

    fn drop_collection(&mut self, category: &str, group: Option<&str>) -> Option<RowId> {
        let id = self.collections.remove(&CollectionKey::new(category, group))?;
        self.dice.retain(|(collection, _), _| *collection != id);
        Some(id)
    }
}

fn die_record(id: RowId, name: Option<&String>, die: Die, collection: RowId) -> DieRecord {
    DieRecord {
        id,
        name: name.cloned(),
        size: die.size.faces(),
        quantity: die.quantity,
        collection,
    }
}

/// A stored die, read back.
pub(crate) struct LoadedDie {
    pub(crate) name: Option<String>,
    pub(crate) die: Die,
}

/// A stored collection, read back.
pub(crate) struct LoadedCollection {
    pub(crate) category: String,
    pub(crate) group: Option<String>,
    pub(crate) dice: Vec<LoadedDie>,
}

/// Every row belonging to one game.
pub(crate) struct LoadedGame {
    pub(crate) record: GameRecord,
    pub(crate) options: Vec<(String, String)>,
    pub(crate) collections: Vec<LoadedCollection>,
    pub(crate) resources: Vec<(String, String, u32)>,
    pub(crate) rows: RowIndex,
}

/// Read a game's rows, rebuilding the row index as it goes. Rows that no
/// longer make sense (unknown sizes, zero quantities) are skipped.
pub(crate) fn load(store: &dyn Store, record: GameRecord) -> SessionResult<LoadedGame> {
    let mut rows = RowIndex::default();

    let mut options = Vec::new();
    for option in store.options_of(record.id)? {
        rows.options.insert(option.key.clone(), option.id);
        options.push((option.key, option.value));
    }

    let mut collections = Vec::new();
    for collection in store.collections_of(record.id)? {
        let key = CollectionKey::new(&collection.category, collection.group.as_deref());
        rows.collections.insert(key, collection.id);

        let mut dice = Vec::new();
        for row in store.dice_of(collection.id)? {
            let die = DieSize::from_faces(row.size)
                .and_then(|size| Die::many(size, row.quantity).ok());
            let Some(die) = die else {
                tracing::warn!(
                    die = %row.id,
                    size = row.size,
                    quantity = row.quantity,
                    "skipping unreadable die row"
                );
                continue;
            };
            let key = match &row.name {
                Some(name) => DieKey::Named(name.clone()),
                None => DieKey::Size(die.size),
            };
            rows.dice.insert((collection.id, key), row.id);
            dice.push(LoadedDie {
                name: row.name,
                die,
            });
        }
        collections.push(LoadedCollection {
            category: collection.category,
            group: collection.group,
            dice,
        });
    }

    let mut resources = Vec::new();
    for resource in store.resources_of(record.id)? {
        rows.resources
            .insert((resource.category.clone(), resource.name.clone()), resource.id);
        resources.push((resource.category, resource.name, resource.quantity));
    }

    Ok(LoadedGame {
        record,
        options,
        collections,
        resources,
        rows,
    })
}
