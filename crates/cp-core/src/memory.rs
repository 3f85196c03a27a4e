use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::id::RowId;
use crate::record::{CollectionRecord, DieRecord, GameRecord, OptionRecord, ResourceRecord};
use crate::store::{Store, Write};

/// Every row of every table, flattened in insertion order.
///
/// This is the on-disk shape used by [`crate::JsonStore`]. Replaying a
/// snapshot in field order rebuilds an identical [`MemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Game rows.
    pub games: Vec<GameRecord>,
    /// Option rows.
    pub options: Vec<OptionRecord>,
    /// Dice collection rows.
    pub collections: Vec<CollectionRecord>,
    /// Die rows.
    pub dice: Vec<DieRecord>,
    /// Resource rows.
    pub resources: Vec<ResourceRecord>,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    games: HashMap<RowId, GameRecord>,
    options: HashMap<RowId, OptionRecord>,
    collections: HashMap<RowId, CollectionRecord>,
    dice: HashMap<RowId, DieRecord>,
    resources: HashMap<RowId, ResourceRecord>,

    // Indexes
    game_order: Vec<RowId>,
    by_channel: HashMap<(u64, u64), RowId>,
    options_by_game: HashMap<RowId, Vec<RowId>>,
    collections_by_game: HashMap<RowId, Vec<RowId>>,
    dice_by_collection: HashMap<RowId, Vec<RowId>>,
    resources_by_game: HashMap<RowId, Vec<RowId>>,
}

impl Tables {
    fn apply(&mut self, write: Write) -> StoreResult<()> {
        match write {
            Write::PutGame(record) => self.put_game(record),
            Write::DeleteGame(id) => {
                self.delete_game(id);
                Ok(())
            }
            Write::PutOption(record) => {
                self.require_game("option", record.id, record.game)?;
                put_child(
                    &mut self.options,
                    &mut self.options_by_game,
                    record.id,
                    record.game,
                    record,
                    |r| r.game,
                );
                Ok(())
            }
            Write::DeleteOption(id) => {
                delete_child(&mut self.options, &mut self.options_by_game, id, |r| r.game);
                Ok(())
            }
            Write::PutCollection(record) => {
                self.require_game("collection", record.id, record.parent)?;
                put_child(
                    &mut self.collections,
                    &mut self.collections_by_game,
                    record.id,
                    record.parent,
                    record,
                    |r| r.parent,
                );
                Ok(())
            }
            Write::DeleteCollection(id) => {
                self.delete_collection(id);
                Ok(())
            }
            Write::PutDie(record) => {
                if !self.collections.contains_key(&record.collection) {
                    return Err(StoreError::MissingParent {
                        table: "die",
                        id: record.id,
                        parent: record.collection,
                    });
                }
                put_child(
                    &mut self.dice,
                    &mut self.dice_by_collection,
                    record.id,
                    record.collection,
                    record,
                    |r| r.collection,
                );
                Ok(())
            }
            Write::DeleteDie(id) => {
                delete_child(&mut self.dice, &mut self.dice_by_collection, id, |r| {
                    r.collection
                });
                Ok(())
            }
            Write::PutResource(record) => {
                self.require_game("resource", record.id, record.game)?;
                put_child(
                    &mut self.resources,
                    &mut self.resources_by_game,
                    record.id,
                    record.game,
                    record,
                    |r| r.game,
                );
                Ok(())
            }
            Write::DeleteResource(id) => {
                delete_child(&mut self.resources, &mut self.resources_by_game, id, |r| {
                    r.game
                });
                Ok(())
            }
        }
    }

    fn require_game(&self, table: &'static str, id: RowId, parent: RowId) -> StoreResult<()> {
        if self.games.contains_key(&parent) {
            Ok(())
        } else {
            Err(StoreError::MissingParent { table, id, parent })
        }
    }

    fn put_game(&mut self, record: GameRecord) -> StoreResult<()> {
        let key = (record.server, record.channel);
        if self
            .by_channel
            .get(&key)
            .is_some_and(|existing| *existing != record.id)
        {
            return Err(StoreError::DuplicateGame {
                server: record.server,
                channel: record.channel,
            });
        }

        match self.games.get(&record.id) {
            Some(old) => {
                self.by_channel.remove(&(old.server, old.channel));
            }
            None => self.game_order.push(record.id),
        }
        self.by_channel.insert(key, record.id);
        self.games.insert(record.id, record);
        Ok(())
    }

    fn delete_game(&mut self, id: RowId) {
        let Some(game) = self.games.remove(&id) else {
            return;
        };
        self.by_channel.remove(&(game.server, game.channel));
        self.game_order.retain(|g| *g != id);

        for option in self.options_by_game.remove(&id).unwrap_or_default() {
            self.options.remove(&option);
        }
        for resource in self.resources_by_game.remove(&id).unwrap_or_default() {
            self.resources.remove(&resource);
        }
        for collection in self.collections_by_game.remove(&id).unwrap_or_default() {
            self.collections.remove(&collection);
            for die in self.dice_by_collection.remove(&collection).unwrap_or_default() {
                self.dice.remove(&die);
            }
        }
    }

    fn delete_collection(&mut self, id: RowId) {
        delete_child(
            &mut self.collections,
            &mut self.collections_by_game,
            id,
            |r| r.parent,
        );
        for die in self.dice_by_collection.remove(&id).unwrap_or_default() {
            self.dice.remove(&die);
        }
    }

    fn children<R: Clone>(
        rows: &HashMap<RowId, R>,
        index: &HashMap<RowId, Vec<RowId>>,
        parent: RowId,
    ) -> Vec<R> {
        index
            .get(&parent)
            .map(|ids| ids.iter().filter_map(|id| rows.get(id)).cloned().collect())
            .unwrap_or_default()
    }
}

/// Insert or replace a child row, keeping the parent index in insertion order.
fn put_child<R>(
    rows: &mut HashMap<RowId, R>,
    index: &mut HashMap<RowId, Vec<RowId>>,
    id: RowId,
    parent: RowId,
    record: R,
    parent_of: impl Fn(&R) -> RowId,
) {
    match rows.get(&id).map(&parent_of) {
        Some(old_parent) if old_parent == parent => {}
        Some(old_parent) => {
            detach(index, old_parent, id);
            index.entry(parent).or_default().push(id);
        }
        None => index.entry(parent).or_default().push(id),
    }
    rows.insert(id, record);
}

fn delete_child<R>(
    rows: &mut HashMap<RowId, R>,
    index: &mut HashMap<RowId, Vec<RowId>>,
    id: RowId,
    parent_of: impl Fn(&R) -> RowId,
) {
    if let Some(record) = rows.remove(&id) {
        detach(index, parent_of(&record), id);
    }
}

fn detach(index: &mut HashMap<RowId, Vec<RowId>>, parent: RowId, id: RowId) {
    if let Some(ids) = index.get_mut(&parent) {
        ids.retain(|child| *child != id);
        if ids.is_empty() {
            index.remove(&parent);
        }
    }
}

/// A store that keeps every table in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Tables,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store by replaying a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> StoreResult<Self> {
        let mut tables = Tables::default();
        let writes = snapshot
            .games
            .into_iter()
            .map(Write::PutGame)
            .chain(snapshot.options.into_iter().map(Write::PutOption))
            .chain(snapshot.collections.into_iter().map(Write::PutCollection))
            .chain(snapshot.dice.into_iter().map(Write::PutDie))
            .chain(snapshot.resources.into_iter().map(Write::PutResource));
        for write in writes {
            tables.apply(write)?;
        }
        Ok(Self { tables })
    }

    /// Flatten every table into a snapshot, parents before children.
    pub fn snapshot(&self) -> Snapshot {
        let t = &self.tables;
        let mut snapshot = Snapshot::default();
        for id in &t.game_order {
            let Some(game) = t.games.get(id) else {
                continue;
            };
            snapshot.games.push(game.clone());
            snapshot
                .options
                .extend(Tables::children(&t.options, &t.options_by_game, *id));
            snapshot
                .resources
                .extend(Tables::children(&t.resources, &t.resources_by_game, *id));
            for collection in Tables::children(&t.collections, &t.collections_by_game, *id) {
                snapshot.dice.extend(Tables::children(
                    &t.dice,
                    &t.dice_by_collection,
                    collection.id,
                ));
                snapshot.collections.push(collection);
            }
        }
        snapshot
    }

    /// Total number of rows across all tables.
    pub fn row_count(&self) -> usize {
        let t = &self.tables;
        t.games.len() + t.options.len() + t.collections.len() + t.dice.len() + t.resources.len()
    }

    /// Apply a batch to a copy of the tables and return it without touching `self`.
    pub(crate) fn staged(&self, batch: Vec<Write>) -> StoreResult<Self> {
        let mut tables = self.tables.clone();
        for write in batch {
            tables.apply(write)?;
        }
        Ok(Self { tables })
    }
}

impl Store for MemoryStore {
    fn game(&self, id: RowId) -> StoreResult<Option<GameRecord>> {
        Ok(self.tables.games.get(&id).cloned())
    }

    fn game_by_channel(&self, server: u64, channel: u64) -> StoreResult<Option<GameRecord>> {
        Ok(self
            .tables
            .by_channel
            .get(&(server, channel))
            .and_then(|id| self.tables.games.get(id))
            .cloned())
    }

    fn stale_games(&self, cutoff: DateTime<Utc>) -> StoreResult<Vec<GameRecord>> {
        Ok(self
            .tables
            .game_order
            .iter()
            .filter_map(|id| self.tables.games.get(id))
            .filter(|g| g.last_activity < cutoff)
            .cloned()
            .collect())
    }

    fn options_of(&self, game: RowId) -> StoreResult<Vec<OptionRecord>> {
        Ok(Tables::children(
            &self.tables.options,
            &self.tables.options_by_game,
            game,
        ))
    }

    fn collections_of(&self, game: RowId) -> StoreResult<Vec<CollectionRecord>> {
        Ok(Tables::children(
            &self.tables.collections,
            &self.tables.collections_by_game,
            game,
        ))
    }

    fn dice_of(&self, collection: RowId) -> StoreResult<Vec<DieRecord>> {
        Ok(Tables::children(
            &self.tables.dice,
            &self.tables.dice_by_collection,
            collection,
        ))
    }

    fn resources_of(&self, game: RowId) -> StoreResult<Vec<ResourceRecord>> {
        Ok(Tables::children(
            &self.tables.resources,
            &self.tables.resources_by_game,
            game,
        ))
    }

    fn commit(&mut self, batch: Vec<Write>) -> StoreResult<()> {
        *self = self.staged(batch)?;
        Ok(())
    }
}
