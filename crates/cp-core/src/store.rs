use chrono::{DateTime, Utc};

use crate::error::StoreResult;
use crate::id::RowId;
use crate::record::{CollectionRecord, DieRecord, GameRecord, OptionRecord, ResourceRecord};

/// A single write against a store. Puts insert or replace by row ID;
/// deletes cascade to every row reachable beneath the deleted one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// Insert or replace a game row.
    PutGame(GameRecord),
    /// Delete a game and everything it owns.
    DeleteGame(RowId),
    /// Insert or replace an option row.
    PutOption(OptionRecord),
    /// Delete an option row.
    DeleteOption(RowId),
    /// Insert or replace a dice collection row.
    PutCollection(CollectionRecord),
    /// Delete a dice collection and its dice.
    DeleteCollection(RowId),
    /// Insert or replace a die row.
    PutDie(DieRecord),
    /// Delete a die row.
    DeleteDie(RowId),
    /// Insert or replace a resource row.
    PutResource(ResourceRecord),
    /// Delete a resource row.
    DeleteResource(RowId),
}

/// Durable storage for game state.
///
/// Child queries return rows in insertion order. [`Store::commit`] applies a
/// batch atomically: if any write fails, none of the batch is visible.
pub trait Store {
    /// Look up a game by ID.
    fn game(&self, id: RowId) -> StoreResult<Option<GameRecord>>;

    /// Look up the game for a server/channel pair.
    fn game_by_channel(&self, server: u64, channel: u64) -> StoreResult<Option<GameRecord>>;

    /// All games whose last activity is strictly before `cutoff`.
    fn stale_games(&self, cutoff: DateTime<Utc>) -> StoreResult<Vec<GameRecord>>;

    /// Options set on a game.
    fn options_of(&self, game: RowId) -> StoreResult<Vec<OptionRecord>>;

    /// Dice collections owned by a game.
    fn collections_of(&self, game: RowId) -> StoreResult<Vec<CollectionRecord>>;

    /// Dice held by a collection.
    fn dice_of(&self, collection: RowId) -> StoreResult<Vec<DieRecord>>;

    /// Resource counters owned by a game.
    fn resources_of(&self, game: RowId) -> StoreResult<Vec<ResourceRecord>>;

    /// Apply a batch of writes atomically.
    fn commit(&mut self, batch: Vec<Write>) -> StoreResult<()>;
}
