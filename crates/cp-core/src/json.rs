use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::StoreResult;
use crate::id::RowId;
use crate::memory::{MemoryStore, Snapshot};
use crate::record::{CollectionRecord, DieRecord, GameRecord, OptionRecord, ResourceRecord};
use crate::store::{Store, Write};

/// A store persisted to a single JSON file.
///
/// Reads are served from memory. Every commit stages the batch on a copy of
/// the tables, writes the copy to `<path>.tmp`, renames it over `path`, and
/// only then swaps it in. A failure at any step leaves both the file and the
/// in-memory tables as they were.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonStore {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let snapshot: Snapshot = serde_json::from_str(&content)?;
            MemoryStore::from_snapshot(snapshot)?
        } else {
            MemoryStore::new()
        };
        tracing::debug!(path = %path.display(), rows = inner.row_count(), "opened store");
        Ok(Self { path, inner })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_snapshot(&self, store: &MemoryStore) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(&store.snapshot())?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Store for JsonStore {
    fn game(&self, id: RowId) -> StoreResult<Option<GameRecord>> {
        self.inner.game(id)
    }

    fn game_by_channel(&self, server: u64, channel: u64) -> StoreResult<Option<GameRecord>> {
        self.inner.game_by_channel(server, channel)
    }

    fn stale_games(&self, cutoff: DateTime<Utc>) -> StoreResult<Vec<GameRecord>> {
        self.inner.stale_games(cutoff)
    }

    fn options_of(&self, game: RowId) -> StoreResult<Vec<OptionRecord>> {
        self.inner.options_of(game)
    }

    fn collections_of(&self, game: RowId) -> StoreResult<Vec<CollectionRecord>> {
        self.inner.collections_of(game)
    }

    fn dice_of(&self, collection: RowId) -> StoreResult<Vec<DieRecord>> {
        self.inner.dice_of(collection)
    }

    fn resources_of(&self, game: RowId) -> StoreResult<Vec<ResourceRecord>> {
        self.inner.resources_of(game)
    }

    fn commit(&mut self, batch: Vec<Write>) -> StoreResult<()> {
        let staged = self.inner.staged(batch)?;
        self.write_snapshot(&staged)?;
        self.inner = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path().join("games.json")).unwrap();
        assert!(store.game_by_channel(1, 1).unwrap().is_none());
    }

    #[test]
    fn commits_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("games.json");
        let game = GameRecord::new(10, 20, Utc::now());
        let id = game.id;
        let resource = ResourceRecord {
            id: RowId::new(),
            category: "xp".to_string(),
            name: "Ben".to_string(),
            quantity: 4,
            game: id,
        };

        {
            let mut store = JsonStore::open(&path).unwrap();
            store
                .commit(vec![Write::PutGame(game), Write::PutResource(resource.clone())])
                .unwrap();
        }

        let store = JsonStore::open(&path).unwrap();
        assert_eq!(store.game_by_channel(10, 20).unwrap().unwrap().id, id);
        assert_eq!(store.resources_of(id).unwrap(), vec![resource]);
    }

    #[test]
    fn failed_commit_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("games.json");
        let mut store = JsonStore::open(&path).unwrap();
        store
            .commit(vec![Write::PutGame(GameRecord::new(1, 1, Utc::now()))])
            .unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let orphan = DieRecord {
            id: RowId::new(),
            name: None,
            size: 6,
            quantity: 1,
            collection: RowId::new(),
        };
        assert!(store.commit(vec![Write::PutDie(orphan)]).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
