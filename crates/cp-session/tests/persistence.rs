//! Games survive a restart and failed writes leave nothing behind.

use chrono::{DateTime, Duration, Utc};
use cp_core::{
    CollectionRecord, DieRecord, GameRecord, JsonStore, MemoryStore, OptionRecord,
    ResourceRecord, RowId, Store, StoreResult, Write,
};
use cp_mechanics::Roller;
use cp_session::{Session, SessionConfig};

fn json_session(path: &std::path::Path) -> Session<JsonStore> {
    Session::with_roller(
        JsonStore::open(path).unwrap(),
        SessionConfig::default(),
        Roller::scripted([3]),
    )
}

#[test]
fn game_rehydrates_from_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("games.json");
    let now = Utc::now();

    let summary = {
        let mut s = json_session(&path);
        s.handle(1, 1, "asset add 8 Rope", now).unwrap();
        s.handle(1, 1, "comp add 6 Broken Arm", now).unwrap();
        s.handle(1, 1, "stress add Amy Mental 10", now).unwrap();
        s.handle(1, 1, "pool add doom 6 2d8", now).unwrap();
        s.handle(1, 1, "pp add Amy 3", now).unwrap();
        s.handle(1, 1, "xp add Amy", now).unwrap();
        s.handle(1, 1, "option best off", now).unwrap();
        s.handle(1, 1, "info", now).unwrap().text
    };

    let mut s = json_session(&path);
    let reply = s.handle(1, 1, "info", now).unwrap();
    assert_eq!(reply.text, summary);
    assert!(reply.text.contains("Amy: Mental D10"));
    assert_eq!(s.handle(1, 1, "option best", now).unwrap().text, "best: off");

    // Rows keep their identity after a reload: raising updates in place.
    s.handle(1, 1, "asset up Rope", now).unwrap();
    let game = s.store().game_by_channel(1, 1).unwrap().unwrap();
    let assets: Vec<_> = s
        .store()
        .collections_of(game.id)
        .unwrap()
        .into_iter()
        .filter(|c| c.category == "asset")
        .collect();
    assert_eq!(assets.len(), 1);
    let dice = s.store().dice_of(assets[0].id).unwrap();
    assert_eq!(dice.len(), 1);
    assert_eq!(dice[0].name.as_deref(), Some("Rope"));
    assert_eq!(dice[0].size, 10);
    assert_eq!(dice[0].quantity, 1);
}

#[test]
fn emptied_pool_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("games.json");
    let now = Utc::now();
    {
        let mut s = json_session(&path);
        s.handle(1, 1, "pool add doom 6", now).unwrap();
        s.handle(1, 1, "pool remove doom 6", now).unwrap();
    }
    let mut s = json_session(&path);
    assert_eq!(
        s.handle(1, 1, "pool add doom 8", now).unwrap().text,
        "doom pool: D8"
    );
    assert_eq!(
        s.handle(1, 1, "pool clear doom", now).unwrap().text,
        "Cleared doom pool."
    );
}

/// A store whose commits can be made to fail.
struct FlakyStore {
    inner: MemoryStore,
    failing: bool,
    refuse: Option<fn(&[Write]) -> bool>,
}

fn activity_only(batch: &[Write]) -> bool {
    batch.iter().all(|w| matches!(w, Write::PutGame(_)))
}

fn deletes_games(batch: &[Write]) -> bool {
    batch.iter().any(|w| matches!(w, Write::DeleteGame(_)))
}

impl Store for FlakyStore {
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
        let refused = self.refuse.is_some_and(|refuse| refuse(&batch));
        if self.failing || refused {
            return Err(std::io::Error::other("disk full").into());
        }
        self.inner.commit(batch)
    }
}

fn flaky_session() -> Session<FlakyStore> {
    let store = FlakyStore {
        inner: MemoryStore::new(),
        failing: false,
        refuse: None,
    };
    Session::with_roller(store, SessionConfig::default(), Roller::scripted([1]))
}

#[test]
fn failed_write_changes_nothing() {
    let mut s = flaky_session();
    let now = Utc::now();
    s.handle(1, 1, "pp add Amy 1", now).unwrap();
    s.handle(1, 1, "comp add 6 Hurt", now).unwrap();
    let before = s.game(1, 1, now).unwrap().render();
    let rows = s.store().inner.row_count();

    s.store_mut().failing = true;
    for input in ["asset add 6 Rope", "comp up Hurt", "pp add Amy", "clean"] {
        let err = s.handle(1, 1, input, now).unwrap_err();
        assert!(err.is_internal(), "{input}: {err}");
    }
    s.store_mut().failing = false;

    assert_eq!(s.game(1, 1, now).unwrap().render(), before);
    assert_eq!(s.store().inner.row_count(), rows);
}

#[test]
fn domain_errors_are_not_internal() {
    let mut s = flaky_session();
    let err = s.handle(1, 1, "comp up Hurt", Utc::now()).unwrap_err();
    assert!(!err.is_internal());
}

#[test]
fn failed_activity_write_keeps_reply() {
    let mut s = flaky_session();
    let now = Utc::now();
    s.handle(1, 1, "pin", now).unwrap();

    s.store_mut().refuse = Some(activity_only);
    let reply = s.handle(1, 1, "asset add 8 Rope", now).unwrap();
    assert_eq!(reply.text, "New asset: D8 Rope");
    assert_eq!(reply.pinned.as_deref(), Some("**Assets**\nD8 Rope"));
    s.store_mut().refuse = None;

    let game = s.store().inner.game_by_channel(1, 1).unwrap().unwrap();
    let collections = s.store().inner.collections_of(game.id).unwrap();
    assert_eq!(collections.len(), 1);
}

#[test]
fn failed_purge_keeps_reply_and_retries() {
    let mut s = flaky_session();
    let now = Utc::now();
    let long_ago = now - Duration::days(400);
    s.handle(1, 2, "xp add Ben", long_ago).unwrap();

    s.store_mut().refuse = Some(deletes_games);
    let reply = s.handle(1, 1, "pp add Amy", now).unwrap();
    assert_eq!(reply.text, "Amy now has 1 plot points");
    assert!(s.store().inner.game_by_channel(1, 2).unwrap().is_some());

    s.store_mut().refuse = None;
    s.handle(1, 1, "info", now).unwrap();
    assert!(s.store().inner.game_by_channel(1, 2).unwrap().is_none());
}
