//! The game registry: one session host serving many channels.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use cp_core::{Store, Write};
use cp_mechanics::Roller;

use crate::command::parse_command;
use crate::config::SessionConfig;
use crate::dispatch::{self, Context, execute};
use crate::error::SessionResult;
use crate::game::GameState;

/// The answer to one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// What to show the user.
    pub text: String,
    /// Whether the game summary changed.
    pub summary_changed: bool,
    /// A refreshed summary for the channel's pinned message, if it has one
    /// and the summary changed.
    pub pinned: Option<String>,
}

/// Serves commands for every channel, caching loaded games.
pub struct Session<S: Store> {
    store: S,
    games: HashMap<(u64, u64), GameState>,
    roller: Roller,
    config: SessionConfig,
    last_purge: Option<NaiveDate>,
}

impl<S: Store> Session<S> {
    /// Create a session. The roller is seeded from the config when a seed is set.
    pub fn new(store: S, config: SessionConfig) -> Self {
        let roller = match config.seed {
            Some(seed) => Roller::seeded(seed),
            None => Roller::from_entropy(),
        };
        Self::with_roller(store, config, roller)
    }

    /// Create a session with a specific roller.
    pub fn with_roller(store: S, config: SessionConfig, roller: Roller) -> Self {
        Self {
            store,
            games: HashMap::new(),
            roller,
            config,
            last_purge: None,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The underlying store, mutably.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The shared roller.
    pub fn roller(&self) -> &Roller {
        &self.roller
    }

    /// Number of games held in memory.
    pub fn cached_games(&self) -> usize {
        self.games.len()
    }

    /// The game for a channel, loading or creating it as needed.
    pub fn game(
        &mut self,
        server: u64,
        channel: u64,
        now: DateTime<Utc>,
    ) -> SessionResult<&GameState> {
        let game = Self::cached(&mut self.games, &mut self.store, server, channel, now)?;
        Ok(game)
    }

    /// Handle one line of input for a channel.
    ///
    /// The channel's prefix is stripped if present. Whatever the outcome,
    /// the game's activity time is updated, and the first command of each
    /// day purges games idle past the retention window. Failures in those
    /// two housekeeping writes are logged and never replace the reply.
    pub fn handle(
        &mut self,
        server: u64,
        channel: u64,
        input: &str,
        now: DateTime<Utc>,
    ) -> SessionResult<Reply> {
        let game = Self::cached(&mut self.games, &mut self.store, server, channel, now)?;

        let line = input.trim();
        let line = line
            .strip_prefix(dispatch::prefix(game, &self.config))
            .unwrap_or(line);
        tracing::debug!(server, channel, line, "handling command");

        let result = parse_command(line).and_then(|command| {
            let mut ctx = Context {
                store: &mut self.store,
                roller: &mut self.roller,
                config: &self.config,
                now,
            };
            execute(game, &mut ctx, command)
        });
        if let Err(e) = &result {
            tracing::debug!(server, channel, error = %e, "command rejected");
        }

        let touched = game.touch(&mut self.store, now);
        let reply = result.map(|outcome| {
            let refresh = outcome.summary_changed && game.pinned().is_some();
            Reply {
                pinned: refresh.then(|| game.render()),
                text: outcome.message,
                summary_changed: outcome.summary_changed,
            }
        });
        if let Err(e) = touched {
            tracing::error!(server, channel, error = %e, "failed to record activity");
        }
        if let Err(e) = self.purge_daily(now) {
            tracing::error!(error = %e, "daily purge failed; retrying on the next command");
        }
        reply
    }

    /// Delete every game idle longer than the retention window. Returns
    /// how many were removed.
    pub fn purge_stale(&mut self, now: DateTime<Utc>) -> SessionResult<usize> {
        let cutoff = now - Duration::days(self.config.retention_days);
        let stale = self.store.stale_games(cutoff)?;
        if stale.is_empty() {
            return Ok(0);
        }
        let writes = stale.iter().map(|game| Write::DeleteGame(game.id)).collect();
        self.store.commit(writes)?;
        for record in &stale {
            self.games.remove(&(record.server, record.channel));
        }
        tracing::info!(count = stale.len(), %cutoff, "purged inactive games");
        Ok(stale.len())
    }

    /// Give back the store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn cached<'a>(
        games: &'a mut HashMap<(u64, u64), GameState>,
        store: &mut S,
        server: u64,
        channel: u64,
        now: DateTime<Utc>,
    ) -> SessionResult<&'a mut GameState> {
        match games.entry((server, channel)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let game = GameState::load_or_create(store, server, channel, now)?;
                Ok(entry.insert(game))
            }
        }
    }

    fn purge_daily(&mut self, now: DateTime<Utc>) -> SessionResult<()> {
        let today = now.date_naive();
        if self.last_purge == Some(today) {
            return Ok(());
        }
        self.purge_stale(now)?;
        self.last_purge = Some(today);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cp_core::MemoryStore;
    use cp_mechanics::ErrorKind;

    fn session(faces: Vec<u32>) -> Session<MemoryStore> {
        Session::with_roller(
            MemoryStore::new(),
            SessionConfig::default(),
            Roller::scripted(faces),
        )
    }

    #[test]
    fn prefix_is_optional() {
        let mut s = session(vec![1]);
        let now = Utc::now();
        let with = s.handle(1, 1, "$asset add 6 Rope", now).unwrap();
        assert_eq!(with.text, "New asset: D6 Rope");
        let without = s.handle(1, 1, "asset up Rope", now).unwrap();
        assert_eq!(without.text, "Stepped up asset: D8 Rope");
    }

    #[test]
    fn custom_prefix() {
        let mut s = session(vec![1]);
        let now = Utc::now();
        s.handle(1, 1, "option prefix !", now).unwrap();
        let reply = s.handle(1, 1, "!info", now).unwrap();
        assert_eq!(reply.text, "There's nothing here yet.");
    }

    #[test]
    fn channels_are_isolated() {
        let mut s = session(vec![1]);
        let now = Utc::now();
        s.handle(1, 1, "pp add Amy", now).unwrap();
        let other = s.handle(1, 2, "info", now).unwrap();
        assert_eq!(other.text, "There's nothing here yet.");
        assert_eq!(s.cached_games(), 2);
    }

    #[test]
    fn pinned_summary_refreshes_on_change() {
        let mut s = session(vec![1]);
        let now = Utc::now();
        let reply = s.handle(1, 1, "comp add 8 Hurt", now).unwrap();
        assert!(reply.summary_changed);
        assert!(reply.pinned.is_none());

        s.handle(1, 1, "pin", now).unwrap();
        let reply = s.handle(1, 1, "asset add 6 Rope", now).unwrap();
        let pinned = reply.pinned.unwrap();
        assert!(pinned.contains("D6 Rope"));
        assert!(pinned.contains("D8 Hurt"));

        let reply = s.handle(1, 1, "roll 6", now).unwrap();
        assert!(reply.pinned.is_none());
    }

    #[test]
    fn rejected_command_still_touches_game() {
        let mut s = session(vec![1]);
        let start = Utc::now();
        s.handle(1, 1, "info", start).unwrap();
        let later = start + Duration::hours(1);
        let err = s.handle(1, 1, "asset remove Rope", later).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(s.game(1, 1, later).unwrap().last_activity(), later);
    }

    #[test]
    fn daily_purge_drops_idle_games() {
        let mut s = session(vec![1]);
        let start = Utc::now();
        s.handle(1, 1, "pp add Amy", start).unwrap();
        let later = start + Duration::days(181);
        s.handle(1, 2, "info", later).unwrap();
        assert_eq!(s.cached_games(), 1);
        assert!(s.store().game_by_channel(1, 1).unwrap().is_none());
        assert!(s.store().game_by_channel(1, 2).unwrap().is_some());
    }

    #[test]
    fn purge_keeps_recent_games() {
        let mut s = session(vec![1]);
        let start = Utc::now();
        s.handle(1, 1, "info", start).unwrap();
        assert_eq!(s.purge_stale(start + Duration::days(179)).unwrap(), 0);
        assert_eq!(s.purge_stale(start + Duration::days(181)).unwrap(), 1);
        assert_eq!(s.cached_games(), 0);
    }
}
