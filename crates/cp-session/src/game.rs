//! The state of one game, bound to a server and channel.

use chrono::{DateTime, Utc};
use cp_core::{GameRecord, RowId, Store, Write};
use cp_mechanics::{
    Apply, Change, DicePool, Die, GroupedEvent, GroupedNamedDice, NamedDice, NamedEvent,
    PoolEvent, PoolRoll, ResourceEvent, Resources, Roller, TraitError,
};

use crate::error::SessionResult;
use crate::repo::{self, ASSET, COMPLICATION, PLOT_POINTS, POOL, RowIndex, STRESS, XP};

/// Stress name used when none is given.
pub const GENERAL_STRESS: &str = "General";

/// The two named-die collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitKind {
    /// Complications.
    Complication,
    /// Assets.
    Asset,
}

impl TraitKind {
    fn category(self) -> &'static str {
        match self {
            Self::Complication => COMPLICATION,
            Self::Asset => ASSET,
        }
    }
}

/// The two counter collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Plot points.
    PlotPoints,
    /// Experience.
    Xp,
}

impl ResourceKind {
    fn category(self) -> &'static str {
        match self {
            Self::PlotPoints => PLOT_POINTS,
            Self::Xp => XP,
        }
    }
}

/// The result of a state-changing command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// What to tell the user.
    pub message: String,
    /// Whether the rendered summary differs from before.
    pub summary_changed: bool,
}

impl Outcome {
    /// A reply that changed nothing.
    pub fn unchanged(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            summary_changed: false,
        }
    }
}

/// Everything tracked for one server/channel pair.
///
/// Every mutating method persists its writes first and touches memory only
/// once the store accepted them, so a failed commit leaves both unchanged.
#[derive(Debug, Clone)]
pub struct GameState {
    record: GameRecord,
    complications: NamedDice,
    assets: NamedDice,
    stress: GroupedNamedDice,
    pools: Vec<DicePool>,
    plot_points: Resources,
    xp: Resources,
    options: Vec<(String, String)>,
    pinned: Option<String>,
    rows: RowIndex,
}

impl GameState {
    fn empty(record: GameRecord) -> Self {
        Self {
            record,
            complications: NamedDice::new(COMPLICATION),
            assets: NamedDice::new(ASSET),
            stress: GroupedNamedDice::new(STRESS),
            pools: Vec::new(),
            plot_points: Resources::new(PLOT_POINTS),
            xp: Resources::new(XP),
            options: Vec::new(),
            pinned: None,
            rows: RowIndex::default(),
        }
    }

    /// Load the game for a channel, creating and storing it if there is none.
    pub fn load_or_create(
        store: &mut dyn Store,
        server: u64,
        channel: u64,
        now: DateTime<Utc>,
    ) -> SessionResult<Self> {
        match store.game_by_channel(server, channel)? {
            Some(record) => Self::load(store, record),
            None => {
                let record = GameRecord::new(server, channel, now);
                store.commit(vec![Write::PutGame(record.clone())])?;
                tracing::info!(game = %record.id, server, channel, "created game");
                Ok(Self::empty(record))
            }
        }
    }

    /// Rebuild a game from its stored rows.
    pub fn load(store: &dyn Store, record: GameRecord) -> SessionResult<Self> {
        let loaded = repo::load(store, record)?;
        let mut game = Self::empty(loaded.record);
        game.options = loaded.options;
        game.rows = loaded.rows;

        for collection in loaded.collections {
            match (collection.category.as_str(), collection.group) {
                (COMPLICATION | ASSET, None) => {
                    let target = if collection.category == COMPLICATION {
                        &mut game.complications
                    } else {
                        &mut game.assets
                    };
                    for loaded in collection.dice {
                        if let Some(name) = loaded.name {
                            target.apply(&NamedEvent::Set {
                                name,
                                die: loaded.die,
                            });
                        }
                    }
                }
                (STRESS, Some(group)) => {
                    game.stress.apply(&GroupedEvent::GroupOpened {
                        group: group.clone(),
                    });
                    for loaded in collection.dice {
                        if let Some(name) = loaded.name {
                            game.stress.apply(&GroupedEvent::Named {
                                group: group.clone(),
                                event: NamedEvent::Set {
                                    name,
                                    die: loaded.die,
                                },
                            });
                        }
                    }
                }
                (POOL, Some(group)) => {
                    let mut pool = DicePool::new(group);
                    for loaded in collection.dice {
                        pool.apply(&PoolEvent::Set(loaded.die));
                    }
                    game.pools.push(pool);
                }
                (category, group) => {
                    tracing::warn!(category, ?group, "skipping unknown collection");
                }
            }
        }

        for (category, name, quantity) in loaded.resources {
            let target = match category.as_str() {
                PLOT_POINTS => &mut game.plot_points,
                XP => &mut game.xp,
                _ => {
                    tracing::warn!(%category, %name, "skipping unknown resource");
                    continue;
                }
            };
            target.apply(&ResourceEvent::Set { name, quantity });
        }

        tracing::info!(
            game = %game.record.id,
            server = game.record.server,
            channel = game.record.channel,
            "loaded game"
        );
        Ok(game)
    }

    /// Row ID of the game.
    pub fn id(&self) -> RowId {
        self.record.id
    }

    /// Server the game belongs to.
    pub fn server(&self) -> u64 {
        self.record.server
    }

    /// Channel the game belongs to.
    pub fn channel(&self) -> u64 {
        self.record.channel
    }

    /// When the game last saw a command.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.record.last_activity
    }

    /// Complications or assets.
    pub fn traits(&self, kind: TraitKind) -> &NamedDice {
        match kind {
            TraitKind::Complication => &self.complications,
            TraitKind::Asset => &self.assets,
        }
    }

    /// Stress by character.
    pub fn stress(&self) -> &GroupedNamedDice {
        &self.stress
    }

    /// Plot points or experience.
    pub fn resources(&self, kind: ResourceKind) -> &Resources {
        match kind {
            ResourceKind::PlotPoints => &self.plot_points,
            ResourceKind::Xp => &self.xp,
        }
    }

    /// A pool by name.
    pub fn pool(&self, name: &str) -> Option<&DicePool> {
        self.pools.iter().find(|p| p.name() == name)
    }

    /// Every pool in creation order.
    pub fn pools(&self) -> &[DicePool] {
        &self.pools
    }

    /// An option value, if set.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every option in the order it was first set.
    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    /// Handle of the pinned summary, if any.
    pub fn pinned(&self) -> Option<&str> {
        self.pinned.as_deref()
    }

    /// Remember a pinned summary handle. Pins are not stored.
    pub fn pin(&mut self, handle: impl Into<String>) {
        self.pinned = Some(handle.into());
    }

    /// Add a trait, raising it if it already exists.
    pub fn add_trait(
        &mut self,
        store: &mut dyn Store,
        kind: TraitKind,
        name: &str,
        die: Die,
    ) -> SessionResult<Outcome> {
        let change = self.traits(kind).add(name, die);
        self.commit_trait(store, kind, change)
    }

    /// Remove a trait.
    pub fn remove_trait(
        &mut self,
        store: &mut dyn Store,
        kind: TraitKind,
        name: &str,
    ) -> SessionResult<Outcome> {
        let change = self.traits(kind).remove(name)?;
        self.commit_trait(store, kind, change)
    }

    /// Step a trait up.
    pub fn step_up_trait(
        &mut self,
        store: &mut dyn Store,
        kind: TraitKind,
        name: &str,
    ) -> SessionResult<Outcome> {
        let change = self.traits(kind).step_up(name)?;
        self.commit_trait(store, kind, change)
    }

    /// Step a trait down, removing it from d4.
    pub fn step_down_trait(
        &mut self,
        store: &mut dyn Store,
        kind: TraitKind,
        name: &str,
    ) -> SessionResult<Outcome> {
        let change = self.traits(kind).step_down(name)?;
        self.commit_trait(store, kind, change)
    }

    /// Give a character stress, raising it if they already have that kind.
    pub fn add_stress(
        &mut self,
        store: &mut dyn Store,
        character: &str,
        name: &str,
        die: Die,
    ) -> SessionResult<Outcome> {
        let change = self.stress.add(character, name, die);
        self.commit_stress(store, change)
    }

    /// Remove one kind of stress from a character.
    pub fn remove_stress(
        &mut self,
        store: &mut dyn Store,
        character: &str,
        name: &str,
    ) -> SessionResult<Outcome> {
        let change = self.stress.remove(character, name)?;
        self.commit_stress(store, change)
    }

    /// Step a character's stress up.
    pub fn step_up_stress(
        &mut self,
        store: &mut dyn Store,
        character: &str,
        name: &str,
    ) -> SessionResult<Outcome> {
        let change = self.stress.step_up(character, name)?;
        self.commit_stress(store, change)
    }

    /// Step a character's stress down, removing it from d4.
    pub fn step_down_stress(
        &mut self,
        store: &mut dyn Store,
        character: &str,
        name: &str,
    ) -> SessionResult<Outcome> {
        let change = self.stress.step_down(character, name)?;
        self.commit_stress(store, change)
    }

    /// Clear all stress for a character.
    pub fn clear_stress(
        &mut self,
        store: &mut dyn Store,
        character: &str,
    ) -> SessionResult<Outcome> {
        let change = self.stress.clear(character)?;
        self.commit_stress(store, change)
    }

    /// Add dice to a pool, creating the pool if needed.
    pub fn add_to_pool(
        &mut self,
        store: &mut dyn Store,
        name: &str,
        dice: &[Die],
    ) -> SessionResult<Outcome> {
        let change = match self.pool(name) {
            Some(pool) => pool.add(dice)?,
            None => DicePool::new(name).add(dice)?,
        };
        self.commit_pool(store, name, change)
    }

    /// Remove dice from a pool. An emptied pool stays until cleared.
    pub fn remove_from_pool(
        &mut self,
        store: &mut dyn Store,
        name: &str,
        dice: &[Die],
    ) -> SessionResult<Outcome> {
        let change = self.require_pool(name)?.remove(dice)?;
        self.commit_pool(store, name, change)
    }

    /// Delete a pool and its dice.
    pub fn clear_pool(&mut self, store: &mut dyn Store, name: &str) -> SessionResult<Outcome> {
        self.require_pool(name)?;
        let mut rows = self.rows.clone();
        let writes = rows.drop_pool(name);
        self.persist(store, writes)?;
        self.rows = rows;
        self.pools.retain(|p| p.name() != name);
        Ok(Outcome {
            message: format!("Cleared {name} pool."),
            summary_changed: true,
        })
    }

    /// Roll a pool, optionally with extra dice that are not kept.
    pub fn roll_pool(
        &self,
        roller: &mut Roller,
        name: &str,
        extra: &[Die],
        suggest_best: bool,
    ) -> SessionResult<PoolRoll> {
        let mut pool = self.require_pool(name)?.temporary_copy();
        if !extra.is_empty() {
            let change = pool.add(extra)?;
            pool.apply_change(change);
        }
        Ok(pool.roll(roller, suggest_best))
    }

    /// Roll loose dice. Nothing is stored.
    pub fn roll_dice(
        &self,
        roller: &mut Roller,
        dice: &[Die],
        suggest_best: bool,
    ) -> SessionResult<PoolRoll> {
        let mut pool = DicePool::new("roll");
        let change = pool.add(dice)?;
        pool.apply_change(change);
        Ok(pool.roll(roller, suggest_best))
    }

    /// Add to a counter.
    pub fn add_resource(
        &mut self,
        store: &mut dyn Store,
        kind: ResourceKind,
        name: &str,
        quantity: u32,
    ) -> SessionResult<Outcome> {
        let change = self.resources(kind).add(name, quantity);
        self.commit_resource(store, kind, change)
    }

    /// Take from a counter.
    pub fn remove_resource(
        &mut self,
        store: &mut dyn Store,
        kind: ResourceKind,
        name: &str,
        quantity: u32,
    ) -> SessionResult<Outcome> {
        let change = self.resources(kind).remove(name, quantity)?;
        self.commit_resource(store, kind, change)
    }

    /// Drop a counter.
    pub fn clear_resource(
        &mut self,
        store: &mut dyn Store,
        kind: ResourceKind,
        name: &str,
    ) -> SessionResult<Outcome> {
        let change = self.resources(kind).clear(name)?;
        self.commit_resource(store, kind, change)
    }

    /// Set an option.
    pub fn set_option(
        &mut self,
        store: &mut dyn Store,
        key: &str,
        value: &str,
    ) -> SessionResult<Outcome> {
        let mut rows = self.rows.clone();
        let write = rows.option_write(self.record.id, key, value);
        self.persist(store, vec![write])?;
        self.rows = rows;
        match self.options.iter_mut().find(|(k, _)| k == key) {
            Some((_, held)) => *held = value.to_string(),
            None => self.options.push((key.to_string(), value.to_string())),
        }
        Ok(Outcome::unchanged(format!("Option {key} is now {value}.")))
    }

    /// Record activity on the game.
    pub fn touch(&mut self, store: &mut dyn Store, now: DateTime<Utc>) -> SessionResult<()> {
        let mut record = self.record.clone();
        record.last_activity = now;
        store.commit(vec![Write::PutGame(record.clone())])?;
        self.record = record;
        Ok(())
    }

    /// Reset every trait, pool and counter. Options and the game itself stay.
    pub fn clean(&mut self, store: &mut dyn Store) -> SessionResult<Outcome> {
        let mut rows = self.rows.clone();
        let writes = rows.clean_writes();
        let changed = !writes.is_empty() || !self.is_blank();
        self.persist(store, writes)?;
        self.rows = rows;

        self.complications = NamedDice::new(COMPLICATION);
        self.assets = NamedDice::new(ASSET);
        self.stress = GroupedNamedDice::new(STRESS);
        self.pools.clear();
        self.plot_points = Resources::new(PLOT_POINTS);
        self.xp = Resources::new(XP);
        tracing::info!(game = %self.record.id, "cleaned game");
        Ok(Outcome {
            message: "Game information has been cleaned.".to_string(),
            summary_changed: changed,
        })
    }

    /// The game summary. Empty sections are left out.
    pub fn render(&self) -> String {
        let mut sections = Vec::new();
        push_section(&mut sections, "Assets", self.assets.lines());
        push_section(&mut sections, "Complications", self.complications.lines());
        push_section(&mut sections, "Stress", self.stress_lines());
        push_section(&mut sections, "Plot Points", self.plot_points.lines());
        let pools = self
            .pools
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}: {p}", p.name()))
            .collect();
        push_section(&mut sections, "Dice Pools", pools);
        push_section(&mut sections, "Experience", self.xp.lines());

        if sections.is_empty() {
            return "There's nothing here yet.".to_string();
        }
        sections.join("\n\n")
    }

    fn stress_lines(&self) -> Vec<String> {
        self.stress
            .iter()
            .map(|(character, dice)| {
                let general_only = dice.len() == 1 && dice.get(GENERAL_STRESS).is_some();
                let body = if dice.is_empty() {
                    "none".to_string()
                } else if general_only {
                    dice.iter()
                        .map(|(_, die)| die.to_string())
                        .collect::<String>()
                } else {
                    dice.iter()
                        .map(|(name, die)| format!("{name} {die}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                format!("{character}: {body}")
            })
            .collect()
    }

    fn is_blank(&self) -> bool {
        self.complications.is_empty()
            && self.assets.is_empty()
            && self.stress.is_empty()
            && self.pools.is_empty()
            && self.plot_points.is_empty()
            && self.xp.is_empty()
    }

    fn require_pool(&self, name: &str) -> SessionResult<&DicePool> {
        self.pool(name).ok_or_else(|| {
            TraitError::NotFound {
                category: POOL.to_string(),
                name: name.to_string(),
            }
            .into()
        })
    }

    fn commit_trait(
        &mut self,
        store: &mut dyn Store,
        kind: TraitKind,
        change: Change<NamedEvent>,
    ) -> SessionResult<Outcome> {
        let mut rows = self.rows.clone();
        let writes = rows.named_writes(self.record.id, kind.category(), None, &change.events);
        self.persist(store, writes)?;
        self.rows = rows;
        let summary_changed = change.alters_state();
        let target = match kind {
            TraitKind::Complication => &mut self.complications,
            TraitKind::Asset => &mut self.assets,
        };
        Ok(Outcome {
            message: target.apply_change(change),
            summary_changed,
        })
    }

    fn commit_stress(
        &mut self,
        store: &mut dyn Store,
        change: Change<GroupedEvent>,
    ) -> SessionResult<Outcome> {
        let mut rows = self.rows.clone();
        let writes = rows.grouped_writes(self.record.id, &change.events);
        self.persist(store, writes)?;
        self.rows = rows;
        let summary_changed = change.alters_state();
        Ok(Outcome {
            message: self.stress.apply_change(change),
            summary_changed,
        })
    }

    fn commit_pool(
        &mut self,
        store: &mut dyn Store,
        name: &str,
        change: Change<PoolEvent>,
    ) -> SessionResult<Outcome> {
        let mut rows = self.rows.clone();
        let writes = rows.pool_writes(self.record.id, name, &change.events);
        self.persist(store, writes)?;
        self.rows = rows;
        let summary_changed = change.alters_state();
        let index = match self.pools.iter().position(|p| p.name() == name) {
            Some(index) => index,
            None => {
                self.pools.push(DicePool::new(name));
                self.pools.len() - 1
            }
        };
        Ok(Outcome {
            message: self.pools[index].apply_change(change),
            summary_changed,
        })
    }

    fn commit_resource(
        &mut self,
        store: &mut dyn Store,
        kind: ResourceKind,
        change: Change<ResourceEvent>,
    ) -> SessionResult<Outcome> {
        let mut rows = self.rows.clone();
        let writes = rows.resource_writes(self.record.id, kind.category(), &change.events);
        self.persist(store, writes)?;
        self.rows = rows;
        let summary_changed = change.alters_state();
        let target = match kind {
            ResourceKind::PlotPoints => &mut self.plot_points,
            ResourceKind::Xp => &mut self.xp,
        };
        Ok(Outcome {
            message: target.apply_change(change),
            summary_changed,
        })
    }

    fn persist(&self, store: &mut dyn Store, writes: Vec<Write>) -> SessionResult<()> {
        if writes.is_empty() {
            return Ok(());
        }
        tracing::debug!(game = %self.record.id, writes = writes.len(), "committing");
        store.commit(writes)?;
        Ok(())
    }
}

fn push_section(sections: &mut Vec<String>, title: &str, lines: Vec<String>) {
    if !lines.is_empty() {
        sections.push(format!("**{title}**\n{}", lines.join("\n")));
    }
}
