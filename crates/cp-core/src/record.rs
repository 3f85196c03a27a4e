use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::RowId;

/// One game per server/channel pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Row identifier.
    pub id: RowId,
    /// Server the channel belongs to.
    pub server: u64,
    /// Channel the game is played in.
    pub channel: u64,
    /// When the last command touched this game.
    pub last_activity: DateTime<Utc>,
}

impl GameRecord {
    /// Create a record for a fresh game, active as of `now`.
    pub fn new(server: u64, channel: u64, now: DateTime<Utc>) -> Self {
        Self {
            id: RowId::new(),
            server,
            channel,
            last_activity: now,
        }
    }
}

/// A per-game option setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    /// Row identifier.
    pub id: RowId,
    /// Option key.
    pub key: String,
    /// Option value.
    pub value: String,
    /// Owning game.
    pub game: RowId,
}

/// A named dice collection or dice pool owned by a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRecord {
    /// Row identifier.
    pub id: RowId,
    /// What the collection holds (`complication`, `asset`, `stress`, `pool`).
    pub category: String,
    /// Group name for grouped collections (a character, or a pool's name).
    pub group: Option<String>,
    /// Owning game.
    pub parent: RowId,
}

/// A single die entry inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieRecord {
    /// Row identifier.
    pub id: RowId,
    /// Trait name; `None` for pool dice, which are keyed by size alone.
    pub name: Option<String>,
    /// Number of faces.
    pub size: u32,
    /// How many dice of this size. Never stored as zero.
    pub quantity: u32,
    /// Owning collection.
    pub collection: RowId,
}

/// A named counter such as plot points or experience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Row identifier.
    pub id: RowId,
    /// Which counter (`plot point`, `xp`).
    pub category: String,
    /// Who holds the counter.
    pub name: String,
    /// Current amount.
    pub quantity: u32,
    /// Owning game.
    pub game: RowId,
}
