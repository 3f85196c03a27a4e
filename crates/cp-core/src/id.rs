use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generated identifier for a row in any table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowId(pub Uuid);

impl RowId {
    /// Generate a new random row ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}
