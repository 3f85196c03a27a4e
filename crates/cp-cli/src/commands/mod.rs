pub mod play;
pub mod purge;
pub mod stats;

use std::path::Path;

use cp_core::JsonStore;
use cp_session::SessionConfig;

/// Build the session configuration from command-line flags.
fn config(seed: Option<u64>, retention_days: i64) -> SessionConfig {
    let config = SessionConfig::default().with_retention_days(retention_days);
    match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    }
}

/// Open the JSON store at `path`, creating it on first commit.
fn open_json(path: &Path) -> Result<JsonStore, String> {
    JsonStore::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))
}
