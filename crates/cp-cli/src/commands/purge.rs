use std::path::Path;

use chrono::Utc;
use colored::Colorize;
use cp_session::Session;

pub fn run(db: &Path, retention_days: i64) -> Result<(), String> {
    let store = super::open_json(db)?;
    let mut session = Session::new(store, super::config(None, retention_days));
    let purged = session
        .purge_stale(Utc::now())
        .map_err(|e| format!("purge failed: {e}"))?;

    println!(
        "  {} {purged} game(s) idle for more than {} days",
        "Purged".bold(),
        session.config().retention_days
    );
    Ok(())
}
