use std::io::{self, BufRead, Write};
use std::path::Path;

use chrono::Utc;
use colored::Colorize;
use cp_core::{MemoryStore, Store};
use cp_session::Session;

pub fn run(
    db: Option<&Path>,
    server: u64,
    channel: u64,
    seed: Option<u64>,
    retention_days: i64,
) -> Result<(), String> {
    let config = super::config(seed, retention_days);
    match db {
        Some(path) => repl(Session::new(super::open_json(path)?, config), server, channel),
        None => repl(Session::new(MemoryStore::new(), config), server, channel),
    }
}

fn repl<S: Store>(mut session: Session<S>, server: u64, channel: u64) -> Result<(), String> {
    println!("  {} CortexPal for channel {server}/{channel}", "Starting".bold());
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            break;
        }

        match session.handle(server, channel, input, Utc::now()) {
            Ok(reply) => {
                println!("{}\n", reply.text);
                if let Some(pinned) = reply.pinned {
                    println!("{}\n{pinned}\n", "Pinned summary updated:".dimmed());
                }
            }
            Err(e) if e.is_internal() => {
                tracing::error!(server, channel, input, error = %e, "command failed");
                println!("{}\n", "Something went wrong; nothing was changed.".red());
            }
            Err(e) => println!("{}\n", e.to_string().yellow()),
        }
    }

    Ok(())
}
