//! CLI host for CortexPal: play a channel's game from the terminal.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "cortex",
    about = "CortexPal: Cortex Prime traits, pools and dice for a channel",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands for one channel from stdin
    Play {
        /// JSON file holding every game (in memory when omitted)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Server ID of the channel
        #[arg(long, default_value = "0")]
        server: u64,

        /// Channel ID
        #[arg(long, default_value = "0")]
        channel: u64,

        /// RNG seed for reproducible rolls
        #[arg(long)]
        seed: Option<u64>,

        /// Days without activity before a game is purged
        #[arg(long, default_value = "180")]
        retention_days: i64,
    },

    /// Delete games idle longer than the retention window
    Purge {
        /// JSON file holding every game
        #[arg(long)]
        db: PathBuf,

        /// Days without activity before a game is purged
        #[arg(long, default_value = "180")]
        retention_days: i64,
    },

    /// Roll every die size many times and show the face distribution
    Stats {
        /// Rolls per die size
        #[arg(short, long, default_value = "1000")]
        rolls: u32,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cortex=info,cp_session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            db,
            server,
            channel,
            seed,
            retention_days,
        } => commands::play::run(db.as_deref(), server, channel, seed, retention_days),
        Commands::Purge { db, retention_days } => commands::purge::run(&db, retention_days),
        Commands::Stats { rolls, seed } => commands::stats::run(rolls, seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
