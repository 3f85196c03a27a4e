//! Per-channel Cortex Prime game sessions.
//!
//! A [`Session`] owns the store, the shared [`cp_mechanics::Roller`] and a
//! cache of [`GameState`]s keyed by server and channel. Each line of input
//! is parsed into a [`Command`], run against the channel's game, persisted,
//! and answered with a [`Reply`]. Games idle past the retention window are
//! purged once per day.

pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod game;
pub mod help;
mod repo;
pub mod session;

pub use command::{Command, parse_command};
pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use game::{GameState, Outcome, ResourceKind, TraitKind};
pub use session::{Reply, Session};
