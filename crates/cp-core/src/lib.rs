//! Storage layer for CortexPal: durable records and the stores that hold them.
//!
//! Game state lives in five logical tables (games, options, dice
//! collections, dice and resources) linked by parent identifiers. Deleting
//! a parent row cascades to everything reachable beneath it. The domain
//! crates never touch a store directly; they hand it [`Write`] batches that
//! apply atomically.

/// Error types used throughout the crate.
pub mod error;
/// Row identifiers shared by every table.
pub mod id;
/// File-backed store that snapshots tables as JSON.
pub mod json;
/// In-memory tables with parent indexes and cascading deletes.
pub mod memory;
/// Row types for each logical table.
pub mod record;
/// The `Store` trait and the write operations it accepts.
pub mod store;

/// Re-export error types.
pub use error::{StoreError, StoreResult};
/// Re-export the row identifier.
pub use id::RowId;
/// Re-export the store implementations.
pub use json::JsonStore;
pub use memory::MemoryStore;
/// Re-export record types.
pub use record::{CollectionRecord, DieRecord, GameRecord, OptionRecord, ResourceRecord};
/// Re-export the store trait and write operations.
pub use store::{Store, Write};
