use crate::id::RowId;

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A row referenced a parent that does not exist.
    #[error("missing parent row {parent} for {table} row {id}")]
    MissingParent {
        /// The table the orphaned row belongs to.
        table: &'static str,
        /// The orphaned row.
        id: RowId,
        /// The parent it points at.
        parent: RowId,
    },

    /// A second game row was written for a server/channel pair that already has one.
    #[error("a game already exists for server {server}, channel {channel}")]
    DuplicateGame {
        /// Server identifier.
        server: u64,
        /// Channel identifier.
        channel: u64,
    },

    /// The backing file could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be encoded or decoded.
    #[error("storage format error: {0}")]
    Json(#[from] serde_json::Error),
}
