//! Error types for game sessions.

use cp_core::StoreError;
use cp_mechanics::{ErrorKind, TraitError};
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while handling a command.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A trait, pool or counter operation was rejected.
    #[error(transparent)]
    Trait(#[from] TraitError),

    /// A known command was given a sub-command it does not understand.
    #[error("{command} does not understand '{instruction}'")]
    UnknownInstruction {
        /// The command.
        command: String,
        /// The unrecognised sub-command.
        instruction: String,
    },

    /// The first word is not a command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A command was missing arguments or had malformed ones.
    #[error("{0}")]
    Usage(String),

    /// The store failed; nothing was changed.
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// The broad class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Trait(e) => e.kind(),
            Self::UnknownInstruction { .. } | Self::UnknownCommand(_) => {
                ErrorKind::UnknownInstruction
            }
            Self::Usage(_) => ErrorKind::Validation,
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// Whether this is an internal fault rather than a problem with the input.
    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}
