//! Error types for the mechanics engine.

use crate::dice::DieSize;

/// Broad classes of failure, used by callers to decide how to report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed die expression, invalid size, or too many dice.
    Validation,
    /// A named trait, pool, counter or group does not exist.
    NotFound,
    /// A removal asked for more than is held.
    InsufficientQuantity,
    /// An unrecognised sub-command.
    UnknownInstruction,
    /// Storage failure or other unexpected fault.
    Internal,
}

/// Errors that can occur when changing traits, pools or counters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraitError {
    /// A die size outside 4, 6, 8, 10, 12.
    #[error(
        "{0} is not a valid die size. You may only use dice with sizes of 4, 6, 8, 10, or 12."
    )]
    InvalidSize(String),

    /// Text that does not look like a die expression at all.
    #[error("{0} is not a valid die expression")]
    InvalidExpression(String),

    /// More than one die given where only one is allowed.
    #[error("{0} is more than one die; only a single die can be used here")]
    TooManyDice(String),

    /// A die expression asking for more dice than one expression may hold.
    #[error("{expr} is too many dice; at most {max} can be given at once")]
    DiceLimit {
        /// The expression as written.
        expr: String,
        /// Largest quantity accepted.
        max: u32,
    },

    /// Adding dice would overflow a pool bucket.
    #[error("the {pool} pool cannot hold that many {size}")]
    PoolFull {
        /// Pool name.
        pool: String,
        /// Bucket that would overflow.
        size: DieSize,
    },

    /// A named entry that does not exist.
    #[error("there is no {category} named {name}")]
    NotFound {
        /// What kind of entry was looked up.
        category: String,
        /// The name that was not found.
        name: String,
    },

    /// A pool has no dice of the requested size.
    #[error("the {pool} pool has no {size} dice")]
    NoSuchDie {
        /// Pool name.
        pool: String,
        /// Requested size.
        size: DieSize,
    },

    /// A pool holds fewer dice of a size than were requested.
    #[error("the {pool} pool only has {have} {size}")]
    InsufficientDice {
        /// Pool name.
        pool: String,
        /// How many dice of that size the pool holds.
        have: u32,
        /// Requested size.
        size: DieSize,
    },

    /// A counter or group that does not exist for this name.
    #[error("{name} has no {category}")]
    HasNone {
        /// Holder name (character or group).
        name: String,
        /// What kind of thing they lack.
        category: String,
    },

    /// A counter holds less than the amount requested.
    #[error("{name} only has {current} {category}")]
    HasOnly {
        /// Holder name.
        name: String,
        /// Amount held before the request.
        current: u32,
        /// Counter category.
        category: String,
    },
}

impl TraitError {
    /// The broad class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSize(_)
            | Self::InvalidExpression(_)
            | Self::TooManyDice(_)
            | Self::DiceLimit { .. }
            | Self::PoolFull { .. } => ErrorKind::Validation,
            Self::NotFound { .. } | Self::NoSuchDie { .. } | Self::HasNone { .. } => {
                ErrorKind::NotFound
            }
            Self::InsufficientDice { .. } | Self::HasOnly { .. } => {
                ErrorKind::InsufficientQuantity
            }
        }
    }
}

/// Convenience result type for mechanics operations.
pub type TraitResult<T> = Result<T, TraitError>;
