//! Cortex Prime game mechanics for CortexPal.
//!
//! Provides dice and die expressions, a frequency-counting roller, dice
//! pools with the best total / best effect heuristic, and the trait
//! collections a game tracks: named dice (complications, assets), dice
//! grouped by character (stress) and plain counters (plot points, xp).
//!
//! Every collection is a pure value holder. Operations look at the current
//! state and return a [`Change`] describing what would happen; nothing
//! moves until those events are handed to [`Apply::apply`]. This lets a
//! caller persist a change first and apply it only once the write landed.

pub mod change;
pub mod dice;
pub mod error;
pub mod traits;

pub use change::{Apply, Change};
pub use dice::{
    DicePool, Die, DieSize, FaceSource, MAX_DICE_PER_EXPRESSION, PoolEvent, PoolRoll, RolledDie,
    Roller, Score, ScriptedFaces, Suggestion, parse_dice, parse_die, parse_single_die,
};
pub use error::{ErrorKind, TraitError, TraitResult};
pub use traits::{GroupedEvent, GroupedNamedDice, NamedDice, NamedEvent, ResourceEvent, Resources};
