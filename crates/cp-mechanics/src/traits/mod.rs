//! Trait collections tracked per game.
//!
//! Names are matched exactly, including case.

pub mod grouped;
pub mod named;
pub mod resources;

pub use grouped::{GroupedEvent, GroupedNamedDice};
pub use named::{NamedDice, NamedEvent};
pub use resources::{ResourceEvent, Resources};
