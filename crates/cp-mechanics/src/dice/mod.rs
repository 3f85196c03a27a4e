//! Dice, die expressions, pools and rolling.
//!
//! Cortex Prime only uses the five standard sizes from d4 to d12. A [`Die`]
//! pairs a size with a quantity; named traits always hold exactly one die,
//! pools aggregate any number per size.

pub mod pool;
pub mod roll;
pub mod roller;

pub use pool::{DicePool, PoolEvent};
pub use roll::{PoolRoll, RolledDie, Score, Suggestion};
pub use roller::{FaceSource, Roller, RngFaces, ScriptedFaces};

use serde::{Deserialize, Serialize};

use crate::error::{TraitError, TraitResult};

/// A die size in canonical order, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DieSize {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
}

impl DieSize {
    /// Every size, smallest first.
    pub const ALL: [DieSize; 5] = [Self::D4, Self::D6, Self::D8, Self::D10, Self::D12];

    /// Returns the number of faces.
    pub fn faces(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
        }
    }

    /// The size with the given number of faces, if it is a valid one.
    pub fn from_faces(faces: u32) -> Option<Self> {
        match faces {
            4 => Some(Self::D4),
            6 => Some(Self::D6),
            8 => Some(Self::D8),
            10 => Some(Self::D10),
            12 => Some(Self::D12),
            _ => None,
        }
    }

    /// Position in canonical order (0 for d4, 4 for d12).
    pub fn index(self) -> usize {
        self as usize
    }

    /// The next size up, staying at d12.
    pub fn up(self) -> Self {
        match self {
            Self::D4 => Self::D6,
            Self::D6 => Self::D8,
            Self::D8 => Self::D10,
            Self::D10 | Self::D12 => Self::D12,
        }
    }

    /// The next size down, staying at d4.
    pub fn down(self) -> Self {
        match self {
            Self::D4 | Self::D6 => Self::D4,
            Self::D8 => Self::D6,
            Self::D10 => Self::D8,
            Self::D12 => Self::D10,
        }
    }
}

impl std::fmt::Display for DieSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "D{}", self.faces())
    }
}

/// One or more dice of the same size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Die {
    /// Die size.
    pub size: DieSize,
    /// How many dice. Always at least one.
    pub quantity: u32,
}

impl Die {
    /// A single die.
    pub fn new(size: DieSize) -> Self {
        Self { size, quantity: 1 }
    }

    /// `quantity` dice of one size. Zero is rejected.
    pub fn many(size: DieSize, quantity: u32) -> TraitResult<Self> {
        if quantity == 0 {
            return Err(TraitError::InvalidExpression(format!("0d{}", size.faces())));
        }
        Ok(Self { size, quantity })
    }

    /// A single die from a face count such as 8.
    pub fn from_faces(faces: u32) -> TraitResult<Self> {
        DieSize::from_faces(faces)
            .map(Self::new)
            .ok_or_else(|| TraitError::InvalidSize(faces.to_string()))
    }

    /// Whether the die is already d12.
    pub fn is_max(&self) -> bool {
        self.size == DieSize::D12
    }

    /// Whether the die is already d4.
    pub fn is_min(&self) -> bool {
        self.size == DieSize::D4
    }

    /// Step up one size. Does nothing at d12; check [`Die::is_max`] first
    /// before reporting a step.
    pub fn step_up(&mut self) {
        self.size = self.size.up();
    }

    /// Step down one size. Does nothing at d4.
    pub fn step_down(&mut self) {
        self.size = self.size.down();
    }

    /// Fold another die into this one.
    ///
    /// A bigger die replaces the current size outright. An equal or smaller
    /// die raises the current one by a single step.
    pub fn combine(&mut self, other: Die) {
        if other.size > self.size {
            self.size = other.size;
        } else if !self.is_max() {
            self.step_up();
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.quantity == 1 {
            write!(f, "{}", self.size)
        } else {
            write!(f, "{}{}", self.quantity, self.size)
        }
    }
}

/// Largest quantity a single die expression may ask for.
pub const MAX_DICE_PER_EXPRESSION: u32 = 100;

/// Parse a die expression such as `8`, `d8`, `D8` or `2d8`.
pub fn parse_die(expr: &str) -> TraitResult<Die> {
    let trimmed = expr.trim();
    let lower = trimmed.to_lowercase();
    let (quantity, faces) = match lower.split_once('d') {
        Some((qty, faces)) => {
            let quantity = if qty.is_empty() {
                1
            } else {
                qty.parse::<u32>()
                    .map_err(|_| TraitError::InvalidExpression(trimmed.to_string()))?
            };
            if quantity > MAX_DICE_PER_EXPRESSION {
                return Err(TraitError::DiceLimit {
                    expr: trimmed.to_string(),
                    max: MAX_DICE_PER_EXPRESSION,
                });
            }
            (quantity, faces)
        }
        None => (1, lower.as_str()),
    };

    let faces = faces
        .parse::<u32>()
        .map_err(|_| TraitError::InvalidExpression(trimmed.to_string()))?;
    let size =
        DieSize::from_faces(faces).ok_or_else(|| TraitError::InvalidSize(faces.to_string()))?;
    Die::many(size, quantity)
}

/// Parse an expression that must name exactly one die.
pub fn parse_single_die(expr: &str) -> TraitResult<Die> {
    let die = parse_die(expr)?;
    if die.quantity > 1 {
        return Err(TraitError::TooManyDice(expr.trim().to_string()));
    }
    Ok(die)
}

/// Parse every expression in a list, stopping at the first bad one.
pub fn parse_dice<S: AsRef<str>>(exprs: &[S]) -> TraitResult<Vec<Die>> {
    exprs.iter().map(|e| parse_die(e.as_ref())).collect()
}

/// Whether a word looks like it is meant as a die expression.
pub fn looks_like_die(word: &str) -> bool {
    let lower = word.trim().to_lowercase();
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    match lower.split_once('d') {
        Some((qty, faces)) => (qty.is_empty() || all_digits(qty)) && all_digits(faces),
        None => all_digits(&lower),
    }
}
