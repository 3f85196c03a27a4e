//! Dice pools bucketed by size (doom, crisis, growth).

use crate::change::{Apply, Change};
use crate::error::{TraitError, TraitResult};

use super::roll::{PoolRoll, RolledDie};
use super::roller::Roller;
use super::{Die, DieSize};

/// A change to one size bucket of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolEvent {
    /// The bucket now holds exactly this die and quantity.
    Set(Die),
    /// The bucket is now empty.
    Emptied(DieSize),
}

/// A named pool of dice with one bucket per size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DicePool {
    name: String,
    slots: [Option<Die>; 5],
}

impl DicePool {
    /// Create an empty pool.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: [None; 5],
        }
    }

    /// Pool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dice held for a size, if any.
    pub fn get(&self, size: DieSize) -> Option<Die> {
        self.slots[size.index()]
    }

    /// Occupied buckets, smallest size first.
    pub fn dice(&self) -> impl Iterator<Item = Die> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Total number of dice across all sizes.
    pub fn count(&self) -> u32 {
        self.dice().map(|d| d.quantity).sum()
    }

    /// Returns true if the pool has no dice.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Plan adding dice, merging quantities into existing buckets.
    pub fn add(&self, dice: &[Die]) -> TraitResult<Change<PoolEvent>> {
        let mut next = self.slots;
        for die in dice {
            let slot = &mut next[die.size.index()];
            match slot {
                Some(held) => {
                    held.quantity = held
                        .quantity
                        .checked_add(die.quantity)
                        .ok_or_else(|| self.full(die.size))?;
                }
                None => *slot = Some(*die),
            }
        }
        Ok(self.plan(next))
    }

    /// Plan removing dice. Every requested size must be held in at least
    /// the requested quantity, or nothing is removed.
    pub fn remove(&self, dice: &[Die]) -> TraitResult<Change<PoolEvent>> {
        let mut wanted = [0u32; 5];
        for die in dice {
            let want = &mut wanted[die.size.index()];
            *want = want
                .checked_add(die.quantity)
                .ok_or_else(|| self.full(die.size))?;
        }

        let mut next = self.slots;
        for size in DieSize::ALL {
            let want = wanted[size.index()];
            if want == 0 {
                continue;
            }
            let slot = &mut next[size.index()];
            let Some(held) = slot else {
                return Err(TraitError::NoSuchDie {
                    pool: self.name.clone(),
                    size,
                });
            };
            if held.quantity < want {
                return Err(TraitError::InsufficientDice {
                    pool: self.name.clone(),
                    have: held.quantity,
                    size,
                });
            }
            held.quantity -= want;
            if held.quantity == 0 {
                *slot = None;
            }
        }
        Ok(self.plan(next))
    }

    /// A detached copy for what-if rolls. Changes to the copy never reach
    /// the source pool or storage.
    pub fn temporary_copy(&self) -> DicePool {
        self.clone()
    }

    /// Roll every die in the pool.
    pub fn roll(&self, roller: &mut Roller, suggest_best: bool) -> PoolRoll {
        let mut rolls = Vec::new();
        for die in self.dice() {
            for _ in 0..die.quantity {
                rolls.push(RolledDie {
                    size: die.size,
                    value: roller.roll(die.size),
                });
            }
        }
        PoolRoll::new(rolls, suggest_best)
    }

    fn full(&self, size: DieSize) -> TraitError {
        TraitError::PoolFull {
            pool: self.name.clone(),
            size,
        }
    }

    fn plan(&self, next: [Option<Die>; 5]) -> Change<PoolEvent> {
        let events = DieSize::ALL
            .iter()
            .filter(|size| self.slots[size.index()] != next[size.index()])
            .map(|size| match next[size.index()] {
                Some(die) => PoolEvent::Set(die),
                None => PoolEvent::Emptied(*size),
            })
            .collect();
        let after = DicePool {
            name: self.name.clone(),
            slots: next,
        };
        Change::many(events, format!("{} pool: {after}", self.name))
    }
}

impl Apply for DicePool {
    type Event = PoolEvent;

    fn apply(&mut self, event: &PoolEvent) {
        match event {
            PoolEvent::Set(die) => self.slots[die.size.index()] = Some(*die),
            PoolEvent::Emptied(size) => self.slots[size.index()] = None,
        }
    }
}

impl std::fmt::Display for DicePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "empty");
        }
        let dice: Vec<String> = self.dice().map(|d| d.to_string()).collect();
        write!(f, "{}", dice.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(size: DieSize, quantity: u32) -> Die {
        Die::many(size, quantity).unwrap()
    }

    fn doom(dice: &[Die]) -> DicePool {
        let mut pool = DicePool::new("doom");
        let change = pool.add(dice).unwrap();
        pool.apply_change(change);
        pool
    }

    #[test]
    fn empty_pool() {
        let pool = DicePool::new("doom");
        assert!(pool.is_empty());
        assert_eq!(pool.count(), 0);
        assert_eq!(pool.to_string(), "empty");
    }

    #[test]
    fn add_merges_by_size() {
        let pool = doom(&[d(DieSize::D8, 1), d(DieSize::D6, 1), d(DieSize::D8, 1)]);
        assert_eq!(pool.get(DieSize::D8), Some(d(DieSize::D8, 2)));
        assert_eq!(pool.count(), 3);
        assert_eq!(pool.to_string(), "D6 2D8");
    }

    #[test]
    fn add_is_planned_not_applied() {
        let pool = DicePool::new("doom");
        let change = pool.add(&[d(DieSize::D10, 1)]).unwrap();
        assert!(pool.is_empty());
        assert_eq!(change.events, vec![PoolEvent::Set(d(DieSize::D10, 1))]);
        assert_eq!(change.message, "doom pool: D10");
    }

    #[test]
    fn remove_subtracts_and_clears_bucket() {
        let mut pool = doom(&[d(DieSize::D6, 1), d(DieSize::D8, 2)]);
        let change = pool.remove(&[d(DieSize::D6, 1), d(DieSize::D8, 1)]).unwrap();
        assert_eq!(
            change.events,
            vec![PoolEvent::Emptied(DieSize::D6), PoolEvent::Set(d(DieSize::D8, 1))]
        );
        let message = pool.apply_change(change);
        assert_eq!(message, "doom pool: D8");
        assert_eq!(pool.get(DieSize::D6), None);
    }

    #[test]
    fn remove_missing_size() {
        let pool = doom(&[d(DieSize::D6, 1)]);
        let err = pool.remove(&[d(DieSize::D12, 1)]).unwrap_err();
        assert_eq!(
            err,
            TraitError::NoSuchDie {
                pool: "doom".to_string(),
                size: DieSize::D12
            }
        );
    }

    #[test]
    fn remove_more_than_held() {
        let pool = doom(&[d(DieSize::D8, 2)]);
        let err = pool
            .remove(&[d(DieSize::D8, 1), d(DieSize::D8, 2)])
            .unwrap_err();
        assert_eq!(
            err,
            TraitError::InsufficientDice {
                pool: "doom".to_string(),
                have: 2,
                size: DieSize::D8
            }
        );
        assert_eq!(pool.get(DieSize::D8), Some(d(DieSize::D8, 2)));
    }

    #[test]
    fn add_overflow_is_rejected() {
        let pool = doom(&[d(DieSize::D6, u32::MAX)]);
        let err = pool.add(&[d(DieSize::D6, 1)]).unwrap_err();
        assert_eq!(
            err,
            TraitError::PoolFull {
                pool: "doom".to_string(),
                size: DieSize::D6
            }
        );
        assert_eq!(pool.get(DieSize::D6), Some(d(DieSize::D6, u32::MAX)));
    }

    #[test]
    fn remove_overflowing_request_is_rejected() {
        let pool = doom(&[d(DieSize::D6, 1)]);
        let err = pool
            .remove(&[d(DieSize::D6, u32::MAX), d(DieSize::D6, 1)])
            .unwrap_err();
        assert!(matches!(err, TraitError::PoolFull { .. }));
        assert_eq!(pool.get(DieSize::D6), Some(d(DieSize::D6, 1)));
    }

    #[test]
    fn emptied_pool_message() {
        let pool = doom(&[d(DieSize::D4, 1)]);
        let change = pool.remove(&[d(DieSize::D4, 1)]).unwrap();
        assert_eq!(change.message, "doom pool: empty");
    }

    #[test]
    fn temporary_copy_is_detached() {
        let pool = doom(&[d(DieSize::D6, 1)]);
        let mut copy = pool.temporary_copy();
        let change = copy.add(&[d(DieSize::D12, 1)]).unwrap();
        copy.apply_change(change);
        assert_eq!(copy.count(), 2);
        assert_eq!(pool.count(), 1);
    }

    #[test]
    fn roll_uses_roller_in_size_order() {
        let pool = doom(&[d(DieSize::D8, 2), d(DieSize::D6, 1)]);
        let mut roller = Roller::scripted([5, 7, 2]);
        let roll = pool.roll(&mut roller, true);
        assert_eq!(
            roll.rolls,
            vec![
                RolledDie { size: DieSize::D6, value: 5 },
                RolledDie { size: DieSize::D8, value: 7 },
                RolledDie { size: DieSize::D8, value: 2 },
            ]
        );
        assert_eq!(
            roll.to_string(),
            "D6 : 5\nD8 : 7, 2\nBest Total: 12 (7 + 5) with Effect: D8 | Best Effect: D8 with Total: 7 (5 + 2)"
        );
        assert_eq!(roller.total_rolls(), 3);
    }

    #[test]
    fn rolling_only_ones_botches() {
        let pool = doom(&[d(DieSize::D10, 3)]);
        let mut roller = Roller::scripted([1]);
        let roll = pool.roll(&mut roller, true);
        assert_eq!(roll.to_string(), "D10 : **(1)**, **(1)**, **(1)**\nBotch");
    }
}
