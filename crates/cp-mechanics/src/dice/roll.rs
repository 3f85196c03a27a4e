//! Roll results and the best total / best effect heuristic.
//!
//! Cortex Prime adds two dice for the total and keeps a third, unused die
//! as the effect. A 1 (a hitch) can be neither. Picking the highest total
//! and picking the biggest effect die can pull in different directions, so
//! two candidates are scored: one favouring the total, one favouring the
//! effect. Both are reported when they disagree.

use super::DieSize;

/// A single rolled die.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolledDie {
    /// Size of the die.
    pub size: DieSize,
    /// Face that came up.
    pub value: u32,
}

impl RolledDie {
    /// Whether the die came up 1.
    pub fn is_hitch(&self) -> bool {
        self.value == 1
    }
}

/// One way of scoring a roll: the dice summed for the total and the effect die.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Face values added into the total, largest first.
    pub terms: Vec<u32>,
    /// Size of the effect die.
    pub effect: DieSize,
}

impl Score {
    /// Sum of the terms.
    pub fn total(&self) -> u32 {
        self.terms.iter().sum()
    }

    /// The total with its terms, e.g. `12 (7 + 5)`.
    pub fn total_text(&self) -> String {
        if self.terms.is_empty() {
            return "0".to_string();
        }
        let terms: Vec<String> = self.terms.iter().map(|t| t.to_string()).collect();
        format!("{} ({})", self.total(), terms.join(" + "))
    }

    /// Whether two scores disagree on effect size or total.
    pub fn differs_from(&self, other: &Score) -> bool {
        self.effect != other.effect || self.total() != other.total()
    }
}

/// What the heuristic suggests for a roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// Every die came up 1.
    Botch,
    /// Best scoring found.
    Best {
        /// Candidate with the highest total.
        by_total: Score,
        /// Candidate with the biggest effect die, when it differs.
        by_effect: Option<Score>,
    },
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Botch => write!(f, "Botch"),
            Self::Best {
                by_total,
                by_effect,
            } => {
                write!(
                    f,
                    "Best Total: {} with Effect: {}",
                    by_total.total_text(),
                    by_total.effect
                )?;
                if let Some(alt) = by_effect {
                    write!(
                        f,
                        " | Best Effect: {} with Total: {}",
                        alt.effect,
                        alt.total_text()
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Score by value first: the two highest faces make the total and the
/// biggest remaining die is the effect (d4 if nothing remains).
///
/// Hitches are ignored. Returns `None` when every die is a hitch.
pub fn best_by_total(rolls: &[RolledDie]) -> Option<Score> {
    let mut candidates: Vec<RolledDie> = rolls.iter().filter(|r| !r.is_hitch()).copied().collect();
    if candidates.is_empty() {
        return None;
    }
    // Equal faces: spend the smaller die so the bigger one stays free as effect.
    candidates.sort_by(|a, b| b.value.cmp(&a.value).then(a.size.cmp(&b.size)));

    let split = candidates.len().min(2);
    let terms = candidates[..split].iter().map(|r| r.value).collect();
    let effect = candidates[split..]
        .iter()
        .map(|r| r.size)
        .max()
        .unwrap_or(DieSize::D4);
    Some(Score { terms, effect })
}

/// Score by size first: the biggest die is the effect and the two highest
/// faces among the rest make the total.
///
/// Hitches are ignored. Returns `None` when every die is a hitch.
pub fn best_by_effect(rolls: &[RolledDie]) -> Option<Score> {
    let mut candidates: Vec<RolledDie> = rolls.iter().filter(|r| !r.is_hitch()).copied().collect();
    candidates.sort_by(|a, b| b.size.cmp(&a.size).then(b.value.cmp(&a.value)));
    let (effect_die, rest) = candidates.split_first()?;

    let mut values: Vec<u32> = rest.iter().map(|r| r.value).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));
    values.truncate(2);
    Some(Score {
        terms: values,
        effect: effect_die.size,
    })
}

/// Work out the suggestion for a set of rolled dice.
///
/// `Botch` is reported whenever every die is a hitch. Otherwise the best
/// scorings are only computed when `suggest_best` is set.
pub fn suggest(rolls: &[RolledDie], suggest_best: bool) -> Option<Suggestion> {
    if !rolls.is_empty() && rolls.iter().all(RolledDie::is_hitch) {
        return Some(Suggestion::Botch);
    }
    if !suggest_best {
        return None;
    }
    let by_total = best_by_total(rolls)?;
    let by_effect = best_by_effect(rolls).filter(|alt| alt.differs_from(&by_total));
    Some(Suggestion::Best {
        by_total,
        by_effect,
    })
}

/// The outcome of rolling a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolRoll {
    /// Every die rolled, grouped by size smallest first.
    pub rolls: Vec<RolledDie>,
    /// Botch or best-scoring suggestion, if any.
    pub suggestion: Option<Suggestion>,
}

impl PoolRoll {
    /// Build a result from rolled dice.
    pub fn new(rolls: Vec<RolledDie>, suggest_best: bool) -> Self {
        let suggestion = suggest(&rolls, suggest_best);
        Self { rolls, suggestion }
    }
}

impl std::fmt::Display for PoolRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines: Vec<String> = Vec::new();
        for size in DieSize::ALL {
            let faces: Vec<String> = self
                .rolls
                .iter()
                .filter(|r| r.size == size)
                .map(|r| {
                    if r.is_hitch() {
                        "**(1)**".to_string()
                    } else {
                        r.value.to_string()
                    }
                })
                .collect();
            if !faces.is_empty() {
                lines.push(format!("{size} : {}", faces.join(", ")));
            }
        }
        if let Some(suggestion) = &self.suggestion {
            lines.push(suggestion.to_string());
        }
        write!(f, "{}", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rolled(values: &[(DieSize, u32)]) -> Vec<RolledDie> {
        values
            .iter()
            .map(|(size, value)| RolledDie {
                size: *size,
                value: *value,
            })
            .collect()
    }

    #[test]
    fn value_first_and_size_first_disagree() {
        let rolls = rolled(&[(DieSize::D6, 5), (DieSize::D8, 7), (DieSize::D8, 2)]);

        let by_total = best_by_total(&rolls).unwrap();
        assert_eq!(by_total.terms, vec![7, 5]);
        assert_eq!(by_total.effect, DieSize::D8);

        let by_effect = best_by_effect(&rolls).unwrap();
        assert_eq!(by_effect.terms, vec![5, 2]);
        assert_eq!(by_effect.effect, DieSize::D8);

        let suggestion = suggest(&rolls, true).unwrap();
        assert_eq!(
            suggestion.to_string(),
            "Best Total: 12 (7 + 5) with Effect: D8 | Best Effect: D8 with Total: 7 (5 + 2)"
        );
    }

    #[test]
    fn agreeing_candidates_report_once() {
        let rolls = rolled(&[(DieSize::D4, 4), (DieSize::D6, 6), (DieSize::D10, 2)]);
        // value-first: 6 + 4 with D10; size-first: D10 effect with 6 + 4
        let suggestion = suggest(&rolls, true).unwrap();
        assert_eq!(
            suggestion.to_string(),
            "Best Total: 10 (6 + 4) with Effect: D10"
        );
    }

    #[test]
    fn hitches_are_excluded() {
        let rolls = rolled(&[(DieSize::D12, 1), (DieSize::D6, 3), (DieSize::D4, 2)]);
        let by_total = best_by_total(&rolls).unwrap();
        assert_eq!(by_total.terms, vec![3, 2]);
        assert_eq!(by_total.effect, DieSize::D4);
    }

    #[test]
    fn single_die_has_d4_effect() {
        let rolls = rolled(&[(DieSize::D8, 6)]);
        let by_total = best_by_total(&rolls).unwrap();
        assert_eq!(by_total.total_text(), "6 (6)");
        assert_eq!(by_total.effect, DieSize::D4);

        let by_effect = best_by_effect(&rolls).unwrap();
        assert_eq!(by_effect.total_text(), "0");
        assert_eq!(by_effect.effect, DieSize::D8);
    }

    #[test]
    fn all_hitches_botch() {
        let rolls = rolled(&[(DieSize::D8, 1), (DieSize::D6, 1)]);
        assert_eq!(suggest(&rolls, true), Some(Suggestion::Botch));
        assert_eq!(suggest(&rolls, false), Some(Suggestion::Botch));
        assert!(best_by_total(&rolls).is_none());
        assert!(best_by_effect(&rolls).is_none());
    }

    #[test]
    fn no_suggestion_when_disabled() {
        let rolls = rolled(&[(DieSize::D8, 5)]);
        assert_eq!(suggest(&rolls, false), None);
    }

    #[test]
    fn tied_values_keep_bigger_die_for_effect() {
        let rolls = rolled(&[(DieSize::D12, 4), (DieSize::D6, 4), (DieSize::D4, 4)]);
        let by_total = best_by_total(&rolls).unwrap();
        assert_eq!(by_total.terms, vec![4, 4]);
        assert_eq!(by_total.effect, DieSize::D12);
    }

    #[test]
    fn display_marks_hitches() {
        let roll = PoolRoll::new(
            rolled(&[(DieSize::D8, 1), (DieSize::D6, 5), (DieSize::D8, 3)]),
            false,
        );
        assert_eq!(roll.to_string(), "D6 : 5\nD8 : **(1)**, 3");
    }

    #[test]
    fn display_botch_has_no_best_line() {
        let roll = PoolRoll::new(rolled(&[(DieSize::D10, 1)]), true);
        assert_eq!(roll.to_string(), "D10 : **(1)**\nBotch");
    }
}
