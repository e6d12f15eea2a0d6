//! Body composition from an energy budget and a repeating part pattern.
//!
//! Fixed blocks are charged up front: the suffix is reserved from both the
//! budget and the size cap before repetitions are counted, and the prefix is
//! charged once per repetition alongside the pattern. A composed body therefore
//! never costs more than the budget nor exceeds the size cap.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{MAX_CREEP_SIZE, Part, body_cost};

/// Repeating pattern plus optional fixed blocks.
///
/// The output layout is `prefix * repeats`, then `pattern * repeats`, then
/// `suffix` once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadoutPattern {
    pub prefix: Vec<Part>,
    pub pattern: Vec<Part>,
    pub suffix: Vec<Part>,
}

impl LoadoutPattern {
    pub fn repeating(pattern: &[Part]) -> Self {
        Self {
            prefix: Vec::new(),
            pattern: pattern.to_vec(),
            suffix: Vec::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &[Part]) -> Self {
        self.prefix = prefix.to_vec();
        self
    }

    pub fn with_suffix(mut self, suffix: &[Part]) -> Self {
        self.suffix = suffix.to_vec();
        self
    }

    fn repeat_cost(&self) -> u32 {
        body_cost(&self.prefix) + body_cost(&self.pattern)
    }

    fn repeat_len(&self) -> usize {
        self.prefix.len() + self.pattern.len()
    }
}

/// A concrete body design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    pub parts: Vec<Part>,
    pub repeats: usize,
}

impl Loadout {
    pub fn cost(&self) -> u32 {
        body_cost(&self.parts)
    }

    /// Zero repetitions means the creep cannot be afforded.
    pub fn is_affordable(&self) -> bool {
        self.repeats > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("cannot afford agent: budget {budget} covers no repetition of a {repeat_cost}-energy pattern")]
    Unaffordable { budget: u32, repeat_cost: u32 },
}

/// Compose a body from `budget`, never exceeding `size_cap` parts.
///
/// `size_cap` is clamped to [`MAX_CREEP_SIZE`]. When no repetition fits the
/// result is empty with `repeats == 0`.
pub fn compose(
    budget: u32,
    pattern: &LoadoutPattern,
    size_cap: usize,
    repetition_limit: usize,
) -> Loadout {
    let size_cap = size_cap.min(MAX_CREEP_SIZE);
    let repeat_cost = pattern.repeat_cost();
    let repeat_len = pattern.repeat_len();
    let suffix_cost = body_cost(&pattern.suffix);

    let repeats = if repeat_len == 0 || budget < suffix_cost || size_cap < pattern.suffix.len() {
        0
    } else {
        let max_by_energy = if repeat_cost == 0 {
            usize::MAX
        } else {
            ((budget - suffix_cost) / repeat_cost) as usize
        };
        let max_by_size = (size_cap - pattern.suffix.len()) / repeat_len;
        max_by_energy.min(max_by_size).min(repetition_limit)
    };

    if repeats == 0 {
        return Loadout {
            parts: Vec::new(),
            repeats: 0,
        };
    }

    let mut parts = Vec::with_capacity(repeats * repeat_len + pattern.suffix.len());
    for _ in 0..repeats {
        parts.extend_from_slice(&pattern.prefix);
    }
    for _ in 0..repeats {
        parts.extend_from_slice(&pattern.pattern);
    }
    parts.extend_from_slice(&pattern.suffix);

    Loadout { parts, repeats }
}

/// Like [`compose`], but treats zero repetitions as an error.
pub fn compose_affordable(
    budget: u32,
    pattern: &LoadoutPattern,
    size_cap: usize,
    repetition_limit: usize,
) -> Result<Loadout, CompositionError> {
    let loadout = compose(budget, pattern, size_cap, repetition_limit);
    if !loadout.is_affordable() {
        return Err(CompositionError::Unaffordable {
            budget,
            repeat_cost: pattern.repeat_cost() + body_cost(&pattern.suffix),
        });
    }
    Ok(loadout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn miner_pattern() -> LoadoutPattern {
        LoadoutPattern::repeating(&[Part::Work, Part::Work, Part::Carry, Part::Move])
    }

    fn guard_pattern() -> LoadoutPattern {
        LoadoutPattern::repeating(&[Part::Attack, Part::Move])
            .with_prefix(&[Part::Tough])
            .with_suffix(&[Part::Work, Part::Carry])
    }

    #[test]
    fn exact_budget_for_four_repeats_yields_four() {
        let pattern = miner_pattern();
        let budget = body_cost(&pattern.pattern) * 4;
        let loadout = compose(budget, &pattern, MAX_CREEP_SIZE, 4);
        assert_eq!(loadout.repeats, 4);
        assert_eq!(loadout.parts.len(), 16);
        assert_eq!(loadout.cost(), budget);
    }

    #[test]
    fn zero_limit_or_short_budget_yields_no_repeats() {
        let pattern = miner_pattern();
        assert_eq!(compose(10_000, &pattern, MAX_CREEP_SIZE, 0).repeats, 0);
        let short = compose(body_cost(&pattern.pattern) - 1, &pattern, MAX_CREEP_SIZE, 3);
        assert_eq!(short.repeats, 0);
        assert!(short.parts.is_empty());
        assert!(!short.is_affordable());
    }

    #[test]
    fn guard_layout_is_prefix_then_pattern_then_suffix() {
        let loadout = compose(10_000, &guard_pattern(), MAX_CREEP_SIZE, 2);
        assert_eq!(
            loadout.parts,
            vec![
                Part::Tough,
                Part::Tough,
                Part::Attack,
                Part::Move,
                Part::Attack,
                Part::Move,
                Part::Work,
                Part::Carry,
            ]
        );
    }

    #[test]
    fn suffix_cost_is_reserved_before_counting_repeats() {
        let pattern = guard_pattern();
        // suffix 150 + 3 repeats of 140 = 570; one short of a fourth repeat.
        let loadout = compose(709, &pattern, MAX_CREEP_SIZE, 10);
        assert_eq!(loadout.repeats, 3);
        assert!(loadout.cost() <= 709);

        let cannot_cover_suffix = compose(149, &pattern, MAX_CREEP_SIZE, 10);
        assert_eq!(cannot_cover_suffix.repeats, 0);
    }

    #[test]
    fn never_exceeds_size_cap_or_budget() {
        let patterns = [miner_pattern(), guard_pattern(), LoadoutPattern::repeating(&[Part::Move])];
        for pattern in &patterns {
            for budget in (0..=12_000).step_by(37) {
                for cap in [1, 7, 30, MAX_CREEP_SIZE, 80] {
                    let loadout = compose(budget, pattern, cap, usize::MAX);
                    assert!(loadout.parts.len() <= cap.min(MAX_CREEP_SIZE));
                    assert!(loadout.cost() <= budget);
                }
            }
        }
    }

    #[test]
    fn compose_affordable_reports_unaffordable() {
        let err = compose_affordable(100, &miner_pattern(), MAX_CREEP_SIZE, 3)
            .expect_err("unaffordable");
        assert_eq!(
            err,
            CompositionError::Unaffordable {
                budget: 100,
                repeat_cost: 300
            }
        );
    }
}
