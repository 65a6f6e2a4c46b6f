//! Difficulty tiers and the level resolver
//!
//! A tier is a contiguous band of levels sharing one set of allowed
//! operations and one operand magnitude. Everything here is a pure
//! function of the level number, so callers recompute on demand instead
//! of caching.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::problem::Operation;

/// Time budget at the first level of every tier (seconds)
pub const BASE_TIME_SECS: f32 = 20.0;
/// Multiplicative decay applied once per level within a tier
pub const TIME_DECAY_FACTOR: f32 = 0.9;
/// Floor the time budget never drops below (seconds)
pub const MIN_TIME_SECS: f32 = 5.0;
/// Correct answers required to advance one level
pub const ANSWERS_PER_LEVEL: u32 = 10;
/// Wrong answers offered alongside the correct one
pub const DISTRACTOR_COUNT: usize = 2;
/// Lives at the start of a session
pub const STARTING_LIVES: u32 = 3;

/// Operand size class for a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DigitMagnitude {
    Single,
    Double,
    Triple,
}

impl DigitMagnitude {
    /// Inclusive operand range for this magnitude
    pub fn range(self) -> RangeInclusive<i64> {
        match self {
            DigitMagnitude::Single => 1..=9,
            DigitMagnitude::Double => 10..=99,
            DigitMagnitude::Triple => 100..=999,
        }
    }
}

/// One rung of the difficulty ladder
#[derive(Debug, Clone)]
pub struct TierDefinition {
    pub number: u32,
    pub levels: RangeInclusive<u32>,
    pub operations: &'static [Operation],
    pub magnitude: DigitMagnitude,
    pub description: &'static str,
}

/// The difficulty ladder. Levels past the last tier keep its rules.
pub static TIERS: [TierDefinition; 8] = [
    TierDefinition {
        number: 1,
        levels: 1..=3,
        operations: &[Operation::Addition, Operation::Subtraction],
        magnitude: DigitMagnitude::Single,
        description: "Single-digit addition and subtraction",
    },
    TierDefinition {
        number: 2,
        levels: 4..=6,
        operations: &[
            Operation::Addition,
            Operation::Subtraction,
            Operation::Multiplication,
        ],
        magnitude: DigitMagnitude::Single,
        description: "Multiplication joins in",
    },
    TierDefinition {
        number: 3,
        levels: 7..=9,
        operations: &[
            Operation::Addition,
            Operation::Subtraction,
            Operation::Multiplication,
            Operation::Division,
        ],
        magnitude: DigitMagnitude::Single,
        description: "All four operations, single digits",
    },
    TierDefinition {
        number: 4,
        levels: 10..=12,
        operations: &[
            Operation::Addition,
            Operation::Subtraction,
            Operation::Multiplication,
            Operation::Division,
        ],
        magnitude: DigitMagnitude::Double,
        description: "Double-digit arithmetic",
    },
    TierDefinition {
        number: 5,
        levels: 13..=15,
        operations: &[
            Operation::Multiplication,
            Operation::Division,
            Operation::Fractions,
        ],
        magnitude: DigitMagnitude::Double,
        description: "Fractions appear",
    },
    TierDefinition {
        number: 6,
        levels: 16..=18,
        operations: &[
            Operation::Fractions,
            Operation::ImproperFractions,
            Operation::Percentages,
        ],
        magnitude: DigitMagnitude::Double,
        description: "Improper fractions and percentages",
    },
    TierDefinition {
        number: 7,
        levels: 19..=21,
        operations: &[
            Operation::Percentages,
            Operation::MetricConversion,
            Operation::Multiplication,
            Operation::Division,
        ],
        magnitude: DigitMagnitude::Double,
        description: "Percentages and metric conversion",
    },
    TierDefinition {
        number: 8,
        levels: 22..=24,
        operations: &[
            Operation::Addition,
            Operation::Subtraction,
            Operation::Multiplication,
            Operation::Division,
            Operation::Fractions,
            Operation::ImproperFractions,
            Operation::Percentages,
            Operation::MetricConversion,
        ],
        magnitude: DigitMagnitude::Triple,
        description: "Everything, triple digits",
    },
];

/// Levels are 1-based; anything below clamps up
fn clamp_level(level: u32) -> u32 {
    level.max(1)
}

/// Tier whose band contains `level`; the last tier for anything beyond
pub fn tier_for_level(level: u32) -> &'static TierDefinition {
    let level = clamp_level(level);
    TIERS
        .iter()
        .find(|t| t.levels.contains(&level))
        .unwrap_or(&TIERS[TIERS.len() - 1])
}

/// Time budget in seconds for `level`
///
/// Starts at [`BASE_TIME_SECS`] on each tier's first level and decays by
/// [`TIME_DECAY_FACTOR`] per level within the tier. Past the last tier
/// there is no further reset, so the decay keeps compounding down to
/// [`MIN_TIME_SECS`].
pub fn time_for_level(level: u32) -> f32 {
    let level = clamp_level(level);
    let tier = tier_for_level(level);
    let steps = level - *tier.levels.start();
    (BASE_TIME_SECS * TIME_DECAY_FACTOR.powi(steps as i32)).max(MIN_TIME_SECS)
}

/// Operations the generator may draw from at `level`
pub fn operations_for_level(level: u32) -> &'static [Operation] {
    tier_for_level(level).operations
}

/// Operand size class for `level`
pub fn digit_magnitude_for_level(level: u32) -> DigitMagnitude {
    tier_for_level(level).magnitude
}

/// Operand range for `level`
pub fn digit_range_for_level(level: u32) -> RangeInclusive<i64> {
    digit_magnitude_for_level(level).range()
}

/// Everything the problem generators need to know about one level
#[derive(Debug, Clone)]
pub struct LevelConfig {
    pub level: u32,
    pub tier: &'static TierDefinition,
    pub time_secs: f32,
    pub operations: &'static [Operation],
    pub magnitude: DigitMagnitude,
    pub digit_range: RangeInclusive<i64>,
}

impl LevelConfig {
    pub fn resolve(level: u32) -> Self {
        let level = clamp_level(level);
        let tier = tier_for_level(level);
        Self {
            level,
            tier,
            time_secs: time_for_level(level),
            operations: tier.operations,
            magnitude: tier.magnitude,
            digit_range: tier.magnitude.range(),
        }
    }
}
