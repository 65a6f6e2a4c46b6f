//! Percentage problems
//!
//! Percentages come from a clean multiples-of-five set and bases are
//! built as multiples of the right step, so both directions ("what is
//! X% of Y" and "A is what % of B") always resolve to whole numbers.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use rand_pcg::Pcg32;

use super::{gcd, Answer, AnswerFormat, MathProblem, Operand, Operation};
use crate::difficulty::{DigitMagnitude, LevelConfig};

/// Multiples of five up to one hundred
pub const CLEAN_PERCENTAGES: [i64; 20] = [
    5, 10, 15, 20, 25, 30, 35, 40, 45, 50, 55, 60, 65, 70, 75, 80, 85, 90, 95, 100,
];

pub fn generate(config: &LevelConfig, rng: &mut Pcg32) -> MathProblem {
    if rng.random_bool(0.5) {
        percent_of(config, rng)
    } else {
        what_percent(config, rng)
    }
}

fn clean_percentage(rng: &mut Pcg32) -> i64 {
    *CLEAN_PERCENTAGES.choose(rng).unwrap_or(&50)
}

/// Smallest base with an integral `percent`% of it
fn base_step(percent: i64) -> i64 {
    100 / gcd(percent, 100)
}

fn base_cap(magnitude: DigitMagnitude) -> i64 {
    match magnitude {
        DigitMagnitude::Single => 6,
        DigitMagnitude::Double => 12,
        DigitMagnitude::Triple => 30,
    }
}

/// "What is 25% of 60?"
fn percent_of(config: &LevelConfig, rng: &mut Pcg32) -> MathProblem {
    let percent = clean_percentage(rng);
    let base = base_step(percent) * rng.random_range(1..=base_cap(config.magnitude));
    let result = percent * base / 100;
    MathProblem {
        operand1: Operand::Number(percent),
        operand2: Some(Operand::Number(base)),
        operation: Operation::Percentages,
        display: format!("What is {percent}% of {base}?"),
        answer: Answer::integer(result),
    }
}

/// "45 is what % of 180?"
fn what_percent(config: &LevelConfig, rng: &mut Pcg32) -> MathProblem {
    let percent = clean_percentage(rng);
    let base = base_step(percent) * rng.random_range(1..=base_cap(config.magnitude));
    let part = percent * base / 100;
    MathProblem {
        operand1: Operand::Number(part),
        operand2: Some(Operand::Number(base)),
        operation: Operation::Percentages,
        display: format!("{part} is what % of {base}?"),
        answer: Answer::percentage(percent),
    }
}

/// Common percentage mistakes: nearby clean percents, the doubled or
/// halved answer, and a factor-of-ten slip
pub fn distractors(correct: &Answer, count: usize, rng: &mut Pcg32) -> Vec<Answer> {
    let value = correct.value.round() as i64;
    let mut pool: Vec<i64> = vec![value + 5, value + 10, value * 2, value * 10];
    if value > 5 {
        pool.push(value - 5);
    }
    if value > 10 {
        pool.push(value - 10);
    }
    if value % 2 == 0 {
        pool.push(value / 2);
    }
    if value % 10 == 0 {
        pool.push(value / 10);
    }
    pool.shuffle(rng);

    let mut values: Vec<i64> = Vec::with_capacity(count);
    for candidate in pool {
        if values.len() == count {
            break;
        }
        if candidate > 0 && candidate != value && !values.contains(&candidate) {
            values.push(candidate);
        }
    }
    let mut next = value + 1;
    while values.len() < count {
        if !values.contains(&next) {
            values.push(next);
        }
        next += 1;
    }

    values
        .into_iter()
        .map(|v| match correct.format {
            AnswerFormat::Percentage => Answer::percentage(v),
            _ => Answer::integer(v),
        })
        .collect()
}
