//! Whole-number arithmetic generators
//!
//! Operands come uniformly from the level's digit range. Subtraction
//! orders its operands so the result is positive and non-zero; division
//! is built backwards (dividend = divisor x quotient) so the answer is
//! always an exact integer.

use rand::Rng;
use rand_pcg::Pcg32;

use super::{Answer, MathProblem, Operand, Operation, MAX_GEN_ATTEMPTS};
use crate::difficulty::LevelConfig;

fn bounds(config: &LevelConfig) -> (i64, i64) {
    (*config.digit_range.start(), *config.digit_range.end())
}

fn binary(operation: Operation, a: i64, symbol: &str, b: i64, result: i64) -> MathProblem {
    MathProblem {
        operand1: Operand::Number(a),
        operand2: Some(Operand::Number(b)),
        operation,
        display: format!("{a} {symbol} {b}"),
        answer: Answer::integer(result),
    }
}

pub fn add(config: &LevelConfig, rng: &mut Pcg32) -> MathProblem {
    let (lo, hi) = bounds(config);
    let a = rng.random_range(lo..=hi);
    let b = rng.random_range(lo..=hi);
    binary(Operation::Addition, a, "+", b, a + b)
}

/// Operands are swapped into descending order, so the difference is
/// positive; equal draws retry
pub fn subtract(config: &LevelConfig, rng: &mut Pcg32) -> MathProblem {
    let (lo, hi) = bounds(config);
    for _ in 0..MAX_GEN_ATTEMPTS {
        let a = rng.random_range(lo..=hi);
        let b = rng.random_range(lo..=hi);
        if a != b {
            let (a, b) = (a.max(b), a.min(b));
            return binary(Operation::Subtraction, a, "-", b, a - b);
        }
    }
    // The range extremes always differ
    binary(Operation::Subtraction, hi, "-", lo, hi - lo)
}

pub fn multiply(config: &LevelConfig, rng: &mut Pcg32) -> MathProblem {
    let (lo, hi) = bounds(config);
    let a = rng.random_range(lo..=hi);
    let b = rng.random_range(lo..=hi);
    binary(Operation::Multiplication, a, "×", b, a * b)
}

/// Divisor at least 2, quotient from the digit range, dividend derived
pub fn divide(config: &LevelConfig, rng: &mut Pcg32) -> MathProblem {
    let (lo, hi) = bounds(config);
    let divisor = rng.random_range(lo.max(2)..=hi.max(2));
    let quotient = rng.random_range(lo..=hi);
    binary(
        Operation::Division,
        divisor * quotient,
        "÷",
        divisor,
        quotient,
    )
}

/// Wrong integer answers near the correct one
///
/// Offsets start small and the band widens as draws collide; a
/// sequential walk upward finishes the set if the randomized phase runs
/// out of attempts. Every value is positive and unique.
pub fn distractors(correct: i64, count: usize, rng: &mut Pcg32) -> Vec<Answer> {
    let mut values: Vec<i64> = Vec::with_capacity(count);
    let mut spread = (correct.abs() / 10).max(2);
    let mut attempts = 0;
    while values.len() < count && attempts < MAX_GEN_ATTEMPTS {
        attempts += 1;
        let offset = rng.random_range(1..=spread);
        let candidate = if rng.random_bool(0.5) {
            correct + offset
        } else {
            correct - offset
        };
        if candidate > 0 && candidate != correct && !values.contains(&candidate) {
            values.push(candidate);
        }
        if attempts % 8 == 0 {
            spread += spread;
        }
    }
    let mut next = correct + 1;
    while values.len() < count {
        if !values.contains(&next) {
            values.push(next);
        }
        next += 1;
    }
    values.into_iter().map(Answer::integer).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> Pcg32 {
        Pcg32::seed_from_u64(seed)
    }

    /// Split "a <op> b" back into its parts
    fn parse_binary(display: &str) -> (i64, String, i64) {
        let parts: Vec<&str> = display.split_whitespace().collect();
        assert_eq!(parts.len(), 3, "unexpected display {display:?}");
        (
            parts[0].parse().unwrap(),
            parts[1].to_string(),
            parts[2].parse().unwrap(),
        )
    }

    #[test]
    fn displayed_operands_recompute_to_the_answer() {
        let mut r = rng(5);
        for level in [1, 5, 8, 11, 23] {
            let config = LevelConfig::resolve(level);
            for _ in 0..250 {
                for generator in [add, subtract, multiply, divide] {
                    let p = generator(&config, &mut r);
                    let (a, op, b) = parse_binary(&p.display);
                    let expected = match op.as_str() {
                        "+" => a + b,
                        "-" => a - b,
                        "×" => a * b,
                        "÷" => a / b,
                        other => panic!("unknown symbol {other}"),
                    };
                    assert_eq!(expected as f64, p.answer.value, "{}", p.display);
                }
            }
        }
    }

    #[test]
    fn subtraction_is_always_positive_and_nonzero() {
        let mut r = rng(17);
        let config = LevelConfig::resolve(1);
        for _ in 0..1000 {
            let p = subtract(&config, &mut r);
            assert!(p.answer.value > 0.0, "{}", p.display);
        }
    }

    #[test]
    fn division_always_lands_on_whole_numbers() {
        let mut r = rng(29);
        for level in [7, 10, 22] {
            let config = LevelConfig::resolve(level);
            for _ in 0..500 {
                let p = divide(&config, &mut r);
                let (a, _, b) = parse_binary(&p.display);
                assert_eq!(a % b, 0, "{}", p.display);
                assert!(b >= 2);
                assert_eq!((a / b) as f64, p.answer.value);
            }
        }
    }

    #[test]
    fn operands_respect_the_digit_range() {
        let mut r = rng(31);
        let config = LevelConfig::resolve(10);
        for _ in 0..500 {
            let p = add(&config, &mut r);
            let (a, _, b) = parse_binary(&p.display);
            assert!((10..=99).contains(&a));
            assert!((10..=99).contains(&b));
        }
    }

    proptest! {
        #[test]
        fn distractors_are_unique_positive_and_wrong(correct in 1i64..5000, seed in 0u64..50) {
            let mut r = rng(seed);
            let ds = distractors(correct, 2, &mut r);
            prop_assert_eq!(ds.len(), 2);
            let v0 = ds[0].value as i64;
            let v1 = ds[1].value as i64;
            prop_assert!(v0 > 0 && v1 > 0);
            prop_assert!(v0 != correct && v1 != correct);
            prop_assert!(v0 != v1);
        }

        #[test]
        fn small_answers_still_get_full_distractor_sets(count in 1usize..6, seed in 0u64..50) {
            let mut r = rng(seed);
            let ds = distractors(1, count, &mut r);
            prop_assert_eq!(ds.len(), count);
        }
    }
}
