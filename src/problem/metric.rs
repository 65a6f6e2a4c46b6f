//! Metric conversion problems
//!
//! A pair is drawn from the enabled whitelist and the multiply-direction
//! value is generated first, so the divide direction always lands on a
//! whole number. Distractors model the classic unit mistakes: decimal
//! slips and the wrong factor.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Answer, MathProblem, Operand, Operation};
use crate::difficulty::{DigitMagnitude, LevelConfig};

/// One convertible unit pair (1 `from` == `factor` `to`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionPair {
    pub factor: i64,
    pub from: &'static str,
    pub to: &'static str,
    pub enabled: bool,
}

/// Conversion whitelist; disabled pairs stay listed but are never drawn
pub const CONVERSIONS: [ConversionPair; 7] = [
    ConversionPair { factor: 10, from: "cm", to: "mm", enabled: true },
    ConversionPair { factor: 100, from: "m", to: "cm", enabled: true },
    ConversionPair { factor: 1000, from: "km", to: "m", enabled: true },
    ConversionPair { factor: 1000, from: "kg", to: "g", enabled: true },
    ConversionPair { factor: 1000, from: "g", to: "mg", enabled: true },
    ConversionPair { factor: 1000, from: "L", to: "mL", enabled: true },
    ConversionPair { factor: 1000, from: "t", to: "kg", enabled: false },
];

/// Render a value with its unit ("3000 m")
pub fn format_quantity(value: i64, unit: &str) -> String {
    format!("{value} {unit}")
}

/// Parse a "3000 m" quantity back into value and unit
pub fn parse_quantity(s: &str) -> Option<(i64, &str)> {
    let mut parts = s.split_whitespace();
    let value = parts.next()?.parse().ok()?;
    let unit = parts.next()?;
    parts.next().is_none().then_some((value, unit))
}

fn value_cap(magnitude: DigitMagnitude) -> i64 {
    match magnitude {
        DigitMagnitude::Single => 9,
        DigitMagnitude::Double => 99,
        DigitMagnitude::Triple => 999,
    }
}

pub fn generate(config: &LevelConfig, rng: &mut Pcg32) -> MathProblem {
    let enabled: Vec<ConversionPair> =
        CONVERSIONS.iter().copied().filter(|c| c.enabled).collect();
    let pair = enabled
        .choose(rng)
        .copied()
        .unwrap_or(CONVERSIONS[0]);
    let small = rng.random_range(1..=value_cap(config.magnitude));
    let big = small * pair.factor;
    if rng.random_bool(0.5) {
        // Multiply direction: 3 km = ? m
        MathProblem {
            operand1: Operand::Number(small),
            operand2: None,
            operation: Operation::MetricConversion,
            display: format!("{} = ? {}", format_quantity(small, pair.from), pair.to),
            answer: Answer::unit(big, pair.to),
        }
    } else {
        // Divide direction: 3000 m = ? km
        MathProblem {
            operand1: Operand::Number(big),
            operand2: None,
            operation: Operation::MetricConversion,
            display: format!("{} = ? {}", format_quantity(big, pair.to), pair.from),
            answer: Answer::unit(small, pair.from),
        }
    }
}

/// Magnitude slips (x10, /10, x1000, /1000), small percentage
/// perturbations, and unit nudges, rendered with the correct answer's
/// unit
pub fn distractors(correct: &Answer, count: usize, rng: &mut Pcg32) -> Vec<Answer> {
    let value = correct.value.round() as i64;
    let unit = parse_quantity(&correct.display)
        .map(|(_, u)| u)
        .unwrap_or("");

    let mut pool: Vec<i64> = vec![value * 10, value * 100, value * 1000];
    for divisor in [10, 100, 1000] {
        if value % divisor == 0 && value / divisor > 0 {
            pool.push(value / divisor);
        }
    }
    pool.push(value + 1);
    if value > 1 {
        pool.push(value - 1);
    }
    pool.push(value * 2);
    // Proportional near-misses (10% and 5%) where they stay whole
    for denom in [10, 20] {
        if value % denom == 0 {
            pool.push(value + value / denom);
            pool.push(value - value / denom);
        }
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
    let mut next = value + 2;
    while values.len() < count {
        if !values.contains(&next) {
            values.push(next);
        }
        next += 1;
    }

    values.into_iter().map(|v| Answer::unit(v, unit)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::AnswerFormat;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> Pcg32 {
        Pcg32::seed_from_u64(seed)
    }

    fn config() -> LevelConfig {
        LevelConfig::resolve(20)
    }

    fn pair_for(from: &str, to: &str) -> Option<ConversionPair> {
        CONVERSIONS
            .iter()
            .copied()
            .find(|c| c.from == from && c.to == to)
    }

    #[test]
    fn disabled_pairs_are_never_drawn() {
        let mut r = rng(6);
        for _ in 0..500 {
            let p = generate(&config(), &mut r);
            assert!(!p.display.contains(" t "), "{}", p.display);
            assert!(!p.answer.display.ends_with(" t"), "{}", p.answer.display);
        }
    }

    #[test]
    fn conversions_are_exact_in_both_directions() {
        let mut r = rng(12);
        for _ in 0..500 {
            let p = generate(&config(), &mut r);
            let (shown, shown_unit) = parse_quantity(p.display.split(" = ").next().unwrap())
                .expect("prompt starts with a quantity");
            let (result, result_unit) =
                parse_quantity(&p.answer.display).expect("answer is a quantity");
            let pair = pair_for(shown_unit, result_unit)
                .or_else(|| pair_for(result_unit, shown_unit))
                .expect("units come from the table");
            if pair.from == shown_unit {
                assert_eq!(shown * pair.factor, result, "{}", p.display);
            } else {
                assert_eq!(result * pair.factor, shown, "{}", p.display);
            }
            assert_eq!(p.answer.format, AnswerFormat::Unit);
        }
    }

    #[test]
    fn prompt_names_the_requested_unit() {
        let mut r = rng(18);
        for _ in 0..200 {
            let p = generate(&config(), &mut r);
            let requested = p.display.rsplit(' ').next().unwrap();
            assert!(
                p.answer.display.ends_with(&format!(" {requested}")),
                "{} vs {}",
                p.display,
                p.answer.display
            );
        }
    }

    #[test]
    fn large_answers_get_proportional_near_misses() {
        // 3000 m admits the 5% and 10% slips exactly; every candidate
        // stays in the known pool and the slips actually get drawn.
        let correct = Answer::unit(3000, "m");
        let pool = [
            30000.0, 300000.0, 3000000.0, 300.0, 30.0, 3.0, 3001.0, 2999.0, 6000.0, 3300.0,
            2700.0, 3150.0, 2850.0,
        ];
        let slips = [3300.0, 2700.0, 3150.0, 2850.0];
        let mut slip_seen = false;
        for seed in 0..40 {
            let mut r = rng(seed);
            for d in distractors(&correct, 2, &mut r) {
                assert!(pool.contains(&d.value), "{:?}", d);
                slip_seen |= slips.contains(&d.value);
            }
        }
        assert!(slip_seen, "proportional slips never drawn");
    }

    #[test]
    fn distractors_keep_the_unit_suffix() {
        let mut r = rng(27);
        let correct = Answer::unit(3000, "m");
        let ds = distractors(&correct, 2, &mut r);
        assert_eq!(ds.len(), 2);
        for d in &ds {
            assert!(d.display.ends_with(" m"), "{}", d.display);
            assert!(d.value > 0.0);
            assert_ne!(d.value, 3000.0);
        }
        assert_ne!(ds[0].value, ds[1].value);
    }

    proptest! {
        #[test]
        fn quantity_rendering_round_trips(value in 1i64..1_000_000, idx in 0usize..7) {
            let unit = CONVERSIONS[idx].from;
            let rendered = format_quantity(value, unit);
            prop_assert_eq!(parse_quantity(&rendered), Some((value, unit)));
        }

        #[test]
        fn malformed_quantities_do_not_parse(s in "[a-z]{1,8}") {
            prop_assert_eq!(parse_quantity(&s), None);
        }
    }
}
