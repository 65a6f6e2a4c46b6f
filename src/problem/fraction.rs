//! Fraction problems: proper and improper modes
//!
//! Denominators come from a fixed clean set, and operand pairs always
//! share a compatible denominator (equal or a multiple) so
//! common-denominator work stays legible. Correct answers are reduced;
//! distractors may deliberately wear an unreduced form, but their values
//! always differ from the correct one.

use std::fmt;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{gcd, Answer, AnswerFormat, MathProblem, Operand, Operation, MAX_GEN_ATTEMPTS};
use crate::answers_equal;
use crate::difficulty::{DigitMagnitude, LevelConfig};

/// Denominators that keep fraction work legible
pub const CLEAN_DENOMINATORS: [i64; 8] = [2, 3, 4, 5, 6, 8, 10, 12];

/// An exact rational
///
/// `new` reduces to lowest terms and keeps the denominator positive;
/// `raw` skips reduction for prompts that deliberately show an
/// unreduced form. Equality is structural, so `raw(2, 4) != new(1, 2)`
/// even though the values match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraction {
    num: i64,
    den: i64,
}

impl Fraction {
    /// Build reduced, denominator positive
    pub fn new(num: i64, den: i64) -> Self {
        debug_assert!(den != 0, "fraction denominator must be non-zero");
        let sign = if den < 0 { -1 } else { 1 };
        let (num, den) = (num * sign, den * sign);
        let g = gcd(num, den).max(1);
        Self {
            num: num / g,
            den: den / g,
        }
    }

    /// Build without reducing
    pub fn raw(num: i64, den: i64) -> Self {
        debug_assert!(den != 0, "fraction denominator must be non-zero");
        Self { num, den }
    }

    pub fn num(&self) -> i64 {
        self.num
    }

    pub fn den(&self) -> i64 {
        self.den
    }

    /// Canonical numeric value
    pub fn value(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Lowest-terms form; idempotent
    pub fn simplify(&self) -> Fraction {
        Fraction::new(self.num, self.den)
    }

    pub fn is_reduced(&self) -> bool {
        self.den > 0 && gcd(self.num, self.den) == 1
    }

    /// Numerator at least the denominator (renders as a mixed number)
    pub fn is_improper(&self) -> bool {
        self.num.abs() >= self.den.abs()
    }

    /// Whole part plus reduced remainder fraction
    pub fn to_mixed(&self) -> (i64, Fraction) {
        (self.num / self.den, Fraction::new(self.num % self.den, self.den))
    }

    /// Rebuild the improper form of `whole` and `part`
    pub fn from_mixed(whole: i64, part: Fraction) -> Fraction {
        Fraction::new(whole * part.den + part.num, part.den)
    }

    pub fn add(&self, other: &Fraction) -> Fraction {
        Fraction::new(
            self.num * other.den + other.num * self.den,
            self.den * other.den,
        )
    }

    pub fn sub(&self, other: &Fraction) -> Fraction {
        Fraction::new(
            self.num * other.den - other.num * self.den,
            self.den * other.den,
        )
    }

    /// Recover the reduced fraction behind a canonical value
    ///
    /// Generator answers always have small denominators, so a bounded
    /// scan finds the exact one.
    pub(crate) fn from_value_exact(value: f64) -> Option<Fraction> {
        for den in 1..=240i64 {
            let scaled = value * den as f64;
            let num = scaled.round();
            if (scaled - num).abs() < crate::ANSWER_EPSILON {
                return Some(Fraction::new(num as i64, den));
            }
        }
        None
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// "1 3/4" rendering; a zero part drops to the whole alone
pub fn format_mixed(whole: i64, part: Fraction) -> String {
    if part.num() == 0 {
        whole.to_string()
    } else {
        format!("{whole} {part}")
    }
}

/// Proper-fraction mode: same-denominator arithmetic, simplification
/// prompts, and fraction-of-a-whole
pub fn generate_proper(config: &LevelConfig, rng: &mut Pcg32) -> MathProblem {
    match rng.random_range(0..10u32) {
        0..=3 => proper_arithmetic(rng),
        4..=6 => simplification(rng),
        _ => fraction_of_whole(config, rng),
    }
}

/// Improper-fraction mode: arithmetic over an improper operand plus
/// mixed-number conversions in both directions
pub fn generate_improper(_config: &LevelConfig, rng: &mut Pcg32) -> MathProblem {
    match rng.random_range(0..10u32) {
        0..=4 => improper_arithmetic(rng),
        5..=7 => to_mixed_conversion(rng),
        _ => to_improper_conversion(rng),
    }
}

fn clean_denominator(rng: &mut Pcg32) -> i64 {
    *CLEAN_DENOMINATORS.choose(rng).unwrap_or(&4)
}

/// A denominator from the clean set that is equal to `d` or a multiple
/// relative of it
fn compatible_denominator(d: i64, rng: &mut Pcg32) -> i64 {
    let options: Vec<i64> = CLEAN_DENOMINATORS
        .iter()
        .copied()
        .filter(|&c| c % d == 0 || d % c == 0)
        .collect();
    options.choose(rng).copied().unwrap_or(d)
}

/// Equal denominators or one a multiple of the other
///
/// Checked on the operands as displayed: reduction can shrink a drawn
/// denominator (3/6 becomes 1/2) out of compatibility with its partner.
fn denominators_compatible(a: &Fraction, b: &Fraction) -> bool {
    a.den() % b.den() == 0 || b.den() % a.den() == 0
}

fn build_binary(
    operation: Operation,
    a: Fraction,
    symbol: &str,
    b: Fraction,
    result: Fraction,
) -> MathProblem {
    MathProblem {
        operand1: Operand::Fraction(a),
        operand2: Some(Operand::Fraction(b)),
        operation,
        display: format!("{a} {symbol} {b}"),
        answer: Answer::fraction(result),
    }
}

/// a ± b over compatible denominators; the result stays proper,
/// positive, and non-zero
fn proper_arithmetic(rng: &mut Pcg32) -> MathProblem {
    for _ in 0..MAX_GEN_ATTEMPTS {
        let d1 = clean_denominator(rng);
        let d2 = compatible_denominator(d1, rng);
        let a = Fraction::new(rng.random_range(1..d1), d1);
        let b = Fraction::new(rng.random_range(1..d2), d2);
        if !denominators_compatible(&a, &b) {
            continue;
        }
        if rng.random_bool(0.5) {
            let result = a.add(&b);
            if result.num() < result.den() {
                return build_binary(Operation::Fractions, a, "+", b, result);
            }
        } else {
            let (hi, lo) = if a.value() >= b.value() { (a, b) } else { (b, a) };
            let result = hi.sub(&lo);
            if result.num() != 0 {
                return build_binary(Operation::Fractions, hi, "-", lo, result);
            }
        }
    }
    let a = Fraction::new(1, 4);
    let b = Fraction::new(1, 8);
    build_binary(Operation::Fractions, a, "+", b, a.add(&b))
}

/// "Simplify 6/8" - the prompt shows a deliberately unreduced fraction
fn simplification(rng: &mut Pcg32) -> MathProblem {
    let den = clean_denominator(rng);
    let num = rng.random_range(1..den);
    let target = Fraction::new(num, den);
    let k = rng.random_range(2..=6);
    let shown = Fraction::raw(target.num() * k, target.den() * k);
    MathProblem {
        operand1: Operand::Fraction(shown),
        operand2: None,
        operation: Operation::Fractions,
        display: format!("Simplify {shown}"),
        answer: Answer::fraction(target),
    }
}

/// "3/4 of 16" - the whole is a multiple of the denominator, so the
/// answer is a whole number
fn fraction_of_whole(config: &LevelConfig, rng: &mut Pcg32) -> MathProblem {
    let den = clean_denominator(rng);
    let num = rng.random_range(1..den);
    let frac = Fraction::new(num, den);
    let k = rng.random_range(1..=whole_cap(config.magnitude));
    let whole = frac.den() * k;
    MathProblem {
        operand1: Operand::Fraction(frac),
        operand2: Some(Operand::Number(whole)),
        operation: Operation::Fractions,
        display: format!("{frac} of {whole}"),
        answer: Answer::integer(frac.num() * k),
    }
}

fn whole_cap(magnitude: DigitMagnitude) -> i64 {
    match magnitude {
        DigitMagnitude::Single => 3,
        DigitMagnitude::Double => 8,
        DigitMagnitude::Triple => 40,
    }
}

/// Improper ± proper; results that collapse to whole numbers retry
fn improper_arithmetic(rng: &mut Pcg32) -> MathProblem {
    for _ in 0..MAX_GEN_ATTEMPTS {
        let d1 = clean_denominator(rng);
        let d2 = compatible_denominator(d1, rng);
        let a = Fraction::new(rng.random_range(d1 + 1..=d1 * 3), d1);
        let b = Fraction::new(rng.random_range(1..d2), d2);
        if a.den() == 1 || !denominators_compatible(&a, &b) {
            continue;
        }
        let subtract = rng.random_bool(0.5);
        let result = if subtract { a.sub(&b) } else { a.add(&b) };
        if result.num() == 0 || result.den() == 1 {
            continue;
        }
        let symbol = if subtract { "-" } else { "+" };
        return build_binary(Operation::ImproperFractions, a, symbol, b, result);
    }
    let a = Fraction::new(5, 4);
    let b = Fraction::new(1, 2);
    build_binary(Operation::ImproperFractions, a, "+", b, a.add(&b))
}

/// Whole part, reduced proper part, and the improper expansion of both
fn mixed_source(rng: &mut Pcg32) -> (Fraction, i64, Fraction) {
    let den = clean_denominator(rng);
    let num = rng.random_range(1..den);
    let part = Fraction::new(num, den);
    let whole = rng.random_range(1..=4);
    (Fraction::from_mixed(whole, part), whole, part)
}

fn to_mixed_conversion(rng: &mut Pcg32) -> MathProblem {
    let (improper, _, _) = mixed_source(rng);
    MathProblem {
        operand1: Operand::Fraction(improper),
        operand2: None,
        operation: Operation::ImproperFractions,
        display: format!("Convert {improper} to a mixed number"),
        answer: Answer::mixed(improper),
    }
}

fn to_improper_conversion(rng: &mut Pcg32) -> MathProblem {
    let (improper, whole, part) = mixed_source(rng);
    MathProblem {
        operand1: Operand::Fraction(improper),
        operand2: None,
        operation: Operation::ImproperFractions,
        display: format!("Convert {} to an improper fraction", format_mixed(whole, part)),
        answer: Answer::fraction(improper),
    }
}

/// Wrong fraction answers: off-by-one numerators and denominators, plus
/// a mis-simplified (unreduced, wrong-value) form
pub fn distractors(correct: &Answer, count: usize, rng: &mut Pcg32) -> Vec<Answer> {
    let exact = Fraction::from_value_exact(correct.value)
        .unwrap_or_else(|| Fraction::raw((correct.value * 12.0).round() as i64, 12));

    let mut pool: Vec<Fraction> = vec![
        Fraction::raw(exact.num() + 1, exact.den()),
        Fraction::raw(exact.num(), exact.den() + 1),
        Fraction::raw((exact.num() + 1) * 2, exact.den() * 2),
    ];
    if exact.num() > 1 {
        pool.push(Fraction::raw(exact.num() - 1, exact.den()));
    }
    if exact.den() > 2 {
        pool.push(Fraction::raw(exact.num(), exact.den() - 1));
    }
    pool.shuffle(rng);

    let mut out: Vec<Answer> = Vec::with_capacity(count);
    for candidate in pool {
        if out.len() == count {
            break;
        }
        push_if_valid(candidate, correct, &mut out);
    }
    // Deterministic fallback: widen the numerator offset
    let mut offset = 2;
    while out.len() < count {
        push_if_valid(Fraction::raw(exact.num() + offset, exact.den()), correct, &mut out);
        offset += 1;
    }
    out
}

fn push_if_valid(candidate: Fraction, correct: &Answer, out: &mut Vec<Answer>) {
    let Some(answer) = render(candidate, correct.format) else {
        return;
    };
    let clashes = answers_equal(answer.value, correct.value)
        || out.iter().any(|e| answers_equal(e.value, answer.value));
    if !clashes {
        out.push(answer);
    }
}

/// Render a candidate in the target format, or reject what the format
/// cannot express
fn render(f: Fraction, format: AnswerFormat) -> Option<Answer> {
    if f.num() <= 0 || f.den() <= 0 {
        return None;
    }
    match format {
        AnswerFormat::Fraction => (f.simplify().den() > 1).then(|| Answer {
            format: AnswerFormat::Fraction,
            value: f.value(),
            display: f.to_string(),
        }),
        AnswerFormat::MixedNumber => {
            let reduced = f.simplify();
            (reduced.den() > 1 && reduced.num() > reduced.den()).then(|| Answer::mixed(reduced))
        }
        _ => None,
    }
}
