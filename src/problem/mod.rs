//! Math problem model and generator dispatch
//!
//! Each domain generator builds a fully specified [`MathProblem`] whose
//! answer is guaranteed clean (integral or a reduced fraction), plus
//! plausible-but-wrong alternatives for it. All correctness decisions run
//! on the canonical numeric value; display strings are produced once at
//! generation time and never parsed back outside this module tree.

pub mod arithmetic;
pub mod fraction;
pub mod metric;
pub mod percentage;

use std::fmt;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::difficulty::LevelConfig;
pub use fraction::Fraction;

/// Retry budget shared by all generator loops; every loop has a
/// deterministic fallback once it runs out
pub(crate) const MAX_GEN_ATTEMPTS: u32 = 32;

/// The eight operation categories problems are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Fractions,
    ImproperFractions,
    Percentages,
    MetricConversion,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::Addition,
        Operation::Subtraction,
        Operation::Multiplication,
        Operation::Division,
        Operation::Fractions,
        Operation::ImproperFractions,
        Operation::Percentages,
        Operation::MetricConversion,
    ];

    /// Selection weight. Basic arithmetic shows up more often than unit
    /// conversion whenever both are allowed.
    pub fn weight(self) -> u32 {
        match self {
            Operation::Addition
            | Operation::Subtraction
            | Operation::Multiplication
            | Operation::Division => 3,
            Operation::Fractions | Operation::ImproperFractions | Operation::Percentages => 2,
            Operation::MetricConversion => 1,
        }
    }

    /// Stable position in [`Operation::ALL`] (telemetry indexing)
    pub fn index(self) -> usize {
        match self {
            Operation::Addition => 0,
            Operation::Subtraction => 1,
            Operation::Multiplication => 2,
            Operation::Division => 3,
            Operation::Fractions => 4,
            Operation::ImproperFractions => 5,
            Operation::Percentages => 6,
            Operation::MetricConversion => 7,
        }
    }

    /// Snake-case name for logs and telemetry keys
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Addition => "addition",
            Operation::Subtraction => "subtraction",
            Operation::Multiplication => "multiplication",
            Operation::Division => "division",
            Operation::Fractions => "fractions",
            Operation::ImproperFractions => "improper_fractions",
            Operation::Percentages => "percentages",
            Operation::MetricConversion => "metric_conversion",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an answer renders and which distractor policy applies to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerFormat {
    Integer,
    Fraction,
    MixedNumber,
    Percentage,
    Unit,
}

/// A displayable answer with its canonical numeric value
///
/// Hit resolution and distractor-distinctness checks compare `value`
/// only; `display` is the one rendering of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub format: AnswerFormat,
    pub value: f64,
    pub display: String,
}

impl Answer {
    pub fn integer(value: i64) -> Self {
        Self {
            format: AnswerFormat::Integer,
            value: value as f64,
            display: value.to_string(),
        }
    }

    /// Fraction rendering; whole values drop the denominator
    pub fn fraction(f: Fraction) -> Self {
        let display = if f.den() == 1 {
            f.num().to_string()
        } else {
            f.to_string()
        };
        Self {
            format: AnswerFormat::Fraction,
            value: f.value(),
            display,
        }
    }

    /// Mixed-number rendering of an improper fraction ("1 3/4")
    pub fn mixed(f: Fraction) -> Self {
        let (whole, part) = f.to_mixed();
        Self {
            format: AnswerFormat::MixedNumber,
            value: f.value(),
            display: fraction::format_mixed(whole, part),
        }
    }

    pub fn percentage(percent: i64) -> Self {
        Self {
            format: AnswerFormat::Percentage,
            value: percent as f64,
            display: format!("{percent}%"),
        }
    }

    pub fn unit(value: i64, unit: &str) -> Self {
        Self {
            format: AnswerFormat::Unit,
            value: value as f64,
            display: metric::format_quantity(value, unit),
        }
    }
}

/// One presented operand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Number(i64),
    Fraction(Fraction),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Fraction(fr) => write!(f, "{fr}"),
        }
    }
}

/// One fully specified problem; immutable for the life of its round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathProblem {
    pub operand1: Operand,
    /// Absent for unary prompts (simplification, conversion)
    pub operand2: Option<Operand>,
    pub operation: Operation,
    /// Prompt shown to the player
    pub display: String,
    pub answer: Answer,
}

/// Generate a problem for `level`: weighted operation pick, then domain
/// dispatch
pub fn generate(level: u32, rng: &mut Pcg32) -> MathProblem {
    let config = LevelConfig::resolve(level);
    let operation = pick_operation(config.operations, rng);
    generate_with(operation, &config, rng)
}

/// Generate a problem for a specific operation
pub fn generate_with(operation: Operation, config: &LevelConfig, rng: &mut Pcg32) -> MathProblem {
    match operation {
        Operation::Addition => arithmetic::add(config, rng),
        Operation::Subtraction => arithmetic::subtract(config, rng),
        Operation::Multiplication => arithmetic::multiply(config, rng),
        Operation::Division => arithmetic::divide(config, rng),
        Operation::Fractions => fraction::generate_proper(config, rng),
        Operation::ImproperFractions => fraction::generate_improper(config, rng),
        Operation::Percentages => percentage::generate(config, rng),
        Operation::MetricConversion => metric::generate(config, rng),
    }
}

/// `count` wrong answers for `problem`, in its answer's format, pairwise
/// distinct and numerically distinct from the correct value
pub fn distractors_for(problem: &MathProblem, count: usize, rng: &mut Pcg32) -> Vec<Answer> {
    // Percentage problems share one mistake pool whichever way their
    // answers render; "X% of Y" answers are plain integers.
    if problem.operation == Operation::Percentages {
        return percentage::distractors(&problem.answer, count, rng);
    }
    match problem.answer.format {
        AnswerFormat::Integer => {
            arithmetic::distractors(problem.answer.value.round() as i64, count, rng)
        }
        AnswerFormat::Fraction | AnswerFormat::MixedNumber => {
            fraction::distractors(&problem.answer, count, rng)
        }
        AnswerFormat::Percentage => percentage::distractors(&problem.answer, count, rng),
        AnswerFormat::Unit => metric::distractors(&problem.answer, count, rng),
    }
}

/// Weighted draw over the allowed operation set
fn pick_operation(allowed: &[Operation], rng: &mut Pcg32) -> Operation {
    let total: u32 = allowed.iter().map(|op| op.weight()).sum();
    if total == 0 {
        return Operation::Addition;
    }
    let mut roll = rng.random_range(0..total);
    for &op in allowed {
        let w = op.weight();
        if roll < w {
            return op;
        }
        roll -= w;
    }
    allowed[allowed.len() - 1]
}

/// Greatest common divisor (Euclid, absolute values)
pub(crate) fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
