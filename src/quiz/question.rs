//! Difficulty-tiered fraction question synthesis
//!
//! Questions are plain data. Formatting and answer checking are free
//! functions over a [`Question`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fraction::Fraction;

/// Arithmetic operation of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }

    /// Combine two fractions. `None` for division by a zero-valued fraction
    /// or when the unreduced result does not fit in `i64`.
    pub fn apply(&self, a: Fraction, b: Fraction) -> Option<Fraction> {
        let (n1, d1) = (a.numerator(), a.denominator());
        let (n2, d2) = (b.numerator(), b.denominator());
        let (n, d) = match self {
            Operation::Add => {
                let n = n1.checked_mul(d2)?.checked_add(n2.checked_mul(d1)?)?;
                (n, d1.checked_mul(d2)?)
            }
            Operation::Subtract => {
                let n = n1.checked_mul(d2)?.checked_sub(n2.checked_mul(d1)?)?;
                (n, d1.checked_mul(d2)?)
            }
            Operation::Multiply => (n1.checked_mul(n2)?, d1.checked_mul(d2)?),
            Operation::Divide => (n1.checked_mul(d2)?, d1.checked_mul(n2)?),
        };
        Fraction::new(n, d).ok()
    }
}

/// Difficulty tier derived from the game level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=2 => Difficulty::Easy,
            3..=5 => Difficulty::Medium,
            6..=8 => Difficulty::Hard,
            _ => Difficulty::Expert,
        }
    }

    /// Operations offered at this tier
    pub fn operations(&self) -> &'static [Operation] {
        use Operation::*;
        match self {
            Difficulty::Easy => &[Add, Subtract],
            Difficulty::Medium => &[Add, Subtract, Multiply],
            Difficulty::Hard | Difficulty::Expert => &[Add, Subtract, Multiply, Divide],
        }
    }
}

/// A generated quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub operand1: Fraction,
    pub operand2: Fraction,
    pub operation: Operation,
    pub correct_answer: Fraction,
}

/// Question text, e.g. `3/4 + 1/4 = ?`
pub fn format_question(question: &Question) -> String {
    format!(
        "{} {} {} = ?",
        question.operand1,
        question.operation.symbol(),
        question.operand2
    )
}

/// Accepts any fraction equivalent to the correct answer
pub fn check_answer(question: &Question, numerator: i64, denominator: i64) -> bool {
    match Fraction::new(numerator, denominator) {
        Ok(answer) => answer.simplify() == question.correct_answer.simplify(),
        Err(_) => false,
    }
}

const EASY_DENOMINATORS: [i64; 5] = [2, 3, 4, 5, 6];
const MEDIUM_PRODUCT_DENOMINATORS: [i64; 4] = [2, 3, 4, 5];

/// Generate a question for the given level
pub fn generate_question<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Question {
    let difficulty = Difficulty::for_level(level);
    let ops = difficulty.operations();
    let operation = ops[rng.random_range(0..ops.len())];

    let (operand1, operand2) = match difficulty {
        Difficulty::Easy => easy_operands(operation, rng),
        Difficulty::Medium => medium_operands(operation, rng),
        Difficulty::Hard => wide_operands(operation, 9, 9, rng),
        Difficulty::Expert => wide_operands(operation, 12, 12, rng),
    };

    // Operands are small and every numerator is at least 1, so this never falls back
    let correct_answer = operation
        .apply(operand1, operand2)
        .unwrap_or(Fraction::from_parts(0, 1));

    Question {
        operand1,
        operand2,
        operation,
        correct_answer,
    }
}

fn pick<R: Rng + ?Sized>(values: &[i64], rng: &mut R) -> i64 {
    values[rng.random_range(0..values.len())]
}

/// Shared denominator, numerators in 1..=d
fn easy_operands<R: Rng + ?Sized>(operation: Operation, rng: &mut R) -> (Fraction, Fraction) {
    let d = pick(&EASY_DENOMINATORS, rng);
    let n1 = rng.random_range(1..=d);
    let mut n2 = rng.random_range(1..=d);

    if operation == Operation::Subtract && n1 < n2 {
        n2 = rng.random_range(1..=n1);
    }

    (Fraction::from_parts(n1, d), Fraction::from_parts(n2, d))
}

/// Related denominators (same or doubled) for add/subtract, small independent ones for multiply
fn medium_operands<R: Rng + ?Sized>(operation: Operation, rng: &mut R) -> (Fraction, Fraction) {
    match operation {
        Operation::Add | Operation::Subtract => {
            let d1 = pick(&EASY_DENOMINATORS, rng);
            let d2 = if rng.random_bool(0.5) { d1 } else { d1 * 2 };
            let n1 = rng.random_range(1..=d1);
            let mut n2 = rng.random_range(1..=d2);

            if operation == Operation::Subtract && n1 * d2 < n2 * d1 {
                // d2 is a multiple of d1, so the bound is exact
                let max = (n1 * d2 / d1).max(1);
                n2 = rng.random_range(1..=max);
            }

            (Fraction::from_parts(n1, d1), Fraction::from_parts(n2, d2))
        }
        Operation::Multiply | Operation::Divide => {
            let d1 = pick(&MEDIUM_PRODUCT_DENOMINATORS, rng);
            let d2 = pick(&MEDIUM_PRODUCT_DENOMINATORS, rng);
            let n1 = rng.random_range(1..=d1);
            let n2 = rng.random_range(1..=d2);
            (Fraction::from_parts(n1, d1), Fraction::from_parts(n2, d2))
        }
    }
}

/// Independent operands; denominators in 2..=max_den, numerators in 1..=max_num.
/// Subtraction swaps the pair so the larger value comes first.
fn wide_operands<R: Rng + ?Sized>(
    operation: Operation,
    max_num: i64,
    max_den: i64,
    rng: &mut R,
) -> (Fraction, Fraction) {
    let d1 = rng.random_range(2..=max_den);
    let d2 = rng.random_range(2..=max_den);
    let n1 = rng.random_range(1..=max_num);
    let n2 = rng.random_range(1..=max_num);
    let a = Fraction::from_parts(n1, d1);
    let b = Fraction::from_parts(n2, d2);

    if operation == Operation::Subtract && a.less_than(&b) {
        (b, a)
    } else {
        (a, b)
    }
}
