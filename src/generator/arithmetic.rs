use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::generator::question::{Answer, Operand, Operator, Question};
use crate::generator::{MIXED_OPERATIONS, OperandRange, Operation, QuestionSource, Tier};

/// Multiplication always draws from the times tables, whatever the tier.
const TIMES_TABLE_MAX: i64 = 12;

pub struct QuestionGenerator {
    rng: SmallRng,
}

impl QuestionGenerator {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for QuestionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionSource for QuestionGenerator {
    fn generate(&mut self, operation: Operation, tier: Tier) -> Question {
        generate_question(operation, tier, &mut self.rng)
    }
}

pub fn generate_question(operation: Operation, tier: Tier, rng: &mut SmallRng) -> Question {
    match operation {
        Operation::Addition => addition(tier.range(), rng),
        Operation::Subtraction => subtraction(tier.range(), rng),
        Operation::Multiplication => multiplication(rng),
        Operation::Division => division(tier, rng),
        Operation::Fractions => fractions(tier, rng),
        Operation::Decimals => decimals(tier.range(), rng),
        Operation::Mixed => {
            let picked = MIXED_OPERATIONS[rng.gen_range(0..MIXED_OPERATIONS.len())];
            generate_question(picked, tier, rng)
        }
    }
}

fn draw(range: OperandRange, rng: &mut SmallRng) -> i64 {
    rng.gen_range(range.min..=range.max)
}

fn addition(range: OperandRange, rng: &mut SmallRng) -> Question {
    let num1 = draw(range, rng);
    let num2 = draw(range, rng);
    integer_question(num1, num2, Operator::Plus, num1 + num2)
}

fn subtraction(range: OperandRange, rng: &mut SmallRng) -> Question {
    let mut num1 = draw(range, rng);
    let mut num2 = draw(range, rng);
    if num2 > num1 {
        std::mem::swap(&mut num1, &mut num2);
    }
    integer_question(num1, num2, Operator::Minus, num1 - num2)
}

fn multiplication(rng: &mut SmallRng) -> Question {
    let num1 = rng.gen_range(1..=TIMES_TABLE_MAX);
    let num2 = rng.gen_range(1..=TIMES_TABLE_MAX);
    integer_question(num1, num2, Operator::Times, num1 * num2)
}

// Quotient and divisor come first so the dividend is always an exact multiple.
fn division(tier: Tier, rng: &mut SmallRng) -> Question {
    let (divisor_max, quotient_max) = tier.division_limits();
    let divisor = rng.gen_range(1..=divisor_max);
    let quotient = rng.gen_range(1..=quotient_max);
    integer_question(quotient * divisor, divisor, Operator::Divide, quotient)
}

fn fractions(tier: Tier, rng: &mut SmallRng) -> Question {
    let denominators = tier.denominators();
    let denominator = denominators[rng.gen_range(0..denominators.len())];
    let n1 = rng.gen_range(1..denominator);
    let n2 = rng.gen_range(1..denominator);
    Question {
        num1: Operand::Fraction {
            numerator: n1,
            denominator,
        },
        num2: Operand::Fraction {
            numerator: n2,
            denominator,
        },
        operator: Operator::Plus,
        answer: Answer::fixed((n1 + n2) as f64 / denominator as f64, 2),
    }
}

fn decimals(range: OperandRange, rng: &mut SmallRng) -> Question {
    let tenths = OperandRange::new(range.min * 10, range.max * 10);
    let t1 = draw(tenths, rng);
    let t2 = draw(tenths, rng);
    Question {
        num1: Operand::Tenths(t1),
        num2: Operand::Tenths(t2),
        operator: Operator::Plus,
        answer: Answer::Fixed {
            units: t1 + t2,
            places: 1,
        },
    }
}

fn integer_question(num1: i64, num2: i64, operator: Operator, answer: i64) -> Question {
    Question {
        num1: Operand::Integer(num1),
        num2: Operand::Integer(num2),
        operator,
        answer: Answer::Integer(answer),
    }
}
