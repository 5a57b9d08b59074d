use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "−")]
    Minus,
    #[serde(rename = "×")]
    Times,
    #[serde(rename = "÷")]
    Divide,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "−",
            Operator::Times => "×",
            Operator::Divide => "÷",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    Integer(i64),
    Fraction { numerator: i64, denominator: i64 },
    /// One decimal place, stored as tenths (45 renders as "4.5").
    Tenths(i64),
}

impl Operand {
    pub fn value(&self) -> f64 {
        match *self {
            Operand::Integer(n) => n as f64,
            Operand::Fraction {
                numerator,
                denominator,
            } => numerator as f64 / denominator as f64,
            Operand::Tenths(t) => t as f64 / 10.0,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Operand::Integer(n) => write!(f, "{n}"),
            Operand::Fraction {
                numerator,
                denominator,
            } => write!(f, "{numerator}/{denominator}"),
            Operand::Tenths(t) => write!(f, "{}.{}", t / 10, t % 10),
        }
    }
}

/// Precomputed answer. Fixed answers are kept as scaled integers so the
/// rounding is decided once, at generation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Integer(i64),
    Fixed { units: i64, places: u8 },
}

impl Answer {
    /// Round `value` to `places` decimal places.
    pub fn fixed(value: f64, places: u8) -> Self {
        let scale = 10f64.powi(places as i32);
        Answer::Fixed {
            units: (value * scale).round() as i64,
            places,
        }
    }

    pub fn value(&self) -> f64 {
        match *self {
            Answer::Integer(n) => n as f64,
            Answer::Fixed { units, places } => units as f64 / 10f64.powi(places as i32),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Answer::Integer(n) => write!(f, "{n}"),
            Answer::Fixed { places, .. } => write!(f, "{:.*}", places as usize, self.value()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Question {
    pub num1: Operand,
    pub num2: Operand,
    pub operator: Operator,
    pub answer: Answer,
}

impl Question {
    /// Prompt text, e.g. "12 ÷ 4".
    pub fn prompt(&self) -> String {
        format!("{} {} {}", self.num1, self.operator, self.num2)
    }
}
