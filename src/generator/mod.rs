pub mod arithmetic;
pub mod question;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

pub use arithmetic::QuestionGenerator;
pub use question::{Answer, Operand, Operator, Question};

/// Anything that can hand the session its next question. The session never
/// cares where questions come from, which lets tests script them.
pub trait QuestionSource {
    fn generate(&mut self, operation: Operation, tier: Tier) -> Question;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Fractions,
    Decimals,
    Mixed,
}

/// Operations offered on the practice menu, in display order.
pub const PRACTICE_OPERATIONS: &[Operation] = &[
    Operation::Addition,
    Operation::Subtraction,
    Operation::Multiplication,
    Operation::Division,
    Operation::Fractions,
    Operation::Decimals,
];

/// Endless mode mixes only the integer operations.
pub const MIXED_OPERATIONS: &[Operation] = &[
    Operation::Addition,
    Operation::Subtraction,
    Operation::Multiplication,
    Operation::Division,
];

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Addition => "addition",
            Operation::Subtraction => "subtraction",
            Operation::Multiplication => "multiplication",
            Operation::Division => "division",
            Operation::Fractions => "fractions",
            Operation::Decimals => "decimals",
            Operation::Mixed => "mixed",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Operation::Addition => "Addition",
            Operation::Subtraction => "Subtraction",
            Operation::Multiplication => "Multiplication",
            Operation::Division => "Division",
            Operation::Fractions => "Fractions",
            Operation::Decimals => "Decimals",
            Operation::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addition" => Ok(Operation::Addition),
            "subtraction" => Ok(Operation::Subtraction),
            "multiplication" => Ok(Operation::Multiplication),
            "division" => Ok(Operation::Division),
            "fractions" => Ok(Operation::Fractions),
            "decimals" => Ok(Operation::Decimals),
            "mixed" => Ok(Operation::Mixed),
            other => Err(GameError::UnknownOperation(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(GameError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Inclusive operand bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperandRange {
    pub min: i64,
    pub max: i64,
}

impl OperandRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const MAX_ENDLESS_LEVEL: u32 = 10;

/// Magnitude table a question is drawn from. Each mode tunes its own ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Practice(Difficulty),
    Adventure(Difficulty),
    /// Endless level, 1..=10.
    Endless(u32),
}

impl Tier {
    pub fn range(self) -> OperandRange {
        match self {
            Tier::Practice(Difficulty::Easy) => OperandRange::new(1, 10),
            Tier::Practice(Difficulty::Medium) => OperandRange::new(5, 50),
            Tier::Practice(Difficulty::Hard) => OperandRange::new(10, 100),
            Tier::Adventure(Difficulty::Easy) => OperandRange::new(1, 10),
            Tier::Adventure(Difficulty::Medium) => OperandRange::new(5, 25),
            Tier::Adventure(Difficulty::Hard) => OperandRange::new(10, 50),
            Tier::Endless(level) => {
                let level = level.clamp(1, MAX_ENDLESS_LEVEL) as i64;
                OperandRange::new(1, (10 + level * 5).min(50))
            }
        }
    }

    /// Upper bounds for (divisor, quotient) in division questions.
    pub fn division_limits(self) -> (i64, i64) {
        match self {
            Tier::Practice(Difficulty::Easy) => (10, 10),
            Tier::Practice(Difficulty::Medium) => (12, 20),
            Tier::Practice(Difficulty::Hard) => (15, 30),
            Tier::Adventure(_) | Tier::Endless(_) => (10, 10),
        }
    }

    pub fn denominators(self) -> &'static [i64] {
        match self {
            Tier::Practice(Difficulty::Medium) => &[2, 3, 4, 5, 6, 8],
            Tier::Practice(Difficulty::Hard) => &[3, 4, 5, 6, 8, 10, 12],
            _ => &[2, 3, 4, 5],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_ids_round_trip() {
        for &op in PRACTICE_OPERATIONS.iter().chain([Operation::Mixed].iter()) {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_operation_fails_fast() {
        let err = "exponents".parse::<Operation>().unwrap_err();
        assert_eq!(err, GameError::UnknownOperation("exponents".to_string()));
        assert!(err.to_string().contains("exponents"));
    }

    #[test]
    fn test_endless_range_grows_and_caps() {
        assert_eq!(Tier::Endless(1).range(), OperandRange::new(1, 15));
        assert_eq!(Tier::Endless(4).range(), OperandRange::new(1, 30));
        assert_eq!(Tier::Endless(8).range(), OperandRange::new(1, 50));
        assert_eq!(Tier::Endless(10).range(), OperandRange::new(1, 50));
    }

    #[test]
    fn test_difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("brutal".parse::<Difficulty>().is_err());
    }
}
