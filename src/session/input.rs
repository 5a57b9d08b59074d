use crate::generator::Answer;

/// Absolute tolerance when comparing a typed answer to the expected one.
/// Fraction answers are rounded to two places, so "2/3" must still match 0.67.
pub const ANSWER_TOLERANCE: f64 = 0.01;

/// Parse typed answer text. Accepts plain decimals ("12", "-3", "4.5") and
/// fractions ("3/4"). Returns None for anything that is not a finite number,
/// including a missing or zero denominator.
///
/// Parsing is strict: both sides of the slash must be numbers, so "/4"
/// (missing numerator) and "1/2/3" (more than one slash) are not numbers
/// and score as wrong answers rather than being read as 0 or 0.5.
pub fn parse_answer(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value = match trimmed.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.trim().parse().ok()?;
            let denominator: f64 = denominator.trim().parse().ok()?;
            if denominator == 0.0 {
                return None;
            }
            numerator / denominator
        }
        None => trimmed.parse().ok()?,
    };

    value.is_finite().then_some(value)
}

pub fn is_correct(input: &str, answer: &Answer) -> bool {
    match parse_answer(input) {
        Some(value) => (value - answer.value()).abs() < ANSWER_TOLERANCE,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_answer("12"), Some(12.0));
        assert_eq!(parse_answer("  7 "), Some(7.0));
        assert_eq!(parse_answer("-3"), Some(-3.0));
        assert_eq!(parse_answer("4.5"), Some(4.5));
        assert_eq!(parse_answer(".5"), Some(0.5));
    }

    #[test]
    fn test_parse_fractions() {
        assert_eq!(parse_answer("3/4"), Some(0.75));
        assert_eq!(parse_answer(" 6 / 3 "), Some(2.0));
    }

    #[test]
    fn test_bad_input_is_not_a_number() {
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("   "), None);
        assert_eq!(parse_answer("abc"), None);
        assert_eq!(parse_answer("3/"), None);
        assert_eq!(parse_answer("3/0"), None);
        assert_eq!(parse_answer("/4"), None);
        assert_eq!(parse_answer("1/2/3"), None);
        assert_eq!(parse_answer("inf"), None);
        assert_eq!(parse_answer("NaN"), None);
    }

    #[test]
    fn test_tolerance_accepts_rounded_fractions() {
        let two_thirds = Answer::fixed(2.0 / 3.0, 2);
        assert!(is_correct("2/3", &two_thirds));
        assert!(is_correct("0.67", &two_thirds));
        assert!(!is_correct("0.65", &two_thirds));
    }

    #[test]
    fn test_integer_answers() {
        let answer = Answer::Integer(42);
        assert!(is_correct("42", &answer));
        assert!(is_correct("42.0", &answer));
        assert!(is_correct("84/2", &answer));
        assert!(!is_correct("41", &answer));
        assert!(!is_correct("forty-two", &answer));
    }
}
