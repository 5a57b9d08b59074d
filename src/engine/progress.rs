use std::collections::BTreeMap;

use crate::engine::scoring::accuracy_percent;
use crate::generator::Operation;
use crate::session::result::ProgressRecord;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationStats {
    pub sessions: u32,
    pub total_questions: u32,
    pub total_correct: u32,
    pub accuracy: u32,
}

/// Lifetime totals over the progress history.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressSummary {
    pub sessions: u32,
    pub total_score: u64,
    pub total_questions: u32,
    pub total_correct: u32,
    pub total_stars: u32,
    pub best_streak: u32,
    pub accuracy: u32,
    pub per_operation: BTreeMap<Operation, OperationStats>,
}

pub fn summarize(history: &[ProgressRecord]) -> ProgressSummary {
    let mut summary = ProgressSummary::default();

    for record in history {
        summary.sessions += 1;
        summary.total_score += u64::from(record.score);
        summary.total_questions += record.total_questions;
        summary.total_correct += record.correct_answers;
        summary.total_stars += u32::from(record.stars_earned);
        summary.best_streak = summary.best_streak.max(record.best_streak);

        let stats = summary.per_operation.entry(record.operation).or_default();
        stats.sessions += 1;
        stats.total_questions += record.total_questions;
        stats.total_correct += record.correct_answers;
    }

    summary.accuracy = accuracy_percent(summary.total_correct, summary.total_questions);
    for stats in summary.per_operation.values_mut() {
        stats.accuracy = accuracy_percent(stats.total_correct, stats.total_questions);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::result::SessionKind;
    use chrono::Utc;

    fn record(operation: Operation, score: u32, correct: u32, total: u32, streak: u32) -> ProgressRecord {
        ProgressRecord {
            id: "1".to_string(),
            operation,
            difficulty: "easy".to_string(),
            score,
            correct_answers: correct,
            total_questions: total,
            stars_earned: crate::engine::scoring::practice_stars(correct, total),
            best_streak: streak,
            mode: SessionKind::Practice,
            created_date: Utc::now(),
        }
    }

    #[test]
    fn test_empty_history() {
        let summary = summarize(&[]);
        assert_eq!(summary, ProgressSummary::default());
        assert_eq!(summary.accuracy, 0);
    }

    #[test]
    fn test_totals_and_grouping() {
        let history = vec![
            record(Operation::Addition, 120, 9, 10, 6),
            record(Operation::Addition, 60, 5, 10, 3),
            record(Operation::Division, 200, 10, 10, 10),
        ];
        let summary = summarize(&history);
        assert_eq!(summary.sessions, 3);
        assert_eq!(summary.total_score, 380);
        assert_eq!(summary.total_questions, 30);
        assert_eq!(summary.total_correct, 24);
        assert_eq!(summary.total_stars, 3 + 1 + 3);
        assert_eq!(summary.best_streak, 10);
        assert_eq!(summary.accuracy, 80);

        let addition = &summary.per_operation[&Operation::Addition];
        assert_eq!(addition.sessions, 2);
        assert_eq!(addition.accuracy, 70);
        assert_eq!(summary.per_operation[&Operation::Division].accuracy, 100);
        assert!(!summary.per_operation.contains_key(&Operation::Mixed));
    }

    #[test]
    fn test_zero_question_records_do_not_divide() {
        let summary = summarize(&[record(Operation::Mixed, 0, 0, 0, 0)]);
        assert_eq!(summary.accuracy, 0);
        assert_eq!(summary.per_operation[&Operation::Mixed].accuracy, 0);
    }
}
