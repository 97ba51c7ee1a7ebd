use serde::Serialize;
use thiserror::Error;

use crate::model::ids::QuestionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("cannot build a result from zero questions")]
    NoQuestions,

    #[error("too many questions for a single result: {len}")]
    TooManyQuestions { len: usize },
}

/// Correctness flag for one question, kept for the review screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionScore {
    pub question_id: QuestionId,
    pub is_correct: bool,
}

/// Immutable scored outcome of a completed attempt.
///
/// Built once at submission and never mutated; the percentage rounds half
/// away from zero so reimplementations agree on ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamResult {
    correct: u32,
    incorrect: u32,
    total: u32,
    percentage: u8,
    scores: Vec<QuestionScore>,
}

impl ExamResult {
    /// Build a result from per-question correctness flags.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::NoQuestions` for an empty score list and
    /// `ResultError::TooManyQuestions` if the count cannot fit in `u32`.
    pub fn from_scores(scores: Vec<QuestionScore>) -> Result<Self, ResultError> {
        if scores.is_empty() {
            return Err(ResultError::NoQuestions);
        }
        let total = u32::try_from(scores.len())
            .map_err(|_| ResultError::TooManyQuestions { len: scores.len() })?;
        let correct = scores.iter().filter(|s| s.is_correct).count() as u32;

        Ok(Self {
            correct,
            incorrect: total - correct,
            total,
            percentage: percentage(correct, total),
            scores,
        })
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Score as a whole percentage, 0 to 100.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn scores(&self) -> &[QuestionScore] {
        &self.scores
    }

    /// Correctness flag for one question, if it was part of the attempt.
    #[must_use]
    pub fn score_for(&self, question_id: &QuestionId) -> Option<bool> {
        self.scores
            .iter()
            .find(|s| &s.question_id == question_id)
            .map(|s| s.is_correct)
    }
}

/// Rounds half away from zero; exact for the small ratios that occur here.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percentage(correct: u32, total: u32) -> u8 {
    (f64::from(correct) * 100.0 / f64::from(total)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(id: &str, is_correct: bool) -> QuestionScore {
        QuestionScore {
            question_id: QuestionId::new(id).unwrap(),
            is_correct,
        }
    }

    #[test]
    fn result_counts_and_percentage() {
        let result =
            ExamResult::from_scores(vec![score("q1", true), score("q2", false)]).unwrap();

        assert_eq!(result.correct(), 1);
        assert_eq!(result.incorrect(), 1);
        assert_eq!(result.total(), 2);
        assert_eq!(result.percentage(), 50);
        assert_eq!(result.score_for(&QuestionId::new("q1").unwrap()), Some(true));
        assert_eq!(result.score_for(&QuestionId::new("q9").unwrap()), None);
    }

    #[test]
    fn thirds_round_to_nearest() {
        let one_of_three =
            ExamResult::from_scores(vec![score("q1", true), score("q2", false), score("q3", false)])
                .unwrap();
        assert_eq!(one_of_three.percentage(), 33);

        let two_of_three =
            ExamResult::from_scores(vec![score("q1", true), score("q2", true), score("q3", false)])
                .unwrap();
        assert_eq!(two_of_three.percentage(), 67);
    }

    #[test]
    fn exact_half_rounds_away_from_zero() {
        let mut scores = vec![score("q1", true)];
        for i in 2..=8 {
            scores.push(score(&format!("q{i}"), false));
        }
        // 1/8 = 12.5% -> 13
        let result = ExamResult::from_scores(scores).unwrap();
        assert_eq!(result.percentage(), 13);
    }

    #[test]
    fn empty_scores_are_rejected() {
        let err = ExamResult::from_scores(Vec::new()).unwrap_err();
        assert!(matches!(err, ResultError::NoQuestions));
    }

    #[test]
    fn all_correct_is_one_hundred() {
        let result = ExamResult::from_scores(vec![score("q1", true), score("q2", true)]).unwrap();
        assert_eq!(result.percentage(), 100);
        assert_eq!(result.incorrect(), 0);
    }
}
