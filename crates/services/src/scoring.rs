//! Pure comparison of recorded answers against the answer key.
//!
//! Nothing here reads a clock or performs I/O; the same inputs always
//! produce the same result.

use exam_core::model::{
    AnswerSheet, ChoiceValue, ExamResult, Question, QuestionId, QuestionScore,
};

use crate::error::GradeError;

//
// ─── GRADING ───────────────────────────────────────────────────────────────────
//

/// Score an attempt.
///
/// A question without an entry in the sheet is "no answer": always incorrect,
/// never an error. Single-select compares by value equality; multi-select
/// requires the exact set, so a correct-but-incomplete subset scores zero.
///
/// # Errors
///
/// Returns `GradeError::NoQuestions` when `questions` is empty; grading an
/// empty set is a caller error, not a valid zero-score result.
pub fn grade(questions: &[Question], answers: &AnswerSheet) -> Result<ExamResult, GradeError> {
    if questions.is_empty() {
        return Err(GradeError::NoQuestions);
    }

    let scores = questions
        .iter()
        .map(|question| QuestionScore {
            question_id: question.id().clone(),
            is_correct: is_correct(question, answers),
        })
        .collect();

    Ok(ExamResult::from_scores(scores)?)
}

fn is_correct(question: &Question, answers: &AnswerSheet) -> bool {
    answers
        .get(question.id())
        .is_some_and(|recorded| question.key().matches(recorded))
}

//
// ─── REVIEW ────────────────────────────────────────────────────────────────────
//

/// Standing of one choice on the review screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceReview {
    pub value: ChoiceValue,
    /// The user picked this choice.
    pub selected: bool,
    /// The answer key names this choice.
    pub expected: bool,
}

/// Per-question detail re-derived for review mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub choices: Vec<ChoiceReview>,
}

/// Re-derive per-question correctness and per-choice standing.
///
/// Reads the same session state `grade` does without mutating anything, so a
/// review pass after submission agrees with the result it accompanies.
#[must_use]
pub fn review(questions: &[Question], answers: &AnswerSheet) -> Vec<QuestionReview> {
    questions
        .iter()
        .map(|question| {
            let recorded = answers.get(question.id());
            let choices = question
                .choices()
                .iter()
                .map(|choice| ChoiceReview {
                    value: choice.value().clone(),
                    selected: recorded.is_some_and(|r| r.contains(choice.value())),
                    expected: question.key().contains(choice.value()),
                })
                .collect();
            QuestionReview {
                question_id: question.id().clone(),
                is_correct: is_correct(question, answers),
                choices,
            }
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
