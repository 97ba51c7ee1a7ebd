use chrono::{DateTime, Utc};
use std::fmt;

use exam_core::model::{
    AnswerSheet, Chapter, ChoiceValue, InputMode, Question, QuestionId, RecordedAnswer,
};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory exam attempt over one chapter.
///
/// Single source of truth for "where am I and what have I answered": owns the
/// chapter for the session's duration, a clamped question index, the answer
/// sheet and the start timestamp. The index stays within bounds by
/// construction; answer entries exist only for touched questions.
pub struct SessionService {
    chapter: Chapter,
    current: usize,
    answers: AnswerSheet,
    started_at: DateTime<Utc>,
}

impl SessionService {
    /// Start a session on the given chapter.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyChapter` if the chapter has no questions.
    pub fn new(chapter: Chapter, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if chapter.is_empty() {
            return Err(SessionError::EmptyChapter);
        }
        Ok(Self {
            chapter,
            current: 0,
            answers: AnswerSheet::new(),
            started_at,
        })
    }

    /// Restart the attempt from scratch: index to zero, answers cleared, new
    /// start time. Nothing from the prior attempt survives.
    pub fn restart(&mut self, started_at: DateTime<Utc>) {
        self.current = 0;
        self.answers.clear();
        self.started_at = started_at;
    }

    #[must_use]
    pub fn chapter(&self) -> &Chapter {
        &self.chapter
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Zero-based index of the question currently shown.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.chapter.len()
    }

    /// The question at the current index.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuestionOutOfRange` if the index is invalid.
    /// The constructor and navigation keep the index in bounds, so this is a
    /// defensive guard that should never fire.
    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.chapter
            .question_at(self.current)
            .ok_or(SessionError::QuestionOutOfRange {
                index: self.current,
                total: self.chapter.len(),
            })
    }

    /// Advance to the next question if there is one; no-op on the last.
    ///
    /// Returns the (possibly unchanged) index.
    pub fn go_next(&mut self) -> usize {
        if self.current + 1 < self.chapter.len() {
            self.current += 1;
        }
        self.current
    }

    /// Step back to the previous question if there is one; no-op on the first.
    ///
    /// Returns the (possibly unchanged) index.
    pub fn go_previous(&mut self) -> usize {
        if self.current > 0 {
            self.current -= 1;
        }
        self.current
    }

    /// True when the first question is shown; disables the Previous control.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    /// True when the last question is shown; swaps Next for Submit.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.chapter.len()
    }

    /// Progress through the chapter as `(index + 1) / total`, in (0, 1].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_fraction(&self) -> f64 {
        (self.current + 1) as f64 / self.chapter.len() as f64
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            index: self.current,
            total: self.total_questions(),
            answered: self.answered_count(),
            fraction: self.progress_fraction(),
            is_first: self.is_first(),
            is_last: self.is_last(),
        }
    }

    /// Record a selection against a question of this chapter.
    ///
    /// Single-select overwrites the stored value; multi-select toggles
    /// membership and keeps the set in canonical sorted order. No other
    /// session state changes.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` when the id does not belong to
    /// the active chapter, and `SessionError::UnknownChoice` when the
    /// question offers no choice with that value. Both are caller errors and
    /// fail loudly rather than being absorbed.
    pub fn record_answer(
        &mut self,
        question_id: &QuestionId,
        value: ChoiceValue,
    ) -> Result<(), SessionError> {
        let question = self
            .chapter
            .question(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.clone()))?;
        if !question.offers(&value) {
            return Err(SessionError::UnknownChoice {
                question: question_id.clone(),
                value,
            });
        }

        match question.mode() {
            InputMode::Single => self.answers.record_single(question_id.clone(), value),
            InputMode::Multiple => self.answers.toggle_multiple(question_id.clone(), value),
        }
        Ok(())
    }

    /// The recorded answer for a question, if it has been touched.
    #[must_use]
    pub fn recorded_answer(&self, question_id: &QuestionId) -> Option<&RecordedAnswer> {
        self.answers.get(question_id)
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    /// Number of questions that have a recorded answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.answered_count()
    }

    /// Time spent so far, measured against the caller-supplied clock.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.started_at
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("chapter_id", self.chapter.id())
            .field("questions", &self.chapter.len())
            .field("current", &self.current)
            .field("answered", &self.answers.answered_count())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
