use thiserror::Error;

use crate::model::ids::{ChapterId, QuestionId};
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChapterError {
    #[error("chapter title cannot be empty")]
    EmptyTitle,

    #[error("duplicate question id within chapter: {0}")]
    DuplicateQuestionId(QuestionId),
}

//
// ─── CHAPTER ───────────────────────────────────────────────────────────────────
//

/// A named, ordered set of questions representing one exam.
///
/// Immutable once built. A chapter may be empty at the type level; the
/// at-least-one-question constraint binds when a session starts on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    id: ChapterId,
    title: String,
    questions: Vec<Question>,
}

impl Chapter {
    /// Build a validated chapter.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError::EmptyTitle` for a blank title and
    /// `ChapterError::DuplicateQuestionId` when two questions share an id.
    pub fn new(
        id: ChapterId,
        title: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, ChapterError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ChapterError::EmptyTitle);
        }
        for (i, question) in questions.iter().enumerate() {
            if questions[..i].iter().any(|q| q.id() == question.id()) {
                return Err(ChapterError::DuplicateQuestionId(question.id().clone()));
            }
        }

        Ok(Self {
            id,
            title,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ChapterId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions in this chapter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The question at `index`, if in bounds.
    #[must_use]
    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Look up a question by id.
    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// True when a question with this id belongs to the chapter.
    #[must_use]
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.question(id).is_some()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
