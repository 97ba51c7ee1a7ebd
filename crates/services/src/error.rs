//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{
    CatalogError, ChapterError, ChoiceValue, IdError, QuestionError, QuestionId, ResultError,
};

/// Errors emitted by the session engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("chapter has no questions")]
    EmptyChapter,

    #[error("question index {index} out of range for {total} questions")]
    QuestionOutOfRange { index: usize, total: usize },

    #[error("question {0} is not part of the active chapter")]
    UnknownQuestion(QuestionId),

    #[error("question {question} offers no choice with value {value}")]
    UnknownChoice {
        question: QuestionId,
        value: ChoiceValue,
    },
}

/// Errors emitted by the scoring engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GradeError {
    #[error("cannot grade an empty question set")]
    NoQuestions,
    #[error(transparent)]
    Result(#[from] ResultError),
}

/// Errors emitted while loading catalog and chapter payloads.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoaderError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("chapter payload contains no chapter object")]
    EmptyPayload,
    #[error("answer key {key:?} of question {question} does not spell a subset of its choices")]
    MalformedAnswerKey { question: String, key: String },
    #[error("catalog entry {0} has neither chapters nor an external link")]
    MissingLink(String),
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Chapter(#[from] ChapterError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
