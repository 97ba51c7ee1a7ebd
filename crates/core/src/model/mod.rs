mod answer;
pub mod catalog;
mod chapter;
mod ids;
mod question;
mod result;

pub use catalog::{CatalogError, ChapterRef, Section, SectionLink};
pub use ids::{ChapterId, ChoiceValue, IdError, QuestionId, SectionId};

pub use answer::{AnswerSheet, RecordedAnswer};
pub use chapter::{Chapter, ChapterError};
pub use question::{AnswerKey, Choice, InputMode, Question, QuestionError};
pub use result::{ExamResult, QuestionScore, ResultError};
