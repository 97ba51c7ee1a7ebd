use thiserror::Error;

use crate::model::{CatalogError, ChapterError, IdError, QuestionError, ResultError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Chapter(#[from] ChapterError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Result(#[from] ResultError),
}
