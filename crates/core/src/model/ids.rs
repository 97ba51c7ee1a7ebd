use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error type for identifier validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

/// Unique identifier for a catalog Section
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Creates a validated `SectionId` (trimmed, non-empty).
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the value is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        validated(value, "section id").map(Self)
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a Chapter
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChapterId(String);

impl ChapterId {
    /// Creates a validated `ChapterId` (trimmed, non-empty).
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the value is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        validated(value, "chapter id").map(Self)
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a Question
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a validated `QuestionId` (trimmed, non-empty).
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the value is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        validated(value, "question id").map(Self)
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stable value token of a Choice, distinct from its display label.
///
/// Tokens sort lexicographically; the canonical order of a multi-select
/// answer and the wire form of its key both rely on that ordering.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChoiceValue(String);

impl ChoiceValue {
    /// Creates a validated `ChoiceValue` (trimmed, non-empty).
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the value is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        validated(value, "choice value").map(Self)
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the token in bytes, used when decoding concatenated keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn validated(value: impl Into<String>, kind: &'static str) -> Result<String, IdError> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty(kind));
    }
    Ok(trimmed.to_string())
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionId({})", self.0)
    }
}

impl fmt::Debug for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChapterId({})", self.0)
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChoiceValue({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_id_display() {
        let id = QuestionId::new("q9-3").unwrap();
        assert_eq!(id.to_string(), "q9-3");
    }

    #[test]
    fn test_question_id_trims_whitespace() {
        let id = QuestionId::new("  q1  ").unwrap();
        assert_eq!(id.as_str(), "q1");
    }

    #[test]
    fn test_blank_question_id_rejected() {
        let err = QuestionId::new("   ").unwrap_err();
        assert!(matches!(err, IdError::Empty("question id")));
    }

    #[test]
    fn test_section_id_roundtrip() {
        let id = SectionId::new("java2").unwrap();
        assert_eq!(id.as_str(), "java2");
        assert_eq!(id.to_string(), "java2");
    }

    #[test]
    fn test_chapter_id_rejects_empty() {
        assert!(ChapterId::new("").is_err());
    }

    #[test]
    fn test_choice_values_sort_lexicographically() {
        let a = ChoiceValue::new("a").unwrap();
        let c = ChoiceValue::new("c").unwrap();
        assert!(a < c);
        assert_eq!(a.len(), 1);
    }
}
