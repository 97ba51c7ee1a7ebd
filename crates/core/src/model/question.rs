use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answer::RecordedAnswer;
use crate::model::ids::{ChoiceValue, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised while building questions and answer keys.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question needs at least two choices, got {0}")]
    TooFewChoices(usize),

    #[error("duplicate choice value: {0}")]
    DuplicateChoiceValue(ChoiceValue),

    #[error("choice label cannot be empty")]
    EmptyChoiceLabel,

    #[error("choice text cannot be empty")]
    EmptyChoiceText,

    #[error("answer key must select at least one choice")]
    EmptyKey,

    #[error("answer key references a value no choice offers: {0}")]
    UnknownKeyValue(ChoiceValue),

    #[error("answer key shape does not match the question's input mode")]
    KeyModeMismatch,
}

//
// ─── INPUT MODE ────────────────────────────────────────────────────────────────
//

/// How a question collects its answer.
///
/// The wire payload spells these as the HTML input types the original data
/// was authored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    /// Exactly one choice may be selected; recording overwrites.
    #[serde(rename = "radio")]
    Single,
    /// Any subset of choices may be selected; recording toggles.
    #[serde(rename = "checkbox")]
    Multiple,
}

//
// ─── CHOICE ────────────────────────────────────────────────────────────────────
//

/// One selectable option within a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    value: ChoiceValue,
    label: String,
    text: String,
}

impl Choice {
    /// Create a choice with a display label (e.g. "A") and display text.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyChoiceLabel` or `EmptyChoiceText` when the
    /// display strings are blank.
    pub fn new(
        value: ChoiceValue,
        label: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(QuestionError::EmptyChoiceLabel);
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyChoiceText);
        }
        Ok(Self { value, label, text })
    }

    #[must_use]
    pub fn value(&self) -> &ChoiceValue {
        &self.value
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

//
// ─── ANSWER KEY ────────────────────────────────────────────────────────────────
//

/// Correct-answer specification attached to a question.
///
/// The multi-select variant holds its values in canonical sorted order so a
/// recorded answer kept in the same order compares directly. The wire form is
/// the sorted concatenation of value tokens; conversion to and from that
/// string happens only at the data boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    Single(ChoiceValue),
    Multiple(Vec<ChoiceValue>),
}

impl AnswerKey {
    /// Key for a single-select question.
    #[must_use]
    pub fn single(value: ChoiceValue) -> Self {
        Self::Single(value)
    }

    /// Key for a multi-select question; values are sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyKey` when no values are given.
    pub fn multiple(mut values: Vec<ChoiceValue>) -> Result<Self, QuestionError> {
        values.sort();
        values.dedup();
        if values.is_empty() {
            return Err(QuestionError::EmptyKey);
        }
        Ok(Self::Multiple(values))
    }

    /// The input mode this key shape belongs to.
    #[must_use]
    pub fn mode(&self) -> InputMode {
        match self {
            Self::Single(_) => InputMode::Single,
            Self::Multiple(_) => InputMode::Multiple,
        }
    }

    /// True when `value` is one of the correct values.
    #[must_use]
    pub fn contains(&self, value: &ChoiceValue) -> bool {
        match self {
            Self::Single(v) => v == value,
            Self::Multiple(vs) => vs.binary_search(value).is_ok(),
        }
    }

    /// Exact-match comparison against a recorded answer.
    ///
    /// Multi-select requires the full set: a correct-but-incomplete subset
    /// does not match. Variant mismatch never matches.
    #[must_use]
    pub fn matches(&self, recorded: &RecordedAnswer) -> bool {
        match (self, recorded) {
            (Self::Single(key), RecordedAnswer::Single(value)) => key == value,
            (Self::Multiple(key), RecordedAnswer::Multiple(values)) => key == values,
            _ => false,
        }
    }

    /// Serialized wire form: the value itself, or the sorted concatenation.
    #[must_use]
    pub fn wire_form(&self) -> String {
        match self {
            Self::Single(v) => v.as_str().to_string(),
            Self::Multiple(vs) => vs.iter().map(ChoiceValue::as_str).collect(),
        }
    }

    fn values(&self) -> &[ChoiceValue] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Multiple(vs) => vs,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One multiple-choice question: prompt, choices, input mode and answer key.
///
/// Immutable once built; construction checks the invariants the rest of the
/// engine depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    code_snippet: Option<String>,
    choices: Vec<Choice>,
    mode: InputMode,
    key: AnswerKey,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt,
    /// `TooFewChoices` when fewer than two choices are given,
    /// `DuplicateChoiceValue` when two choices share a value token,
    /// `UnknownKeyValue` when the key names a value no choice offers, and
    /// `KeyModeMismatch` when the key shape disagrees with `mode`.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        code_snippet: Option<String>,
        choices: Vec<Choice>,
        mode: InputMode,
        key: AnswerKey,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if choices.len() < 2 {
            return Err(QuestionError::TooFewChoices(choices.len()));
        }
        for (i, choice) in choices.iter().enumerate() {
            if choices[..i].iter().any(|c| c.value() == choice.value()) {
                return Err(QuestionError::DuplicateChoiceValue(choice.value().clone()));
            }
        }
        if key.mode() != mode {
            return Err(QuestionError::KeyModeMismatch);
        }
        for value in key.values() {
            if !choices.iter().any(|c| c.value() == value) {
                return Err(QuestionError::UnknownKeyValue(value.clone()));
            }
        }

        Ok(Self {
            id,
            prompt,
            code_snippet,
            choices,
            mode,
            key,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn code_snippet(&self) -> Option<&str> {
        self.code_snippet.as_deref()
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[must_use]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    #[must_use]
    pub fn key(&self) -> &AnswerKey {
        &self.key
    }

    /// Look up a choice by its value token.
    #[must_use]
    pub fn choice(&self, value: &ChoiceValue) -> Option<&Choice> {
        self.choices.iter().find(|c| c.value() == value)
    }

    /// True when this question offers a choice with the given value.
    #[must_use]
    pub fn offers(&self, value: &ChoiceValue) -> bool {
        self.choice(value).is_some()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
