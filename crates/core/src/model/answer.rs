use std::collections::BTreeMap;

use crate::model::ids::{ChoiceValue, QuestionId};

//
// ─── RECORDED ANSWER ───────────────────────────────────────────────────────────
//

/// What the user has selected for one question.
///
/// Multi-select values are kept sorted and deduplicated so equality against
/// an [`AnswerKey`](crate::model::AnswerKey) is order-independent without any
/// normalization at comparison time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAnswer {
    Single(ChoiceValue),
    Multiple(Vec<ChoiceValue>),
}

impl RecordedAnswer {
    /// True when `value` is part of this answer.
    #[must_use]
    pub fn contains(&self, value: &ChoiceValue) -> bool {
        match self {
            Self::Single(v) => v == value,
            Self::Multiple(vs) => vs.binary_search(value).is_ok(),
        }
    }

    /// The selected values in canonical order.
    #[must_use]
    pub fn values(&self) -> &[ChoiceValue] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Multiple(vs) => vs,
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
}

//
// ─── ANSWER SHEET ──────────────────────────────────────────────────────────────
//

/// Mapping from question id to recorded answer.
///
/// An entry exists only for questions the user has touched; a multi-select
/// entry whose last value is toggled off is removed, so "never answered" and
/// "answered then cleared" are indistinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    entries: BTreeMap<QuestionId, RecordedAnswer>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single-select answer, overwriting any previous value.
    pub fn record_single(&mut self, question_id: QuestionId, value: ChoiceValue) {
        self.entries
            .insert(question_id, RecordedAnswer::Single(value));
    }

    /// Toggle a value in a multi-select answer.
    ///
    /// Inserts the value if absent (keeping the set sorted), removes it if
    /// present, and drops the whole entry when the set becomes empty.
    pub fn toggle_multiple(&mut self, question_id: QuestionId, value: ChoiceValue) {
        let values = match self.entries.remove(&question_id) {
            Some(RecordedAnswer::Multiple(values)) => values,
            // A stale single-select entry is replaced rather than merged.
            Some(RecordedAnswer::Single(_)) | None => Vec::new(),
        };

        let mut values = values;
        match values.binary_search(&value) {
            Ok(pos) => {
                values.remove(pos);
            }
            Err(pos) => values.insert(pos, value),
        }

        if !values.is_empty() {
            self.entries
                .insert(question_id, RecordedAnswer::Multiple(values));
        }
    }

    #[must_use]
    pub fn get(&self, question_id: &QuestionId) -> Option<&RecordedAnswer> {
        self.entries.get(question_id)
    }

    #[must_use]
    pub fn is_answered(&self, question_id: &QuestionId) -> bool {
        self.entries.contains_key(question_id)
    }

    /// Number of questions with a recorded answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discard every recorded answer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &RecordedAnswer)> {
        self.entries.iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
