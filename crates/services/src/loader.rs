//! Boundary between the raw catalog/chapter JSON and the domain model.
//!
//! The payload shapes mirror what the data folder serves: a catalog is a list
//! of subject entries that either embed chapter listings or redirect to an
//! external site; a chapter payload is an array whose first element carries
//! the questions. Multi-select answer keys travel as the sorted concatenation
//! of choice value tokens and are decoded here, once, into their canonical
//! sequence form.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use exam_core::model::{
    AnswerKey, Chapter, ChapterId, ChapterRef, Choice, ChoiceValue, InputMode, Question,
    QuestionId, Section, SectionId, SectionLink,
};

use crate::error::LoaderError;

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntryWire {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    external_link: Option<String>,
    #[serde(default)]
    chapters: Vec<ChapterRefWire>,
}

#[derive(Debug, Deserialize)]
struct ChapterRefWire {
    id: String,
    title: String,
    file: String,
    #[serde(default)]
    questions: u32,
}

#[derive(Debug, Deserialize)]
struct ChapterWire {
    id: String,
    title: String,
    questions: Vec<QuestionWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionWire {
    id: String,
    text: String,
    #[serde(default)]
    code_snippet: Option<String>,
    input_type: InputMode,
    choices: Vec<ChoiceWire>,
    correct_answer: String,
}

#[derive(Debug, Deserialize)]
struct ChoiceWire {
    value: String,
    label: String,
    text: String,
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Parse a catalog payload into navigation sections.
///
/// # Errors
///
/// Returns `LoaderError::Json` for malformed JSON, `MissingLink` for an entry
/// with neither chapters nor an external link, and the wrapped model error
/// for anything the domain types reject.
pub fn parse_catalog(payload: &str) -> Result<Vec<Section>, LoaderError> {
    let entries: Vec<CatalogEntryWire> = serde_json::from_str(payload)?;
    entries.into_iter().map(section_from_wire).collect()
}

fn section_from_wire(wire: CatalogEntryWire) -> Result<Section, LoaderError> {
    let link = if let Some(raw) = wire.external_link {
        SectionLink::external(&raw)?
    } else if wire.chapters.is_empty() {
        return Err(LoaderError::MissingLink(wire.id));
    } else {
        let refs = wire
            .chapters
            .into_iter()
            .map(|c| {
                Ok(ChapterRef::new(
                    ChapterId::new(c.id)?,
                    c.title,
                    c.file,
                    c.questions,
                )?)
            })
            .collect::<Result<Vec<_>, LoaderError>>()?;
        SectionLink::chapters(refs)?
    };

    Ok(Section::new(
        SectionId::new(wire.id)?,
        wire.name,
        wire.description,
        link,
    )?)
}

//
// ─── CHAPTER ───────────────────────────────────────────────────────────────────
//

/// Parse a chapter payload into a validated [`Chapter`].
///
/// The wire format is an array containing one chapter object; the first
/// element wins, as in the data the original viewer shipped with.
///
/// # Errors
///
/// Returns `LoaderError::EmptyPayload` for an empty array,
/// `MalformedAnswerKey` when a multi-select key does not spell a subset of
/// the question's choices, and the wrapped model error for anything the
/// domain types reject.
pub fn parse_chapter(payload: &str) -> Result<Chapter, LoaderError> {
    let mut payload: Vec<ChapterWire> = serde_json::from_str(payload)?;
    if payload.len() > 1 {
        tracing::warn!(
            extra = payload.len() - 1,
            "chapter payload carries extra chapter objects, taking the first"
        );
    }
    let Some(wire) = payload.drain(..).next() else {
        return Err(LoaderError::EmptyPayload);
    };

    let questions = wire
        .questions
        .into_iter()
        .map(question_from_wire)
        .collect::<Result<Vec<_>, LoaderError>>()?;

    Ok(Chapter::new(ChapterId::new(wire.id)?, wire.title, questions)?)
}

fn question_from_wire(wire: QuestionWire) -> Result<Question, LoaderError> {
    let choices = wire
        .choices
        .into_iter()
        .map(|c| Ok(Choice::new(ChoiceValue::new(c.value)?, c.label, c.text)?))
        .collect::<Result<Vec<Choice>, LoaderError>>()?;

    let key = match wire.input_type {
        InputMode::Single => AnswerKey::single(ChoiceValue::new(wire.correct_answer)?),
        InputMode::Multiple => {
            let values = decode_multi_key(&wire.id, &wire.correct_answer, &choices)?;
            AnswerKey::multiple(values)?
        }
    };

    Ok(Question::new(
        QuestionId::new(wire.id)?,
        wire.text,
        wire.code_snippet,
        choices,
        wire.input_type,
        key,
    )?)
}

/// Decode a concatenated multi-select key (`"ac"`) against the question's
/// own choices.
///
/// The key is produced by concatenating selected value tokens in sorted
/// order, so walking the sorted choice values and greedily consuming
/// prefixes reverses it; any leftover means the key names something the
/// question does not offer.
fn decode_multi_key(
    question_id: &str,
    key: &str,
    choices: &[Choice],
) -> Result<Vec<ChoiceValue>, LoaderError> {
    let mut values: Vec<&ChoiceValue> = choices.iter().map(Choice::value).collect();
    values.sort();

    let mut rest = key;
    let mut selected = Vec::new();
    for value in values {
        if let Some(stripped) = rest.strip_prefix(value.as_str()) {
            rest = stripped;
            selected.push(value.clone());
        }
    }

    if !rest.is_empty() || selected.is_empty() {
        return Err(LoaderError::MalformedAnswerKey {
            question: question_id.to_string(),
            key: key.to_string(),
        });
    }
    Ok(selected)
}

//
// ─── FILE HELPERS ──────────────────────────────────────────────────────────────
//

/// Read and parse a catalog file.
///
/// # Errors
///
/// Returns `LoaderError::Io` when the file cannot be read, otherwise the same
/// errors as [`parse_catalog`].
pub fn load_catalog_file(path: &Path) -> Result<Vec<Section>, LoaderError> {
    parse_catalog(&read(path)?)
}

/// Read and parse a chapter file.
///
/// # Errors
///
/// Returns `LoaderError::Io` when the file cannot be read, otherwise the same
/// errors as [`parse_chapter`].
pub fn load_chapter_file(path: &Path) -> Result<Chapter, LoaderError> {
    parse_chapter(&read(path)?)
}

fn read(path: &Path) -> Result<String, LoaderError> {
    fs::read_to_string(path).map_err(|source| {
        tracing::warn!(path = %path.display(), %source, "failed to read data file");
        LoaderError::Io {
            path: path.display().to_string(),
            source,
        }
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CHAPTER_JSON: &str = r#"[
      {
        "id": "chapter9",
        "title": "Chapter 9 Objects and Classes",
        "questions": [
          {
            "id": "q1",
            "text": "What is the output?",
            "codeSnippet": "int x = 1;\nSystem.out.println(x);",
            "inputType": "radio",
            "inputName": "q1",
            "choices": [
              {"value": "a", "label": "A", "text": "0"},
              {"value": "b", "label": "B", "text": "1"}
            ],
            "correctAnswer": "b"
          },
          {
            "id": "q2",
            "text": "Which are reference types?",
            "inputType": "checkbox",
            "inputName": "q2",
            "choices": [
              {"value": "a", "label": "A", "text": "String"},
              {"value": "b", "label": "B", "text": "int"},
              {"value": "c", "label": "C", "text": "Object"}
            ],
            "correctAnswer": "ac"
          }
        ]
      }
    ]"#;

    #[test]
    fn chapter_payload_parses_into_domain_types() {
        let chapter = parse_chapter(CHAPTER_JSON).unwrap();

        assert_eq!(chapter.id().as_str(), "chapter9");
        assert_eq!(chapter.len(), 2);

        let q1 = chapter.question_at(0).unwrap();
        assert_eq!(q1.mode(), InputMode::Single);
        assert!(q1.code_snippet().unwrap().contains("println"));
        assert_eq!(q1.key().wire_form(), "b");

        let q2 = chapter.question_at(1).unwrap();
        assert_eq!(q2.mode(), InputMode::Multiple);
        assert!(q2.code_snippet().is_none());
        assert_eq!(q2.key().wire_form(), "ac");
    }

    #[test]
    fn empty_chapter_array_is_an_error() {
        let err = parse_chapter("[]").unwrap_err();
        assert!(matches!(err, LoaderError::EmptyPayload));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_chapter("not json").unwrap_err(),
            LoaderError::Json(_)
        ));
    }

    #[test]
    fn key_with_unknown_value_is_rejected() {
        let payload = CHAPTER_JSON.replace("\"correctAnswer\": \"ac\"", "\"correctAnswer\": \"az\"");
        let err = parse_chapter(&payload).unwrap_err();
        assert!(matches!(err, LoaderError::MalformedAnswerKey { .. }));
    }

    #[test]
    fn empty_multi_key_is_rejected() {
        let payload = CHAPTER_JSON.replace("\"correctAnswer\": \"ac\"", "\"correctAnswer\": \"\"");
        let err = parse_chapter(&payload).unwrap_err();
        assert!(matches!(err, LoaderError::MalformedAnswerKey { .. }));
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let payload = CHAPTER_JSON.replace("\"id\": \"q2\"", "\"id\": \"q1\"");
        let err = parse_chapter(&payload).unwrap_err();
        assert!(matches!(err, LoaderError::Chapter(_)));
    }

    #[test]
    fn multi_key_roundtrips_through_canonical_form() {
        let chapter = parse_chapter(CHAPTER_JSON).unwrap();
        let key = chapter.question_at(1).unwrap().key();
        assert_eq!(key.wire_form(), "ac");
    }

    #[test]
    fn catalog_parses_embedded_and_external_entries() {
        let payload = r#"[
          {
            "id": "java2",
            "name": "Java 2",
            "description": "Objects and Classes",
            "chapters": [
              {"id": "chapter9", "title": "Chapter 9", "file": "chapter9.json", "questions": 4}
            ]
          },
          {
            "id": "it",
            "name": "Information Technology",
            "description": "IT Subjects",
            "externalLink": "https://example.github.io/it/"
          }
        ]"#;

        let sections = parse_catalog(payload).unwrap();
        assert_eq!(sections.len(), 2);

        assert!(!sections[0].is_external());
        assert_eq!(sections[0].total_questions(), 4);
        assert_eq!(sections[0].chapters()[0].path(), "chapter9.json");

        assert!(sections[1].is_external());
    }

    #[test]
    fn catalog_entry_without_any_link_is_rejected() {
        let payload = r#"[{"id": "x", "name": "X", "description": ""}]"#;
        let err = parse_catalog(payload).unwrap_err();
        assert!(matches!(err, LoaderError::MissingLink(_)));
    }

    #[test]
    fn catalog_entry_with_bad_url_is_rejected() {
        let payload = r#"[{"id": "x", "name": "X", "externalLink": "not a url"}]"#;
        let err = parse_catalog(payload).unwrap_err();
        assert!(matches!(err, LoaderError::Catalog(_)));
    }

    #[test]
    fn chapter_file_loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CHAPTER_JSON.as_bytes()).unwrap();

        let chapter = load_chapter_file(file.path()).unwrap();
        assert_eq!(chapter.len(), 2);
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let err = load_chapter_file(Path::new("no/such/chapter.json")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}
