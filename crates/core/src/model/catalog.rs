use thiserror::Error;
use url::Url;

use crate::model::ids::{ChapterId, SectionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("section name cannot be empty")]
    EmptyName,

    #[error("chapter reference title cannot be empty")]
    EmptyChapterTitle,

    #[error("chapter reference path cannot be empty")]
    EmptyChapterPath,

    #[error("section must list at least one chapter")]
    NoChapters,

    #[error("invalid external link: {0}")]
    InvalidLink(#[from] url::ParseError),
}

//
// ─── CHAPTER REFERENCE ─────────────────────────────────────────────────────────
//

/// Pointer from the catalog to a loadable chapter payload.
///
/// Navigation metadata only; the questions themselves arrive when the
/// referenced payload is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRef {
    id: ChapterId,
    title: String,
    path: String,
    question_count: u32,
}

impl ChapterRef {
    /// Build a chapter reference.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyChapterTitle` or `EmptyChapterPath` when
    /// the respective field is blank.
    pub fn new(
        id: ChapterId,
        title: impl Into<String>,
        path: impl Into<String>,
        question_count: u32,
    ) -> Result<Self, CatalogError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CatalogError::EmptyChapterTitle);
        }
        let path = path.into();
        if path.trim().is_empty() {
            return Err(CatalogError::EmptyChapterPath);
        }
        Ok(Self {
            id,
            title,
            path,
            question_count,
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

    /// Payload location, relative to the section's data folder.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Advertised question count, shown before the payload is loaded.
    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }
}

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

/// Where a catalog section leads: chapters of its own, or another site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionLink {
    Chapters(Vec<ChapterRef>),
    External(Url),
}

impl SectionLink {
    /// Link to embedded chapters.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NoChapters` when the list is empty.
    pub fn chapters(refs: Vec<ChapterRef>) -> Result<Self, CatalogError> {
        if refs.is_empty() {
            return Err(CatalogError::NoChapters);
        }
        Ok(Self::Chapters(refs))
    }

    /// Link to an external exam site.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidLink` when the value is not a valid URL.
    pub fn external(raw: &str) -> Result<Self, CatalogError> {
        Ok(Self::External(Url::parse(raw)?))
    }
}

/// A subject entry in the catalog. Used only for navigation, never scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    name: String,
    description: String,
    link: SectionLink,
}

impl Section {
    /// Build a catalog section.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyName` when the display name is blank.
    pub fn new(
        id: SectionId,
        name: impl Into<String>,
        description: impl Into<String>,
        link: SectionLink,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            description: description.into(),
            link,
        })
    }

    #[must_use]
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn link(&self) -> &SectionLink {
        &self.link
    }

    /// True when this section redirects to another site.
    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self.link, SectionLink::External(_))
    }

    /// Chapter references, empty for external sections.
    #[must_use]
    pub fn chapters(&self) -> &[ChapterRef] {
        match &self.link {
            SectionLink::Chapters(refs) => refs,
            SectionLink::External(_) => &[],
        }
    }

    /// Sum of advertised question counts across embedded chapters.
    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.chapters()
            .iter()
            .map(ChapterRef::question_count)
            .sum()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter_ref(id: &str, count: u32) -> ChapterRef {
        ChapterRef::new(
            ChapterId::new(id).unwrap(),
            format!("Chapter {id}"),
            format!("{id}.json"),
            count,
        )
        .unwrap()
    }

    #[test]
    fn section_with_chapters_sums_questions() {
        let section = Section::new(
            SectionId::new("java2").unwrap(),
            "Java 2",
            "OOP chapters",
            SectionLink::chapters(vec![chapter_ref("c9", 4), chapter_ref("c10", 6)]).unwrap(),
        )
        .unwrap();

        assert!(!section.is_external());
        assert_eq!(section.chapters().len(), 2);
        assert_eq!(section.total_questions(), 10);
    }

    #[test]
    fn external_section_has_no_chapters() {
        let section = Section::new(
            SectionId::new("it").unwrap(),
            "Information Technology",
            "IT subjects",
            SectionLink::external("https://example.github.io/it/").unwrap(),
        )
        .unwrap();

        assert!(section.is_external());
        assert!(section.chapters().is_empty());
        assert_eq!(section.total_questions(), 0);
    }

    #[test]
    fn invalid_external_link_is_rejected() {
        let err = SectionLink::external("not a url").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidLink(_)));
    }

    #[test]
    fn empty_chapter_list_is_rejected() {
        let err = SectionLink::chapters(Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::NoChapters));
    }

    #[test]
    fn blank_section_name_is_rejected() {
        let err = Section::new(
            SectionId::new("x").unwrap(),
            "  ",
            "",
            SectionLink::external("https://example.com/").unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyName));
    }
}
