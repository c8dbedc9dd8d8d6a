//! The persisted per-project description document

use serde::{Deserialize, Serialize};

/// Dublin Core metadata block of the description document.
///
/// Field order here is the serialization order, which keeps re-persisted
/// documents byte-stable across runs. Every field is guaranteed non-empty
/// after a merge (see [`crate::store::merge`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DublinCore {
    /// Book title
    #[serde(rename = "dc:title", default)]
    pub title: String,

    /// Author(s), as a single display string
    #[serde(rename = "dc:creator", default)]
    pub creator: String,

    /// Unique identifier
    #[serde(rename = "dc:identifier", default)]
    pub identifier: String,

    /// Language code (ISO 639-1)
    #[serde(rename = "dc:language", default)]
    pub language: String,

    /// Copyright/rights statement
    #[serde(rename = "dc:rights", default)]
    pub rights: String,

    /// Publisher name
    #[serde(rename = "dc:publisher", default)]
    pub publisher: String,

    /// Publication date (YYYY-MM-DD)
    #[serde(rename = "dc:date", default)]
    pub date: String,
}

/// One chapter record; order in the parent list is the reading order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChapterEntry {
    /// Markdown source filename, relative to the project directory
    pub markdown: String,

    /// Per-chapter stylesheet override. Persisted for hand-edited documents
    /// but not consulted during rendering; every chapter links the default
    /// CSS list (known limitation carried from the reference behavior).
    #[serde(default)]
    pub css: String,
}

impl ChapterEntry {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            css: String::new(),
        }
    }
}

/// The description document persisted as `description.json` in each project
/// directory. Created on first run, merged with overrides and re-persisted on
/// every subsequent run; never deleted by the build.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookDescription {
    /// Dublin Core metadata
    #[serde(default)]
    pub metadata: DublinCore,

    /// Stylesheets applied to every chapter and the TOC, in link order
    #[serde(default)]
    pub default_css: Vec<String>,

    /// Chapters in reading order (defines the spine)
    #[serde(default)]
    pub chapters: Vec<ChapterEntry>,

    /// Filename of the cover image, if any. Only honored when the file is
    /// actually present in the images directory.
    #[serde(default)]
    pub cover_image: Option<String>,
}

impl BookDescription {
    /// Markdown filenames of all chapters, in reading order
    pub fn chapter_filenames(&self) -> Vec<String> {
        self.chapters.iter().map(|c| c.markdown.clone()).collect()
    }
}
