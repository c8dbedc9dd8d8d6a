//! Transient per-chapter build artifact

use super::Diagnostic;

/// The rendered form of one chapter, held only for the duration of a build.
///
/// Produced by the renderer and consumed by the archive packager; never
/// persisted independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterArtifact {
    /// Markdown source filename this artifact was rendered from
    pub source: String,

    /// Complete XHTML content document
    pub xhtml: String,

    /// Bare filenames of images referenced by this chapter
    pub images: Vec<String>,

    /// Recoverable problems encountered while rendering
    pub diagnostics: Vec<Diagnostic>,
}
