//! Seam to the external document-conversion pipeline
//!
//! The conversion stage (PDF to Markdown and friends) is an opaque
//! collaborator: this crate only depends on the filesystem layout it leaves
//! behind, never on its internals.

use crate::error::{ProjectError, Result};
use std::path::{Path, PathBuf};

/// Output kinds a conversion pipeline may produce.
///
/// The build consumes only the `Markdown` case; every other kind fails fast
/// with [`ProjectError::UnsupportedOutputKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutput {
    /// A markdown file with a sibling images directory and optional metadata
    /// document
    Markdown {
        markdown: PathBuf,
        images_dir: PathBuf,
        metadata: Option<PathBuf>,
    },

    /// Rendered HTML output
    Html(PathBuf),

    /// Structured JSON output
    Json(PathBuf),

    /// Chunked output for retrieval pipelines
    Chunks(PathBuf),

    /// Raw text extraction output
    Extraction(PathBuf),
}

impl ConversionOutput {
    /// Short name of this output kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionOutput::Markdown { .. } => "markdown",
            ConversionOutput::Html(_) => "html",
            ConversionOutput::Json(_) => "json",
            ConversionOutput::Chunks(_) => "chunks",
            ConversionOutput::Extraction(_) => "extraction",
        }
    }
}

/// An opaque document-conversion pipeline
pub trait DocumentConverter {
    /// Convert `source` into `output_dir`, reporting what was produced
    fn convert(&self, source: &Path, output_dir: &Path) -> Result<ConversionOutput>;
}

/// Accept a conversion output as EPUB build input.
///
/// Returns the markdown file and its images directory, or fails fast when the
/// pipeline produced anything other than markdown.
pub fn markdown_project(output: ConversionOutput) -> Result<(PathBuf, PathBuf)> {
    match output {
        ConversionOutput::Markdown {
            markdown,
            images_dir,
            ..
        } => Ok((markdown, images_dir)),
        other => Err(ProjectError::UnsupportedOutputKind(other.kind().to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EpubError;

    #[test]
    fn test_markdown_output_accepted() {
        let output = ConversionOutput::Markdown {
            markdown: PathBuf::from("book/book.md"),
            images_dir: PathBuf::from("book/images"),
            metadata: None,
        };
        let (markdown, images_dir) = markdown_project(output).unwrap();
        assert_eq!(markdown, PathBuf::from("book/book.md"));
        assert_eq!(images_dir, PathBuf::from("book/images"));
    }

    #[test]
    fn test_other_kinds_fail_fast() {
        let err = markdown_project(ConversionOutput::Json(PathBuf::from("x.json"))).unwrap_err();
        match err {
            EpubError::Project(ProjectError::UnsupportedOutputKind(kind)) => {
                assert_eq!(kind, "json");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
