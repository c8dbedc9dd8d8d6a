//! Structured diagnostics and build results

use serde::Serialize;
use std::path::PathBuf;

/// A recoverable, per-item problem surfaced by the build.
///
/// Diagnostics never abort a build; they are collected into the final
/// [`BuildReport`] so callers can inspect what was skipped or left untouched.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A markdown image reference whose filename was not found in the
    /// project's images directory; the reference was left untouched.
    MissingImage { chapter: String, reference: String },

    /// A stylesheet listed in the description document that is absent from
    /// the css directory; it was skipped, not packaged.
    MissingCss { filename: String },

    /// The configured cover image is not present in the images directory;
    /// no cover designation was emitted.
    CoverImageNotFound { filename: String },

    /// An available image could not be read while packaging; the manifest
    /// entry remains but the archive member was skipped.
    ImageCopyFailed { filename: String, reason: String },

    /// The image optimization utility failed on one image.
    ImageOptimizeFailed { filename: String, reason: String },
}

/// Summary of a completed build
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BuildReport {
    /// Final path of the generated archive
    pub epub_path: PathBuf,

    /// Number of chapters packaged
    pub chapter_count: usize,

    /// Number of images packaged
    pub image_count: usize,

    /// All recoverable problems encountered, in discovery order
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of a build attempt that may be cancelled by the review hook
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The archive was written successfully
    Completed(BuildReport),

    /// A chapter reviewer declined to proceed; nothing was written
    Aborted { chapter: String },
}
