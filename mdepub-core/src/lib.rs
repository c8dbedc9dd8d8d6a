//! mdepub Core Library
//!
//! This crate assembles a valid EPUB 3 e-book from a project directory of
//! markdown chapter files, associated images and user-supplied metadata. The
//! pipeline runs strictly forward: the metadata store yields the chapter and
//! CSS lists, each chapter is rendered to XHTML (rewriting image references
//! along the way), the structural documents are generated from the final
//! lists, and everything is packaged into a single ZIP container with the
//! member ordering EPUB readers rely on.

pub mod archive;
pub mod build;
pub mod convert;
pub mod documents;
pub mod error;
pub mod images;
pub mod render;
pub mod store;
pub mod types;

pub use archive::{ArchiveConfig, EpubPackage};
pub use build::{BuildConfig, ChapterReviewer, EpubProject, PassthroughReviewer, ReviewOutcome};
pub use convert::{ConversionOutput, DocumentConverter};
pub use error::{EpubError, ImageError, ProjectError, Result};
pub use render::{RenderConfig, XhtmlRenderer};
pub use types::{
    BookDescription, BuildOutcome, BuildReport, ChapterArtifact, ChapterEntry, Diagnostic,
    DublinCore,
};
