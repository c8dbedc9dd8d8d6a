//! Core types for the mdepub build pipeline

mod chapter;
mod description;
mod diagnostics;

pub use chapter::ChapterArtifact;
pub use description::{BookDescription, ChapterEntry, DublinCore};
pub use diagnostics::{BuildOutcome, BuildReport, Diagnostic};
