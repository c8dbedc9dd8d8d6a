//! Error types for mdepub-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using EpubError
pub type Result<T> = std::result::Result<T, EpubError>;

/// Top-level error type for all build operations
#[derive(Debug, Error)]
pub enum EpubError {
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Description document error: {0}")]
    Description(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal project-level errors, raised before any output is written
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("No markdown chapters found in {}", .0.display())]
    NoChapters(PathBuf),

    #[error("Chapter file not found: {}", .0.display())]
    ChapterNotFound(PathBuf),

    #[error("Unsupported conversion output kind: {0}")]
    UnsupportedOutputKind(String),
}

/// Errors from the image optimization utility
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to encode image {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}
