//! Metadata store: load, merge and persist the per-project description document

use crate::error::Result;
use crate::types::{BookDescription, ChapterEntry, DublinCore};
use chrono::Local;
use std::fs;
use std::path::Path;

/// Filename of the description document inside a project directory
pub const DESCRIPTION_FILENAME: &str = "description.json";

/// Default title when neither the document nor the overrides provide one
pub const DEFAULT_TITLE: &str = "Untitled Document";
/// Default creator
pub const DEFAULT_CREATOR: &str = "Unknown Author";
/// Default language code
pub const DEFAULT_LANGUAGE: &str = "en";
/// Default rights statement
pub const DEFAULT_RIGHTS: &str = "All rights reserved";
/// Default publisher
pub const DEFAULT_PUBLISHER: &str = "mdepub";

/// Stylesheet that must always be linked by every chapter and the TOC
pub const DEFAULT_STYLESHEET: &str = "stylesheet.css";

/// Load the description document from `path`.
///
/// A missing file is not an error: the first run of a project starts from an
/// empty default structure. A present but malformed document is fatal.
pub fn load(path: &Path) -> Result<BookDescription> {
    if !path.exists() {
        return Ok(BookDescription::default());
    }
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Merge user overrides onto an existing description.
///
/// Pure: each metadata field takes the override when non-empty, else the
/// existing value, else a named default. The identifier default is derived
/// from the current timestamp and the date default from the current date, so
/// they are only ever generated when absent from both inputs.
pub fn merge(existing: &BookDescription, overrides: &BookDescription) -> BookDescription {
    let pick = |over: &str, exist: &str, default: &str| -> String {
        if !over.is_empty() {
            over.to_string()
        } else if !exist.is_empty() {
            exist.to_string()
        } else {
            default.to_string()
        }
    };

    let now = Local::now();
    let metadata = DublinCore {
        title: pick(&overrides.metadata.title, &existing.metadata.title, DEFAULT_TITLE),
        creator: pick(
            &overrides.metadata.creator,
            &existing.metadata.creator,
            DEFAULT_CREATOR,
        ),
        identifier: pick(
            &overrides.metadata.identifier,
            &existing.metadata.identifier,
            &format!("id-{}", now.format("%Y%m%d%H%M%S")),
        ),
        language: pick(
            &overrides.metadata.language,
            &existing.metadata.language,
            DEFAULT_LANGUAGE,
        ),
        rights: pick(&overrides.metadata.rights, &existing.metadata.rights, DEFAULT_RIGHTS),
        publisher: pick(
            &overrides.metadata.publisher,
            &existing.metadata.publisher,
            DEFAULT_PUBLISHER,
        ),
        date: pick(
            &overrides.metadata.date,
            &existing.metadata.date,
            &now.format("%Y-%m-%d").to_string(),
        ),
    };

    BookDescription {
        metadata,
        default_css: if !overrides.default_css.is_empty() {
            overrides.default_css.clone()
        } else {
            existing.default_css.clone()
        },
        chapters: if !overrides.chapters.is_empty() {
            overrides.chapters.clone()
        } else {
            existing.chapters.clone()
        },
        cover_image: overrides
            .cover_image
            .clone()
            .or_else(|| existing.cover_image.clone()),
    }
}

/// Guarantee the generated indentation stylesheet is linked, and remove
/// duplicate CSS entries preserving first occurrence order.
pub fn ensure_default_stylesheet(description: &mut BookDescription) {
    if !description
        .default_css
        .iter()
        .any(|c| c == DEFAULT_STYLESHEET)
    {
        description.default_css.push(DEFAULT_STYLESHEET.to_string());
    }

    let mut seen = Vec::new();
    description.default_css.retain(|c| {
        if seen.contains(c) {
            false
        } else {
            seen.push(c.clone());
            true
        }
    });
}

/// Populate the chapter list from the project directory on first run.
///
/// Only runs when `chapters` is empty; markdown files are sorted
/// lexicographically and this ordering becomes the permanent reading order
/// once the document is persisted.
pub fn seed_chapters(description: &mut BookDescription, project_dir: &Path) -> Result<()> {
    if !description.chapters.is_empty() {
        return Ok(());
    }

    let mut names: Vec<String> = fs::read_dir(project_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".md"))
        .collect();
    names.sort();

    tracing::debug!(count = names.len(), "Seeding chapter list from project directory");
    description.chapters = names.into_iter().map(ChapterEntry::new).collect();

    Ok(())
}

/// Write the canonical description document back to `path`.
///
/// Whole-file write; safe to call on every run. Re-persisting an unchanged
/// document produces byte-identical output.
pub fn persist(path: &Path, description: &BookDescription) -> Result<()> {
    let json = serde_json::to_string_pretty(description)?;
    fs::write(path, json)?;
    Ok(())
}
