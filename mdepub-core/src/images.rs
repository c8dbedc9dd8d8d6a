//! Image discovery, reference rewriting and optimization

use crate::error::{ImageError, Result};
use crate::types::Diagnostic;
use image::imageops::FilterType;
use image::GenericImageView;
use regex::{Captures, Regex};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Image file extensions included in the available-image set
pub const IMAGE_EXTENSIONS: [&str; 4] = ["gif", "jpg", "jpeg", "png"];

/// Longest-side bound used by [`copy_and_resize`] unless overridden
pub const DEFAULT_MAX_DIMENSION: u32 = 1800;

/// JPEG quality used when re-encoding
const JPEG_QUALITY: u8 = 85;

fn image_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("valid image pattern"))
}

/// Result of scanning one chapter's markdown for image references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolution {
    /// Markdown with resolved references rewritten to `images/<filename>`
    pub text: String,

    /// Bare filenames of resolved images, first occurrence order, deduplicated
    pub references: Vec<String>,

    /// One diagnostic per unresolved reference
    pub diagnostics: Vec<Diagnostic>,
}

/// Scan markdown for `![alt](path)` references and resolve them against the
/// project's images directory.
///
/// Matching is by filename only: directory components in the original
/// reference are ignored, so same-named images in different source subfolders
/// are not distinguished (known limitation, preserved deliberately).
/// Unresolved references are left untouched and reported as diagnostics;
/// they never abort the build.
pub fn extract_references(markdown: &str, images_dir: &Path, chapter: &str) -> ImageResolution {
    let mut references: Vec<String> = Vec::new();
    let mut diagnostics = Vec::new();

    let text = image_ref_pattern()
        .replace_all(markdown, |caps: &Captures| {
            let alt = &caps[1];
            let reference = caps[2].trim();
            let filename = Path::new(reference)
                .file_name()
                .and_then(|name| name.to_str());

            match filename {
                Some(name) if images_dir.join(name).is_file() => {
                    if !references.iter().any(|r| r == name) {
                        references.push(name.to_string());
                    }
                    format!("![{}](images/{})", alt, name)
                }
                _ => {
                    tracing::warn!(chapter, reference, "Image not found in images directory");
                    diagnostics.push(Diagnostic::MissingImage {
                        chapter: chapter.to_string(),
                        reference: reference.to_string(),
                    });
                    caps[0].to_string()
                }
            }
        })
        .into_owned();

    ImageResolution {
        text,
        references,
        diagnostics,
    }
}

/// List image filenames physically present in the images directory.
///
/// Filtered by extension (case-insensitive) and sorted for deterministic
/// manifests. A nonexistent directory yields an empty list, not an error.
pub fn list_available_images(images_dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(images_dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            Path::new(name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    names.sort();
    names
}

/// Copy an image to `dst`, downscaling so the longest side is at most
/// `max_dimension` (never upscaling) and re-encoding for e-reader use.
///
/// The output codec follows the source extension: `.jpg`/`.jpeg` stays JPEG,
/// `.png` stays PNG, anything else falls back to JPEG with a corrected `.jpg`
/// output extension. Alpha channels are flattened before JPEG encoding.
/// Returns the path actually written, which may differ from `dst` in
/// extension.
pub fn copy_and_resize(src: &Path, dst: &Path, max_dimension: u32) -> Result<PathBuf> {
    let img = image::open(src).map_err(|source| ImageError::Decode {
        path: src.to_path_buf(),
        source,
    })?;

    let (width, height) = img.dimensions();
    let img = if width.max(height) > max_dimension {
        img.resize(max_dimension, max_dimension, FilterType::Lanczos3)
    } else {
        img
    };

    let ext = src
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => {
            save_jpeg(&img, dst)?;
            Ok(dst.to_path_buf())
        }
        "png" => {
            img.save_with_format(dst, image::ImageFormat::Png)
                .map_err(|source| ImageError::Encode {
                    path: dst.to_path_buf(),
                    source,
                })?;
            Ok(dst.to_path_buf())
        }
        _ => {
            let corrected = dst.with_extension("jpg");
            save_jpeg(&img, &corrected)?;
            Ok(corrected)
        }
    }
}

fn save_jpeg(img: &image::DynamicImage, path: &Path) -> Result<()> {
    // JPEG has no alpha channel; flatten before encoding
    let rgb = img.to_rgb8();
    let file = fs::File::create(path)?;
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|source| ImageError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}
