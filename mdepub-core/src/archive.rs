//! EPUB archive packager
//!
//! Assembles all generated and copied artifacts into a single ZIP container
//! with the member ordering and compression rules EPUB readers rely on.

use crate::error::Result;
use crate::types::Diagnostic;
use std::fs;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Content of the mandatory first archive member
pub const MIMETYPE: &[u8] = b"application/epub+zip";

/// Compression settings for the packager, passed in explicitly at call time
#[derive(Debug, Clone, Default)]
pub struct ArchiveConfig {
    /// Deflate level for compressed members (library default when `None`)
    pub compression_level: Option<i64>,
}

/// Everything that goes into one archive, in already-final form
#[derive(Debug, Clone, Default)]
pub struct EpubPackage {
    /// `META-INF/container.xml`
    pub container_xml: String,

    /// `OPS/package.opf`
    pub package_opf: String,

    /// `OPS/titlepage.xhtml`
    pub titlepage: String,

    /// Chapter documents as (archive path, xhtml), in reading order
    pub chapters: Vec<(String, String)>,

    /// Images as (archive path, source file); bytes copied verbatim
    pub images: Vec<(String, PathBuf)>,

    /// `OPS/TOC.xhtml`
    pub toc_xhtml: String,

    /// `OPS/toc.ncx`
    pub toc_ncx: String,

    /// Stylesheets as (archive path, source file); absent files are skipped
    pub css: Vec<(String, PathBuf)>,
}

/// Write an EPUB archive to `writer`.
///
/// Member order is fixed: stored `mimetype` first, then deflated
/// container.xml, package.opf, titlepage, chapters, images, TOC.xhtml,
/// toc.ncx, CSS. Entry timestamps are pinned so re-runs produce
/// byte-identical archives. Returns per-item diagnostics for skipped members.
pub fn write_epub<W: Write + Seek>(
    writer: W,
    package: &EpubPackage,
    config: &ArchiveConfig,
) -> Result<Vec<Diagnostic>> {
    let mut zip = ZipWriter::new(writer);
    let mut diagnostics = Vec::new();

    let stored = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(DateTime::default());
    let mut deflated = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    if config.compression_level.is_some() {
        deflated = deflated.compression_level(config.compression_level);
    }

    // Readers type-sniff the first entry; it must be the uncompressed mimetype
    zip.start_file("mimetype", stored)?;
    zip.write_all(MIMETYPE)?;

    zip.start_file("META-INF/container.xml", deflated)?;
    zip.write_all(package.container_xml.as_bytes())?;

    zip.start_file("OPS/package.opf", deflated)?;
    zip.write_all(package.package_opf.as_bytes())?;

    zip.start_file("OPS/titlepage.xhtml", deflated)?;
    zip.write_all(package.titlepage.as_bytes())?;

    for (path, xhtml) in &package.chapters {
        zip.start_file(path.as_str(), deflated)?;
        zip.write_all(xhtml.as_bytes())?;
    }

    for (path, src) in &package.images {
        match fs::read(src) {
            Ok(data) => {
                zip.start_file(path.as_str(), deflated)?;
                zip.write_all(&data)?;
            }
            Err(err) => {
                let filename = file_name(src);
                tracing::warn!(image = %filename, error = %err, "Skipping unreadable image");
                diagnostics.push(Diagnostic::ImageCopyFailed {
                    filename,
                    reason: err.to_string(),
                });
            }
        }
    }

    zip.start_file("OPS/TOC.xhtml", deflated)?;
    zip.write_all(package.toc_xhtml.as_bytes())?;

    zip.start_file("OPS/toc.ncx", deflated)?;
    zip.write_all(package.toc_ncx.as_bytes())?;

    for (path, src) in &package.css {
        if !src.is_file() {
            tracing::warn!(stylesheet = %file_name(src), "Stylesheet not on disk, skipping");
            diagnostics.push(Diagnostic::MissingCss {
                filename: file_name(src),
            });
            continue;
        }
        zip.start_file(path.as_str(), deflated)?;
        zip.write_all(&fs::read(src)?)?;
    }

    let mut inner = zip.finish()?;
    inner.flush()?;

    Ok(diagnostics)
}

/// Write the archive to a temporary sibling path and rename on success.
///
/// A failure mid-write removes the temporary file; no partial archive is ever
/// left at the final path.
pub fn write_epub_file(
    path: &Path,
    package: &EpubPackage,
    config: &ArchiveConfig,
) -> Result<Vec<Diagnostic>> {
    let tmp = path.with_extension("epub.tmp");
    let file = fs::File::create(&tmp)?;

    match write_epub(BufWriter::new(file), package, config) {
        Ok(diagnostics) => {
            fs::rename(&tmp, path)?;
            Ok(diagnostics)
        }
        Err(err) => {
            let _ = fs::remove_file(&tmp);
            Err(err)
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
