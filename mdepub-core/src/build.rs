//! Build orchestrator: one project directory in, one EPUB archive out

use crate::archive::{self, ArchiveConfig, EpubPackage};
use crate::documents;
use crate::error::{ProjectError, Result};
use crate::images;
use crate::render::{RenderConfig, XhtmlRenderer};
use crate::store;
use crate::types::{BookDescription, BuildOutcome, BuildReport, Diagnostic};
use std::fs;
use std::path::{Path, PathBuf};

/// Indentation stylesheet generated into every project's css directory
pub const INDENT_CSS: &str = "\np {\n  text-indent: 1.5em;\n  margin-top: 0;\n  margin-bottom: 0;\n}\n\n/* For starting chapters/sections on a new page */\nh1, h2, h3, h4 {\n  page-break-before: always;\n  text-align: center;\n  margin-top: 3em;\n  margin-bottom: 1.5em;\n  line-height: 1.2;\n}\n";

/// All tunables for one build, passed explicitly; no process-wide state
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    pub render: RenderConfig,
    pub archive: ArchiveConfig,
}

/// Decision returned by a [`ChapterReviewer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// Continue the build with this chapter
    pub proceed: bool,

    /// Chapter text to use, possibly edited by the reviewer
    pub text: String,
}

/// Per-chapter review hook invoked before rendering.
///
/// Interactive frontends can open an editor here; the default implementation
/// passes the text through untouched.
pub trait ChapterReviewer {
    fn review(&self, filename: &str, text: &str) -> ReviewOutcome;
}

/// No-op reviewer for non-interactive contexts
pub struct PassthroughReviewer;

impl ChapterReviewer for PassthroughReviewer {
    fn review(&self, _filename: &str, text: &str) -> ReviewOutcome {
        ReviewOutcome {
            proceed: true,
            text: text.to_string(),
        }
    }
}

/// A validated project directory ready to build
#[derive(Debug)]
pub struct EpubProject {
    project_dir: PathBuf,
}

impl EpubProject {
    /// Open a project directory, failing fast before anything is written.
    ///
    /// Fatal conditions: the directory does not exist, or it contains no
    /// markdown files at all.
    pub fn open(project_dir: impl Into<PathBuf>) -> Result<Self> {
        let project_dir = project_dir.into();
        if !project_dir.is_dir() {
            return Err(ProjectError::DirectoryNotFound(project_dir).into());
        }

        let has_markdown = fs::read_dir(&project_dir)?
            .filter_map(|entry| entry.ok())
            .any(|entry| {
                entry.path().is_file()
                    && entry
                        .file_name()
                        .to_str()
                        .map(|name| name.ends_with(".md"))
                        .unwrap_or(false)
            });
        if !has_markdown {
            return Err(ProjectError::NoChapters(project_dir).into());
        }

        Ok(Self { project_dir })
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Run the whole pipeline: merge and persist the description document,
    /// review and render every chapter, generate the structural documents and
    /// package the archive as `{output_dir}/{project_name}.epub`.
    ///
    /// The archive is written to a temporary path and renamed on success, so
    /// a failed build never leaves a partial file at the final path.
    pub fn build(
        &self,
        output_dir: &Path,
        overrides: &BookDescription,
        config: &BuildConfig,
        reviewer: &dyn ChapterReviewer,
    ) -> Result<BuildOutcome> {
        self.ensure_indent_stylesheet()?;

        let description_path = self.project_dir.join(store::DESCRIPTION_FILENAME);
        let existing = store::load(&description_path)?;
        let mut description = store::merge(&existing, overrides);
        store::ensure_default_stylesheet(&mut description);
        store::seed_chapters(&mut description, &self.project_dir)?;
        store::persist(&description_path, &description)?;

        // Review pass; an abort here happens before any archive I/O
        let mut contents: Vec<(String, String)> = Vec::new();
        for chapter in &description.chapters {
            let path = self.project_dir.join(&chapter.markdown);
            let text = fs::read_to_string(&path)
                .map_err(|_| ProjectError::ChapterNotFound(path.clone()))?;

            let outcome = reviewer.review(&chapter.markdown, &text);
            if !outcome.proceed {
                tracing::info!(chapter = %chapter.markdown, "Build aborted by reviewer");
                return Ok(BuildOutcome::Aborted {
                    chapter: chapter.markdown.clone(),
                });
            }
            contents.push((chapter.markdown.clone(), outcome.text));
        }

        let images_dir = self.project_dir.join("images");
        let css_dir = self.project_dir.join("css");
        let renderer = XhtmlRenderer::new(config.render.clone());

        let mut diagnostics = Vec::new();
        let mut artifacts = Vec::new();
        for (filename, text) in &contents {
            let mut artifact = renderer.render(text, &description.default_css, filename, &images_dir);
            diagnostics.append(&mut artifact.diagnostics);
            artifacts.push(artifact);
        }

        // The manifest covers every image physically present, referenced or not
        let available_images = images::list_available_images(&images_dir);

        // Cover designation is only honored for images confirmed present
        let mut manifest_description = description.clone();
        if let Some(cover) = &description.cover_image {
            if !available_images.contains(cover) {
                tracing::warn!(cover = %cover, "Cover image not present in images directory");
                diagnostics.push(Diagnostic::CoverImageNotFound {
                    filename: cover.clone(),
                });
                manifest_description.cover_image = None;
            }
        }

        let md_filenames = description.chapter_filenames();
        let package = EpubPackage {
            container_xml: documents::container_xml().to_string(),
            package_opf: documents::package_opf(
                &manifest_description,
                &md_filenames,
                &available_images,
                &description.default_css,
            ),
            titlepage: documents::titlepage_xhtml(
                &description.metadata.title,
                &description.metadata.creator,
            ),
            chapters: artifacts
                .iter()
                .enumerate()
                .map(|(i, artifact)| {
                    (
                        format!("OPS/{}", documents::chapter_href(i, &artifact.source)),
                        artifact.xhtml.clone(),
                    )
                })
                .collect(),
            images: available_images
                .iter()
                .map(|name| (format!("OPS/images/{}", name), images_dir.join(name)))
                .collect(),
            toc_xhtml: documents::toc_xhtml(&description.default_css, &md_filenames),
            toc_ncx: documents::toc_ncx(&md_filenames),
            css: description
                .default_css
                .iter()
                .map(|name| (format!("OPS/css/{}", name), css_dir.join(name)))
                .collect(),
        };

        fs::create_dir_all(output_dir)?;
        let epub_path = output_dir.join(format!("{}.epub", self.project_name()));
        let mut archive_diagnostics = archive::write_epub_file(&epub_path, &package, &config.archive)?;
        diagnostics.append(&mut archive_diagnostics);

        tracing::info!(
            path = %epub_path.display(),
            chapters = md_filenames.len(),
            images = available_images.len(),
            "EPUB written"
        );

        Ok(BuildOutcome::Completed(BuildReport {
            epub_path,
            chapter_count: md_filenames.len(),
            image_count: available_images.len(),
            diagnostics,
        }))
    }

    /// The archive is named after the project directory
    fn project_name(&self) -> String {
        self.project_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "book".to_string())
    }

    /// Create `css/stylesheet.css` on first run; existing files are never
    /// overwritten
    fn ensure_indent_stylesheet(&self) -> Result<()> {
        let css_dir = self.project_dir.join("css");
        fs::create_dir_all(&css_dir)?;

        let stylesheet = css_dir.join(store::DEFAULT_STYLESHEET);
        if !stylesheet.exists() {
            tracing::debug!("Creating default indentation stylesheet");
            fs::write(&stylesheet, INDENT_CSS)?;
        }
        Ok(())
    }
}
