//! Build command implementation

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use mdepub_core::{
    BookDescription, BuildConfig, BuildOutcome, EpubProject, PassthroughReviewer,
};
use std::path::Path;
use std::time::Duration;

/// Build one project directory into an EPUB archive
pub fn build(
    project_dir: &str,
    output_dir: &str,
    title: Option<String>,
    author: Option<String>,
    cover: Option<String>,
) -> Result<()> {
    let mut overrides = BookDescription::default();
    if let Some(title) = title {
        overrides.metadata.title = title;
    }
    if let Some(author) = author {
        overrides.metadata.creator = author;
    }
    overrides.cover_image = cover;

    let project = EpubProject::open(project_dir)
        .with_context(|| format!("Failed to open project directory: {}", project_dir))?;

    // Set up progress spinner
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Building EPUB...");

    let outcome = project
        .build(
            Path::new(output_dir),
            &overrides,
            &BuildConfig::default(),
            &PassthroughReviewer,
        )
        .with_context(|| format!("Failed to build {}", project_dir))?;

    match outcome {
        BuildOutcome::Completed(report) => {
            pb.finish_with_message(format!(
                "Wrote {} ({} chapters, {} images)",
                report.epub_path.display(),
                report.chapter_count,
                report.image_count
            ));

            for diagnostic in &report.diagnostics {
                tracing::warn!(?diagnostic, "Build diagnostic");
            }
            if !report.diagnostics.is_empty() {
                eprintln!(
                    "Finished with {} warning(s); run with --verbose for details",
                    report.diagnostics.len()
                );
            }
            Ok(())
        }
        BuildOutcome::Aborted { chapter } => {
            pb.finish_with_message(format!("Build aborted at {}", chapter));
            Ok(())
        }
    }
}
