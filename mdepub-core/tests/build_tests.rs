//! End-to-end build tests for mdepub-core
//!
//! Each test assembles a throwaway project directory, runs the full pipeline
//! and inspects the resulting archive: member ordering and compression, the
//! shared chapter numbering across package/nav/NCX documents, idempotent
//! re-runs, and cover/diagnostic behavior.

use mdepub_core::{
    BookDescription, BuildConfig, BuildOutcome, BuildReport, Diagnostic, EpubProject,
    PassthroughReviewer,
};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Create a project directory with the given chapters and image files
fn make_project(root: &Path, chapters: &[(&str, &str)], images: &[(&str, &[u8])]) -> PathBuf {
    let project = root.join("my-book");
    fs::create_dir(&project).unwrap();
    for (name, text) in chapters {
        fs::write(project.join(name), text).unwrap();
    }
    if !images.is_empty() {
        let images_dir = project.join("images");
        fs::create_dir(&images_dir).unwrap();
        for (name, bytes) in images {
            fs::write(images_dir.join(name), bytes).unwrap();
        }
    }
    project
}

fn build(project: &Path, out: &Path) -> BuildReport {
    build_with(project, out, &BookDescription::default())
}

fn build_with(project: &Path, out: &Path, overrides: &BookDescription) -> BuildReport {
    let outcome = EpubProject::open(project)
        .unwrap()
        .build(out, overrides, &BuildConfig::default(), &PassthroughReviewer)
        .unwrap();
    match outcome {
        BuildOutcome::Completed(report) => report,
        BuildOutcome::Aborted { chapter } => panic!("unexpected abort at {chapter}"),
    }
}

fn archive_names(path: &Path) -> Vec<String> {
    let file = fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

fn read_member(path: &Path, name: &str) -> String {
    let file = fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

#[test]
fn test_member_order_and_stored_mimetype() {
    let dir = tempfile::tempdir().unwrap();
    let project = make_project(
        dir.path(),
        &[("a.md", "alpha"), ("b.md", "beta")],
        &[("pic.png", b"not-a-real-png")],
    );
    let out = dir.path().join("out");

    let report = build(&project, &out);
    assert_eq!(report.chapter_count, 2);
    assert_eq!(report.image_count, 1);

    assert_eq!(
        archive_names(&report.epub_path),
        vec![
            "mimetype",
            "META-INF/container.xml",
            "OPS/package.opf",
            "OPS/titlepage.xhtml",
            "OPS/s00000-a.xhtml",
            "OPS/s00001-b.xhtml",
            "OPS/images/pic.png",
            "OPS/TOC.xhtml",
            "OPS/toc.ncx",
            "OPS/css/stylesheet.css",
        ]
    );

    let file = fs::File::open(&report.epub_path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut first = archive.by_index(0).unwrap();
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), zip::CompressionMethod::Stored);
    let mut mimetype = String::new();
    first.read_to_string(&mut mimetype).unwrap();
    assert_eq!(mimetype, "application/epub+zip");
}

#[test]
fn test_chapter_numbering_is_identical_across_documents() {
    let dir = tempfile::tempdir().unwrap();
    let project = make_project(
        dir.path(),
        &[("intro.md", "i"), ("one.md", "1"), ("two.md", "2")],
        &[],
    );
    let out = dir.path().join("out");
    let report = build(&project, &out);

    let opf = read_member(&report.epub_path, "OPS/package.opf");
    let toc = read_member(&report.epub_path, "OPS/TOC.xhtml");
    let ncx = read_member(&report.epub_path, "OPS/toc.ncx");
    let names = archive_names(&report.epub_path);

    for (i, stem) in ["intro", "one", "two"].iter().enumerate() {
        let id = format!("s{:05}", i);
        let href = format!("s{:05}-{}.xhtml", i, stem);

        assert!(opf.contains(&format!("<item id=\"{}\" href=\"{}\"", id, href)));
        assert!(opf.contains(&format!("<itemref idref=\"{}\"", id)));
        assert!(toc.contains(&format!("href=\"{}\"", href)));
        assert!(ncx.contains(&format!("<content src=\"{}\"/>", href)));
        assert!(names.contains(&format!("OPS/{}", href)));
    }
}

#[test]
fn test_rebuild_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let project = make_project(
        dir.path(),
        &[("a.md", "alpha\nbeta"), ("b.md", "gamma")],
        &[("pic.jpg", b"jpeg-bytes")],
    );
    let out = dir.path().join("out");

    // First run generates and persists the timestamp-derived identifier
    let first_report = build(&project, &out);
    let first = fs::read(&first_report.epub_path).unwrap();

    let second_report = build(&project, &out);
    let second = fs::read(&second_report.epub_path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_description_seeded_sorted_and_stable() {
    let dir = tempfile::tempdir().unwrap();
    let project = make_project(dir.path(), &[("b.md", "b"), ("a.md", "a")], &[]);
    let out = dir.path().join("out");
    build(&project, &out);

    let description: BookDescription =
        serde_json::from_str(&fs::read_to_string(project.join("description.json")).unwrap())
            .unwrap();
    assert_eq!(description.chapter_filenames(), vec!["a.md", "b.md"]);
    assert!(description
        .default_css
        .contains(&"stylesheet.css".to_string()));
    assert!(!description.metadata.identifier.is_empty());

    // The generated indentation stylesheet exists and gets packaged
    assert!(project.join("css/stylesheet.css").is_file());

    // Chapter order is permanent: a later file does not reorder the spine
    fs::write(project.join("0-first.md"), "late arrival").unwrap();
    let report = build(&project, &out);
    let opf = read_member(&report.epub_path, "OPS/package.opf");
    assert!(opf.contains("<item id=\"s00000\" href=\"s00000-a.xhtml\""));
    assert!(!opf.contains("0-first"));
}

#[test]
fn test_overrides_take_precedence_over_stored_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let project = make_project(dir.path(), &[("a.md", "a")], &[]);
    let out = dir.path().join("out");
    build(&project, &out);

    let mut overrides = BookDescription::default();
    overrides.metadata.title = "Second Edition".to_string();
    let report = build_with(&project, &out, &overrides);

    let opf = read_member(&report.epub_path, "OPS/package.opf");
    assert!(opf.contains("<dc:title id=\"title\">Second Edition</dc:title>"));

    let titlepage = read_member(&report.epub_path, "OPS/titlepage.xhtml");
    assert!(titlepage.contains("Second Edition"));
}

#[test]
fn test_project_without_images_has_no_image_entries() {
    let dir = tempfile::tempdir().unwrap();
    let project = make_project(dir.path(), &[("a.md", "a"), ("b.md", "b")], &[]);
    let out = dir.path().join("out");

    let report = build(&project, &out);
    assert_eq!(report.image_count, 0);
    assert!(archive_names(&report.epub_path)
        .iter()
        .all(|name| !name.starts_with("OPS/images/")));
}

#[test]
fn test_unreferenced_images_still_packaged_and_listed() {
    let dir = tempfile::tempdir().unwrap();
    let project = make_project(
        dir.path(),
        &[("a.md", "no references here")],
        &[("orphan.gif", b"gif-bytes")],
    );
    let out = dir.path().join("out");

    let report = build(&project, &out);
    assert_eq!(report.image_count, 1);
    assert!(archive_names(&report.epub_path).contains(&"OPS/images/orphan.gif".to_string()));

    let opf = read_member(&report.epub_path, "OPS/package.opf");
    assert!(opf.contains("href=\"images/orphan.gif\" media-type=\"image/gif\""));
}

#[test]
fn test_cover_designation_only_for_present_images() {
    let dir = tempfile::tempdir().unwrap();
    let project = make_project(
        dir.path(),
        &[("a.md", "a")],
        &[("real.png", b"png-bytes")],
    );
    let out = dir.path().join("out");

    let mut overrides = BookDescription::default();
    overrides.cover_image = Some("ghost.png".to_string());
    let report = build_with(&project, &out, &overrides);

    let opf = read_member(&report.epub_path, "OPS/package.opf");
    assert!(!opf.contains("cover-image"));
    assert!(!opf.contains("name=\"cover\""));
    assert!(report.diagnostics.contains(&Diagnostic::CoverImageNotFound {
        filename: "ghost.png".to_string(),
    }));

    // A present cover gets both the property and the compatibility meta
    let mut overrides = BookDescription::default();
    overrides.cover_image = Some("real.png".to_string());
    let report = build_with(&project, &out, &overrides);
    let opf = read_member(&report.epub_path, "OPS/package.opf");
    assert!(opf.contains("properties=\"cover-image\""));
    assert!(opf.contains("<meta name=\"cover\" content=\"image-00000\"/>"));
}

#[test]
fn test_missing_image_reference_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let project = make_project(dir.path(), &[("a.md", "see ![fig](missing.png)")], &[]);
    let out = dir.path().join("out");

    let report = build(&project, &out);
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::MissingImage {
            chapter: "a.md".to_string(),
            reference: "missing.png".to_string(),
        }]
    );

    // The reference is left untouched in the rendered chapter
    let chapter = read_member(&report.epub_path, "OPS/s00000-a.xhtml");
    assert!(chapter.contains("missing.png"));
    assert!(!chapter.contains("images/missing.png"));
}

#[test]
fn test_each_source_line_is_its_own_paragraph() {
    let dir = tempfile::tempdir().unwrap();
    let project = make_project(dir.path(), &[("a.md", "line one\nline two\nline three")], &[]);
    let out = dir.path().join("out");

    let report = build(&project, &out);
    let chapter = read_member(&report.epub_path, "OPS/s00000-a.xhtml");
    assert_eq!(chapter.matches("<p>").count(), 3);
}
