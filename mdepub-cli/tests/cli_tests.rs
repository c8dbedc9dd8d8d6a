//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn mdepub() -> Command {
    Command::cargo_bin("mdepub").unwrap()
}

#[test]
fn test_build_produces_epub_named_after_project() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("alice");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("ch1.md"), "Down the rabbit hole.").unwrap();
    let out = dir.path().join("out");

    mdepub()
        .arg("build")
        .arg(&project)
        .arg("--output-dir")
        .arg(&out)
        .arg("--title")
        .arg("Alice")
        .assert()
        .success();

    let epub = out.join("alice.epub");
    assert!(epub.is_file());

    // Sanity-check the archive: first member is the stored mimetype
    let file = fs::File::open(&epub).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    assert_eq!(archive.by_index(0).unwrap().name(), "mimetype");
}

#[test]
fn test_build_missing_project_dir_fails() {
    let dir = tempfile::tempdir().unwrap();

    mdepub()
        .arg("build")
        .arg(dir.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open project directory"));
}

#[test]
fn test_build_project_without_markdown_fails() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("empty");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("readme.txt"), "no chapters").unwrap();

    mdepub()
        .arg("build")
        .arg(&project)
        .assert()
        .failure();
}
