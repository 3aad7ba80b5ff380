//! Command-line tests for the mindmap-io binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn mindmap_io() -> Command {
    Command::cargo_bin("mindmap-io").unwrap()
}

#[test]
fn test_inspect_prints_counts() {
    mindmap_io()
        .arg("inspect")
        .arg(fixture("connectors.mm"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Nodes: 3"))
        .stdout(predicate::str::contains("Connectors: 2"));
}

#[test]
fn test_inspect_reports_warnings() {
    mindmap_io()
        .arg("inspect")
        .arg(fixture("dangling.mm"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Connectors: 1"))
        .stderr(predicate::str::contains("Warnings: 2"))
        .stderr(predicate::str::contains("unknown node 'ID_404'"));
}

#[test]
fn test_normalize_to_stdout_is_stable() {
    let expected = fs::read_to_string(fixture("connectors.mm")).unwrap();

    mindmap_io()
        .arg("normalize")
        .arg(fixture("connectors.mm"))
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn test_normalize_with_style_writes_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.mm");

    mindmap_io()
        .arg("normalize")
        .arg(fixture("loose.mm"))
        .arg("--style")
        .arg(fixture("style.yaml"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved to:"));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains(
        r##"<arrowlink SHAPE="LINE" COLOR="#0000ff" WIDTH="4" TRANSPARENCY="200" DESTINATION="ID_2""##
    ));
}

#[test]
fn test_paste_merges_fragment() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("merged.mm");

    mindmap_io()
        .arg("paste")
        .arg(fixture("connectors.mm"))
        .arg(fixture("fragment.mm"))
        .arg("--parent")
        .arg("ID_3")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("duplicate node ID 'ID_2'"));

    let merged = fs::read_to_string(&output).unwrap();
    assert!(merged.contains(r#"TEXT="Pasted""#));
    assert!(merged.contains(r#"TEXT="Pasted child""#));
    assert_eq!(merged.matches("<arrowlink").count(), 5);
}

#[test]
fn test_paste_under_unknown_parent_fails() {
    mindmap_io()
        .arg("paste")
        .arg(fixture("connectors.mm"))
        .arg(fixture("fragment.mm"))
        .arg("--parent")
        .arg("ID_404")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("ID_404"));
}

#[test]
fn test_malformed_document_fails() {
    mindmap_io()
        .arg("inspect")
        .arg(fixture("malformed.mm"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("WIDTH=\"wide\""));
}

#[test]
fn test_missing_file_fails() {
    mindmap_io()
        .arg("inspect")
        .arg(fixture("does-not-exist.mm"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
