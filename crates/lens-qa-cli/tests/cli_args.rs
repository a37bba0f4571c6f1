//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and error handling.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use lens_qa_test_support::SyntheticImageBuilder;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from any user or project config.
fn lens_qa(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lens-qa").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("xdg"));
    cmd
}

fn flat_png(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("flat.png");
    SyntheticImageBuilder::save(&SyntheticImageBuilder::uniform_gray(200, 200, 128), &path)
        .unwrap();
    path
}

// === Missing/Invalid Path Tests ===

#[test]
fn test_missing_path_shows_error() {
    let home = TempDir::new().unwrap();
    lens_qa(home.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No paths specified"));
}

#[test]
fn test_nonexistent_path_warns_but_continues() {
    let home = TempDir::new().unwrap();
    lens_qa(home.path())
        .arg("/nonexistent/path/to/image.jpg")
        .assert()
        .code(0) // No images processed = nothing dirty
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_empty_directory() {
    let home = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();

    lens_qa(home.path())
        .arg(empty.path())
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());
}

// === Format Validation Tests ===

#[test]
fn test_invalid_format_rejected() {
    let home = TempDir::new().unwrap();
    let image = flat_png(&home);

    lens_qa(home.path())
        .arg("--format")
        .arg("xml")
        .arg(image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("json").or(predicate::str::contains("jsonl")));
}

#[test]
fn test_valid_formats_accepted() {
    let home = TempDir::new().unwrap();
    let image = flat_png(&home);

    for format in ["json", "jsonl"] {
        lens_qa(home.path())
            .arg("--format")
            .arg(format)
            .arg(&image)
            .assert()
            .code(0);
    }
}

// === Threshold Validation Tests ===

#[test]
fn test_threshold_out_of_range_rejected() {
    let home = TempDir::new().unwrap();
    let image = flat_png(&home);

    lens_qa(home.path())
        .arg("--threshold")
        .arg("2.0")
        .arg(image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 is not in 0.0..=1.0"));
}

#[test]
fn test_threshold_not_a_number_rejected() {
    let home = TempDir::new().unwrap();
    let image = flat_png(&home);

    lens_qa(home.path())
        .args(["score", "--threshold", "high"])
        .arg(image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid number"));
}

#[test]
fn test_threshold_in_range_accepted() {
    let home = TempDir::new().unwrap();
    let image = flat_png(&home);

    lens_qa(home.path())
        .arg("--threshold")
        .arg("0.9")
        .arg(image)
        .assert()
        .code(0);
}

// === Subcommand Tests ===

#[test]
fn test_help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    lens_qa(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("check")
                .and(predicate::str::contains("score"))
                .and(predicate::str::contains("is-dirty")),
        );
}

#[test]
fn test_explicit_check_subcommand() {
    let home = TempDir::new().unwrap();
    let image = flat_png(&home);

    lens_qa(home.path())
        .arg("check")
        .arg(image)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"is_dirty\":false"));
}

#[test]
fn test_score_requires_path() {
    let home = TempDir::new().unwrap();
    lens_qa(home.path()).arg("score").assert().failure();
}

#[test]
fn test_verbose_flag_accepted() {
    let home = TempDir::new().unwrap();
    let image = flat_png(&home);

    lens_qa(home.path())
        .arg("-vv")
        .arg(image)
        .assert()
        .code(0)
        .stderr(predicate::str::contains("DEBUG"));
}

#[test]
fn test_quiet_suppresses_progress() {
    let home = TempDir::new().unwrap();
    let image = flat_png(&home);

    lens_qa(home.path())
        .arg("--quiet")
        .arg("--progress")
        .arg(image)
        .assert()
        .code(0)
        .stderr(predicate::str::is_empty());
}
