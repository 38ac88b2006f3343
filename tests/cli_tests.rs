//! End-to-end tests of the folderize binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn folderize() -> Command {
    let mut cmd = Command::cargo_bin("folderize").expect("binary is built");
    cmd.env("NO_COLOR", "1");
    cmd
}

fn sample_dir() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    for name in ["a.jpg", "b.pdf", "c.mkv", "d.unknownext"] {
        fs::write(temp_dir.path().join(name), name).expect("Failed to write test file");
    }
    temp_dir
}

#[test]
fn test_default_run_reports_each_file_and_total() {
    let dir = sample_dir();

    folderize()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("a.jpg moved to images/"))
        .stdout(predicate::str::contains("c.mkv moved to videos/"))
        .stdout(predicate::str::contains("d.unknownext moved to others/"))
        .stdout(predicate::str::contains("4 moved"));

    assert!(dir.path().join("pdfs/b.pdf").is_file());
}

#[test]
fn test_image_flag_moves_only_images() {
    let dir = sample_dir();

    folderize()
        .arg(dir.path())
        .arg("--image")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 moved"));

    assert!(dir.path().join("images/a.jpg").is_file());
    assert!(dir.path().join("b.pdf").is_file());
    assert!(!dir.path().join("others").exists());
}

#[test]
fn test_bare_others_flag_before_destination() {
    let dir = sample_dir();
    let out = TempDir::new().expect("Failed to create temp directory");

    folderize()
        .arg(dir.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("4 moved"));

    assert!(out.path().join("others/a.jpg").is_file());
    assert!(out.path().join("others/d.unknownext").is_file());
}

#[test]
fn test_named_others_flag() {
    let dir = sample_dir();

    folderize()
        .arg(dir.path())
        .arg("-p")
        .arg("--others=rest")
        .assert()
        .success()
        .stdout(predicate::str::contains("b.pdf moved to pdfs/"))
        .stdout(predicate::str::contains("a.jpg moved to rest/"));
}

#[test]
fn test_missing_source_exits_non_zero() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let out = dir.path().join("out");

    folderize()
        .arg(dir.path().join("nope"))
        .arg(&out)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Source path does not exist"));

    assert!(!out.exists());
}

#[test]
fn test_per_file_failure_keeps_exit_code_zero() {
    let dir = sample_dir();
    fs::create_dir_all(dir.path().join("images/a.jpg/inner")).expect("Failed to create dir");

    folderize()
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("a.jpg error while moving"))
        .stdout(predicate::str::contains("3 moved"));
}

#[test]
fn test_dry_run_leaves_files() {
    let dir = sample_dir();

    folderize()
        .arg(dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("a.jpg would move to images/"))
        .stdout(predicate::str::contains("4 would be moved"));

    assert!(dir.path().join("a.jpg").is_file());
    assert!(!dir.path().join("images").exists());
}

#[test]
fn test_quiet_hides_per_file_lines() {
    let dir = sample_dir();

    folderize()
        .arg(dir.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("moved to").not())
        .stdout(predicate::str::contains("4 moved"));
}

#[test]
fn test_invalid_filter_file_exits_non_zero() {
    let dir = sample_dir();
    let filters = dir.path().join("filters.cfg");
    fs::write(&filters, "[filters.exclude]\nregex = [\"(\"]\n").expect("Failed to write file");

    folderize()
        .arg(dir.path())
        .arg("--config")
        .arg(&filters)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid regex pattern"));

    assert!(dir.path().join("a.jpg").is_file());
}

#[test]
fn test_too_many_arguments_is_a_usage_error() {
    folderize()
        .args(["one", "two", "three"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_others_outside_destination_is_a_usage_error() {
    let dir = sample_dir();
    let outside = TempDir::new().expect("Failed to create temp directory");
    let escaped = outside.path().join("stolen");

    folderize()
        .arg(dir.path())
        .arg(format!("--others={}", escaped.display()))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid folder name"));

    folderize()
        .arg(dir.path())
        .arg("--others=../stolen")
        .assert()
        .failure()
        .code(2);

    assert!(!escaped.exists());
    assert!(!dir.path().join("images").exists());
    assert!(dir.path().join("d.unknownext").is_file());
}

#[test]
fn test_dry_run_does_not_create_missing_destination() {
    let dir = sample_dir();
    let out = TempDir::new().expect("Failed to create temp directory");
    let brand_new = out.path().join("brand_new_dest");

    folderize()
        .arg(dir.path())
        .arg(&brand_new)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 would be moved"));

    assert!(!brand_new.exists());
}

#[test]
fn test_file_blocking_a_folder_is_reported_per_file() {
    let dir = sample_dir();
    fs::write(dir.path().join("videos"), "not a folder").expect("Failed to write test file");

    folderize()
        .arg(dir.path())
        .args(["-i", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("exists and is not a folder"))
        .stderr(predicate::str::contains("c.mkv error while moving"))
        .stdout(predicate::str::contains("1 moved"));

    assert!(dir.path().join("images/a.jpg").is_file());
    assert!(dir.path().join("c.mkv").is_file());
}
