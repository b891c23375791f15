//! Integration tests for unarc-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;
use unarc_core::test_utils::LegacyZipBuilder;
use unarc_core::test_utils::create_test_tar;

/// "データ.txt" stored as Shift-JIS.
const DATA_TXT: &[u8] = b"\x83\x66\x81\x5B\x83\x5E.txt";
/// "写真/" stored as Shift-JIS.
const PHOTOS_DIR: &[u8] = b"\x8E\xCA\x90\x5E/";

fn unarc_cmd() -> Command {
    cargo_bin_cmd!("unarc")
}

fn legacy_zip(dir: &Path, name: &str) -> PathBuf {
    let archive = dir.join(name);
    LegacyZipBuilder::new()
        .dir(PHOTOS_DIR)
        .file(DATA_TXT, b"hello")
        .write_to(&archive);
    archive
}

#[test]
fn test_version_flag() {
    unarc_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unarc"));
}

#[test]
fn test_extract_help() {
    unarc_cmd()
        .arg("extract")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--on-decode-error"))
        .stdout(predicate::str::contains("--fail-fast"));
}

#[test]
fn test_extract_requires_archive() {
    unarc_cmd().arg("extract").assert().failure();
}

#[test]
fn test_extract_recovers_names() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = legacy_zip(temp.path(), "photos.zip");

    unarc_cmd()
        .arg("extract")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Files extracted: 1"));

    let dest = temp.path().join("photos");
    assert!(dest.join("写真").is_dir());
    assert_eq!(fs::read_to_string(dest.join("データ.txt")).unwrap(), "hello");
}

#[test]
fn test_extract_unsupported_extension() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = temp.path().join("notes.xyz");
    fs::write(&archive, b"not an archive").unwrap();

    unarc_cmd()
        .arg("extract")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"))
        .stderr(predicate::str::contains("1 of 1 archives failed"));

    assert!(!temp.path().join("notes").exists());
}

#[test]
fn test_extract_batch_isolates_failures() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let bad = temp.path().join("broken.zip");
    fs::write(&bad, b"garbage").unwrap();
    let good = legacy_zip(temp.path(), "good.zip");

    unarc_cmd()
        .arg("extract")
        .arg(&bad)
        .arg(&good)
        .assert()
        .failure()
        .stdout(predicate::str::contains("1 of 2 archives extracted"));

    assert!(!temp.path().join("broken").exists());
    assert!(temp.path().join("good").join("データ.txt").exists());
}

#[test]
fn test_extract_fail_fast() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let bad = temp.path().join("broken.zip");
    fs::write(&bad, b"garbage").unwrap();
    let good = legacy_zip(temp.path(), "good.zip");

    unarc_cmd()
        .arg("extract")
        .arg("--fail-fast")
        .arg(&bad)
        .arg(&good)
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 not attempted"));

    assert!(!temp.path().join("good").exists());
}

#[test]
fn test_extract_tar_bulk() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = temp.path().join("bundle.tar");
    fs::write(&archive, create_test_tar(&[("a.txt", b"alpha")])).unwrap();

    unarc_cmd()
        .arg("extract")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("bulk"));

    assert_eq!(
        fs::read_to_string(temp.path().join("bundle").join("a.txt")).unwrap(),
        "alpha"
    );
}

#[test]
fn test_extract_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = legacy_zip(temp.path(), "photos.zip");

    let output = unarc_cmd()
        .arg("--json")
        .arg("extract")
        .arg(&archive)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "extract");
    assert_eq!(json["status"], "success");
    let report = &json["data"]["archives"][0]["report"];
    assert_eq!(report["strategy"], "per-entry");
    assert_eq!(report["files_extracted"], 1);
    assert_eq!(report["bytes_written"], 5);
}

#[test]
fn test_extract_json_failure() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = temp.path().join("notes.xyz");
    fs::write(&archive, b"x").unwrap();

    let output = unarc_cmd()
        .arg("--json")
        .arg("extract")
        .arg(&archive)
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["data"]["failed"], 1);
    assert!(json["error"].as_str().unwrap().contains("1 of 1"));
}

#[test]
fn test_extract_abort_on_undecodable_name() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = temp.path().join("bad.zip");
    LegacyZipBuilder::new()
        .file(b"ok.txt", b"1")
        .file(b"\xFF\xFE.txt", b"2")
        .write_to(&archive);

    unarc_cmd()
        .arg("extract")
        .arg("--on-decode-error")
        .arg("abort")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("\\xFF\\xFE"));

    assert!(temp.path().join("bad").join("ok.txt").exists());
}

#[test]
fn test_extract_skips_undecodable_name_by_default() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = temp.path().join("bad.zip");
    LegacyZipBuilder::new()
        .file(b"ok.txt", b"1")
        .file(b"\xFF\xFE.txt", b"2")
        .write_to(&archive);

    unarc_cmd()
        .arg("extract")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped:"));
}

#[test]
fn test_list_shows_recovered_names() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = legacy_zip(temp.path(), "photos.zip");

    unarc_cmd()
        .arg("list")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("データ.txt"))
        .stdout(predicate::str::contains("写真/"));

    assert!(!temp.path().join("photos").exists());
}

#[test]
fn test_list_long_shows_tier() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = legacy_zip(temp.path(), "photos.zip");

    unarc_cmd()
        .arg("list")
        .arg("--long")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("shift_jis"))
        .stdout(predicate::str::contains("Total: 2 entries"));
}

#[test]
fn test_list_bulk_format_unsupported() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = temp.path().join("bundle.tar");
    fs::write(&archive, create_test_tar(&[("a.txt", b"alpha")])).unwrap();

    unarc_cmd().arg("list").arg(&archive).assert().failure();
}

#[test]
fn test_formats_lists_bindings() {
    unarc_cmd()
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains(".zip"))
        .stdout(predicate::str::contains("per-entry"))
        .stdout(predicate::str::contains(".7z"));
}

#[test]
fn test_formats_json() {
    let output = unarc_cmd().arg("--json").arg("formats").output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let formats = json["data"].as_array().unwrap();
    assert!(
        formats
            .iter()
            .any(|f| f["extension"] == ".tgz" && f["strategy"] == "bulk")
    );
}

#[test]
fn test_completion_bash() {
    unarc_cmd()
        .arg("completion")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("unarc"));
}
