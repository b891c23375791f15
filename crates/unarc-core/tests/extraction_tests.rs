//! Integration tests for unarc-core.
//!
//! These tests verify end-to-end workflows with real filesystem operations.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use unarc_core::BatchPolicy;
use unarc_core::DecodeErrorPolicy;
use unarc_core::ExtractionConfig;
use unarc_core::ExtractionError;
use unarc_core::Extractor;
use unarc_core::SkipReason;
use unarc_core::Strategy;
use unarc_core::extract_all;
use unarc_core::extract_archive;
use unarc_core::formats::CompressionCodec;
use unarc_core::test_utils::LegacyZipBuilder;
use unarc_core::test_utils::compress;
use unarc_core::test_utils::create_test_tar;
use unarc_core::test_utils::create_test_zip;

/// "データ.txt" stored as Shift-JIS.
const DATA_TXT: &[u8] = b"\x83\x66\x81\x5B\x83\x5E.txt";
/// "写真/" stored as Shift-JIS.
const PHOTOS_DIR: &[u8] = b"\x8E\xCA\x90\x5E/";

fn list_dir(path: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn config() -> ExtractionConfig {
    ExtractionConfig::default()
}

#[test]
fn test_legacy_zip_name_recovered() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("archive.zip");
    LegacyZipBuilder::new()
        .file(DATA_TXT, b"hello")
        .write_to(&archive);

    let report = extract_archive(&archive, &config()).unwrap();

    let dest = temp.path().join("archive");
    assert_eq!(report.destination, dest);
    assert_eq!(report.strategy, Strategy::PerEntry);
    assert_eq!(list_dir(&dest), ["データ.txt"]);
    assert_eq!(fs::read_to_string(dest.join("データ.txt")).unwrap(), "hello");
}

#[test]
fn test_directory_marker_creates_only_directory() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("photos.zip");
    LegacyZipBuilder::new().dir(PHOTOS_DIR).write_to(&archive);

    let report = extract_archive(&archive, &config()).unwrap();

    let dir = temp.path().join("photos").join("写真");
    assert!(dir.is_dir());
    assert!(list_dir(&dir).is_empty());
    assert_eq!(report.files_extracted, 0);
    assert_eq!(report.directories_created, 2);
}

#[test]
fn test_nested_legacy_paths() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("nested.zip");
    let mut nested = PHOTOS_DIR.to_vec();
    nested.extend_from_slice(DATA_TXT);
    LegacyZipBuilder::new()
        .file(&nested, b"inside")
        .write_to(&archive);

    extract_archive(&archive, &config()).unwrap();

    let file = temp.path().join("nested/写真/データ.txt");
    assert_eq!(fs::read_to_string(file).unwrap(), "inside");
}

#[test]
fn test_trail_byte_backslash_is_not_a_directory() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("so.zip");
    // "ソ" ends in 0x5C
    LegacyZipBuilder::new()
        .file(b"\x83\x5C", b"katakana so")
        .write_to(&archive);

    let report = extract_archive(&archive, &config()).unwrap();

    assert_eq!(report.files_extracted, 1);
    let file = temp.path().join("so").join("ソ");
    assert!(file.is_file());
    assert_eq!(fs::read_to_string(file).unwrap(), "katakana so");
}

#[test]
fn test_jisx0213_names() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("ext.zip");
    // "①.txt", "硃.txt" and "𠂉.txt"
    LegacyZipBuilder::new()
        .file(b"\x87\x40.txt", b"one")
        .file(b"\xED\x40.txt", b"vermilion")
        .file(b"\xF0\x40.txt", b"plane two")
        .write_to(&archive);

    let report = extract_archive(&archive, &config()).unwrap();

    assert_eq!(report.files_extracted, 3);
    assert!(!report.has_skipped());
    let dest = temp.path().join("ext");
    assert_eq!(list_dir(&dest), ["①.txt", "硃.txt", "𠂉.txt"]);
}

#[test]
fn test_utf8_flagged_names_pass_through() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("modern.zip");
    fs::write(&archive, create_test_zip(&[("資料/メモ.txt", b"memo")])).unwrap();

    extract_archive(&archive, &config()).unwrap();

    let file = temp.path().join("modern/資料/メモ.txt");
    assert_eq!(fs::read_to_string(file).unwrap(), "memo");
}

#[test]
fn test_unregistered_extension_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("data.xyz");
    fs::write(&archive, b"payload").unwrap();
    let before = list_dir(temp.path());

    let err = extract_archive(&archive, &config()).unwrap_err();

    assert!(matches!(
        err,
        ExtractionError::UnsupportedArchiveType { ref extension } if extension == ".xyz"
    ));
    assert_eq!(list_dir(temp.path()), before);
}

#[test]
fn test_uppercase_extension_is_unsupported() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("DATA.ZIP");
    fs::write(&archive, create_test_zip(&[("a.txt", b"a")])).unwrap();

    let err = extract_archive(&archive, &config()).unwrap_err();

    assert!(matches!(err, ExtractionError::UnsupportedArchiveType { .. }));
    assert!(!temp.path().join("DATA").exists());
}

#[test]
fn test_batch_isolates_corrupt_archive() {
    let temp = TempDir::new().unwrap();
    let good = temp.path().join("a.zip");
    let bad = temp.path().join("b.zip");
    LegacyZipBuilder::new().file(DATA_TXT, b"hello").write_to(&good);
    fs::write(&bad, b"this is not a zip archive").unwrap();

    let batch = extract_all(&[&good, &bad], &config());

    assert_eq!(batch.outcomes.len(), 2);
    assert!(!batch.is_success());
    assert!(!batch.all_failed());
    assert!(temp.path().join("a/データ.txt").is_file());
    assert!(!temp.path().join("b").exists());

    let failures: Vec<_> = batch.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, bad.as_path());
    assert!(matches!(failures[0].1, ExtractionError::ArchiveOpen { .. }));
}

#[test]
fn test_batch_fail_fast() {
    let temp = TempDir::new().unwrap();
    let bad = temp.path().join("a.zip");
    let good = temp.path().join("b.zip");
    fs::write(&bad, b"garbage").unwrap();
    LegacyZipBuilder::new().file(b"x.txt", b"x").write_to(&good);

    let batch = extract_all(
        &[&bad, &good],
        &config().with_batch_policy(BatchPolicy::FailFast),
    );

    assert_eq!(batch.outcomes.len(), 1);
    assert_eq!(batch.not_attempted(), 1);
    assert!(!temp.path().join("b").exists());
}

#[test]
fn test_all_archives_fail() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a.xyz");
    let b = temp.path().join("b.zip");

    let batch = extract_all(&[&a, &b], &config());

    assert!(batch.all_failed());
    assert_eq!(batch.failures().count(), 2);
}

#[test]
fn test_colliding_names_last_write_wins() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("dup.zip");
    LegacyZipBuilder::new()
        .file(DATA_TXT, b"legacy")
        .utf8_file("データ.txt", b"unicode")
        .write_to(&archive);

    let report = extract_archive(&archive, &config()).unwrap();

    let file = temp.path().join("dup/データ.txt");
    assert_eq!(fs::read_to_string(file).unwrap(), "unicode");
    assert_eq!(report.files_extracted, 2);
    assert_eq!(report.files_overwritten, 1);
}

#[test]
fn test_undecodable_entry_skipped_by_default() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("mixed.zip");
    LegacyZipBuilder::new()
        .file(b"bad\xFD.txt", b"lost")
        .file(DATA_TXT, b"kept")
        .write_to(&archive);

    let report = extract_archive(&archive, &config()).unwrap();

    assert_eq!(report.files_extracted, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].kind, SkipReason::UndecodableName);
    assert_eq!(list_dir(&temp.path().join("mixed")), ["データ.txt"]);
}

#[test]
fn test_undecodable_entry_aborts_archive() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("mixed.zip");
    LegacyZipBuilder::new()
        .file(b"bad\xFD.txt", b"lost")
        .write_to(&archive);
    let config = config().with_decode_error_policy(DecodeErrorPolicy::Abort);

    let err = extract_archive(&archive, &config).unwrap_err();

    assert!(matches!(err, ExtractionError::FilenameDecode(ref e) if e.raw == b"bad\xFD.txt"));
}

#[test]
fn test_traversal_entry_skipped() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("evil.zip");
    LegacyZipBuilder::new()
        .file(b"../outside.txt", b"escape")
        .file(b"inside.txt", b"ok")
        .write_to(&archive);

    let report = extract_archive(&archive, &config()).unwrap();

    assert_eq!(report.skipped[0].kind, SkipReason::UnsafePath);
    assert!(!temp.path().join("outside.txt").exists());
    assert!(temp.path().join("evil/inside.txt").is_file());
}

#[test]
fn test_existing_destination_is_reused() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("again.zip");
    LegacyZipBuilder::new().file(DATA_TXT, b"v2").write_to(&archive);
    let dest = temp.path().join("again");
    fs::create_dir(&dest).unwrap();
    fs::write(dest.join("データ.txt"), b"v1").unwrap();

    let report = extract_archive(&archive, &config()).unwrap();

    assert_eq!(report.directories_created, 0);
    assert_eq!(fs::read_to_string(dest.join("データ.txt")).unwrap(), "v2");
}

#[test]
fn test_tar_is_extracted_in_bulk() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("bundle.tar");
    fs::write(
        &archive,
        create_test_tar(&[("docs/readme.txt", b"read me"), ("a.txt", b"a")]),
    )
    .unwrap();

    let report = extract_archive(&archive, &config()).unwrap();

    assert_eq!(report.strategy, Strategy::Bulk);
    let dest = temp.path().join("bundle");
    assert_eq!(
        fs::read_to_string(dest.join("docs/readme.txt")).unwrap(),
        "read me"
    );
}

#[test]
fn test_compressed_tar_codecs() {
    let temp = TempDir::new().unwrap();
    let tar = create_test_tar(&[("file.txt", b"content")]);

    for codec in CompressionCodec::ALL {
        let archive = temp
            .path()
            .join(format!("bundle{}", codec.tar_extension()));
        fs::write(&archive, compress(codec, &tar)).unwrap();

        extract_archive(&archive, &config()).unwrap();

        let file = temp.path().join("bundle/file.txt");
        assert_eq!(fs::read_to_string(&file).unwrap(), "content", "{}", codec.name());
        fs::remove_dir_all(temp.path().join("bundle")).unwrap();
    }
}

#[test]
fn test_corrupt_bulk_archive_leaves_no_destination() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("broken.tgz");
    fs::write(&archive, b"definitely not gzip").unwrap();

    let err = extract_archive(&archive, &config()).unwrap_err();

    assert!(matches!(err, ExtractionError::ArchiveOpen { .. }));
    assert!(!temp.path().join("broken").exists());
}

#[test]
fn test_corrupt_7z_leaves_no_destination() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("broken.7z");
    fs::write(&archive, b"7z\xBC\xAF\x27\x1C\x00\x04 truncated").unwrap();

    let err = extract_archive(&archive, &config()).unwrap_err();

    assert!(matches!(err, ExtractionError::ArchiveOpen { .. }));
    assert!(!temp.path().join("broken").exists());
}

#[test]
fn test_extractor_reused_across_archives() {
    let temp = TempDir::new().unwrap();
    let extractor = Extractor::default();
    for name in ["one.zip", "two.zip"] {
        let archive = temp.path().join(name);
        LegacyZipBuilder::new().file(DATA_TXT, name.as_bytes()).write_to(&archive);
        extractor.extract(&archive).unwrap();
    }

    assert!(temp.path().join("one/データ.txt").is_file());
    assert!(temp.path().join("two/データ.txt").is_file());
}
