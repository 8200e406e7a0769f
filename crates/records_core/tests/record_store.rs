use records_core::{RecordStore, StoreError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_lines(dir: &Path, file_name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(file_name);
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn file_exists_reports_regular_files_only() {
    let dir = TempDir::new().unwrap();
    let math = write_lines(dir.path(), "math.txt", &["Alice, 90"]);

    assert!(RecordStore::file_exists(&math));
    assert!(!RecordStore::file_exists(dir.path()));
    assert!(!RecordStore::file_exists(dir.path().join("missing.txt")));
}

#[test]
fn records_load_name_score_pairs() {
    let dir = TempDir::new().unwrap();
    let math = write_lines(dir.path(), "math.txt", &["Alice, 90", "Bob, 85"]);
    let store = RecordStore::new(math);

    assert!(store.contains("Alice").unwrap());
    assert_eq!(store.get("Bob").unwrap(), Some(85));
    assert_eq!(store.get("Zed").unwrap(), None);
    assert_eq!(store.len().unwrap(), 2);
    assert_eq!(store.subject(), "math");
}

#[test]
fn records_ignore_blank_lines_and_keep_last_duplicate() {
    let dir = TempDir::new().unwrap();
    let path = write_lines(
        dir.path(),
        "history.txt",
        &["", "Bob, 70", "   ", "Bob , 75", "Charlie,80"],
    );
    let store = RecordStore::new(path);

    let records = store.records().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records["Bob"], 75);
    assert_eq!(records["Charlie"], 80);
}

#[test]
fn records_are_cached_until_path_changes() {
    let dir = TempDir::new().unwrap();
    let math = write_lines(dir.path(), "math.txt", &["Alice, 90"]);
    let english = write_lines(dir.path(), "english.txt", &["Eve, 99"]);
    let mut store = RecordStore::new(&math);

    assert!(!store.is_loaded());
    assert_eq!(store.get("Alice").unwrap(), Some(90));
    assert!(store.is_loaded());

    write_lines(dir.path(), "math.txt", &["Alice, 10"]);
    assert_eq!(store.get("Alice").unwrap(), Some(90));

    store.set_path(&english).unwrap();
    assert!(!store.is_loaded());
    assert_eq!(store.path(), english.as_path());
    assert!(store.contains("Eve").unwrap());
    assert!(!store.contains("Alice").unwrap());
}

#[test]
fn set_path_rejects_missing_file_and_keeps_binding() {
    let dir = TempDir::new().unwrap();
    let math = write_lines(dir.path(), "math.txt", &["Alice, 90"]);
    let mut store = RecordStore::new(&math);
    store.records().unwrap();

    let missing = dir.path().join("missing.txt");
    let err = store.set_path(&missing).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref path) if path == &missing));
    assert_eq!(store.path(), math.as_path());
    assert!(store.is_loaded());
}

#[test]
fn from_subject_binds_subject_file_and_can_be_rebound() {
    let dir = TempDir::new().unwrap();
    let english = write_lines(dir.path(), "english.txt", &["Eve, 99"]);

    let store = RecordStore::from_subject(dir.path(), "english");
    assert_eq!(store.path(), english.as_path());
    assert!(store.contains("Eve").unwrap());

    let mut elsewhere = RecordStore::from_subject("/nonexistent", "english");
    elsewhere.set_path(&english).unwrap();
    assert!(elsewhere.contains("Eve").unwrap());
}

#[test]
fn malformed_lines_fail_with_line_number() {
    let dir = TempDir::new().unwrap();
    let no_comma = write_lines(dir.path(), "a.txt", &["Alice, 90", "Bob 85"]);
    let bad_score = write_lines(dir.path(), "b.txt", &["Alice, ninety"]);

    let err = RecordStore::new(&no_comma).records().unwrap_err();
    assert!(matches!(err, StoreError::Parse { line: 2, .. }), "unexpected error: {err}");

    let err = RecordStore::new(&bad_score).records().unwrap_err();
    assert!(matches!(err, StoreError::Parse { line: 1, .. }));
    assert!(err.to_string().contains("not an integer"));
}

#[test]
fn failed_load_is_not_cached() {
    let dir = TempDir::new().unwrap();
    let path = write_lines(dir.path(), "math.txt", &["broken"]);
    let store = RecordStore::new(&path);

    assert!(store.records().is_err());
    assert!(!store.is_loaded());

    write_lines(dir.path(), "math.txt", &["Alice, 90"]);
    assert_eq!(store.get("Alice").unwrap(), Some(90));
}

#[test]
fn missing_file_fails_with_io_error() {
    let dir = TempDir::new().unwrap();
    let store = RecordStore::new(dir.path().join("missing.txt"));

    let err = store.records().unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn to_records_serializes_in_name_order() {
    let dir = TempDir::new().unwrap();
    let path = write_lines(dir.path(), "math.txt", &["Bob, 85", "Alice, 90"]);
    let records = RecordStore::new(path).to_records().unwrap();

    let json = serde_json::to_value(&records).unwrap();
    assert_eq!(json[0]["name"], "Alice");
    assert_eq!(json[0]["score"], 90);
    assert_eq!(json[1]["name"], "Bob");
}
