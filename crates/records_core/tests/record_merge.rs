use records_core::{RecordMap, RecordMerger, RecordStore, StoreError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_lines(dir: &Path, file_name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, format!("{}\n", lines.join("\n"))).unwrap();
    path
}

struct Subjects {
    _dir: TempDir,
    math: RecordStore,
    science: RecordStore,
    history: RecordStore,
}

fn subjects() -> Subjects {
    let dir = TempDir::new().unwrap();
    let math = write_lines(dir.path(), "math.txt", &["Alice, 90", "Bob, 85"]);
    let science = write_lines(dir.path(), "science.txt", &["Alice, 88", "Charlie, 77"]);
    let history = write_lines(
        dir.path(),
        "history.txt",
        &["Bob, 70", "Charlie, 80", "David, 95"],
    );
    Subjects {
        math: RecordStore::new(math),
        science: RecordStore::new(science),
        history: RecordStore::new(history),
        _dir: dir,
    }
}

fn map(pairs: &[(&str, i64)]) -> RecordMap {
    pairs
        .iter()
        .map(|(name, score)| (name.to_string(), *score))
        .collect()
}

#[test]
fn merge_keeps_highest_score_per_name() {
    let s = subjects();
    let combined = s.math.merge(&s.science).unwrap();

    assert_eq!(
        combined.records().unwrap(),
        &map(&[("Alice", 90), ("Bob", 85), ("Charlie", 77)])
    );
    assert!(RecordStore::file_exists(combined.path()));
}

#[test]
fn merge_names_output_from_subjects_beside_inputs() {
    let s = subjects();
    let combined = s.math.merge(&s.science).unwrap();

    assert_eq!(
        combined.path(),
        s.math.path().parent().unwrap().join("combined_math_science.txt")
    );
}

#[test]
fn merge_writes_sorted_name_score_lines() {
    let s = subjects();
    let combined = s.science.merge(&s.math).unwrap();

    let content = fs::read_to_string(combined.path()).unwrap();
    assert_eq!(content, "Alice, 90\nBob, 85\nCharlie, 77\n");
}

#[test]
fn merge_leaves_inputs_untouched() {
    let s = subjects();
    let before = fs::read(s.math.path()).unwrap();
    s.math.merge(&s.science).unwrap();

    assert_eq!(fs::read(s.math.path()).unwrap(), before);
    assert_eq!(s.math.records().unwrap(), &map(&[("Alice", 90), ("Bob", 85)]));
}

#[test]
fn merge_with_itself_is_identity() {
    let s = subjects();
    let combined = s.history.merge(&s.history).unwrap();

    assert_eq!(combined.records().unwrap(), s.history.records().unwrap());
}

#[test]
fn merge_covers_every_name_with_its_maximum() {
    let s = subjects();
    let combined = s.history.merge(&s.science).unwrap();
    let a = s.history.records().unwrap();
    let b = s.science.records().unwrap();
    let merged = combined.records().unwrap();

    for name in a.keys().chain(b.keys()) {
        let expected = a.get(name).copied().unwrap_or(0).max(b.get(name).copied().unwrap_or(0));
        assert_eq!(merged[name], expected, "score mismatch for {name}");
    }
    assert_eq!(merged.len(), 4);
}

#[test]
fn merge_all_folds_every_store() {
    let s = subjects();
    let combined = s.math.merge_all(&[&s.science, &s.history]).unwrap();

    assert_eq!(
        combined.path().file_name().unwrap(),
        "multi_combined_math.txt"
    );
    assert_eq!(
        combined.records().unwrap(),
        &map(&[("Alice", 90), ("Bob", 85), ("Charlie", 80), ("David", 95)])
    );
}

#[test]
fn merge_all_is_order_independent() {
    let s = subjects();
    let out = TempDir::new().unwrap();
    let merger = RecordMerger::new(out.path());

    let abc = merger.merge_all(&s.math, &[&s.science, &s.history]).unwrap();
    let abc_records = abc.records().unwrap().clone();
    let cba = merger.merge_all(&s.history, &[&s.science, &s.math]).unwrap();
    let bac = merger.merge_all(&s.science, &[&s.math, &s.history]).unwrap();

    assert_eq!(cba.records().unwrap(), &abc_records);
    assert_eq!(bac.records().unwrap(), &abc_records);
}

#[test]
fn merge_all_with_no_others_copies_base() {
    let s = subjects();
    let combined = s.math.merge_all(&[]).unwrap();

    assert_eq!(combined.records().unwrap(), s.math.records().unwrap());
}

#[test]
fn merger_writes_into_configured_directory() {
    let s = subjects();
    let out = TempDir::new().unwrap();
    let combined = RecordMerger::new(out.path())
        .merge(&s.math, &s.history)
        .unwrap();

    assert_eq!(combined.path(), out.path().join("combined_math_history.txt"));
}

#[test]
fn merge_propagates_parse_errors_without_writing() {
    let s = subjects();
    let out = TempDir::new().unwrap();
    let broken = RecordStore::new(write_lines(out.path(), "broken.txt", &["no comma here"]));

    let err = RecordMerger::new(out.path())
        .merge(&s.math, &broken)
        .unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }));
    assert!(!out.path().join("combined_math_broken.txt").exists());
}

#[test]
fn merge_into_missing_directory_fails_with_io_error() {
    let s = subjects();
    let err = RecordMerger::new("/nonexistent/records/out")
        .merge(&s.math, &s.science)
        .unwrap_err();

    assert!(matches!(err, StoreError::Io { .. }));
}
