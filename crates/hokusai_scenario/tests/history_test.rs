//! Read history persistence tests.

use hokusai_error::HokusaiErrorKind;
use hokusai_interface::{ReadHistorySink, SavePoint};
use hokusai_scenario::ReadHistory;
use tempfile::TempDir;

#[test]
fn test_missing_file_is_empty_history() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let history = ReadHistory::load(dir.path().join("history.json")).expect("load");

    assert_eq!(history, ReadHistory::new());
    assert!(history.last_save().is_none());
}

#[test]
fn test_history_survives_save_and_load() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("history.json");

    let mut history = ReadHistory::new();
    history.record_page_read("intro", 3);
    history.record_page_read("intro", 1);
    history.record_scene_viewed("finale");
    history.autosave(&SavePoint::new("intro", 3));
    history.save(&path).expect("save");

    let loaded = ReadHistory::load(&path).expect("load");
    assert_eq!(loaded, history);
    assert_eq!(loaded.furthest_page("intro"), Some(3));
    assert!(loaded.is_page_read("intro", 2));
    assert!(loaded.is_scene_viewed("finale"));
    assert_eq!(loaded.last_save(), Some(&SavePoint::new("intro", 3)));
}

#[test]
fn test_corrupt_file_is_a_persistence_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("history.json");
    std::fs::write(&path, "{ not json").expect("write");

    let err = ReadHistory::load(&path).unwrap_err();
    assert!(matches!(err.kind(), HokusaiErrorKind::Persistence(_)));
}
