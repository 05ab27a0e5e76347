use std::fs::File;
use std::sync::Arc;

use upload_registry::{logging, FileHandle, LocalFile, UploadRegistry};

#[test]
fn test_local_file_name() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("holiday photo.jpg");
    File::create(&path).unwrap();

    let handle = LocalFile::new(&path);
    assert_eq!(handle.file_name().as_deref(), Some("holiday photo.jpg"));
    assert_eq!(handle.path(), path.as_path());

    // the handle is just a path: no name if there's no final component
    assert_eq!(LocalFile::new("/").file_name(), None);
    assert_eq!(LocalFile::new("uploads/..").file_name(), None);
}

#[test]
fn test_local_file_removed_after_queueing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("gone.txt");
    File::create(&path).unwrap();

    let registry = UploadRegistry::default();
    registry.add_uploads(vec![Arc::new(LocalFile::new(&path))]).unwrap();
    std::fs::remove_file(&path).unwrap();

    // the registry never touches content, so the entry stays as queued
    let snapshot = registry.snapshot();
    let record = snapshot.values().next().unwrap();
    assert_eq!(record.name, "gone.txt");
    assert!(!record.handle.path().exists());
}

#[test]
fn test_upload_id_format() {
    let registry = UploadRegistry::default();
    registry.add_uploads(vec![Arc::new(LocalFile::new("a.txt"))]).unwrap();

    let snapshot = registry.snapshot();
    let id = snapshot.keys().next().unwrap().to_string();

    // canonical hyphenated uuid, version 4
    assert_eq!(id.len(), 36);
    assert_eq!(id.matches('-').count(), 4);
    assert_eq!(id.chars().nth(14), Some('4'));
}

#[test]
fn test_snapshot_serializes_without_handles() {
    let registry = UploadRegistry::default();
    registry
        .add_uploads(vec![Arc::new(LocalFile::new("docs/readme.md"))])
        .unwrap();

    let snapshot = registry.snapshot();
    let id = snapshot.keys().next().unwrap().to_string();
    let json = serde_json::to_value(&snapshot).unwrap();

    let record = &json[id.as_str()];
    assert_eq!(record["name"], "readme.md");
    assert!(record["queued_at"].is_string());
    assert!(record.get("handle").is_none());
}

#[test]
fn test_init_tracing_only_once() {
    assert!(logging::init_tracing());
    assert!(!logging::init_tracing());
}
