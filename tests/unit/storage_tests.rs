// Object store tests

use kagami::config::{StorageBackendKind, StorageConfig};
use kagami::storage::{build_store, KeyPattern, LocalStore, ObjectStore, StorageError};
use tempfile::TempDir;

#[test]
fn test_key_pattern_substitution() {
    assert_eq!(KeyPattern::default().key_for("cat.jpg"), "cat.jpg");
    assert_eq!(
        KeyPattern::new("images/:filename/original").key_for("cat.jpg"),
        "images/cat.jpg/original"
    );
}

#[test]
fn test_local_store_fetch() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    std::fs::write(dir.path().join("nested/a.bin"), b"hello").unwrap();

    let store = LocalStore::new(dir.path());
    let data = tokio_test::block_on(store.fetch("nested/a.bin")).unwrap();
    assert_eq!(&data[..], b"hello");

    let err = tokio_test::block_on(store.fetch("nested/missing.bin")).unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));

    let err = tokio_test::block_on(store.fetch("nested")).unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[test]
fn test_local_store_rejects_traversal() {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::new(dir.path());
    let err = tokio_test::block_on(store.fetch("../secret")).unwrap_err();
    assert!(matches!(err, StorageError::InvalidKey(_)));
}

#[tokio::test]
async fn test_build_local_store() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("photo"), b"bytes").unwrap();

    let config = StorageConfig {
        backend: StorageBackendKind::Local,
        root: Some(dir.path().to_path_buf()),
        ..StorageConfig::default()
    };
    let store = build_store(&config).await.unwrap();
    assert_eq!(store.name(), "local");
    assert_eq!(&store.fetch("photo").await.unwrap()[..], b"bytes");
}

#[tokio::test]
async fn test_build_local_store_without_root() {
    let config = StorageConfig {
        backend: StorageBackendKind::Local,
        ..StorageConfig::default()
    };
    assert!(build_store(&config).await.is_err());
}
