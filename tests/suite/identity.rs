//! Identifier persistence across runs.

use std::sync::Arc;

use moodping_engine::moodping_core::{FileStore, Identity, MemoryStore, USER_ID_KEY};

fn identity_at(path: &std::path::Path) -> Identity {
    Identity::new(Arc::new(FileStore::new(path)), Arc::new(MemoryStore::new()))
}

#[test]
fn user_id_survives_restart_but_session_does_not() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let first = identity_at(&path);
    let user = first.user_id().unwrap();
    let session = first.session_id().unwrap();
    assert_eq!(first.session_id().unwrap(), session);

    let second = identity_at(&path);
    assert_eq!(second.user_id().unwrap(), user);
    assert_ne!(second.session_id().unwrap(), session);
}

#[test]
fn deleting_storage_issues_a_new_user_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let before = identity_at(&path).user_id().unwrap();
    std::fs::remove_file(&path).unwrap();
    let after = identity_at(&path).user_id().unwrap();

    assert_ne!(before, after);
}

#[test]
fn malformed_stored_id_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, format!(r#"{{"{USER_ID_KEY}": ""}}"#)).unwrap();

    let identity = identity_at(&path);
    let id = identity.user_id().unwrap();
    assert!(!id.as_str().is_empty());
    assert_eq!(identity.user_id().unwrap(), id);
}
