//! Unit tests for `FileSessionStore`.

use smart_bookmark::services::session_store::{FileSessionStore, SessionStoreTrait};
use smart_bookmark::types::auth::AuthSession;
use smart_bookmark::types::errors::SessionStoreError;
use tempfile::TempDir;

fn session() -> AuthSession {
    AuthSession {
        access_token: "access-abc".to_string(),
        refresh_token: Some("refresh-xyz".to_string()),
        expires_at: 1_900_000_000,
        token_type: "bearer".to_string(),
    }
}

#[test]
fn test_load_without_file_is_none() {
    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

    store.save(&session()).unwrap();
    let loaded = store.load().unwrap().expect("session should be stored");

    assert_eq!(loaded.access_token, "access-abc");
    assert_eq!(loaded.refresh_token.as_deref(), Some("refresh-xyz"));
    assert_eq!(loaded.expires_at, 1_900_000_000);
}

#[cfg(unix)]
#[test]
fn test_saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));
    store.save(&session()).unwrap();

    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_clear_removes_file_and_tolerates_missing() {
    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));

    store.clear().unwrap();
    store.save(&session()).unwrap();
    store.clear().unwrap();
    assert!(!store.path().exists());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_corrupt_file_is_a_serialization_error() {
    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));
    std::fs::write(store.path(), "garbage").unwrap();

    assert!(matches!(
        store.load(),
        Err(SessionStoreError::SerializationError(_))
    ));
}

#[test]
fn test_debug_output_redacts_tokens() {
    let rendered = format!("{:?}", session());
    assert!(!rendered.contains("access-abc"));
    assert!(!rendered.contains("refresh-xyz"));
    assert!(rendered.contains("<redacted>"));
}
