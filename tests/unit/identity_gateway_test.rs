//! Unit tests for the identity gateway's pure parts: OAuth callback parsing,
//! user decoding, sign-in URL building and session restore.

use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use smart_bookmark::services::identity_gateway::{
    parse_callback, parse_user, IdentityGatewayTrait, SupabaseIdentity, TokenSource,
};
use smart_bookmark::services::session_store::{FileSessionStore, SessionStoreTrait};
use smart_bookmark::types::auth::{AuthSession, OAuthProvider};
use smart_bookmark::types::errors::AuthError;
use smart_bookmark::types::settings::ClientSettings;

const NOW: i64 = 1_700_000_000;

fn configured() -> ClientSettings {
    let mut settings = ClientSettings::default();
    settings.backend.url = "https://proj.supabase.co".to_string();
    settings.backend.anon_key = "anon-key".to_string();
    settings
}

// ─── parse_callback ───

#[test]
fn test_callback_tokens_from_fragment() {
    let session = parse_callback(
        "http://localhost:5173/dashboard#access_token=abc&refresh_token=def&expires_in=600&token_type=bearer",
        NOW,
    )
    .unwrap();
    assert_eq!(session.access_token, "abc");
    assert_eq!(session.refresh_token.as_deref(), Some("def"));
    assert_eq!(session.expires_at, NOW + 600);
    assert_eq!(session.token_type, "bearer");
}

#[test]
fn test_callback_prefers_explicit_expires_at() {
    let session = parse_callback(
        "http://localhost:5173/dashboard#access_token=abc&expires_at=1700009999&expires_in=5",
        NOW,
    )
    .unwrap();
    assert_eq!(session.expires_at, 1_700_009_999);
}

#[test]
fn test_callback_defaults() {
    let session = parse_callback("http://localhost:5173/dashboard?access_token=abc", NOW).unwrap();
    assert_eq!(session.expires_at, NOW + 3600);
    assert_eq!(session.token_type, "bearer");
    assert_eq!(session.refresh_token, None);
}

#[rstest]
#[case(
    "http://localhost:5173/dashboard?error=access_denied&error_description=User+cancelled",
    "User cancelled"
)]
#[case("http://localhost:5173/dashboard#error=server_error", "server_error")]
#[case("http://localhost:5173/dashboard", "missing access_token")]
fn test_callback_errors(#[case] url: &str, #[case] message: &str) {
    match parse_callback(url, NOW) {
        Err(AuthError::InvalidCallback(m)) => assert_eq!(m, message),
        other => panic!("expected InvalidCallback, got {:?}", other.map(|s| s.expires_at)),
    }
}

#[test]
fn test_callback_malformed_url() {
    assert!(matches!(
        parse_callback("not a url", NOW),
        Err(AuthError::InvalidCallback(_))
    ));
}

// ─── parse_user ───

#[test]
fn test_parse_user_with_full_metadata() {
    let user = parse_user(
        r#"{"id":"u1","email":"a@b.co","user_metadata":{"full_name":"Ada L","avatar_url":"https://img/a.png"}}"#,
    )
    .unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.full_name.as_deref(), Some("Ada L"));
    assert_eq!(user.avatar_url.as_deref(), Some("https://img/a.png"));
}

#[test]
fn test_parse_user_falls_back_to_name_and_picture() {
    let user = parse_user(
        r#"{"id":"u2","email":"g@h.io","user_metadata":{"name":"Grace","picture":"https://img/g.png"}}"#,
    )
    .unwrap();
    assert_eq!(user.full_name.as_deref(), Some("Grace"));
    assert_eq!(user.avatar_url.as_deref(), Some("https://img/g.png"));
}

#[test]
fn test_parse_user_without_metadata_uses_email_for_display() {
    let user = parse_user(r#"{"id":"u3","email":"zed@example.com"}"#).unwrap();
    assert_eq!(user.full_name, None);
    assert_eq!(user.display_name(), "zed@example.com");
    assert_eq!(user.initial(), "Z");
}

#[test]
fn test_parse_user_rejects_garbage() {
    assert!(matches!(parse_user("[]"), Err(AuthError::Decode(_))));
}

// ─── SupabaseIdentity ───

#[test]
fn test_requires_configured_backend() {
    let result = SupabaseIdentity::new(&ClientSettings::default(), None);
    assert!(matches!(result, Err(AuthError::NotConfigured(_))));
}

#[test]
fn test_sign_in_url() {
    let identity = SupabaseIdentity::new(&configured(), None).unwrap();
    let url = identity.sign_in_url(OAuthProvider::Google).unwrap();
    assert_eq!(
        url,
        "https://proj.supabase.co/auth/v1/authorize?provider=google&redirect_to=http%3A%2F%2Flocalhost%3A5173%2Fdashboard"
    );
    assert!(!identity.is_signed_in());
}

#[test]
fn test_restores_unexpired_session_and_skips_expired() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let store = Arc::new(FileSessionStore::new(&path));

    store
        .save(&AuthSession {
            access_token: "still-good".to_string(),
            refresh_token: None,
            expires_at: i64::MAX,
            token_type: "bearer".to_string(),
        })
        .unwrap();
    let identity = SupabaseIdentity::new(&configured(), Some(store.clone())).unwrap();
    assert_eq!(identity.access_token().as_deref(), Some("still-good"));

    store
        .save(&AuthSession {
            access_token: "stale".to_string(),
            refresh_token: None,
            expires_at: 1,
            token_type: "bearer".to_string(),
        })
        .unwrap();
    let identity = SupabaseIdentity::new(&configured(), Some(store)).unwrap();
    assert_eq!(identity.access_token(), None);
}

#[tokio::test]
async fn test_current_user_without_session_is_none_and_offline() {
    let identity = SupabaseIdentity::new(&configured(), None).unwrap();
    assert_eq!(identity.current_user().await.unwrap(), None);
}

#[tokio::test]
async fn test_sign_out_without_session_clears_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{}").unwrap();
    let store = Arc::new(FileSessionStore::new(&path));

    let identity = SupabaseIdentity::new(&configured(), Some(store)).unwrap();
    identity.sign_out().await.unwrap();
    assert!(!path.exists());
}
