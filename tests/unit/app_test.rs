//! Unit tests for `SessionController`: session start, sign-in/out, form
//! submission and the notifications raised on failures.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use smart_bookmark::app::SessionController;
use smart_bookmark::services::memory_backend::{InMemoryStore, StaticIdentity};
use smart_bookmark::types::bookmark::{Bookmark, User};
use smart_bookmark::types::errors::{BookmarkError, ValidationError};
use smart_bookmark::types::settings::ClientSettings;
use smart_bookmark::types::view::{ListView, Notification, NotificationLevel};

fn alex() -> User {
    User {
        id: "user-1".to_string(),
        email: "alex@example.com".to_string(),
        full_name: Some("Alex Johnson".to_string()),
        avatar_url: None,
    }
}

fn row(id: &str, minute: u32) -> Bookmark {
    Bookmark {
        id: id.to_string(),
        user_id: "user-1".to_string(),
        title: format!("Title {}", id),
        url: format!("https://{}.example.com/page", id),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, minute, 0).unwrap(),
    }
}

struct Harness {
    identity: Arc<StaticIdentity>,
    store: Arc<InMemoryStore>,
    controller: SessionController,
}

fn harness(identity: StaticIdentity, rows: Vec<Bookmark>) -> Harness {
    let identity = Arc::new(identity);
    let store = Arc::new(InMemoryStore::with_rows(rows));
    let controller =
        SessionController::new(identity.clone(), store.clone(), &ClientSettings::default());
    Harness {
        identity,
        store,
        controller,
    }
}

// ─── Start ───

#[tokio::test]
async fn test_dashboard_is_loading_before_start() {
    let h = harness(StaticIdentity::signed_in(alex()), vec![]);
    let view = h.controller.dashboard();
    assert_eq!(view.list, ListView::Loading { placeholders: 3 });
    assert_eq!(view.profile, None);
}

#[tokio::test]
async fn test_start_signed_in_loads_profile_and_list() {
    let mut h = harness(
        StaticIdentity::signed_in(alex()),
        vec![row("a", 1), row("b", 2)],
    );

    let view = h.controller.start().await;

    let profile = view.profile.expect("profile should be resolved");
    assert_eq!(profile.display_name, "Alex Johnson");
    assert_eq!(profile.initial, "A");
    assert_eq!(view.count_label, "2 links saved");
    match view.list {
        ListView::Populated { cards } => {
            assert_eq!(cards.len(), 2);
            assert_eq!(cards[0].id, "b");
            assert_eq!(cards[0].hostname, "b.example.com");
            assert_eq!(
                cards[0].favicon_url.as_deref(),
                Some("https://www.google.com/s2/favicons?domain=b.example.com&sz=32")
            );
            assert!(!cards[0].is_new);
        }
        other => panic!("expected populated list, got {:?}", other),
    }
}

#[tokio::test]
async fn test_start_with_no_rows_shows_empty_state() {
    let mut h = harness(StaticIdentity::signed_in(alex()), vec![]);
    let view = h.controller.start().await;
    assert_eq!(view.list, ListView::Empty);
    assert_eq!(view.count_label, "0 links saved");
}

#[tokio::test]
async fn test_start_signed_out_has_no_profile() {
    let mut h = harness(StaticIdentity::signed_out(alex()), vec![row("a", 1)]);
    let view = h.controller.start().await;
    assert_eq!(view.profile, None);
    assert!(h.controller.user().is_none());
    assert_eq!(h.store.calls().list, 0);
}

#[tokio::test]
async fn test_start_with_unreachable_identity_notifies() {
    let mut h = harness(StaticIdentity::signed_in(alex()), vec![]);
    h.identity.set_unreachable(true);

    h.controller.start().await;
    assert_eq!(
        h.controller.drain_notifications(),
        vec![Notification::error("Failed to load your profile")]
    );
}

#[tokio::test]
async fn test_start_with_failing_store_notifies_and_shows_empty() {
    let mut h = harness(StaticIdentity::signed_in(alex()), vec![row("a", 1)]);
    h.store.set_fail_list(true);

    let view = h.controller.start().await;
    assert_eq!(view.list, ListView::Empty);
    assert_eq!(
        h.controller.drain_notifications(),
        vec![Notification::error("Failed to load bookmarks")]
    );
    assert!(h.controller.drain_notifications().is_empty(), "drain empties the queue");
}

// ─── Sign-in / sign-out ───

#[tokio::test]
async fn test_complete_sign_in_then_loads() {
    let mut h = harness(StaticIdentity::signed_out(alex()), vec![row("a", 1)]);
    h.controller.start().await;

    let view = h
        .controller
        .complete_sign_in("http://localhost:5173/dashboard#access_token=t")
        .await
        .unwrap();
    assert!(view.profile.is_some());
    assert_eq!(view.count_label, "1 link saved");
}

#[tokio::test]
async fn test_complete_sign_in_uses_returned_user_without_second_lookup() {
    let mut h = harness(StaticIdentity::signed_out(alex()), vec![row("a", 1)]);
    h.controller.start().await;
    assert_eq!(h.identity.user_lookups(), 1);

    let view = h
        .controller
        .complete_sign_in("http://localhost:5173/dashboard#access_token=t")
        .await
        .unwrap();

    assert_eq!(h.identity.user_lookups(), 1);
    assert_eq!(h.controller.user(), Some(&alex()));
    assert_eq!(view.profile.map(|p| p.initial).as_deref(), Some("A"));
    assert_eq!(h.store.calls().list, 1);
}

#[tokio::test]
async fn test_failed_sign_in_notifies() {
    let mut h = harness(StaticIdentity::signed_out(alex()), vec![]);

    let result = h
        .controller
        .complete_sign_in("http://localhost:5173/dashboard?error=access_denied")
        .await;
    assert!(result.is_err());
    assert_eq!(
        h.controller.drain_notifications(),
        vec![Notification::error("Sign-in failed")]
    );
}

#[tokio::test]
async fn test_sign_in_url_uses_configured_provider_by_default() {
    let h = harness(StaticIdentity::signed_out(alex()), vec![]);
    assert_eq!(
        h.controller.sign_in_url(None).unwrap(),
        "memory://authorize?provider=google"
    );
}

#[tokio::test]
async fn test_sign_out_clears_session_state() {
    let mut h = harness(StaticIdentity::signed_in(alex()), vec![row("a", 1)]);
    h.controller.start().await;
    h.controller.set_form_title("Half typed");

    h.controller.sign_out().await;

    assert!(h.controller.user().is_none());
    assert!(h.controller.bookmarks().is_empty());
    assert_eq!(h.controller.form_view().title, "");
    let notes = h.controller.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Info);
    assert_eq!(notes[0].message, "Signed out");
}

// ─── Form submission ───

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_submit_form_adds_highlighted_bookmark() {
    let mut h = harness(StaticIdentity::signed_in(alex()), vec![]);
    h.controller.start().await;

    h.controller.set_form_title("Linear");
    let form = h.controller.set_form_url("linear.app");
    assert!(form.can_submit);

    let added = h.controller.submit_form().await.unwrap();
    assert_eq!(added.url, "https://linear.app");
    assert_eq!(h.controller.form_view().title, "", "form clears on success");

    let view = h.controller.dashboard();
    assert_eq!(view.highlighted_id.as_deref(), Some(added.id.as_str()));
    match &view.list {
        ListView::Populated { cards } => assert!(cards[0].is_new),
        other => panic!("expected populated list, got {:?}", other),
    }

    tokio::time::sleep(Duration::from_millis(1501)).await;
    assert_eq!(h.controller.highlighted_id(), None);
}

#[tokio::test]
async fn test_invalid_form_makes_no_store_call_and_no_notification() {
    let mut h = harness(StaticIdentity::signed_in(alex()), vec![]);
    h.controller.start().await;

    h.controller.set_form_title("Broken");
    h.controller.set_form_url("not a url");
    let err = h.controller.submit_form().await.unwrap_err();

    assert!(matches!(err, BookmarkError::Validation(ValidationError::InvalidUrl)));
    assert_eq!(h.store.calls().insert, 0);
    assert!(h.controller.drain_notifications().is_empty());
}

#[tokio::test]
async fn test_failed_submit_notifies_and_keeps_input() {
    let mut h = harness(StaticIdentity::signed_in(alex()), vec![]);
    h.controller.start().await;
    h.store.set_fail_insert(true);

    h.controller.set_form_title("Keep me");
    h.controller.set_form_url("keep.me");
    let err = h.controller.submit_form().await.unwrap_err();

    assert!(matches!(err, BookmarkError::AddFailed(_)));
    let form = h.controller.form_view();
    assert_eq!(form.title, "Keep me");
    assert!(!form.submitting);
    assert_eq!(
        h.controller.drain_notifications(),
        vec![Notification::error("Failed to add bookmark")]
    );
}

// ─── Direct add / delete ───

#[tokio::test]
async fn test_add_requires_signed_in_user() {
    let mut h = harness(StaticIdentity::signed_out(alex()), vec![]);
    h.controller.start().await;

    let err = h
        .controller
        .add_bookmark("Title", "https://x.io")
        .await
        .unwrap_err();
    assert!(matches!(err, BookmarkError::NotSignedIn));
    assert_eq!(h.store.calls().insert, 0);
}

#[tokio::test]
async fn test_delete_failure_notifies() {
    let mut h = harness(StaticIdentity::signed_in(alex()), vec![row("a", 1)]);
    h.controller.start().await;
    h.store.set_fail_delete(true);

    assert!(h.controller.delete_bookmark("a").await.is_err());
    assert_eq!(h.controller.bookmarks().len(), 1);
    assert_eq!(
        h.controller.drain_notifications(),
        vec![Notification::error("Failed to delete bookmark")]
    );
}

#[tokio::test]
async fn test_delete_last_bookmark_shows_empty_state() {
    let mut h = harness(StaticIdentity::signed_in(alex()), vec![row("a", 1)]);
    h.controller.start().await;

    h.controller.delete_bookmark("a").await.unwrap();
    let view = h.controller.dashboard();
    assert_eq!(view.list, ListView::Empty);
    assert_eq!(view.count_label, "0 links saved");
}

// ─── Demo ───

#[tokio::test]
async fn test_demo_session_is_seeded() {
    let mut controller = SessionController::demo(&ClientSettings::default());
    let view = controller.start().await;

    assert_eq!(
        view.profile.map(|p| p.display_name).as_deref(),
        Some("Alex Johnson")
    );
    assert_eq!(view.count_label, "3 links saved");
    assert_eq!(controller.bookmarks()[0].id, "demo-1");
}
