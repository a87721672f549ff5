//! Session controller for Smart Bookmark.
//!
//! The single owner of per-session state: the signed-in user, the bookmark
//! list, the add form and pending notifications. The presentation layer
//! reads view models from it and sends intents to it; nothing is global.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::managers::bookmark_form::{validate_submission, BookmarkForm};
use crate::managers::bookmark_list::BookmarkListManager;
use crate::services::favicon;
use crate::services::identity_gateway::{IdentityGatewayTrait, SupabaseIdentity, TokenSource};
use crate::services::memory_backend::{InMemoryStore, StaticIdentity};
use crate::services::remote_store::{RemoteStore, RemoteStoreTrait};
use crate::services::session_store::{FileSessionStore, SessionStoreTrait};
use crate::types::auth::OAuthProvider;
use crate::types::bookmark::{Bookmark, User};
use crate::types::errors::{AuthError, BookmarkError};
use crate::types::settings::{ClientSettings, DisplaySettings};
use crate::types::view::{
    count_label, BookmarkCard, DashboardView, FormView, ListView, Notification, ProfileView,
};

pub struct SessionController {
    identity: Arc<dyn IdentityGatewayTrait>,
    list: BookmarkListManager,
    form: BookmarkForm,
    user: Option<User>,
    provider: OAuthProvider,
    display: DisplaySettings,
    notifications: Vec<Notification>,
}

impl SessionController {
    pub fn new(
        identity: Arc<dyn IdentityGatewayTrait>,
        store: Arc<dyn RemoteStoreTrait>,
        settings: &ClientSettings,
    ) -> Self {
        Self {
            identity,
            list: BookmarkListManager::new(
                store,
                Duration::from_millis(settings.display.highlight_ms),
            ),
            form: BookmarkForm::new(),
            user: None,
            provider: settings.auth.provider,
            display: settings.display.clone(),
            notifications: Vec::new(),
        }
    }

    /// Wires the hosted identity provider and store from `settings`.
    ///
    /// `session_path` overrides where the auth session is persisted.
    pub fn from_settings(
        settings: &ClientSettings,
        session_path: Option<PathBuf>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let session_store: Arc<dyn SessionStoreTrait> = Arc::new(FileSessionStore::new(
            session_path.unwrap_or_else(FileSessionStore::default_path),
        ));
        let identity = Arc::new(SupabaseIdentity::new(settings, Some(session_store))?);
        let tokens: Arc<dyn TokenSource> = identity.clone();
        let store = Arc::new(RemoteStore::new(&settings.backend, tokens)?);
        Ok(Self::new(identity, store, settings))
    }

    /// A signed-in demo session over an in-memory store seeded with a few links.
    pub fn demo(settings: &ClientSettings) -> Self {
        let identity = StaticIdentity::demo();
        let owner = "demo-user";
        let now = Utc::now();
        let seed = [
            ("Linear – Plan and build products", "https://linear.app"),
            ("Vercel – Develop. Preview. Ship.", "https://vercel.com"),
            ("Notion – Your connected workspace", "https://notion.so"),
        ];
        let rows = seed
            .iter()
            .enumerate()
            .map(|(i, (title, url))| Bookmark {
                id: format!("demo-{}", i + 1),
                user_id: owner.to_string(),
                title: title.to_string(),
                url: url.to_string(),
                created_at: now - ChronoDuration::minutes(i as i64),
            })
            .collect();
        Self::new(
            Arc::new(identity),
            Arc::new(InMemoryStore::with_rows(rows)),
            settings,
        )
    }

    /// Resolves the user and loads their bookmarks.
    ///
    /// Failures become notifications; the returned view reflects whatever
    /// state was reached.
    pub async fn start(&mut self) -> DashboardView {
        match self.identity.current_user().await {
            Ok(Some(user)) => self.load_for(user).await,
            Ok(None) => {
                self.user = None;
                self.list.clear();
            }
            Err(e) => {
                warn!(error = %e, "resolving user failed");
                self.user = None;
                self.list.clear();
                self.notifications
                    .push(Notification::error("Failed to load your profile"));
            }
        }
        self.dashboard()
    }

    /// URL that starts the OAuth flow; `None` uses the configured provider.
    pub fn sign_in_url(&self, provider: Option<OAuthProvider>) -> Result<String, AuthError> {
        self.identity.sign_in_url(provider.unwrap_or(self.provider))
    }

    pub async fn complete_sign_in(&mut self, callback_url: &str) -> Result<DashboardView, AuthError> {
        match self.identity.complete_sign_in(callback_url).await {
            Ok(user) => {
                self.load_for(user).await;
                Ok(self.dashboard())
            }
            Err(e) => {
                warn!(error = %e, "sign-in failed");
                self.notifications.push(Notification::error("Sign-in failed"));
                Err(e)
            }
        }
    }

    /// Adopts `user` as the session owner and loads their bookmarks.
    async fn load_for(&mut self, user: User) {
        info!(user_id = %user.id, "session started");
        let owner = user.id.clone();
        self.user = Some(user);
        if let Err(e) = self.list.initialize(&owner).await {
            self.notify_failure(&e);
        }
    }

    /// Local state is dropped even when the provider call fails.
    pub async fn sign_out(&mut self) {
        if let Err(e) = self.identity.sign_out().await {
            warn!(error = %e, "sign-out failed");
            self.notifications.push(Notification::error("Failed to sign out"));
        } else {
            self.notifications.push(Notification::info("Signed out"));
        }
        self.user = None;
        self.list.clear();
        self.form = BookmarkForm::new();
    }

    pub fn set_form_title(&mut self, title: &str) -> FormView {
        self.form.set_title(title);
        self.form.view()
    }

    pub fn set_form_url(&mut self, url: &str) -> FormView {
        self.form.set_url(url);
        self.form.view()
    }

    pub fn form_view(&self) -> FormView {
        self.form.view()
    }

    /// Submits the form. Validation failures stay inline and make no store
    /// call; store failures raise a notification and keep the input.
    pub async fn submit_form(&mut self) -> Result<Bookmark, BookmarkError> {
        let owner = self.owner_id()?;
        let submission = self.form.begin_submit()?;

        let result = self
            .list
            .add(&owner, &submission.title, &submission.url)
            .await;
        self.form.finish_submit(result.is_ok());

        if let Err(e) = &result {
            self.notify_failure(e);
        }
        result
    }

    /// Adds without going through the form state.
    pub async fn add_bookmark(&mut self, title: &str, url: &str) -> Result<Bookmark, BookmarkError> {
        let owner = self.owner_id()?;
        let submission = validate_submission(title, url)?;
        let result = self
            .list
            .add(&owner, &submission.title, &submission.url)
            .await;
        if let Err(e) = &result {
            self.notify_failure(e);
        }
        result
    }

    pub async fn delete_bookmark(&mut self, id: &str) -> Result<(), BookmarkError> {
        self.owner_id()?;
        let result = self.list.remove(id).await;
        if let Err(e) = &result {
            self.notify_failure(e);
        }
        result
    }

    pub fn dashboard(&self) -> DashboardView {
        let highlighted = self.list.highlighted_id();
        let list = if self.list.is_loading() {
            ListView::Loading {
                placeholders: self.display.skeleton_count,
            }
        } else if self.list.is_empty() {
            ListView::Empty
        } else {
            ListView::Populated {
                cards: self
                    .list
                    .bookmarks()
                    .iter()
                    .map(|b| self.card(b, highlighted.as_deref()))
                    .collect(),
            }
        };

        DashboardView {
            profile: self.user.as_ref().map(|u| ProfileView {
                display_name: u.display_name().to_string(),
                initial: u.initial(),
                avatar_url: u.avatar_url.clone(),
            }),
            list,
            highlighted_id: highlighted,
            count_label: count_label(self.list.len()),
        }
    }

    fn card(&self, bookmark: &Bookmark, highlighted: Option<&str>) -> BookmarkCard {
        BookmarkCard {
            id: bookmark.id.clone(),
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
            hostname: favicon::hostname(&bookmark.url),
            favicon_url: favicon::favicon_url(&bookmark.url, self.display.favicon_size),
            is_new: highlighted == Some(bookmark.id.as_str()),
        }
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        self.list.bookmarks()
    }

    pub fn highlighted_id(&self) -> Option<String> {
        self.list.highlighted_id()
    }

    pub fn subscribe_highlight(&self) -> watch::Receiver<Option<String>> {
        self.list.subscribe_highlight()
    }

    fn owner_id(&self) -> Result<String, BookmarkError> {
        self.user
            .as_ref()
            .map(|u| u.id.clone())
            .ok_or(BookmarkError::NotSignedIn)
    }

    /// Store failures are reported to the user; validation stays inline.
    fn notify_failure(&mut self, error: &BookmarkError) {
        let message = match error {
            BookmarkError::LoadFailed(_) => "Failed to load bookmarks",
            BookmarkError::AddFailed(_) => "Failed to add bookmark",
            BookmarkError::DeleteFailed(_) => "Failed to delete bookmark",
            BookmarkError::Validation(_) | BookmarkError::NotSignedIn => return,
        };
        self.notifications.push(Notification::error(message));
    }
}
