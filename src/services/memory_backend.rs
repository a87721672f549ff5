//! In-memory stand-ins for the hosted backend.
//!
//! `InMemoryStore` and `StaticIdentity` implement the gateway traits without
//! a network, with switchable failures. The RPC bridge uses them in demo
//! mode; the test suites use them everywhere.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::services::identity_gateway::{IdentityGatewayTrait, TokenSource};
use crate::services::remote_store::RemoteStoreTrait;
use crate::types::auth::OAuthProvider;
use crate::types::bookmark::{Bookmark, NewBookmark, User};
use crate::types::errors::{AuthError, StoreError};

/// Number of calls each store operation has received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub list: usize,
    pub insert: usize,
    pub delete: usize,
}

#[derive(Default)]
struct StoreState {
    rows: Vec<Bookmark>,
    last_created: Option<DateTime<Utc>>,
    fail_list: bool,
    fail_insert: bool,
    fail_delete: bool,
    calls: StoreCalls,
}

/// A bookmark table held in memory.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the table with existing rows.
    pub fn with_rows(rows: Vec<Bookmark>) -> Self {
        let last_created = rows.iter().map(|b| b.created_at).max();
        Self {
            state: Mutex::new(StoreState {
                rows,
                last_created,
                ..StoreState::default()
            }),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.state().fail_list = fail;
    }

    pub fn set_fail_insert(&self, fail: bool) {
        self.state().fail_insert = fail;
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.state().fail_delete = fail;
    }

    pub fn calls(&self) -> StoreCalls {
        self.state().calls
    }

    /// Every stored row, in insertion order.
    pub fn rows(&self) -> Vec<Bookmark> {
        self.state().rows.clone()
    }
}

#[async_trait]
impl RemoteStoreTrait for InMemoryStore {
    async fn list_bookmarks(&self, owner_id: &str) -> Result<Vec<Bookmark>, StoreError> {
        let mut state = self.state();
        state.calls.list += 1;
        if state.fail_list {
            return Err(StoreError::Network("store unreachable".to_string()));
        }
        let mut rows: Vec<Bookmark> = state
            .rows
            .iter()
            .filter(|b| b.user_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    /// Assigns a fresh id and a creation time strictly after the previous one.
    async fn insert_bookmark(&self, bookmark: &NewBookmark) -> Result<Bookmark, StoreError> {
        let mut state = self.state();
        state.calls.insert += 1;
        if state.fail_insert {
            return Err(StoreError::Api {
                status: 503,
                message: "insert rejected".to_string(),
            });
        }

        let now = Utc::now();
        let created_at = match state.last_created {
            Some(last) if last >= now => last + Duration::milliseconds(1),
            _ => now,
        };
        state.last_created = Some(created_at);

        let row = Bookmark {
            id: Uuid::new_v4().to_string(),
            user_id: bookmark.user_id.clone(),
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
            created_at,
        };
        state.rows.push(row.clone());
        Ok(row)
    }

    /// Deleting an unknown id succeeds, as a filtered delete does on the backend.
    async fn delete_bookmark(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.state();
        state.calls.delete += 1;
        if state.fail_delete {
            return Err(StoreError::Network("store unreachable".to_string()));
        }
        state.rows.retain(|b| b.id != id);
        Ok(())
    }
}

#[derive(Default)]
struct IdentityState {
    signed_in: bool,
    unreachable: bool,
    lookups: usize,
}

/// Identity provider with one fixed account.
pub struct StaticIdentity {
    account: User,
    state: Mutex<IdentityState>,
}

impl StaticIdentity {
    /// Already signed in as `account`.
    pub fn signed_in(account: User) -> Self {
        Self {
            account,
            state: Mutex::new(IdentityState {
                signed_in: true,
                ..IdentityState::default()
            }),
        }
    }

    /// Signed out; `complete_sign_in` signs in as `account`.
    pub fn signed_out(account: User) -> Self {
        Self {
            account,
            state: Mutex::new(IdentityState::default()),
        }
    }

    /// The demo account used by the RPC bridge's `--demo` mode.
    pub fn demo() -> Self {
        Self::signed_in(User {
            id: "demo-user".to_string(),
            email: "user@example.com".to_string(),
            full_name: Some("Alex Johnson".to_string()),
            avatar_url: None,
        })
    }

    fn state(&self) -> std::sync::MutexGuard<'_, IdentityState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes `current_user` fail with a network error.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state().unreachable = unreachable;
    }

    /// Number of `current_user` calls so far.
    pub fn user_lookups(&self) -> usize {
        self.state().lookups
    }
}

impl TokenSource for StaticIdentity {
    fn access_token(&self) -> Option<String> {
        self.state()
            .signed_in
            .then(|| format!("memory-token-{}", self.account.id))
    }
}

#[async_trait]
impl IdentityGatewayTrait for StaticIdentity {
    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        let mut state = self.state();
        state.lookups += 1;
        if state.unreachable {
            return Err(AuthError::Network("identity provider unreachable".to_string()));
        }
        Ok(state.signed_in.then(|| self.account.clone()))
    }

    fn sign_in_url(&self, provider: OAuthProvider) -> Result<String, AuthError> {
        Ok(format!("memory://authorize?provider={}", provider.as_str()))
    }

    async fn complete_sign_in(&self, callback_url: &str) -> Result<User, AuthError> {
        if callback_url.contains("error=") {
            return Err(AuthError::InvalidCallback("provider returned an error".to_string()));
        }
        self.state().signed_in = true;
        Ok(self.account.clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.state().signed_in = false;
        Ok(())
    }
}
