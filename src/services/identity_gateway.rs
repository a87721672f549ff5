//! Identity Gateway for Smart Bookmark.
//!
//! Resolves the signed-in user's profile from the hosted auth service
//! (GoTrue-compatible), builds the OAuth sign-in URL, completes the redirect
//! callback and signs out. Also serves as the access-token source for the
//! remote store.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::services::session_store::SessionStoreTrait;
use crate::types::auth::{AuthSession, OAuthProvider};
use crate::types::bookmark::User;
use crate::types::errors::AuthError;
use crate::types::settings::ClientSettings;

/// Fallback lifetime when the callback carries neither `expires_at` nor `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Anything that can hand out the current bearer token.
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Trait defining identity operations.
#[async_trait]
pub trait IdentityGatewayTrait: Send + Sync {
    /// `Ok(None)` when nobody is signed in.
    async fn current_user(&self) -> Result<Option<User>, AuthError>;
    fn sign_in_url(&self, provider: OAuthProvider) -> Result<String, AuthError>;
    /// Consumes the provider's redirect URL and returns the signed-in user.
    async fn complete_sign_in(&self, callback_url: &str) -> Result<User, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
}

#[derive(Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

#[derive(Deserialize, Default)]
struct UserMetadata {
    full_name: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
    picture: Option<String>,
}

/// Maps a `GET /auth/v1/user` body to a [`User`].
///
/// OAuth providers disagree on metadata keys, so `name`/`picture` are used
/// when `full_name`/`avatar_url` are missing.
pub fn parse_user(body: &str) -> Result<User, AuthError> {
    let raw: GoTrueUser =
        serde_json::from_str(body).map_err(|e| AuthError::Decode(e.to_string()))?;
    let meta = raw.user_metadata.unwrap_or_default();
    Ok(User {
        id: raw.id,
        email: raw.email.unwrap_or_default(),
        full_name: meta.full_name.or(meta.name),
        avatar_url: meta.avatar_url.or(meta.picture),
    })
}

/// Extracts tokens from an OAuth redirect URL.
///
/// Tokens normally arrive in the fragment; the query string is read as well
/// so error redirects are reported with the provider's description.
pub fn parse_callback(callback_url: &str, now: i64) -> Result<AuthSession, AuthError> {
    let url = Url::parse(callback_url)
        .map_err(|e| AuthError::InvalidCallback(format!("malformed url: {}", e)))?;

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    if let Some(fragment) = url.fragment() {
        pairs.extend(url::form_urlencoded::parse(fragment.as_bytes()).into_owned());
    }
    let get = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .filter(|v| !v.is_empty())
    };

    if let Some(description) = get("error_description").or_else(|| get("error")) {
        return Err(AuthError::InvalidCallback(description));
    }

    let access_token = get("access_token")
        .ok_or_else(|| AuthError::InvalidCallback("missing access_token".to_string()))?;
    let expires_at = match get("expires_at").and_then(|v| v.parse::<i64>().ok()) {
        Some(at) => at,
        None => {
            let lifetime = get("expires_in")
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
            now + lifetime
        }
    };

    Ok(AuthSession {
        access_token,
        refresh_token: get("refresh_token"),
        expires_at,
        token_type: get("token_type").unwrap_or_else(|| "bearer".to_string()),
    })
}

/// HTTP implementation of [`IdentityGatewayTrait`].
pub struct SupabaseIdentity {
    client: Client,
    auth_url: Url,
    anon_key: String,
    redirect_url: String,
    session: RwLock<Option<AuthSession>>,
    session_store: Option<Arc<dyn SessionStoreTrait>>,
}

impl SupabaseIdentity {
    /// Creates the gateway and restores a persisted, unexpired session.
    pub fn new(
        settings: &ClientSettings,
        session_store: Option<Arc<dyn SessionStoreTrait>>,
    ) -> Result<Self, AuthError> {
        if !settings.backend.is_configured() {
            return Err(AuthError::NotConfigured(
                "backend url and anon key are required".to_string(),
            ));
        }
        let mut auth_url = Url::parse(settings.backend.url.trim())
            .map_err(|e| AuthError::NotConfigured(format!("invalid backend url: {}", e)))?;
        auth_url
            .path_segments_mut()
            .map_err(|_| AuthError::NotConfigured("backend url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["auth", "v1"]);

        let restored = match &session_store {
            Some(store) => match store.load() {
                Ok(Some(session)) if !session.is_expired(Utc::now().timestamp()) => {
                    debug!("restored persisted auth session");
                    Some(session)
                }
                Ok(_) => None,
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable auth session");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            client: Client::new(),
            auth_url,
            anon_key: settings.backend.anon_key.clone(),
            redirect_url: settings.auth.redirect_url.clone(),
            session: RwLock::new(restored),
            session_store,
        })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.auth_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(path);
        }
        url
    }

    fn session(&self) -> Option<AuthSession> {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_session(&self, session: Option<AuthSession>) -> Result<(), AuthError> {
        if let Some(store) = &self.session_store {
            match &session {
                Some(s) => store.save(s)?,
                None => store.clear()?,
            }
        }
        *self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = session;
        Ok(())
    }

    pub fn is_signed_in(&self) -> bool {
        self.access_token().is_some()
    }
}

impl TokenSource for SupabaseIdentity {
    fn access_token(&self) -> Option<String> {
        self.session()
            .filter(|s| !s.is_expired(Utc::now().timestamp()))
            .map(|s| s.access_token.clone())
    }
}

#[async_trait]
impl IdentityGatewayTrait for SupabaseIdentity {
    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        let token = match self.access_token() {
            Some(token) => token,
            None => {
                if self.session().is_some() {
                    info!("auth session expired, signing out locally");
                    self.set_session(None)?;
                }
                return Ok(None);
            }
        };

        let response = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            info!("access token rejected, clearing session");
            self.set_session(None)?;
            return Ok(None);
        }
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(AuthError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        parse_user(&body).map(Some)
    }

    fn sign_in_url(&self, provider: OAuthProvider) -> Result<String, AuthError> {
        let mut url = self.endpoint("authorize");
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", &self.redirect_url);
        Ok(url.to_string())
    }

    async fn complete_sign_in(&self, callback_url: &str) -> Result<User, AuthError> {
        let session = parse_callback(callback_url, Utc::now().timestamp())?;
        self.set_session(Some(session))?;

        let user = self.current_user().await?.ok_or(AuthError::NotAuthenticated)?;
        info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    /// Revokes the token remotely when possible; the local session is
    /// dropped either way.
    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(token) = self.access_token() {
            let result = self
                .client
                .post(self.endpoint("logout"))
                .header("apikey", &self.anon_key)
                .header(AUTHORIZATION, format!("Bearer {}", token))
                .send()
                .await;
            match result {
                Ok(response) if !response.status().is_success() => {
                    warn!(status = %response.status(), "remote logout rejected");
                }
                Err(e) => warn!(error = %e, "remote logout failed"),
                Ok(_) => {}
            }
        }
        self.set_session(None)?;
        info!("signed out");
        Ok(())
    }
}
