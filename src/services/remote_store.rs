//! Remote Store Gateway for Smart Bookmark.
//!
//! Talks to the hosted `bookmarks` table over its PostgREST interface.
//! Row-level access is enforced by the backend; this client only scopes the
//! list query by owner and forwards the caller's access token.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::services::identity_gateway::TokenSource;
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::StoreError;
use crate::types::settings::BackendSettings;

/// Trait defining the authoritative bookmark operations.
#[async_trait]
pub trait RemoteStoreTrait: Send + Sync {
    /// All bookmarks owned by `owner_id`, newest first.
    async fn list_bookmarks(&self, owner_id: &str) -> Result<Vec<Bookmark>, StoreError>;
    /// Inserts one row and returns it as stored.
    async fn insert_bookmark(&self, bookmark: &NewBookmark) -> Result<Bookmark, StoreError>;
    async fn delete_bookmark(&self, id: &str) -> Result<(), StoreError>;
}

/// PostgREST error body; only the message is surfaced.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// HTTP implementation of [`RemoteStoreTrait`].
pub struct RemoteStore {
    client: Client,
    table_url: Url,
    anon_key: String,
    tokens: Arc<dyn TokenSource>,
}

impl RemoteStore {
    /// Builds a store client for `settings.table` under `{url}/rest/v1/`.
    pub fn new(settings: &BackendSettings, tokens: Arc<dyn TokenSource>) -> Result<Self, StoreError> {
        if !settings.is_configured() {
            return Err(StoreError::NotConfigured(
                "backend url and anon key are required".to_string(),
            ));
        }

        let mut table_url = Url::parse(settings.url.trim())
            .map_err(|e| StoreError::NotConfigured(format!("invalid backend url: {}", e)))?;
        table_url
            .path_segments_mut()
            .map_err(|_| StoreError::NotConfigured("backend url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["rest", "v1", settings.table.as_str()]);

        Ok(Self {
            client: Client::new(),
            table_url,
            anon_key: settings.anon_key.clone(),
            tokens,
        })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    /// `?select=*&user_id=eq.{owner}&order=created_at.desc`
    pub fn list_url(&self, owner_id: &str) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &format!("eq.{}", owner_id))
            .append_pair("order", "created_at.desc");
        url
    }

    /// `?id=eq.{id}`
    pub fn item_url(&self, id: &str) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        url
    }

    /// Headers sent on every request. Falls back to the anon key as bearer
    /// when nobody is signed in; row-level security then yields no rows.
    pub fn auth_headers(&self) -> Result<HeaderMap, StoreError> {
        let bearer = self
            .tokens
            .access_token()
            .unwrap_or_else(|| self.anon_key.clone());

        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.anon_key)
                .map_err(|e| StoreError::NotConfigured(format!("invalid anon key: {}", e)))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", bearer))
                .map_err(|e| StoreError::NotConfigured(format!("invalid access token: {}", e)))?,
        );
        Ok(headers)
    }
}

/// Turns a non-success response into [`StoreError::Api`].
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        message: api_error_message(&body),
    })
}

/// Extracts `message` from a PostgREST error body, or returns the raw text.
pub fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

pub fn decode_rows(body: &str) -> Result<Vec<Bookmark>, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl RemoteStoreTrait for RemoteStore {
    async fn list_bookmarks(&self, owner_id: &str) -> Result<Vec<Bookmark>, StoreError> {
        let url = self.list_url(owner_id);
        debug!(%url, "listing bookmarks");

        let response = self
            .client
            .get(url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let body = check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        decode_rows(&body)
    }

    async fn insert_bookmark(&self, bookmark: &NewBookmark) -> Result<Bookmark, StoreError> {
        debug!(url = %bookmark.url, "inserting bookmark");

        let response = self
            .client
            .post(self.table_url.clone())
            .headers(self.auth_headers()?)
            .header("Prefer", "return=representation")
            .json(bookmark)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let body = check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        decode_rows(&body)?.into_iter().next().ok_or_else(|| {
            warn!("insert acknowledged without a returned row");
            StoreError::MissingRow
        })
    }

    async fn delete_bookmark(&self, id: &str) -> Result<(), StoreError> {
        debug!(id, "deleting bookmark");

        let response = self
            .client
            .delete(self.item_url(id))
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        check_status(response).await?;
        Ok(())
    }
}
