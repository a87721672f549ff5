//! RPC method handler for the Smart Bookmark JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` turns renderer intents into `SessionController` calls and
//! returns view models as JSON.

use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::app::SessionController;
use crate::managers::bookmark_form::{normalize_url, validate_url};
use crate::types::auth::OAuthProvider;

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call to the session controller.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(
    app: &Mutex<SessionController>,
    method: &str,
    params: &Value,
) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Session ───
        "session.start" => {
            let mut a = app.lock().await;
            to_json(&a.start().await)
        }
        "dashboard.view" => {
            let a = app.lock().await;
            to_json(&a.dashboard())
        }
        "profile.get" => {
            let a = app.lock().await;
            to_json(&a.user())
        }
        "notifications.drain" => {
            let mut a = app.lock().await;
            to_json(&a.drain_notifications())
        }

        // ─── Auth ───
        "auth.sign_in_url" => {
            let provider = match params.get("provider") {
                Some(v) if !v.is_null() => Some(
                    serde_json::from_value::<OAuthProvider>(v.clone())
                        .map_err(|e| format!("invalid provider: {}", e))?,
                ),
                _ => None,
            };
            let a = app.lock().await;
            let url = a.sign_in_url(provider).map_err(|e| e.to_string())?;
            Ok(json!({"url": url}))
        }
        "auth.complete" => {
            let callback = str_param(params, "callback_url")?;
            let mut a = app.lock().await;
            let view = a.complete_sign_in(callback).await.map_err(|e| e.to_string())?;
            to_json(&view)
        }
        "auth.sign_out" => {
            let mut a = app.lock().await;
            a.sign_out().await;
            Ok(json!({"ok": true}))
        }

        // ─── Form ───
        "form.set_title" => {
            let title = str_param(params, "title")?;
            let mut a = app.lock().await;
            to_json(&a.set_form_title(title))
        }
        "form.set_url" => {
            let url = str_param(params, "url")?;
            let mut a = app.lock().await;
            to_json(&a.set_form_url(url))
        }
        "form.view" => {
            let a = app.lock().await;
            to_json(&a.form_view())
        }
        "form.submit" => {
            let mut a = app.lock().await;
            let bookmark = a.submit_form().await.map_err(|e| e.to_string())?;
            Ok(json!({"bookmark": to_json(&bookmark)?, "form": to_json(&a.form_view())?}))
        }
        "url.validate" => {
            let url = str_param(params, "url")?;
            let error = validate_url(url).err().map(|e| e.to_string());
            Ok(json!({
                "valid": error.is_none(),
                "error": error,
                "normalized": if url.trim().is_empty() { None } else { Some(normalize_url(url)) },
            }))
        }

        // ─── Bookmarks ───
        "bookmark.list" => {
            let a = app.lock().await;
            to_json(&a.bookmarks())
        }
        "bookmark.add" => {
            let title = str_param(params, "title")?;
            let url = str_param(params, "url")?;
            let mut a = app.lock().await;
            let bookmark = a.add_bookmark(title, url).await.map_err(|e| e.to_string())?;
            to_json(&bookmark)
        }
        "bookmark.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().await;
            a.delete_bookmark(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
