use serde::{Deserialize, Serialize};

use super::auth::OAuthProvider;

/// Top-level client settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClientSettings {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Hosted backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendSettings {
    /// Project base URL, e.g. `https://abcd.supabase.co`.
    pub url: String,
    /// Public (anon) API key sent with every request.
    pub anon_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    "bookmarks".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            table: default_table(),
        }
    }
}

impl BackendSettings {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }
}

/// Sign-in settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSettings {
    pub provider: OAuthProvider,
    /// Where the provider redirects after sign-in.
    pub redirect_url: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            provider: OAuthProvider::Google,
            redirect_url: "http://localhost:5173/dashboard".to_string(),
        }
    }
}

/// Dashboard presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySettings {
    /// How long a newly added bookmark stays highlighted.
    pub highlight_ms: u64,
    /// Placeholder cards shown while loading.
    pub skeleton_count: usize,
    pub favicon_size: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            highlight_ms: 1500,
            skeleton_count: 3,
            favicon_size: 32,
        }
    }
}
