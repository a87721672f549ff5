//! View models handed to the presentation process.
//!
//! Everything here is plain data derived from the session controller; the
//! renderer never talks to the gateways directly.

use serde::{Deserialize, Serialize};

/// One rendered bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkCard {
    pub id: String,
    pub title: String,
    pub url: String,
    pub hostname: String,
    pub favicon_url: Option<String>,
    pub is_new: bool,
}

/// The three states of the bookmark list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ListView {
    Loading { placeholders: usize },
    Empty,
    Populated { cards: Vec<BookmarkCard> },
}

/// Navbar profile block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    pub display_name: String,
    pub initial: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    /// `None` while the user is not resolved or signed out.
    pub profile: Option<ProfileView>,
    pub list: ListView,
    pub highlighted_id: Option<String>,
    pub count_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormView {
    pub title: String,
    pub url: String,
    pub url_error: Option<String>,
    pub can_submit: bool,
    pub submitting: bool,
    pub button_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A transient toast raised by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

/// `"1 link saved"` / `"N links saved"`.
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 link saved".to_string()
    } else {
        format!("{} links saved", count)
    }
}
