use thiserror::Error;

// === StoreError ===

/// Errors returned by the remote bookmark store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend URL or key is missing.
    #[error("Store not configured: {0}")]
    NotConfigured(String),
    /// The request never produced a response.
    #[error("Store network error: {0}")]
    Network(String),
    /// The store answered with a non-success status.
    #[error("Store API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// The response body did not match the expected row shape.
    #[error("Store response decode error: {0}")]
    Decode(String),
    /// An insert was acknowledged without returning the created row.
    #[error("Store returned no row for insert")]
    MissingRow,
}

// === AuthError ===

/// Errors related to the identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Auth not configured: {0}")]
    NotConfigured(String),
    #[error("Auth network error: {0}")]
    Network(String),
    #[error("Auth API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Auth response decode error: {0}")]
    Decode(String),
    /// The OAuth redirect did not carry usable tokens.
    #[error("Invalid sign-in callback: {0}")]
    InvalidCallback(String),
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Session storage error: {0}")]
    Session(#[from] SessionStoreError),
}

// === ValidationError ===

/// Local form validation failures. Display strings are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a title")]
    EmptyTitle,
    #[error("Please enter a URL")]
    EmptyUrl,
    #[error("Please enter a valid URL")]
    InvalidUrl,
    #[error("A submission is already in progress")]
    SubmissionInFlight,
}

// === BookmarkError ===

/// Errors surfaced by the bookmark list operations.
#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to load bookmarks: {0}")]
    LoadFailed(#[source] StoreError),
    #[error("Failed to add bookmark: {0}")]
    AddFailed(#[source] StoreError),
    #[error("Failed to delete bookmark: {0}")]
    DeleteFailed(#[source] StoreError),
    #[error("Not signed in")]
    NotSignedIn,
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    IoError(String),
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === SessionStoreError ===

/// Errors related to persisting the auth session on disk.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Session store I/O error: {0}")]
    IoError(String),
    #[error("Session store serialization error: {0}")]
    SerializationError(String),
}
