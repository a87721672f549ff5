//! Auth session persistence.
//!
//! The only local state the client keeps: the identity provider's tokens,
//! written as JSON to the platform data directory so a restart stays signed in.

use std::fs;
use std::path::{Path, PathBuf};

use crate::platform;
use crate::types::auth::AuthSession;
use crate::types::errors::SessionStoreError;

/// Trait defining auth session storage.
pub trait SessionStoreTrait: Send + Sync {
    fn load(&self) -> Result<Option<AuthSession>, SessionStoreError>;
    fn save(&self, session: &AuthSession) -> Result<(), SessionStoreError>;
    fn clear(&self) -> Result<(), SessionStoreError>;
}

/// Stores the session in a single JSON file.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `session.json` in the platform data directory.
    pub fn default_path() -> PathBuf {
        platform::get_data_dir().join("session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStoreTrait for FileSessionStore {
    /// Returns `None` when no session has been saved.
    fn load(&self) -> Result<Option<AuthSession>, SessionStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| SessionStoreError::IoError(format!("Failed to read session: {}", e)))?;
        let session = serde_json::from_str(&content).map_err(|e| {
            SessionStoreError::SerializationError(format!("Failed to parse session: {}", e))
        })?;
        Ok(Some(session))
    }

    fn save(&self, session: &AuthSession) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SessionStoreError::IoError(format!("Failed to create data directory: {}", e))
            })?;
        }
        let json = serde_json::to_string(session).map_err(|e| {
            SessionStoreError::SerializationError(format!("Failed to serialize session: {}", e))
        })?;
        fs::write(&self.path, json)
            .map_err(|e| SessionStoreError::IoError(format!("Failed to write session: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                SessionStoreError::IoError(format!("Failed to restrict session file: {}", e))
            })?;
        }
        Ok(())
    }

    /// Removing a missing file is not an error.
    fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionStoreError::IoError(format!(
                "Failed to remove session: {}",
                e
            ))),
        }
    }
}
