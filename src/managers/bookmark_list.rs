//! Bookmark list reconciliation for Smart Bookmark.
//!
//! Owns the in-memory, newest-first collection for the current session.
//! Every mutation is applied only after the remote store confirms it; the
//! store stays the single source of truth and a reload re-derives the order
//! from `created_at`.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::managers::highlight::HighlightMarker;
use crate::services::remote_store::RemoteStoreTrait;
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::{BookmarkError, ValidationError};

/// Session-scoped bookmark collection backed by a remote store.
pub struct BookmarkListManager {
    store: Arc<dyn RemoteStoreTrait>,
    bookmarks: Vec<Bookmark>,
    loading: bool,
    highlight: HighlightMarker,
}

impl BookmarkListManager {
    /// `highlight_delay` is how long a freshly added bookmark stays marked.
    pub fn new(store: Arc<dyn RemoteStoreTrait>, highlight_delay: Duration) -> Self {
        Self {
            store,
            bookmarks: Vec::new(),
            loading: true,
            highlight: HighlightMarker::new(highlight_delay),
        }
    }

    /// Replaces the collection with everything `owner_id` owns in the store.
    ///
    /// On failure the collection is left empty and `LoadFailed` is returned
    /// for the caller to report.
    pub async fn initialize(&mut self, owner_id: &str) -> Result<&[Bookmark], BookmarkError> {
        self.loading = true;
        self.bookmarks.clear();
        self.highlight.clear();

        let result = self.store.list_bookmarks(owner_id).await;
        self.loading = false;

        let mut rows = result.map_err(|e| {
            warn!(error = %e, "loading bookmarks failed");
            BookmarkError::LoadFailed(e)
        })?;

        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let mut seen = HashSet::new();
        rows.retain(|b| seen.insert(b.id.clone()));

        info!(count = rows.len(), "bookmarks loaded");
        self.bookmarks = rows;
        Ok(&self.bookmarks)
    }

    /// Inserts a bookmark and, once stored, puts it first and highlights it.
    ///
    /// `title` and `url` are sent as given apart from trimming; URL
    /// normalization belongs to the form layer.
    pub async fn add(
        &mut self,
        owner_id: &str,
        title: &str,
        url: &str,
    ) -> Result<Bookmark, BookmarkError> {
        let title = title.trim();
        let url = url.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl.into());
        }

        let new_bookmark = NewBookmark {
            title: title.to_string(),
            url: url.to_string(),
            user_id: owner_id.to_string(),
        };
        let stored = self
            .store
            .insert_bookmark(&new_bookmark)
            .await
            .map_err(|e| {
                warn!(error = %e, "adding bookmark failed");
                BookmarkError::AddFailed(e)
            })?;

        self.bookmarks.retain(|b| b.id != stored.id);
        self.bookmarks.insert(0, stored.clone());
        self.highlight.mark(&stored.id);

        debug!(id = %stored.id, "bookmark added");
        Ok(stored)
    }

    /// Deletes by id and drops the matching entry once the store confirms.
    ///
    /// An id that is not in the collection is a no-op after the store call.
    pub async fn remove(&mut self, id: &str) -> Result<(), BookmarkError> {
        self.store.delete_bookmark(id).await.map_err(|e| {
            warn!(error = %e, id, "deleting bookmark failed");
            BookmarkError::DeleteFailed(e)
        })?;

        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b.id != id);
        self.highlight.clear_if(id);

        debug!(id, removed = before - self.bookmarks.len(), "bookmark deleted");
        Ok(())
    }

    /// Drops all local state, e.g. on sign-out. The list reads as loading
    /// again until the next `initialize`.
    pub fn clear(&mut self) {
        self.bookmarks.clear();
        self.loading = true;
        self.highlight.clear();
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    /// True until a load has completed, successfully or not.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn highlighted_id(&self) -> Option<String> {
        self.highlight.current()
    }

    pub fn subscribe_highlight(&self) -> watch::Receiver<Option<String>> {
        self.highlight.subscribe()
    }
}
