//! Transient "recently added" marker.
//!
//! Holds at most one highlighted bookmark id. Marking an id spawns a timer
//! task that clears it after the configured delay; marking again aborts the
//! previous timer before starting a new one. The value lives in a `watch`
//! channel so observers learn when it changes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

pub struct HighlightMarker {
    delay: Duration,
    tx: Arc<watch::Sender<Option<String>>>,
    timer: Option<JoinHandle<()>>,
}

impl HighlightMarker {
    pub fn new(delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            delay,
            tx: Arc::new(tx),
            timer: None,
        }
    }

    pub fn current(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }

    /// Highlights `id`, superseding any previous highlight and its timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mark(&mut self, id: &str) {
        self.cancel_timer();
        self.tx.send_replace(Some(id.to_string()));

        let tx = Arc::clone(&self.tx);
        let delay = self.delay;
        let id = id.to_string();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send_if_modified(|current| {
                if current.as_deref() == Some(id.as_str()) {
                    *current = None;
                    true
                } else {
                    false
                }
            });
            debug!(%id, "highlight expired");
        }));
    }

    /// Clears the highlight now and cancels its timer.
    pub fn clear(&mut self) {
        self.cancel_timer();
        self.tx.send_if_modified(|current| current.take().is_some());
    }

    /// Clears only if `id` is the highlighted one.
    pub fn clear_if(&mut self, id: &str) {
        if self.current().as_deref() == Some(id) {
            self.clear();
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for HighlightMarker {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
