//! Transient status messages.
//!
//! There is exactly one notification element. A new message replaces the
//! current one and restarts its timer; nothing is queued.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::warn;

use crate::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    /// Style class applied to the notification element.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shows a message for a fixed duration, then dismisses it.
///
/// Starts with nothing on screen. Dismissal needs a running tokio runtime;
/// without one the message simply stays until the next call replaces it.
pub struct NotificationService {
    document: Arc<dyn Document>,
    duration: Duration,
    // Bumped on every notify so stale timers leave newer messages alone
    generation: Arc<Mutex<u64>>,
}

impl NotificationService {
    pub fn new(document: Arc<dyn Document>, duration: Duration) -> Self {
        Self {
            document,
            duration,
            generation: Arc::new(Mutex::new(0)),
        }
    }

    pub fn notify(&self, message: impl AsRef<str>, kind: NotificationKind) {
        let generation = {
            let mut current = self.generation.lock();
            *current += 1;
            self.document.show_toast(message.as_ref(), kind);
            *current
        };

        let Ok(handle) = Handle::try_current() else {
            warn!("No async runtime available, notification will not auto-dismiss");
            return;
        };

        let timer = tokio::time::sleep(self.duration);
        let document = Arc::clone(&self.document);
        let current = Arc::clone(&self.generation);
        handle.spawn(async move {
            timer.await;
            let current = current.lock();
            if *current == generation {
                document.dismiss_toast();
            }
        });
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.notify(message, NotificationKind::Success);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.notify(message, NotificationKind::Error);
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.notify(message, NotificationKind::Info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;
    use tokio::time::sleep;

    fn service(doc: &Arc<MemoryDocument>) -> NotificationService {
        let document: Arc<dyn Document> = doc.clone();
        NotificationService::new(document, Duration::from_millis(3000))
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismisses_after_duration() {
        let doc = Arc::new(MemoryDocument::new());
        let notifier = service(&doc);

        notifier.success("Doctor added successfully!");
        assert_eq!(doc.toast().map(|t| t.kind), Some(NotificationKind::Success));

        sleep(Duration::from_millis(2999)).await;
        assert!(doc.toast().is_some());

        sleep(Duration::from_millis(2)).await;
        assert!(doc.toast().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_calls_reset_the_timer() {
        let doc = Arc::new(MemoryDocument::new());
        let notifier = service(&doc);

        notifier.info("first");
        sleep(Duration::from_millis(2000)).await;
        notifier.error("second");

        // The first timer fires at 3000 ms and must leave "second" alone
        sleep(Duration::from_millis(1500)).await;
        let toast = doc.toast().unwrap();
        assert_eq!(toast.message, "second");
        assert_eq!(toast.kind, NotificationKind::Error);

        sleep(Duration::from_millis(1600)).await;
        assert!(doc.toast().is_none());
        assert_eq!(doc.toasts().len(), 2);
    }

    #[test]
    fn test_without_runtime_message_stays() {
        let doc = Arc::new(MemoryDocument::new());
        let notifier = service(&doc);
        notifier.info("Bills are loaded by patient ID. Use the search feature.");
        assert!(doc.toast().is_some());
    }
}
