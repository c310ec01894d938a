//! Global loading overlay.
//!
//! One flag for the whole console, no reference counting: overlapping
//! requests share it and the last `hide` wins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::document::Document;

pub const BUSY_ELEMENT: &str = "loading-overlay";

pub struct BusyIndicator {
    document: Arc<dyn Document>,
    shown: AtomicBool,
}

impl BusyIndicator {
    /// Starts hidden; the overlay element is hidden in the markup.
    pub fn new(document: Arc<dyn Document>) -> Self {
        Self {
            document,
            shown: AtomicBool::new(false),
        }
    }

    pub fn show(&self) {
        self.shown.store(true, Ordering::SeqCst);
        self.document.set_hidden(BUSY_ELEMENT, false);
    }

    pub fn hide(&self) {
        self.shown.store(false, Ordering::SeqCst);
        self.document.set_hidden(BUSY_ELEMENT, true);
    }

    pub fn is_shown(&self) -> bool {
        self.shown.load(Ordering::SeqCst)
    }

    /// Show the overlay until the returned guard is dropped.
    pub fn acquire(&self) -> BusyGuard<'_> {
        self.show();
        BusyGuard { indicator: self }
    }
}

/// Hides the overlay on drop, whichever way the guarded scope is left.
#[must_use = "the overlay is hidden again as soon as the guard is dropped"]
pub struct BusyGuard<'a> {
    indicator: &'a BusyIndicator,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.indicator.hide();
    }
}
