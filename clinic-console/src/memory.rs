//! In-memory [`Document`] implementation.
//!
//! Backs the terminal front end's field state and every test. Besides the
//! element state itself it keeps a short history of what happened to the
//! page (renders per table, visibility flips, toasts, confirmation prompts)
//! so callers can assert on it.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::document::{Document, SelectOption, TableRow};
use crate::notification::NotificationKind;

/// A notification as it was shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Debug, Default)]
struct DocumentState {
    values: HashMap<String, String>,
    checked: HashSet<String>,
    visible: HashSet<String>,
    active: HashSet<String>,
    tables: HashMap<String, Vec<TableRow>>,
    render_counts: HashMap<String, usize>,
    options: HashMap<String, Vec<SelectOption>>,
    texts: HashMap<String, String>,
    attributes: HashMap<(String, String), String>,
    visibility_log: Vec<(String, bool)>,
    scrolled: Vec<String>,
    toast: Option<Toast>,
    toasts: Vec<Toast>,
    prompts: Vec<String>,
    revision: u64,
}

/// Elements start hidden, matching the console markup where forms and the
/// loading overlay stay hidden until something reveals them.
#[derive(Debug)]
pub struct MemoryDocument {
    state: Mutex<DocumentState>,
    confirm_answer: AtomicBool,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Empty document that answers every confirmation with "yes".
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DocumentState::default()),
            confirm_answer: AtomicBool::new(true),
        }
    }

    pub fn set_confirm_answer(&self, answer: bool) {
        self.confirm_answer.store(answer, Ordering::SeqCst);
    }

    pub fn rows(&self, table: &str) -> Vec<TableRow> {
        self.state.lock().tables.get(table).cloned().unwrap_or_default()
    }

    /// How many times `table` has been re-rendered.
    pub fn render_count(&self, table: &str) -> usize {
        self.state.lock().render_counts.get(table).copied().unwrap_or(0)
    }

    pub fn options(&self, select: &str) -> Vec<SelectOption> {
        self.state.lock().options.get(select).cloned().unwrap_or_default()
    }

    pub fn text(&self, element: &str) -> Option<String> {
        self.state.lock().texts.get(element).cloned()
    }

    /// The notification currently on screen.
    pub fn toast(&self) -> Option<Toast> {
        self.state.lock().toast.clone()
    }

    /// Every notification shown so far, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.state.lock().toasts.clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.state.lock().prompts.clone()
    }

    pub fn scrolled(&self) -> Vec<String> {
        self.state.lock().scrolled.clone()
    }

    /// The `hidden` values written to `element`, in order.
    pub fn visibility_changes(&self, element: &str) -> Vec<bool> {
        self.state
            .lock()
            .visibility_log
            .iter()
            .filter(|(id, _)| id == element)
            .map(|(_, hidden)| *hidden)
            .collect()
    }

    /// Counter bumped by every write that changes what the page shows.
    pub fn revision(&self) -> u64 {
        self.state.lock().revision
    }
}

impl Document for MemoryDocument {
    fn value(&self, field: &str) -> String {
        self.state.lock().values.get(field).cloned().unwrap_or_default()
    }

    fn set_value(&self, field: &str, value: &str) {
        let mut state = self.state.lock();
        state.values.insert(field.to_string(), value.to_string());
        state.revision += 1;
    }

    fn is_checked(&self, field: &str) -> bool {
        self.state.lock().checked.contains(field)
    }

    fn set_checked(&self, field: &str, checked: bool) {
        let mut state = self.state.lock();
        if checked {
            state.checked.insert(field.to_string());
        } else {
            state.checked.remove(field);
        }
        state.revision += 1;
    }

    fn is_hidden(&self, element: &str) -> bool {
        !self.state.lock().visible.contains(element)
    }

    fn set_hidden(&self, element: &str, hidden: bool) {
        let mut state = self.state.lock();
        if hidden {
            state.visible.remove(element);
        } else {
            state.visible.insert(element.to_string());
        }
        state.visibility_log.push((element.to_string(), hidden));
        state.revision += 1;
    }

    fn is_active(&self, element: &str) -> bool {
        self.state.lock().active.contains(element)
    }

    fn set_active(&self, element: &str, active: bool) {
        let mut state = self.state.lock();
        if active {
            state.active.insert(element.to_string());
        } else {
            state.active.remove(element);
        }
        state.revision += 1;
    }

    fn render_rows(&self, table: &str, rows: Vec<TableRow>) {
        let mut state = self.state.lock();
        state.tables.insert(table.to_string(), rows);
        *state.render_counts.entry(table.to_string()).or_insert(0) += 1;
        state.revision += 1;
    }

    fn set_options(&self, select: &str, options: Vec<SelectOption>) {
        let mut state = self.state.lock();
        state.options.insert(select.to_string(), options);
        state.revision += 1;
    }

    fn set_text(&self, element: &str, text: &str) {
        let mut state = self.state.lock();
        state.texts.insert(element.to_string(), text.to_string());
        state.revision += 1;
    }

    fn attribute(&self, element: &str, name: &str) -> Option<String> {
        self.state
            .lock()
            .attributes
            .get(&(element.to_string(), name.to_string()))
            .cloned()
    }

    fn set_attribute(&self, element: &str, name: &str, value: &str) {
        let mut state = self.state.lock();
        state
            .attributes
            .insert((element.to_string(), name.to_string()), value.to_string());
        state.revision += 1;
    }

    fn scroll_into_view(&self, element: &str) {
        self.state.lock().scrolled.push(element.to_string());
    }

    fn show_toast(&self, message: &str, kind: NotificationKind) {
        let toast = Toast {
            message: message.to_string(),
            kind,
        };
        let mut state = self.state.lock();
        state.toasts.push(toast.clone());
        state.toast = Some(toast);
        state.revision += 1;
    }

    fn dismiss_toast(&self) {
        let mut state = self.state.lock();
        state.toast = None;
        state.revision += 1;
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.state.lock().prompts.push(prompt.to_string());
        self.confirm_answer.load(Ordering::SeqCst)
    }
}
