//! The page surface the controllers read from and render into.
//!
//! The console never owns markup. It addresses named elements (form fields,
//! table bodies, forms, counters) through the [`Document`] trait, which a
//! front end implements on top of whatever it actually draws. Element ids
//! follow the console markup: `doctors-tbody`, `add-doctor-form`,
//! `update-patient-age`, `loading-overlay` and so on.

use crate::notification::NotificationKind;

/// Named-element access to the rendered console.
///
/// All methods take `&self`; implementations use interior mutability so a
/// single document can be shared by every controller.
pub trait Document: Send + Sync {
    /// Current value of a form field, empty when unset.
    fn value(&self, field: &str) -> String;
    fn set_value(&self, field: &str, value: &str);

    fn is_checked(&self, field: &str) -> bool;
    fn set_checked(&self, field: &str, checked: bool);

    fn is_hidden(&self, element: &str) -> bool;
    fn set_hidden(&self, element: &str, hidden: bool);

    /// The "active" marker carried by sections and navigation buttons.
    fn is_active(&self, element: &str) -> bool;
    fn set_active(&self, element: &str, active: bool);

    /// Replace the whole body of `table` with `rows`.
    fn render_rows(&self, table: &str, rows: Vec<TableRow>);

    /// Replace the options of a select element.
    fn set_options(&self, select: &str, options: Vec<SelectOption>);

    fn set_text(&self, element: &str, text: &str);

    fn attribute(&self, element: &str, name: &str) -> Option<String>;
    fn set_attribute(&self, element: &str, name: &str, value: &str);

    /// Smoothly scroll `element` into view.
    fn scroll_into_view(&self, element: &str);

    /// Show `message` in the single notification element, replacing
    /// whatever it currently shows.
    fn show_toast(&self, message: &str, kind: NotificationKind);
    fn dismiss_toast(&self);

    /// Ask the user to confirm a destructive action.
    fn confirm(&self, prompt: &str) -> bool;
}

/// One row of a table body
#[derive(Debug, Clone, PartialEq)]
pub enum TableRow {
    Cells(Vec<Cell>),
    /// A single cell spanning all columns, used for empty and failed loads
    Placeholder { message: String, colspan: usize },
}

impl TableRow {
    pub fn placeholder(message: impl Into<String>, colspan: usize) -> Self {
        TableRow::Placeholder {
            message: message.into(),
            colspan,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, TableRow::Placeholder { .. })
    }

    /// Placeholder text, if this is a placeholder row.
    pub fn message(&self) -> Option<&str> {
        match self {
            TableRow::Placeholder { message, .. } => Some(message),
            TableRow::Cells(_) => None,
        }
    }

    /// Flatten the row to the text a reader would see, one entry per cell.
    pub fn texts(&self) -> Vec<String> {
        match self {
            TableRow::Placeholder { message, .. } => vec![message.clone()],
            TableRow::Cells(cells) => cells.iter().map(Cell::text).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Badge { text: String, class: &'static str },
    Actions(Vec<RowAction>),
}

impl Cell {
    pub fn text(&self) -> String {
        match self {
            Cell::Text(text) | Cell::Badge { text, .. } => text.clone(),
            Cell::Actions(actions) => actions
                .iter()
                .map(RowAction::label)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowAction {
    Button { label: &'static str, action: Action },
    /// Static text in the actions column, e.g. `✓ Paid`
    Note(&'static str),
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Button { label, .. } => *label,
            RowAction::Note(text) => *text,
        }
    }
}

/// What a row button triggers, keyed by the entity id of its row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit(i64),
    Delete(i64),
    Pay(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// The leading "Select …" entry with an empty value.
    pub fn prompt(label: impl Into<String>) -> Self {
        Self::new("", label)
    }
}
