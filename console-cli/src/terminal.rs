//! [`Document`] implementation for a terminal.
//!
//! Field state lives in a [`MemoryDocument`]; everything the user should see
//! (tables, counters, notifications, the loading overlay) is printed as it
//! happens.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clinic_console::{
    Action, Cell, Document, MemoryDocument, NotificationKind, RowAction, SelectOption, TableRow,
    BUSY_ELEMENT,
};
use colored::*;
use console::{measure_text_width, pad_str, Alignment};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;

const COLUMN_GAP: &str = "  ";

const DOCTOR_HEADERS: &[&str] = &["ID", "Name", "Specialization", "Status", "Actions"];
const PATIENT_HEADERS: &[&str] = &["ID", "Name", "Age", "Gender", "Actions"];
const APPOINTMENT_HEADERS: &[&str] = &["ID", "Patient ID", "Doctor ID", "Date", "Actions"];
const BILL_HEADERS: &[&str] = &[
    "ID",
    "Appointment ID",
    "Patient ID",
    "Amount",
    "Status",
    "Actions",
];

fn table_headers(table: &str) -> &'static [&'static str] {
    match table {
        "doctors-tbody" => DOCTOR_HEADERS,
        "patients-tbody" => PATIENT_HEADERS,
        "appointments-tbody" => APPOINTMENT_HEADERS,
        "bills-tbody" => BILL_HEADERS,
        _ => &[],
    }
}

/// `total-doctors` -> `Total doctors`
fn counter_label(element: &str) -> String {
    let spaced = element.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn action_text(action: &RowAction) -> String {
    match action {
        RowAction::Button { label, action } => {
            let (Action::Edit(id) | Action::Delete(id) | Action::Pay(id)) = action;
            format!("[{} #{}]", label, id)
        }
        RowAction::Note(text) => (*text).to_string(),
    }
}

fn plain_text(cell: &Cell) -> String {
    match cell {
        Cell::Actions(actions) => actions.iter().map(action_text).collect::<Vec<_>>().join(" "),
        other => other.text(),
    }
}

fn styled(cell: &Cell, padded: &str) -> String {
    match cell {
        Cell::Text(_) => padded.to_string(),
        Cell::Badge { class, .. } => {
            if class.ends_with("-available") || class.ends_with("-paid") {
                padded.green().bold().to_string()
            } else {
                padded.red().bold().to_string()
            }
        }
        Cell::Actions(_) => padded.dimmed().to_string(),
    }
}

pub struct TerminalDocument {
    fields: MemoryDocument,
    spinner: Mutex<Option<ProgressBar>>,
    assume_yes: bool,
    failed: AtomicBool,
}

impl TerminalDocument {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            fields: MemoryDocument::new(),
            spinner: Mutex::new(None),
            assume_yes,
            failed: AtomicBool::new(false),
        }
    }

    /// Whether any error notification was shown.
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn options(&self, select: &str) -> Vec<SelectOption> {
        self.fields.options(select)
    }

    fn start_spinner(&self) {
        let mut spinner = self.spinner.lock();
        if spinner.is_some() {
            return;
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message("Loading...");
        bar.enable_steady_tick(Duration::from_millis(80));
        *spinner = Some(bar);
    }

    fn stop_spinner(&self) {
        if let Some(bar) = self.spinner.lock().take() {
            bar.finish_and_clear();
        }
    }

    fn print_table(&self, table: &str, rows: &[TableRow]) {
        let headers = table_headers(table);

        let mut widths: Vec<usize> = headers.iter().map(|h| measure_text_width(h)).collect();
        for row in rows {
            if let TableRow::Cells(cells) = row {
                for (index, cell) in cells.iter().enumerate() {
                    let width = measure_text_width(&plain_text(cell));
                    match widths.get_mut(index) {
                        Some(current) => *current = (*current).max(width),
                        None => widths.push(width),
                    }
                }
            }
        }

        println!();
        if !headers.is_empty() {
            let line = headers
                .iter()
                .zip(&widths)
                .map(|(header, width)| pad_str(header, *width, Alignment::Left, None).to_string())
                .collect::<Vec<_>>()
                .join(COLUMN_GAP);
            println!("{}", line.bold().underline());
        }

        for row in rows {
            match row {
                TableRow::Placeholder { message, .. } => println!("{}", message.italic().dimmed()),
                TableRow::Cells(cells) => {
                    let line = cells
                        .iter()
                        .zip(&widths)
                        .map(|(cell, width)| {
                            let text = plain_text(cell);
                            styled(cell, &pad_str(&text, *width, Alignment::Left, None))
                        })
                        .collect::<Vec<_>>()
                        .join(COLUMN_GAP);
                    println!("{}", line);
                }
            }
        }
        println!();
    }
}

impl Document for TerminalDocument {
    fn value(&self, field: &str) -> String {
        self.fields.value(field)
    }

    fn set_value(&self, field: &str, value: &str) {
        self.fields.set_value(field, value);
    }

    fn is_checked(&self, field: &str) -> bool {
        self.fields.is_checked(field)
    }

    fn set_checked(&self, field: &str, checked: bool) {
        self.fields.set_checked(field, checked);
    }

    fn is_hidden(&self, element: &str) -> bool {
        self.fields.is_hidden(element)
    }

    fn set_hidden(&self, element: &str, hidden: bool) {
        if element == BUSY_ELEMENT {
            if hidden {
                self.stop_spinner();
            } else {
                self.start_spinner();
            }
        }
        self.fields.set_hidden(element, hidden);
    }

    fn is_active(&self, element: &str) -> bool {
        self.fields.is_active(element)
    }

    fn set_active(&self, element: &str, active: bool) {
        self.fields.set_active(element, active);
    }

    fn render_rows(&self, table: &str, rows: Vec<TableRow>) {
        self.print_table(table, &rows);
        self.fields.render_rows(table, rows);
    }

    fn set_options(&self, select: &str, options: Vec<SelectOption>) {
        self.fields.set_options(select, options);
    }

    fn set_text(&self, element: &str, text: &str) {
        println!("  {:<20} {}", counter_label(element), text.bright_white().bold());
        self.fields.set_text(element, text);
    }

    fn attribute(&self, element: &str, name: &str) -> Option<String> {
        self.fields.attribute(element, name)
    }

    fn set_attribute(&self, element: &str, name: &str, value: &str) {
        self.fields.set_attribute(element, name, value);
    }

    fn scroll_into_view(&self, element: &str) {
        self.fields.scroll_into_view(element);
    }

    fn show_toast(&self, message: &str, kind: NotificationKind) {
        // Keep the spinner line from swallowing the message
        self.stop_spinner();
        match kind {
            NotificationKind::Success => eprintln!("✅ {}", message.bright_green()),
            NotificationKind::Info => eprintln!("ℹ️  {}", message.bright_blue()),
            NotificationKind::Error => {
                self.failed.store(true, Ordering::SeqCst);
                eprintln!("❌ {}", message.bright_red());
            }
        }
        self.fields.show_toast(message, kind);
    }

    fn dismiss_toast(&self) {
        self.fields.dismiss_toast();
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}
