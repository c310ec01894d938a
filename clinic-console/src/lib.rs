//! Clinic administration console
//!
//! The orchestration layer between a rendered console and the clinic REST
//! backend. Front ends implement [`Document`] on top of whatever they draw;
//! this crate reads form fields from it, calls the backend through a single
//! [`Gateway`] and renders results back into it.
//!
//! # Components
//!
//! - [`NotificationService`]: one transient message at a time, auto-dismissed
//! - [`BusyIndicator`]: global loading overlay, held for the length of a call
//! - [`Gateway`]: every backend call; uniform busy/notify/log/re-raise handling
//! - [`controllers`]: doctors, patients, appointments and bills views
//! - [`Dashboard`]: summary counters
//! - [`Navigator`]: section switching
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use clinic_console::{ClinicConsole, MemoryDocument, Section};
//! use config_engine::ConsoleConfig;
//!
//! # async fn run() -> clinic_console::Result<()> {
//! let document = Arc::new(MemoryDocument::new());
//! let console = ClinicConsole::new(&ConsoleConfig::default(), document.clone())?;
//!
//! console.initialize().await;
//! console.activate(Section::Patients).await;
//! println!("{:?}", document.rows("patients-tbody"));
//! # Ok(())
//! # }
//! ```

pub mod busy;
pub mod console;
pub mod controllers;
pub mod dashboard;
pub mod document;
pub mod form;
pub mod gateway;
pub mod memory;
pub mod models;
pub mod navigation;
pub mod notification;

pub use busy::{BusyGuard, BusyIndicator, BUSY_ELEMENT};
pub use console::ClinicConsole;
pub use controllers::{
    AppointmentController, BillController, ConsoleContext, CrudEntity, DoctorController,
    EditableEntity, EntityController, EntityView, PatientController,
};
pub use dashboard::{Dashboard, DashboardSummary};
pub use document::{Action, Cell, Document, RowAction, SelectOption, TableRow};
pub use form::{FormEvent, FormValidation};
pub use gateway::{Gateway, RequestOptions};
pub use memory::{MemoryDocument, Toast};
pub use models::*;
pub use navigation::{Navigator, Section};
pub use notification::{NotificationKind, NotificationService};

pub use error_common::{ConsoleError, Result};
