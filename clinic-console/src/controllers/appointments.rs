//! Appointment list and booking form.
//!
//! Appointments cannot be edited, only booked and cancelled. Opening the
//! booking form fills the patient and doctor dropdowns; only doctors that
//! are currently available can be picked.

use chrono::Local;
use error_common::Result;
use tracing::debug;

use crate::controllers::{ConsoleContext, CrudEntity, EntityController, EntityView};
use crate::document::{Action, Cell, Document, RowAction, SelectOption, TableRow};
use crate::form::{parse_date, parse_selection, FormEvent};
use crate::models::{Appointment, AppointmentForm, Doctor, Patient};

pub const PATIENT_SELECT: &str = "appointment-patient";
pub const DOCTOR_SELECT: &str = "appointment-doctor";
pub const DATE_FIELD: &str = "appointment-date";

impl CrudEntity for Appointment {
    type Form = AppointmentForm;

    const VIEW: EntityView = EntityView {
        name: "appointment",
        endpoint: "/appointments",
        table: "appointments-tbody",
        columns: 5,
        add_form: "add-appointment-form",
        edit_form: None,
        empty_message: "No appointments found. Book an appointment to get started.",
        error_message: "Error loading appointments",
        added: "Appointment booked successfully! Notification sent and bill created.",
        deleted: "Appointment cancelled successfully!",
        delete_prompt: "Are you sure you want to cancel this appointment?",
    };

    fn to_row(&self) -> TableRow {
        TableRow::Cells(vec![
            Cell::from(self.id.to_string()),
            Cell::from(self.patient_id.to_string()),
            Cell::from(self.doctor_id.to_string()),
            Cell::from(self.appointment_date.format("%Y-%m-%d").to_string()),
            Cell::Actions(vec![RowAction::Button {
                label: "Cancel",
                action: Action::Delete(self.id),
            }]),
        ])
    }

    fn read_add_form(document: &dyn Document) -> Result<AppointmentForm> {
        let patient_id = parse_selection(&document.value(PATIENT_SELECT), "Please select a patient")?;
        let doctor_id = parse_selection(&document.value(DOCTOR_SELECT), "Please select a doctor")?;
        let min = document.attribute(DATE_FIELD, "min");
        let appointment_date = parse_date(
            "Appointment date",
            &document.value(DATE_FIELD),
            min.as_deref(),
        )?;

        Ok(AppointmentForm {
            patient_id,
            doctor_id,
            appointment_date,
        })
    }

    fn clear_add_form(document: &dyn Document) {
        document.set_value(PATIENT_SELECT, "");
        document.set_value(DOCTOR_SELECT, "");
        document.set_value(DATE_FIELD, "");
    }
}

/// Dropdown entries for the patient picker
pub fn patient_options(patients: &[Patient]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::prompt("Select Patient"))
        .chain(patients.iter().map(|p| {
            SelectOption::new(p.id.to_string(), format!("{} (ID: {})", p.name, p.id))
        }))
        .collect()
}

/// Dropdown entries for the doctor picker; unavailable doctors are left out.
pub fn doctor_options(doctors: &[Doctor]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::prompt("Select Doctor"))
        .chain(doctors.iter().filter(|d| d.available).map(|d| {
            SelectOption::new(
                d.id.to_string(),
                format!("{} - {} (ID: {})", d.name, d.specialization, d.id),
            )
        }))
        .collect()
}

/// Today's date in the `min` attribute format of the date field
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[derive(Clone)]
pub struct AppointmentController {
    inner: EntityController<Appointment>,
}

impl AppointmentController {
    pub fn new(ctx: ConsoleContext) -> Self {
        Self {
            inner: EntityController::new(ctx),
        }
    }

    fn ctx(&self) -> &ConsoleContext {
        self.inner.context()
    }

    pub async fn load(&self) {
        self.inner.load().await;
    }

    /// Reveal the booking form and fill both dropdowns.
    ///
    /// Patients and doctors are fetched concurrently; if either call fails
    /// the dropdowns keep their previous options.
    pub async fn show_add_form(&self) -> Result<()> {
        self.inner.show_add_form();

        let gateway = &self.ctx().gateway;
        let (patients, doctors) = tokio::try_join!(
            gateway.fetch::<Vec<Patient>>(Patient::VIEW.endpoint),
            gateway.fetch::<Vec<Doctor>>(Doctor::VIEW.endpoint),
        )?;

        let document = &self.ctx().document;
        document.set_options(PATIENT_SELECT, patient_options(&patients));
        document.set_options(DOCTOR_SELECT, doctor_options(&doctors));
        debug!(
            patients = patients.len(),
            doctors = doctors.len(),
            "Booking form populated"
        );
        Ok(())
    }

    pub fn hide_add_form(&self) {
        self.inner.hide_add_form();
    }

    pub async fn add(&self, event: &mut FormEvent) -> Result<()> {
        self.inner.add(event).await
    }

    /// Cancel an appointment after confirmation.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.inner.delete(id).await
    }
}
