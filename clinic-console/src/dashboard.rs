//! Summary counters derived from the doctor, patient and appointment lists.

use error_common::{log_error, Result};
use tracing::debug;

use crate::controllers::{ConsoleContext, CrudEntity};
use crate::models::{Appointment, Doctor, Patient};

pub const TOTAL_DOCTORS: &str = "total-doctors";
pub const TOTAL_PATIENTS: &str = "total-patients";
pub const TOTAL_APPOINTMENTS: &str = "total-appointments";
pub const AVAILABLE_DOCTORS: &str = "available-doctors";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_doctors: usize,
    pub total_patients: usize,
    pub total_appointments: usize,
    pub available_doctors: usize,
}

impl DashboardSummary {
    pub fn from_collections(
        doctors: &[Doctor],
        patients: &[Patient],
        appointments: &[Appointment],
    ) -> Self {
        Self {
            total_doctors: doctors.len(),
            total_patients: patients.len(),
            total_appointments: appointments.len(),
            available_doctors: doctors.iter().filter(|d| d.available).count(),
        }
    }
}

#[derive(Clone)]
pub struct Dashboard {
    ctx: ConsoleContext,
}

impl Dashboard {
    pub fn new(ctx: ConsoleContext) -> Self {
        Self { ctx }
    }

    /// Recompute every counter and confirm the refresh either way.
    ///
    /// The three lists are fetched concurrently. On failure the counters keep
    /// their previous values.
    pub async fn refresh(&self) -> Result<DashboardSummary> {
        let gateway = &self.ctx.gateway;
        let fetched = tokio::try_join!(
            gateway.fetch::<Vec<Doctor>>(Doctor::VIEW.endpoint),
            gateway.fetch::<Vec<Patient>>(Patient::VIEW.endpoint),
            gateway.fetch::<Vec<Appointment>>(Appointment::VIEW.endpoint),
        );

        let (doctors, patients, appointments) = match fetched {
            Ok(lists) => lists,
            Err(err) => {
                log_error("dashboard refresh", &err);
                self.ctx.notifier.error("Error loading dashboard data");
                return Err(err);
            }
        };

        let summary = DashboardSummary::from_collections(&doctors, &patients, &appointments);
        let document = &self.ctx.document;
        document.set_text(TOTAL_DOCTORS, &summary.total_doctors.to_string());
        document.set_text(TOTAL_PATIENTS, &summary.total_patients.to_string());
        document.set_text(TOTAL_APPOINTMENTS, &summary.total_appointments.to_string());
        document.set_text(AVAILABLE_DOCTORS, &summary.available_doctors.to_string());
        debug!(?summary, "Dashboard counters updated");

        self.ctx.notifier.info("Dashboard refreshed!");
        Ok(summary)
    }
}
