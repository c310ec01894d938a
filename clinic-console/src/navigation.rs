//! Section switching.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use error_common::ConsoleError;
use tracing::debug;

use crate::controllers::{AppointmentController, DoctorController, PatientController};
use crate::dashboard::Dashboard;
use crate::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Doctors,
    Patients,
    Appointments,
    Billing,
    Dashboard,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Doctors,
        Section::Patients,
        Section::Appointments,
        Section::Billing,
        Section::Dashboard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Doctors => "doctors",
            Section::Patients => "patients",
            Section::Appointments => "appointments",
            Section::Billing => "billing",
            Section::Dashboard => "dashboard",
        }
    }

    pub fn container_id(&self) -> String {
        format!("{}-section", self.as_str())
    }

    pub fn nav_button_id(&self) -> String {
        format!("nav-{}", self.as_str())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| ConsoleError::Validation(format!("Unknown section: {}", s)))
    }
}

/// Switches the visible section and loads its data.
#[derive(Clone)]
pub struct Navigator {
    document: Arc<dyn Document>,
    doctors: DoctorController,
    patients: PatientController,
    appointments: AppointmentController,
    dashboard: Dashboard,
}

impl Navigator {
    pub fn new(
        document: Arc<dyn Document>,
        doctors: DoctorController,
        patients: PatientController,
        appointments: AppointmentController,
        dashboard: Dashboard,
    ) -> Self {
        Self {
            document,
            doctors,
            patients,
            appointments,
            dashboard,
        }
    }

    pub async fn activate(&self, section: Section) {
        for other in Section::ALL {
            self.document.set_active(&other.container_id(), false);
            self.document.set_active(&other.nav_button_id(), false);
        }
        self.document.set_active(&section.container_id(), true);
        self.document.set_active(&section.nav_button_id(), true);
        debug!(%section, "Section activated");

        match section {
            Section::Doctors => self.doctors.load().await,
            Section::Patients => self.patients.load().await,
            Section::Appointments => self.appointments.load().await,
            // Bills are only ever fetched by an explicit patient search
            Section::Billing => {}
            Section::Dashboard => {
                // Failure is already shown as a notification
                let _ = self.dashboard.refresh().await;
            }
        }
    }
}
