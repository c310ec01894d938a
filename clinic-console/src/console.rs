//! Console assembly: one document, one busy flag, one notification element
//! and one gateway shared by every controller.

use std::sync::Arc;

use config_engine::ConsoleConfig;
use error_common::Result;
use tracing::info;

use crate::busy::BusyIndicator;
use crate::controllers::appointments::{self, DATE_FIELD};
use crate::controllers::{
    AppointmentController, BillController, ConsoleContext, DoctorController, PatientController,
};
use crate::dashboard::Dashboard;
use crate::document::Document;
use crate::gateway::Gateway;
use crate::navigation::{Navigator, Section};
use crate::notification::NotificationService;

pub struct ClinicConsole {
    context: ConsoleContext,
    busy: Arc<BusyIndicator>,
    pub doctors: DoctorController,
    pub patients: PatientController,
    pub appointments: AppointmentController,
    pub bills: BillController,
    pub dashboard: Dashboard,
    pub navigator: Navigator,
}

impl ClinicConsole {
    /// Wire every component against `document`. Nothing is fetched yet.
    pub fn new(config: &ConsoleConfig, document: Arc<dyn Document>) -> Result<Self> {
        let busy = Arc::new(BusyIndicator::new(Arc::clone(&document)));
        let notifier = Arc::new(NotificationService::new(
            Arc::clone(&document),
            config.notification_duration(),
        ));
        let gateway = Arc::new(Gateway::new(config, Arc::clone(&busy), Arc::clone(&notifier))?);
        let context = ConsoleContext::new(document, gateway, notifier);

        let doctors = DoctorController::new(context.clone());
        let patients = PatientController::new(context.clone());
        let appointments = AppointmentController::new(context.clone());
        let bills = BillController::new(context.clone());
        let dashboard = Dashboard::new(context.clone());
        let navigator = Navigator::new(
            Arc::clone(&context.document),
            doctors.clone(),
            patients.clone(),
            appointments.clone(),
            dashboard.clone(),
        );

        Ok(Self {
            context,
            busy,
            doctors,
            patients,
            appointments,
            bills,
            dashboard,
            navigator,
        })
    }

    pub fn context(&self) -> &ConsoleContext {
        &self.context
    }

    pub fn busy(&self) -> &BusyIndicator {
        &self.busy
    }

    pub async fn activate(&self, section: Section) {
        self.navigator.activate(section).await;
    }

    /// Page-load setup: date constraint, doctors list and dashboard.
    pub async fn initialize(&self) {
        self.context
            .document
            .set_attribute(DATE_FIELD, "min", &appointments::today());

        self.doctors.load().await;
        // Failure is already shown as a notification
        let _ = self.dashboard.refresh().await;

        info!("Clinic Management System initialized");
        info!(api_gateway = %self.context.gateway.base_url(), "API gateway");
    }
}
