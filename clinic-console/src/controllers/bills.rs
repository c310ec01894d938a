//! Bills view.
//!
//! Bills are never listed wholesale: the table only ever shows the result of
//! a search by patient id, and every mutation re-runs that search.

use error_common::{ConsoleError, Result};
use logger_redacted::redacted_debug;
use tracing::{debug, info};

use crate::controllers::ConsoleContext;
use crate::document::{Action, Cell, Document, RowAction, TableRow};
use crate::form::{parse_number, FormEvent};
use crate::gateway::RequestOptions;
use crate::models::{Bill, BillRequest, BillStatus};

pub const BILLS_TABLE: &str = "bills-tbody";
pub const BILL_COLUMNS: usize = 6;
pub const SEARCH_FIELD: &str = "search-patient-id";
pub const ADD_FORM: &str = "add-bill-form";
pub const APPOINTMENT_FIELD: &str = "bill-appointment-id";
pub const PATIENT_FIELD: &str = "bill-patient-id";

const BILLS_ENDPOINT: &str = "/bills";

impl Bill {
    pub fn to_row(&self) -> TableRow {
        let class = match self.status {
            BillStatus::Paid => "status-paid",
            BillStatus::Unpaid => "status-unpaid",
        };
        let settle = match self.status {
            BillStatus::Unpaid => RowAction::Button {
                label: "Mark as Paid",
                action: Action::Pay(self.id),
            },
            BillStatus::Paid => RowAction::Note("✓ Paid"),
        };

        TableRow::Cells(vec![
            Cell::from(self.id.to_string()),
            Cell::from(self.appointment_id.to_string()),
            Cell::from(self.patient_id.to_string()),
            Cell::from(self.display_amount()),
            Cell::Badge {
                text: self.status.to_string(),
                class,
            },
            Cell::Actions(vec![
                settle,
                RowAction::Button {
                    label: "Delete",
                    action: Action::Delete(self.id),
                },
            ]),
        ])
    }
}

#[derive(Clone)]
pub struct BillController {
    ctx: ConsoleContext,
}

impl BillController {
    pub fn new(ctx: ConsoleContext) -> Self {
        Self { ctx }
    }

    fn document(&self) -> &dyn Document {
        self.ctx.document.as_ref()
    }

    /// Explain that bills are searched, not listed. Makes no request.
    pub fn load_all(&self) {
        self.document().render_rows(
            BILLS_TABLE,
            vec![TableRow::placeholder(
                "No bills to display. Create a bill or search by patient ID.",
                BILL_COLUMNS,
            )],
        );
        self.ctx
            .notifier
            .info("Bills are loaded by patient ID. Use the search feature.");
    }

    /// List the bills of the patient id currently in the search field.
    pub async fn search_by_patient(&self) -> Result<()> {
        let raw = self.document().value(SEARCH_FIELD);
        if raw.trim().is_empty() {
            return self
                .ctx
                .reject(Err(ConsoleError::Validation("Please enter a patient ID".to_string())));
        }
        let patient_id: i64 = self.ctx.reject(parse_number("Patient ID", &raw))?;

        let endpoint = format!("{}/patient/{}", BILLS_ENDPOINT, patient_id);
        let rows = match self.ctx.gateway.fetch::<Vec<Bill>>(&endpoint).await {
            Ok(bills) if bills.is_empty() => vec![TableRow::placeholder(
                format!("No bills found for patient ID: {}", raw.trim()),
                BILL_COLUMNS,
            )],
            Ok(bills) => bills.iter().map(Bill::to_row).collect(),
            Err(err) => {
                self.document().render_rows(
                    BILLS_TABLE,
                    vec![TableRow::placeholder("Error loading bills", BILL_COLUMNS)],
                );
                return Err(err);
            }
        };
        self.document().render_rows(BILLS_TABLE, rows);
        Ok(())
    }

    pub fn show_add_form(&self) {
        self.document().set_hidden(ADD_FORM, false);
    }

    pub fn hide_add_form(&self) {
        self.document().set_hidden(ADD_FORM, true);
        self.document().set_value(APPOINTMENT_FIELD, "");
        self.document().set_value(PATIENT_FIELD, "");
    }

    /// Create a bill for an appointment, then show that patient's bills.
    pub async fn add(&self, event: &mut FormEvent) -> Result<()> {
        event.prevent_default();

        let request = self.ctx.reject(self.read_add_form())?;
        let options = RequestOptions::post()
            .query("appointmentId", request.appointment_id)
            .query("patientId", request.patient_id);
        self.ctx.gateway.request(BILLS_ENDPOINT, options).await?;

        info!(appointment_id = request.appointment_id, "Bill created");
        self.ctx.notifier.success("Bill created successfully!");
        self.hide_add_form();
        self.document()
            .set_value(SEARCH_FIELD, &request.patient_id.to_string());
        self.refresh_search().await;
        Ok(())
    }

    fn read_add_form(&self) -> Result<BillRequest> {
        Ok(BillRequest {
            appointment_id: parse_number("Appointment ID", &self.document().value(APPOINTMENT_FIELD))?,
            patient_id: parse_number("Patient ID", &self.document().value(PATIENT_FIELD))?,
        })
    }

    pub async fn pay_bill(&self, id: i64) -> Result<()> {
        let endpoint = format!("{}/{}/pay", BILLS_ENDPOINT, id);
        self.ctx
            .gateway
            .request(&endpoint, RequestOptions::put())
            .await?;

        info!(id, "Bill paid");
        self.ctx.notifier.success("Bill marked as paid!");
        self.refresh_current_search().await;
        Ok(())
    }

    /// Delete after confirmation. Declining is not an error.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self
            .document()
            .confirm("Are you sure you want to delete this bill?")
        {
            debug!(id, "Bill delete declined");
            return Ok(());
        }

        let endpoint = format!("{}/{}", BILLS_ENDPOINT, id);
        self.ctx
            .gateway
            .request(&endpoint, RequestOptions::delete())
            .await?;

        info!(id, "Bill deleted");
        self.ctx.notifier.success("Bill deleted successfully!");
        self.refresh_current_search().await;
        Ok(())
    }

    /// Re-run the search only when a patient id is already filled in.
    async fn refresh_current_search(&self) {
        if self.document().value(SEARCH_FIELD).trim().is_empty() {
            return;
        }
        self.refresh_search().await;
    }

    async fn refresh_search(&self) {
        // The mutation itself went through; a failed refresh is reported on its own
        if let Err(err) = self.search_by_patient().await {
            redacted_debug!("Bill search refresh failed: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn bill(status: BillStatus) -> Bill {
        Bill {
            id: 5,
            appointment_id: 3,
            patient_id: 7,
            amount: Decimal::new(50000, 2),
            status,
        }
    }

    #[test]
    fn test_unpaid_row_offers_payment() {
        let row = bill(BillStatus::Unpaid).to_row();
        assert_eq!(
            row.texts(),
            vec!["5", "3", "7", "$500.00", "UNPAID", "Mark as Paid Delete"]
        );
    }

    #[test]
    fn test_paid_row_shows_note() {
        let TableRow::Cells(cells) = bill(BillStatus::Paid).to_row() else {
            panic!("expected cells");
        };
        assert_eq!(
            cells[4],
            Cell::Badge {
                text: "PAID".to_string(),
                class: "status-paid"
            }
        );
        assert_eq!(
            cells[5],
            Cell::Actions(vec![
                RowAction::Note("✓ Paid"),
                RowAction::Button {
                    label: "Delete",
                    action: Action::Delete(5)
                },
            ])
        );
    }
}
