use error_common::Result;

use crate::controllers::{CrudEntity, EditableEntity, EntityController, EntityView};
use crate::document::{Action, Cell, Document, RowAction, TableRow};
use crate::form::parse_number;
use crate::models::{Doctor, DoctorForm};

pub type DoctorController = EntityController<Doctor>;

pub const NAME_FIELD: &str = "doctor-name";
pub const SPECIALIZATION_FIELD: &str = "doctor-specialization";
pub const AVAILABLE_FIELD: &str = "doctor-available";

pub const UPDATE_ID_FIELD: &str = "update-doctor-id";
pub const UPDATE_NAME_FIELD: &str = "update-doctor-name";
pub const UPDATE_SPECIALIZATION_FIELD: &str = "update-doctor-specialization";
pub const UPDATE_AVAILABLE_FIELD: &str = "update-doctor-available";

impl CrudEntity for Doctor {
    type Form = DoctorForm;

    const VIEW: EntityView = EntityView {
        name: "doctor",
        endpoint: "/doctors",
        table: "doctors-tbody",
        columns: 5,
        add_form: "add-doctor-form",
        edit_form: Some("update-doctor-form"),
        empty_message: "No doctors found. Add a doctor to get started.",
        error_message: "Error loading doctors",
        added: "Doctor added successfully!",
        deleted: "Doctor deleted successfully!",
        delete_prompt: "Are you sure you want to delete this doctor?",
    };

    fn to_row(&self) -> TableRow {
        let badge = if self.available {
            Cell::Badge {
                text: "Available".to_string(),
                class: "status-available",
            }
        } else {
            Cell::Badge {
                text: "Unavailable".to_string(),
                class: "status-unavailable",
            }
        };

        TableRow::Cells(vec![
            Cell::from(self.id.to_string()),
            Cell::from(self.name.as_str()),
            Cell::from(self.specialization.as_str()),
            badge,
            Cell::Actions(vec![
                RowAction::Button {
                    label: "Edit",
                    action: Action::Edit(self.id),
                },
                RowAction::Button {
                    label: "Delete",
                    action: Action::Delete(self.id),
                },
            ]),
        ])
    }

    fn read_add_form(document: &dyn Document) -> Result<DoctorForm> {
        Ok(DoctorForm {
            name: document.value(NAME_FIELD),
            specialization: document.value(SPECIALIZATION_FIELD),
            available: document.is_checked(AVAILABLE_FIELD),
        })
    }

    fn clear_add_form(document: &dyn Document) {
        document.set_value(NAME_FIELD, "");
        document.set_value(SPECIALIZATION_FIELD, "");
        document.set_checked(AVAILABLE_FIELD, true);
    }
}

impl EditableEntity for Doctor {
    const UPDATED: &'static str = "Doctor updated successfully!";

    fn populate_edit_form(&self, document: &dyn Document) {
        document.set_value(UPDATE_ID_FIELD, &self.id.to_string());
        document.set_value(UPDATE_NAME_FIELD, &self.name);
        document.set_value(UPDATE_SPECIALIZATION_FIELD, &self.specialization);
        document.set_checked(UPDATE_AVAILABLE_FIELD, self.available);
    }

    fn read_edit_form(document: &dyn Document) -> Result<(i64, DoctorForm)> {
        let id = parse_number("Doctor ID", &document.value(UPDATE_ID_FIELD))?;
        Ok((
            id,
            DoctorForm {
                name: document.value(UPDATE_NAME_FIELD),
                specialization: document.value(UPDATE_SPECIALIZATION_FIELD),
                available: document.is_checked(UPDATE_AVAILABLE_FIELD),
            },
        ))
    }
}
