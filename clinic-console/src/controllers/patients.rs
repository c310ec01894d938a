use error_common::Result;

use crate::controllers::{CrudEntity, EditableEntity, EntityController, EntityView};
use crate::document::{Action, Cell, Document, RowAction, TableRow};
use crate::form::parse_number;
use crate::models::{Patient, PatientForm};

pub type PatientController = EntityController<Patient>;

pub const NAME_FIELD: &str = "patient-name";
pub const AGE_FIELD: &str = "patient-age";
pub const GENDER_FIELD: &str = "patient-gender";

pub const UPDATE_ID_FIELD: &str = "update-patient-id";
pub const UPDATE_NAME_FIELD: &str = "update-patient-name";
pub const UPDATE_AGE_FIELD: &str = "update-patient-age";
pub const UPDATE_GENDER_FIELD: &str = "update-patient-gender";

impl CrudEntity for Patient {
    type Form = PatientForm;

    const VIEW: EntityView = EntityView {
        name: "patient",
        endpoint: "/patients",
        table: "patients-tbody",
        columns: 5,
        add_form: "add-patient-form",
        edit_form: Some("update-patient-form"),
        empty_message: "No patients found. Add a patient to get started.",
        error_message: "Error loading patients",
        added: "Patient added successfully!",
        deleted: "Patient deleted successfully!",
        delete_prompt: "Are you sure you want to delete this patient?",
    };

    fn to_row(&self) -> TableRow {
        TableRow::Cells(vec![
            Cell::from(self.id.to_string()),
            Cell::from(self.name.as_str()),
            Cell::from(self.age.to_string()),
            Cell::from(self.gender.as_str()),
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

    fn read_add_form(document: &dyn Document) -> Result<PatientForm> {
        Ok(PatientForm {
            name: document.value(NAME_FIELD),
            age: parse_number("Age", &document.value(AGE_FIELD))?,
            gender: document.value(GENDER_FIELD),
        })
    }

    fn clear_add_form(document: &dyn Document) {
        document.set_value(NAME_FIELD, "");
        document.set_value(AGE_FIELD, "");
        document.set_value(GENDER_FIELD, "");
    }
}

impl EditableEntity for Patient {
    const UPDATED: &'static str = "Patient updated successfully!";

    fn populate_edit_form(&self, document: &dyn Document) {
        document.set_value(UPDATE_ID_FIELD, &self.id.to_string());
        document.set_value(UPDATE_NAME_FIELD, &self.name);
        document.set_value(UPDATE_AGE_FIELD, &self.age.to_string());
        document.set_value(UPDATE_GENDER_FIELD, &self.gender);
    }

    fn read_edit_form(document: &dyn Document) -> Result<(i64, PatientForm)> {
        let id = parse_number("Patient ID", &document.value(UPDATE_ID_FIELD))?;
        Ok((
            id,
            PatientForm {
                name: document.value(UPDATE_NAME_FIELD),
                age: parse_number("Age", &document.value(UPDATE_AGE_FIELD))?,
                gender: document.value(UPDATE_GENDER_FIELD),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;

    #[test]
    fn test_non_numeric_age_is_rejected() {
        let doc = MemoryDocument::new();
        doc.set_value(NAME_FIELD, "Jane Roe");
        doc.set_value(AGE_FIELD, "abc");
        doc.set_value(GENDER_FIELD, "Female");

        let err = Patient::read_add_form(&doc).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_row_layout() {
        let patient = Patient {
            id: 7,
            name: "Jane Roe".to_string(),
            age: 34,
            gender: "Female".to_string(),
        };
        assert_eq!(
            patient.to_row().texts(),
            vec!["7", "Jane Roe", "34", "Female", "Edit Delete"]
        );
    }
}
