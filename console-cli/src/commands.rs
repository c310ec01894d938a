//! Subcommands. Each one fills the same fields and fires the same controller
//! actions a click in the console would.

use anyhow::Context;
use clap::Subcommand;
use clinic_console::controllers::appointments::{self, DATE_FIELD, DOCTOR_SELECT, PATIENT_SELECT};
use clinic_console::controllers::{bills, doctors, patients};
use clinic_console::{ClinicConsole, Document, FormEvent, Section};
use dialoguer::Select;

use crate::terminal::TerminalDocument;

#[derive(Subcommand, Debug)]
pub enum DoctorCommand {
    /// List all doctors
    List,
    /// Register a doctor
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        specialization: String,
        /// Register the doctor as not taking appointments
        #[arg(long)]
        unavailable: bool,
    },
    /// Edit a doctor; omitted fields keep their current value
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        specialization: Option<String>,
        #[arg(long)]
        available: Option<bool>,
    },
    /// Delete a doctor
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum PatientCommand {
    /// List all patients
    List,
    /// Register a patient
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        gender: String,
    },
    /// Edit a patient; omitted fields keep their current value
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        gender: Option<String>,
    },
    /// Delete a patient
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum AppointmentCommand {
    /// List all appointments
    List,
    /// Book an appointment; prompts for patient and doctor when omitted
    Book {
        #[arg(long)]
        patient: Option<String>,
        #[arg(long)]
        doctor: Option<String>,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: String,
    },
    /// Cancel an appointment
    Cancel { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum BillCommand {
    /// Explain how bills are listed
    List,
    /// Show the bills of one patient
    Search { patient_id: String },
    /// Create a bill for an appointment
    Create {
        #[arg(long)]
        appointment: String,
        #[arg(long)]
        patient: String,
    },
    /// Mark a bill as paid
    Pay {
        id: i64,
        /// Patient whose bills are shown again afterwards
        #[arg(long)]
        patient: Option<String>,
    },
    /// Delete a bill
    Delete {
        id: i64,
        #[arg(long)]
        patient: Option<String>,
    },
}

pub async fn dashboard(console: &ClinicConsole) {
    console.activate(Section::Dashboard).await;
}

pub async fn run_doctors(
    console: &ClinicConsole,
    document: &TerminalDocument,
    command: DoctorCommand,
) -> clinic_console::Result<()> {
    let controller = &console.doctors;
    match command {
        DoctorCommand::List => controller.load().await,
        DoctorCommand::Add {
            name,
            specialization,
            unavailable,
        } => {
            controller.show_add_form();
            document.set_value(doctors::NAME_FIELD, &name);
            document.set_value(doctors::SPECIALIZATION_FIELD, &specialization);
            document.set_checked(doctors::AVAILABLE_FIELD, !unavailable);
            controller.add(&mut FormEvent::submit()).await?;
        }
        DoctorCommand::Edit {
            id,
            name,
            specialization,
            available,
        } => {
            controller.show_edit_form(id).await?;
            if let Some(name) = name {
                document.set_value(doctors::UPDATE_NAME_FIELD, &name);
            }
            if let Some(specialization) = specialization {
                document.set_value(doctors::UPDATE_SPECIALIZATION_FIELD, &specialization);
            }
            if let Some(available) = available {
                document.set_checked(doctors::UPDATE_AVAILABLE_FIELD, available);
            }
            controller.update(&mut FormEvent::submit()).await?;
        }
        DoctorCommand::Delete { id } => controller.delete(id).await?,
    }
    Ok(())
}

pub async fn run_patients(
    console: &ClinicConsole,
    document: &TerminalDocument,
    command: PatientCommand,
) -> clinic_console::Result<()> {
    let controller = &console.patients;
    match command {
        PatientCommand::List => controller.load().await,
        PatientCommand::Add { name, age, gender } => {
            controller.show_add_form();
            document.set_value(patients::NAME_FIELD, &name);
            document.set_value(patients::AGE_FIELD, &age);
            document.set_value(patients::GENDER_FIELD, &gender);
            controller.add(&mut FormEvent::submit()).await?;
        }
        PatientCommand::Edit {
            id,
            name,
            age,
            gender,
        } => {
            controller.show_edit_form(id).await?;
            if let Some(name) = name {
                document.set_value(patients::UPDATE_NAME_FIELD, &name);
            }
            if let Some(age) = age {
                document.set_value(patients::UPDATE_AGE_FIELD, &age);
            }
            if let Some(gender) = gender {
                document.set_value(patients::UPDATE_GENDER_FIELD, &gender);
            }
            controller.update(&mut FormEvent::submit()).await?;
        }
        PatientCommand::Delete { id } => controller.delete(id).await?,
    }
    Ok(())
}

pub async fn run_appointments(
    console: &ClinicConsole,
    document: &TerminalDocument,
    command: AppointmentCommand,
) -> anyhow::Result<()> {
    let controller = &console.appointments;
    match command {
        AppointmentCommand::List => controller.load().await,
        AppointmentCommand::Book {
            patient,
            doctor,
            date,
        } => {
            document.set_attribute(DATE_FIELD, "min", &appointments::today());
            controller.show_add_form().await?;

            let patient = match patient {
                Some(patient) => patient,
                None => pick(document, PATIENT_SELECT, "Patient")?,
            };
            let doctor = match doctor {
                Some(doctor) => doctor,
                None => pick(document, DOCTOR_SELECT, "Doctor")?,
            };
            document.set_value(PATIENT_SELECT, &patient);
            document.set_value(DOCTOR_SELECT, &doctor);
            document.set_value(DATE_FIELD, &date);
            controller.add(&mut FormEvent::submit()).await?;
        }
        AppointmentCommand::Cancel { id } => controller.delete(id).await?,
    }
    Ok(())
}

pub async fn run_bills(
    console: &ClinicConsole,
    document: &TerminalDocument,
    command: BillCommand,
) -> clinic_console::Result<()> {
    let controller = &console.bills;
    match command {
        BillCommand::List => controller.load_all(),
        BillCommand::Search { patient_id } => {
            document.set_value(bills::SEARCH_FIELD, &patient_id);
            controller.search_by_patient().await?;
        }
        BillCommand::Create {
            appointment,
            patient,
        } => {
            controller.show_add_form();
            document.set_value(bills::APPOINTMENT_FIELD, &appointment);
            document.set_value(bills::PATIENT_FIELD, &patient);
            controller.add(&mut FormEvent::submit()).await?;
        }
        BillCommand::Pay { id, patient } => {
            if let Some(patient) = patient {
                document.set_value(bills::SEARCH_FIELD, &patient);
            }
            controller.pay_bill(id).await?;
        }
        BillCommand::Delete { id, patient } => {
            if let Some(patient) = patient {
                document.set_value(bills::SEARCH_FIELD, &patient);
            }
            controller.delete(id).await?;
        }
    }
    Ok(())
}

/// Let the user choose from a dropdown the booking form just filled.
fn pick(document: &TerminalDocument, select: &str, prompt: &str) -> anyhow::Result<String> {
    // The leading entry is the empty "Select ..." prompt
    let choices: Vec<_> = document
        .options(select)
        .into_iter()
        .filter(|option| !option.value.is_empty())
        .collect();
    if choices.is_empty() {
        anyhow::bail!("No {} available to choose from", prompt.to_lowercase());
    }

    let labels: Vec<&str> = choices.iter().map(|option| option.label.as_str()).collect();
    let index = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()
        .with_context(|| format!("Failed to read {} selection", prompt.to_lowercase()))?;

    choices
        .get(index)
        .map(|option| option.value.clone())
        .context("Selection out of range")
}
