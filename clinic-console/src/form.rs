//! Form submission boundary.
//!
//! Field values arrive as text. Everything numeric or date-shaped is parsed
//! here, and payloads are checked against the same constraints the markup
//! declares, so a bad value fails locally with [`ConsoleError::Validation`]
//! instead of reaching the backend.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use error_common::{ConsoleError, Result};

use crate::models::{AppointmentForm, DoctorForm, PatientForm};

pub const MIN_AGE: i32 = 0;
pub const MAX_AGE: i32 = 150;

/// A form submit event.
///
/// Handlers call [`FormEvent::prevent_default`] before anything else so the
/// page never performs its own navigation-style submission.
#[derive(Debug, Default)]
pub struct FormEvent {
    default_prevented: bool,
}

impl FormEvent {
    pub fn submit() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Checks a payload against the form's native constraints.
pub trait FormValidation {
    fn validate(&self) -> Result<()>;
}

/// Fail with a validation error unless `$predicate` holds.
#[macro_export]
macro_rules! validate_field {
    ($field:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            return Err($crate::ConsoleError::Validation($message.to_string()));
        }
    };
}

/// Fail unless the string field is non-blank.
#[macro_export]
macro_rules! validate_required {
    ($field:expr, $message:expr) => {
        $crate::validate_field!($field, !$field.trim().is_empty(), $message);
    };
}

/// Fail unless `$min <= $field <= $max`.
#[macro_export]
macro_rules! validate_range {
    ($field:expr, $min:expr, $max:expr, $message:expr) => {
        $crate::validate_field!($field, ($min..=$max).contains(&$field), $message);
    };
}

impl FormValidation for DoctorForm {
    fn validate(&self) -> Result<()> {
        validate_required!(self.name, "Name is required");
        validate_required!(self.specialization, "Specialization is required");
        Ok(())
    }
}

impl FormValidation for PatientForm {
    fn validate(&self) -> Result<()> {
        validate_required!(self.name, "Name is required");
        validate_range!(self.age, MIN_AGE, MAX_AGE, "Age must be between 0 and 150");
        validate_required!(self.gender, "Gender is required");
        Ok(())
    }
}

impl FormValidation for AppointmentForm {
    fn validate(&self) -> Result<()> {
        validate_field!(self.patient_id, self.patient_id > 0, "Please select a patient");
        validate_field!(self.doctor_id, self.doctor_id > 0, "Please select a doctor");
        Ok(())
    }
}

/// Parse a numeric field, naming it in the error.
pub fn parse_number<T>(label: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConsoleError::Validation(format!("{} is required", label)));
    }
    trimmed
        .parse::<T>()
        .map_err(|_| ConsoleError::Validation(format!("{} must be a whole number", label)))
}

/// Parse the selected value of an entity dropdown; the empty prompt entry
/// means nothing was picked.
pub fn parse_selection(raw: &str, missing: &str) -> Result<i64> {
    if raw.trim().is_empty() {
        return Err(ConsoleError::Validation(missing.to_string()));
    }
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ConsoleError::Validation(missing.to_string()))
}

/// Parse a `YYYY-MM-DD` date field, honouring its `min` constraint.
pub fn parse_date(label: &str, raw: &str, min: Option<&str>) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConsoleError::Validation(format!("{} is required", label)));
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        ConsoleError::Validation(format!("{} must be a date (YYYY-MM-DD)", label))
    })?;

    if let Some(min) = min.and_then(|m| NaiveDate::parse_from_str(m, "%Y-%m-%d").ok()) {
        validate_field!(
            date,
            date >= min,
            format!("{} cannot be before {}", label, min)
        );
    }
    Ok(date)
}
