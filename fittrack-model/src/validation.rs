//! Field rules for the `validator` derives and helpers for reading the
//! resulting [`ValidationErrors`].
//!
//! A rejected account creation serializes as
//! `{"name": [...], "fitness_profile": {"height": [...]}}`, each entry being
//! a `{code, message, params}` object.

use std::borrow::Cow;

use chrono::NaiveDate;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::{
    choices::{FitnessGoal, Gender},
    mobile_number::MobileNumber,
};

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

pub const REQUIRED: &str = "This field is required.";
pub const DATE_OF_BIRTH_IN_FUTURE: &str = "Date of birth must be in the past.";
pub const HEIGHT_NOT_POSITIVE: &str = "Height must be a positive value.";
pub const WEIGHT_NOT_POSITIVE: &str = "Weight must be a positive value.";
pub const NAME_TOO_LONG: &str = "Ensure this field has no more than 255 characters.";
pub const VALUE_TOO_LARGE: &str = "Ensure this value is less than or equal to 4294967295.";

/// Errors found while decoding fields, before any rule ran. They take the
/// place of whatever the rules report for the same field.
pub type ReadErrors = Vec<(&'static str, ValidationError)>;

pub fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

pub fn validate_date_of_birth(value: &NaiveDate, today: &NaiveDate) -> Result<(), ValidationError> {
    if value >= today {
        Err(error("date_of_birth", DATE_OF_BIRTH_IN_FUTURE))
    } else {
        Ok(())
    }
}

pub fn validate_mobile_number(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<MobileNumber>()
        .map(|_| ())
        .map_err(|e| error("mobile_number", e.to_string()))
}

pub fn validate_gender(code: &str) -> Result<(), ValidationError> {
    code.parse::<Gender>()
        .map(|_| ())
        .map_err(|_| invalid_choice(code))
}

pub fn validate_goal(code: &str) -> Result<(), ValidationError> {
    code.parse::<FitnessGoal>()
        .map(|_| ())
        .map_err(|_| invalid_choice(code))
}

/// Upper bound of the unsigned measurement columns; the lower bound is a
/// `range` rule on the field.
pub fn validate_fits_u32(value: impl std::borrow::Borrow<i64>) -> Result<(), ValidationError> {
    if *value.borrow() > i64::from(u32::MAX) {
        Err(error("max_value", VALUE_TOO_LARGE))
    } else {
        Ok(())
    }
}

fn invalid_choice(code: &str) -> ValidationError {
    error("invalid_choice", format!("\"{}\" is not a valid choice.", code))
}

pub(crate) fn replace_field(errors: &mut ValidationErrors, field: &'static str, error: ValidationError) {
    errors.errors_mut().remove(field);
    errors.add(field, error);
}

pub(crate) fn nest(errors: &mut ValidationErrors, field: &'static str, nested: ValidationErrors) {
    errors
        .errors_mut()
        .insert(field.into(), ValidationErrorsKind::Struct(Box::new(nested)));
}

pub(crate) fn non_field(error: ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(NON_FIELD_ERRORS, error);
    errors
}

/// Messages recorded directly on `field`.
pub fn field_messages(errors: &ValidationErrors, field: &str) -> Vec<String> {
    match errors.errors().get(field) {
        Some(ValidationErrorsKind::Field(errors)) => errors
            .iter()
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Errors of the sub-payload stored under `field`.
pub fn nested_errors<'a>(errors: &'a ValidationErrors, field: &str) -> Option<&'a ValidationErrors> {
    match errors.errors().get(field) {
        Some(ValidationErrorsKind::Struct(nested)) => Some(nested),
        _ => None,
    }
}

/// Names of the fields with errors, sorted.
pub fn error_fields(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<String> = errors.errors().keys().map(|k| k.to_string()).collect();
    fields.sort();
    fields
}
