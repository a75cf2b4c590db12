//! Lenient reading of JSON request bodies.
//!
//! Fields are decoded one at a time, so a missing or mistyped value becomes an
//! error on that field and the remaining fields still get validated.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::ValidationError;

use crate::validation::{error, ReadErrors};

pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NOT_AN_INTEGER: &str = "A valid integer is required.";
pub const BAD_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
pub const NOT_AN_OBJECT: &str = "Invalid data. Expected a dictionary.";

pub(crate) struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    errors: ReadErrors,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(value: &'a Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(object) => Ok(Self {
                object,
                errors: ReadErrors::new(),
            }),
            _ => Err(error("invalid", NOT_AN_OBJECT)),
        }
    }

    /// The raw value of `field`; null counts as absent.
    pub(crate) fn get(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field).filter(|value| !value.is_null())
    }

    /// Decodes `field`. A value of the wrong shape is recorded with the
    /// `invalid` message and read as absent.
    pub(crate) fn read<T: DeserializeOwned>(
        &mut self,
        field: &'static str,
        invalid: &'static str,
    ) -> Option<T> {
        let value = self.get(field)?;
        match serde_json::from_value(value.clone()) {
            Ok(value) => Some(value),
            Err(_) => {
                self.errors.push((field, error("invalid", invalid)));
                None
            }
        }
    }

    pub(crate) fn finish(self) -> ReadErrors {
        self.errors
    }
}
