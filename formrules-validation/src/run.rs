// Outcome of one validation run

use crate::{FieldError, FieldValue, FieldValues};
use indexmap::IndexMap;

/// Result of validating one set of values.
///
/// Each run starts from an empty error map; nothing carries over between runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationRun {
    values: FieldValues,
    errors: IndexMap<String, FieldError>,
}

impl ValidationRun {
    pub fn new(values: FieldValues) -> Self {
        Self {
            values,
            errors: IndexMap::new(),
        }
    }

    /// True iff no field failed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields that failed
    pub fn number_of_invalids(&self) -> usize {
        self.errors.len()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    /// Message recorded for a failed field
    pub fn message(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(|e| e.message.as_str())
    }

    pub fn errors(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.values()
    }

    /// Field -> message map of every failure
    pub fn messages(&self) -> IndexMap<String, String> {
        self.errors
            .iter()
            .map(|(field, error)| (field.clone(), error.message.clone()))
            .collect()
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    /// Submitted value of a field
    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Submitted value of a field that passed, for redisplay
    pub fn valid_value(&self, field: &str) -> Option<&FieldValue> {
        if self.errors.contains_key(field) {
            None
        } else {
            self.values.get(field)
        }
    }

    pub(crate) fn record(&mut self, error: FieldError) {
        self.errors.insert(error.field.clone(), error);
    }

    pub(crate) fn clear(&mut self, field: &str) {
        self.errors.shift_remove(field);
    }

    pub(crate) fn set_value(&mut self, field: &str, value: FieldValue) {
        self.values.insert(field.to_string(), value);
    }

    /// JSON representation of the failures
    pub fn to_json(&self) -> serde_json::Value {
        let errors: Vec<&FieldError> = self.errors.values().collect();
        serde_json::json!({
            "valid": self.is_valid(),
            "errors": errors,
        })
    }
}
