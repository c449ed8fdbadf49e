// Configuration errors and per-field validation failures

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised while configuring a validator.
///
/// Invalid input data is never reported through this type; it ends up as a
/// [`FieldError`] in the validation run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An `invalidHandler` was given that cannot be called
    #[error("Invalid option set for \"invalidHandler\": not callable")]
    HandlerNotCallable,

    /// A rule declaration had an unsupported shape
    #[error("Invalid rules for field '{field}': {reason}")]
    InvalidRule { field: String, reason: String },

    /// A message declaration had an unsupported shape
    #[error("Invalid messages for field '{field}': {reason}")]
    InvalidMessage { field: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for validator configuration
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Validation failure for a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name that failed validation
    pub field: String,

    /// Rule that failed
    pub rule: String,

    /// Resolved, user-facing message
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let error = FieldError::new("email", "required", "This is a required field");
        assert_eq!(error.to_string(), "email: This is a required field");
        assert_eq!(error.rule, "required");
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::HandlerNotCallable.to_string(),
            "Invalid option set for \"invalidHandler\": not callable"
        );

        let error = ConfigError::InvalidRule {
            field: "age".to_string(),
            reason: "expected a rule name or an object".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid rules for field 'age': expected a rule name or an object"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let error: ConfigError = parse.unwrap_err().into();
        assert!(matches!(error, ConfigError::Json(_)));
    }
}
