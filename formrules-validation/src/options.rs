// Validator options

use crate::messages::{FieldMessage, Messages};
use crate::{ConfigError, FieldRuleSet, FieldValidator, FieldValues, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Called once a whole-set validation has finished, valid or not
pub type InvalidHandler = Arc<dyn Fn(&FieldValues, &FieldValidator) + Send + Sync>;

pub const DEFAULT_ERROR_CLASS: &str = "error";
pub const DEFAULT_ERROR_ELEMENT: &str = "label";

/// Options accepted by [`FieldValidator::from_options`].
///
/// The JSON shape matches the jQuery validation plugin options, so a single
/// declaration can drive both the browser and the server:
///
/// ```
/// use formrules_validation::ValidatorOptions;
///
/// let options = ValidatorOptions::from_json(r#"{
///     "rules": {
///         "name": "required",
///         "email": { "required": true, "email": true }
///     },
///     "messages": {
///         "name": "Please enter your name"
///     },
///     "errorClass": "invalid"
/// }"#).unwrap();
///
/// assert_eq!(options.rules.len(), 2);
/// assert_eq!(options.error_class, "invalid");
/// ```
#[derive(Clone)]
pub struct ValidatorOptions {
    /// Rule sets keyed by field name
    pub rules: IndexMap<String, FieldRuleSet>,

    /// Field messages
    pub messages: Messages,

    /// Class name the renderer puts on error elements
    pub error_class: String,

    /// Element name the renderer wraps error messages in
    pub error_element: String,

    pub invalid_handler: Option<InvalidHandler>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            rules: IndexMap::new(),
            messages: Messages::new(),
            error_class: DEFAULT_ERROR_CLASS.to_string(),
            error_element: DEFAULT_ERROR_ELEMENT.to_string(),
            invalid_handler: None,
        }
    }
}

impl ValidatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build options from a parsed JSON document.
    ///
    /// Unknown keys are ignored, as the browser plugin accepts many options
    /// that have no meaning on the server.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            return Err(ConfigError::InvalidRule {
                field: String::new(),
                reason: "options must be a JSON object".to_string(),
            });
        };

        // A callback cannot be expressed in JSON
        if root.contains_key("invalidHandler") {
            return Err(ConfigError::HandlerNotCallable);
        }

        let mut options = Self::new();

        if let Some(rules) = root.remove("rules") {
            options.rules = parse_rules(rules)?;
        }
        if let Some(messages) = root.remove("messages") {
            options.messages = parse_messages(messages)?;
        }
        if let Some(Value::String(class)) = root.remove("errorClass") {
            options.error_class = class;
        }
        if let Some(Value::String(element)) = root.remove("errorElement") {
            options.error_element = element;
        }

        Ok(options)
    }

    /// Add (or merge) the rules of a field
    pub fn with_rules(mut self, field: impl Into<String>, rules: FieldRuleSet) -> Self {
        self.rules.entry(field.into()).or_default().merge(&rules);
        self
    }

    pub fn with_message(mut self, field: impl Into<String>, message: FieldMessage) -> Self {
        self.messages.insert(field.into(), message);
        self
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn with_error_class(mut self, class: impl Into<String>) -> Self {
        self.error_class = class.into();
        self
    }

    pub fn with_error_element(mut self, element: impl Into<String>) -> Self {
        self.error_element = element.into();
        self
    }

    pub fn with_invalid_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&FieldValues, &FieldValidator) + Send + Sync + 'static,
    {
        self.invalid_handler = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for ValidatorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorOptions")
            .field("rules", &self.rules)
            .field("messages", &self.messages)
            .field("error_class", &self.error_class)
            .field("error_element", &self.error_element)
            .field("invalid_handler", &self.invalid_handler.is_some())
            .finish()
    }
}

fn parse_rules(value: Value) -> Result<IndexMap<String, FieldRuleSet>> {
    let Value::Object(fields) = value else {
        return Err(ConfigError::InvalidRule {
            field: String::new(),
            reason: "\"rules\" must be an object keyed by field name".to_string(),
        });
    };

    fields
        .into_iter()
        .map(|(field, rules)| match rules {
            Value::String(_) | Value::Object(_) => serde_json::from_value::<FieldRuleSet>(rules)
                .map(|set| (field.clone(), set))
                .map_err(|e| ConfigError::InvalidRule {
                    field,
                    reason: e.to_string(),
                }),
            other => Err(ConfigError::InvalidRule {
                field,
                reason: format!("expected a rule name or an object, got {}", other),
            }),
        })
        .collect()
}

fn parse_messages(value: Value) -> Result<Messages> {
    let Value::Object(fields) = value else {
        return Err(ConfigError::InvalidMessage {
            field: String::new(),
            reason: "\"messages\" must be an object keyed by field name".to_string(),
        });
    };

    fields
        .into_iter()
        .map(|(field, message)| {
            serde_json::from_value::<FieldMessage>(message)
                .map(|message| (field.clone(), message))
                .map_err(|_| ConfigError::InvalidMessage {
                    field,
                    reason: "expected a message or an object of rule messages".to_string(),
                })
        })
        .collect()
}
