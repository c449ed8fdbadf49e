//! Message catalog
//!
//! Resolves the user-facing message for a failed `(field, rule)` pair.
//!
//! Lookup goes from most to least specific:
//!
//! 1. a message for this rule on this field
//! 2. a generic message for this field
//! 3. the rule's default message
//!
//! Field messages and rule defaults live in separate namespaces, so a field
//! named `email` never shadows the default message of the `email` rule.

use crate::RuleParam;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;

/// Message used when neither the field nor the rule has one
pub const FALLBACK_MESSAGE: &str = "Please fix this field.";

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\d+)\}").unwrap());

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("required", "This is a required field"),
    ("email", "Please enter a valid email address."),
    ("url", "Please enter a valid URL."),
    ("date", "Please enter a valid date."),
    ("digits", "Please enter only digits."),
    ("equalTo", "Please enter the same value again."),
    ("min", "Please enter a smaller value."),
    ("max", "Please enter a larger value."),
    ("minlength", "Please enter a longer value."),
    ("maxlength", "Please enter a shorter value."),
    ("range", "Please enter a value between {0} and {1}."),
    ("rangelength", "Please enter a value between {0} and {1} characters long."),
];

/// Messages declared for one field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldMessage {
    /// One message for every rule of the field
    Generic(String),
    /// Messages per rule name
    PerRule(IndexMap<String, String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FieldMessages {
    generic: Option<String>,
    per_rule: IndexMap<String, String>,
}

impl FieldMessages {
    // Existing entries win
    fn absorb(&mut self, message: FieldMessage) {
        match message {
            FieldMessage::Generic(text) => {
                self.generic.get_or_insert(text);
            }
            FieldMessage::PerRule(rules) => {
                for (rule, text) in rules {
                    self.per_rule.entry(rule).or_insert(text);
                }
            }
        }
    }
}

/// Messages keyed by field, as given to the `messages` option
pub type Messages = IndexMap<String, FieldMessage>;

/// Rule defaults plus per-field overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    defaults: IndexMap<String, String>,
    fields: IndexMap<String, FieldMessages>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        let defaults = DEFAULT_MESSAGES
            .iter()
            .map(|(rule, text)| (rule.to_string(), text.to_string()))
            .collect();

        Self {
            defaults,
            fields: IndexMap::new(),
        }
    }
}

impl MessageCatalog {
    /// Catalog with the built-in rule defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog without any messages
    pub fn empty() -> Self {
        Self {
            defaults: IndexMap::new(),
            fields: IndexMap::new(),
        }
    }

    /// Merge field messages; messages that are already set keep priority
    pub fn extend<I, K>(&mut self, messages: I)
    where
        I: IntoIterator<Item = (K, FieldMessage)>,
        K: Into<String>,
    {
        for (field, message) in messages {
            self.fields.entry(field.into()).or_default().absorb(message);
        }
    }

    /// Set a generic message for a field, if it has none yet
    pub fn add_field_message(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field: String = field.into();
        self.extend([(field, FieldMessage::Generic(message.into()))]);
    }

    /// Set a rule-specific message for a field, if it has none yet
    pub fn add_rule_message(
        &mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) {
        let field: String = field.into();
        let per_rule = IndexMap::from([(rule.into(), message.into())]);
        self.extend([(field, FieldMessage::PerRule(per_rule))]);
    }

    /// Set (or replace) the default message of a rule
    pub fn set_default(&mut self, rule: impl Into<String>, message: impl Into<String>) {
        self.defaults.insert(rule.into(), message.into());
    }

    pub fn default_for(&self, rule: &str) -> Option<&str> {
        self.defaults.get(rule).map(String::as_str)
    }

    /// The unformatted template that applies to `(field, rule)`
    pub fn template(&self, field: &str, rule: &str) -> &str {
        let field_messages = self.fields.get(field);

        field_messages
            .and_then(|m| m.per_rule.get(rule))
            .or_else(|| field_messages.and_then(|m| m.generic.as_ref()))
            .or_else(|| self.defaults.get(rule))
            .map_or(FALLBACK_MESSAGE, String::as_str)
    }

    /// Resolve and format the message for a failed rule
    pub fn resolve(&self, field: &str, rule: &str, param: &RuleParam) -> String {
        format_message(self.template(field, rule), param)
    }
}

/// Replace `{n}` placeholders with the n-th element of a list parameter.
///
/// Placeholders without a matching element are left as written.
pub fn format_message(template: &str, param: &RuleParam) -> String {
    if !matches!(param, RuleParam::List(_)) {
        return template.to_string();
    }

    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| param.get(index))
                .map_or_else(|| caps[0].to_string(), ToString::to_string)
        })
        .into_owned()
}
