// Field validator

use crate::messages::FieldMessage;
use crate::options::{DEFAULT_ERROR_CLASS, DEFAULT_ERROR_ELEMENT, InvalidHandler};
use crate::rules::REQUIRED;
use crate::{
    FieldError, FieldRuleSet, FieldValue, FieldValues, MessageCatalog, Result, RuleContext,
    RuleParam, RuleRegistry, ValidationRun, ValidatorOptions,
};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Validates named values against per-field rule sets.
///
/// Rules of a field run in declaration order and stop at the first failure,
/// so every invalid field carries exactly one message. A field without a
/// `required` rule is optional: an empty value skips its rules entirely.
///
/// # Examples
///
/// ```
/// use formrules_validation::{FieldRuleSet, FieldValidator, RuleParam};
///
/// let mut validator = FieldValidator::new();
/// validator.add_rules(["email"], FieldRuleSet::new()
///     .rule("required", RuleParam::None)
///     .rule("email", RuleParam::None));
///
/// let run = validator.validate([("email", "")]);
/// assert_eq!(run.message("email"), Some("This is a required field"));
///
/// let run = validator.validate([("email", "user@example.com")]);
/// assert!(run.is_valid());
/// ```
#[derive(Clone)]
pub struct FieldValidator {
    registry: Arc<RuleRegistry>,
    rules: IndexMap<String, FieldRuleSet>,
    messages: MessageCatalog,
    invalid_handler: Option<InvalidHandler>,
    error_class: String,
    error_element: String,
    last_run: Option<ValidationRun>,
}

impl FieldValidator {
    /// Validator using the built-in methods and default messages
    pub fn new() -> Self {
        Self::with_registry(Arc::new(RuleRegistry::with_defaults()))
    }

    /// Validator sharing an existing registry
    pub fn with_registry(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            rules: IndexMap::new(),
            messages: MessageCatalog::default(),
            invalid_handler: None,
            error_class: DEFAULT_ERROR_CLASS.to_string(),
            error_element: DEFAULT_ERROR_ELEMENT.to_string(),
            last_run: None,
        }
    }

    /// Configure a validator from options
    pub fn from_options(options: ValidatorOptions) -> Self {
        let mut validator = Self::new();
        for (field, rules) in options.rules {
            validator.add_rules([field], rules);
        }
        validator.extend_messages(options.messages);
        validator.invalid_handler = options.invalid_handler;
        validator.error_class = options.error_class;
        validator.error_element = options.error_element;
        validator
    }

    /// Configure a validator from jQuery-style JSON options
    pub fn from_json(json: &str) -> Result<Self> {
        ValidatorOptions::from_json(json).map(Self::from_options)
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Merge `rules` into the rule set of every listed field.
    ///
    /// A rule that a field already has is replaced by the newer declaration;
    /// rules missing from `rules` are kept.
    pub fn add_rules<I, S>(&mut self, fields: I, rules: FieldRuleSet)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            trace!(field = %field, rules = rules.len(), "adding rules");
            self.rules.entry(field).or_default().merge(&rules);
        }
    }

    /// Add a single rule to one field
    pub fn add_rule(
        &mut self,
        field: impl Into<String>,
        name: impl Into<String>,
        param: impl Into<RuleParam>,
    ) {
        let field: String = field.into();
        self.add_rules([field], FieldRuleSet::new().rule(name, param));
    }

    /// Merge field messages; messages already set keep priority
    pub fn extend_messages<I, K>(&mut self, messages: I)
    where
        I: IntoIterator<Item = (K, FieldMessage)>,
        K: Into<String>,
    {
        self.messages.extend(messages);
    }

    /// Register a custom method, optionally with its default message.
    ///
    /// The registry is copied on first write when it is shared with other
    /// validators, so they do not see the new method.
    pub fn add_method<F>(&mut self, name: impl Into<String>, predicate: F, message: Option<&str>)
    where
        F: Fn(&FieldValue, &RuleParam, &RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        if let Some(message) = message {
            self.messages.set_default(name.clone(), message);
        }
        Arc::make_mut(&mut self.registry).register(name, predicate);
    }

    pub fn set_invalid_handler<F>(&mut self, handler: F)
    where
        F: Fn(&FieldValues, &FieldValidator) + Send + Sync + 'static,
    {
        self.invalid_handler = Some(Arc::new(handler));
    }

    /// A field is optional unless its rules include `required`
    pub fn is_optional(&self, field: &str) -> bool {
        !self
            .rules
            .get(field)
            .is_some_and(FieldRuleSet::has_required)
    }

    pub fn rules_for(&self, field: &str) -> Option<&FieldRuleSet> {
        self.rules.get(field)
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    pub fn error_class(&self) -> &str {
        &self.error_class
    }

    pub fn error_element(&self) -> &str {
        &self.error_element
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate one field and record the outcome in the current run.
    ///
    /// Cross-field rules see the values of the current run.
    pub fn validate_field(&mut self, field: &str, value: impl Into<FieldValue>) -> bool {
        let value = value.into();
        let mut run = self.last_run.take().unwrap_or_default();
        run.set_value(field, value.clone());

        let error = self.check_field(field, &value, &RuleContext::new(run.values()));
        let passed = error.is_none();
        match error {
            Some(error) => run.record(error),
            None => run.clear(field),
        }

        self.last_run = Some(run);
        passed
    }

    /// Validate a whole set of values, cross-checking against the set itself
    pub fn validate<I, K, V>(&mut self, values: I) -> &ValidationRun
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let run = self.evaluate(collect_values(values), None);
        self.finish(run)
    }

    /// Validate a whole set of values, cross-checking against `peers`
    pub fn validate_with_peers<I, K, V>(&mut self, values: I, peers: &FieldValues) -> &ValidationRun
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let run = self.evaluate(collect_values(values), Some(peers));
        self.finish(run)
    }

    /// Validate without storing the run or calling the invalid handler
    pub fn check<I, K, V>(&self, values: I) -> ValidationRun
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.evaluate(collect_values(values), None)
    }

    fn evaluate(&self, values: FieldValues, peers: Option<&FieldValues>) -> ValidationRun {
        debug!(fields = values.len(), "validating");
        let mut run = ValidationRun::new(values);

        let errors: Vec<FieldError> = {
            let ctx = RuleContext::new(peers.unwrap_or(run.values()));

            let submitted = run
                .values()
                .iter()
                .filter_map(|(field, value)| self.check_field(field, value, &ctx));

            // Required fields that were never submitted
            let missing = self
                .rules
                .iter()
                .filter(|(field, _)| !run.values().contains_key(*field))
                .filter_map(|(field, rules)| {
                    rules.get(REQUIRED).map(|param| {
                        debug!(field = %field, "required field missing");
                        self.error(field, REQUIRED, param)
                    })
                });

            submitted.chain(missing).collect()
        };

        for error in errors {
            run.record(error);
        }
        run
    }

    fn check_field(
        &self,
        field: &str,
        value: &FieldValue,
        ctx: &RuleContext<'_>,
    ) -> Option<FieldError> {
        let rules = self.rules.get(field)?;

        if value.is_empty() && !rules.has_required() {
            trace!(field, "optional and empty, rules skipped");
            return None;
        }

        for (rule, param) in rules.iter() {
            if !self.registry.evaluate(rule, value, param, ctx) {
                debug!(field, rule, "rule failed");
                return Some(self.error(field, rule, param));
            }
        }

        None
    }

    fn error(&self, field: &str, rule: &str, param: &RuleParam) -> FieldError {
        FieldError::new(field, rule, self.messages.resolve(field, rule, param))
    }

    fn finish(&mut self, run: ValidationRun) -> &ValidationRun {
        debug!(
            fields = run.values().len(),
            invalid = run.number_of_invalids(),
            "validation finished"
        );
        self.last_run = Some(run);

        if let (Some(handler), Some(run)) = (&self.invalid_handler, &self.last_run) {
            handler(run.values(), self);
        }

        self.last_run.get_or_insert_with(ValidationRun::default)
    }

    // ========================================================================
    // Last run
    // ========================================================================

    /// The most recent run, if any
    pub fn last_run(&self) -> Option<&ValidationRun> {
        self.last_run.as_ref()
    }

    /// Field -> message map of the most recent run
    pub fn errors(&self) -> IndexMap<String, String> {
        self.last_run
            .as_ref()
            .map(ValidationRun::messages)
            .unwrap_or_default()
    }

    /// Whether the most recent run passed; true before any run
    pub fn is_valid(&self) -> bool {
        self.last_run.as_ref().is_none_or(ValidationRun::is_valid)
    }

    pub fn number_of_invalids(&self) -> usize {
        self.last_run
            .as_ref()
            .map_or(0, ValidationRun::number_of_invalids)
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.last_run.as_ref()?.message(field)
    }

    /// Last submitted value of a field that passed
    pub fn valid_value(&self, field: &str) -> Option<&FieldValue> {
        self.last_run.as_ref()?.valid_value(field)
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValidator")
            .field("registry", &self.registry)
            .field("rules", &self.rules)
            .field("messages", &self.messages)
            .field("invalid_handler", &self.invalid_handler.is_some())
            .field("error_class", &self.error_class)
            .field("error_element", &self.error_element)
            .field("last_run", &self.last_run)
            .finish()
    }
}

fn collect_values<I, K, V>(values: I) -> FieldValues
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    values
        .into_iter()
        .map(|(field, value)| (field.into(), value.into()))
        .collect()
}
