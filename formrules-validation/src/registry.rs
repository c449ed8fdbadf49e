// Rule registry: rule name -> predicate

use crate::methods;
use crate::{FieldValue, FieldValues, RuleParam};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A rule predicate.
///
/// Receives the field value, the rule parameter declared for the field and
/// the evaluation context, and returns whether the value passes.
pub type RuleFn = Arc<dyn Fn(&FieldValue, &RuleParam, &RuleContext<'_>) -> bool + Send + Sync>;

/// Cross-field context for rules such as `equalTo` and selector-style `required`
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    peers: &'a FieldValues,
}

impl<'a> RuleContext<'a> {
    pub fn new(peers: &'a FieldValues) -> Self {
        Self { peers }
    }

    /// A context without any peer values
    pub fn empty() -> RuleContext<'static> {
        static EMPTY: Lazy<FieldValues> = Lazy::new(FieldValues::new);
        RuleContext { peers: &EMPTY }
    }

    /// Value of another submitted field
    pub fn peer(&self, field: &str) -> Option<&'a FieldValue> {
        self.peers.get(field)
    }

    pub fn peers(&self) -> &'a FieldValues {
        self.peers
    }
}

/// Total lookup table from rule name to predicate.
///
/// Names that were never registered evaluate to `true`.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    methods: HashMap<String, RuleFn>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in methods installed
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        methods::install(&mut registry);
        registry
    }

    /// Install or replace the predicate for `name`
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&FieldValue, &RuleParam, &RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(predicate));
    }

    /// Install an already shared predicate
    pub fn register_shared(&mut self, name: impl Into<String>, predicate: RuleFn) {
        self.methods.insert(name.into(), predicate);
    }

    /// Evaluate rule `name` against `value`
    pub fn evaluate(
        &self,
        name: &str,
        value: &FieldValue,
        param: &RuleParam,
        ctx: &RuleContext<'_>,
    ) -> bool {
        match self.methods.get(name) {
            Some(predicate) => predicate(value, param, ctx),
            None => {
                trace!(rule = name, "no method registered, passing");
                true
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Registered rule names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("methods", &self.names())
            .finish()
    }
}
