// Per-field rule sets

use crate::RuleParam;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

/// Name of the rule that makes a field mandatory
pub const REQUIRED: &str = "required";

/// Ordered rule name -> parameter mapping for one field.
///
/// Rules are evaluated in the order they are stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRuleSet {
    rules: IndexMap<String, RuleParam>,
}

impl FieldRuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Rule set holding a single parameterless rule, e.g. `"name": "required"`
    pub fn single(name: impl Into<String>) -> Self {
        Self::new().rule(name, RuleParam::None)
    }

    /// Add a rule, replacing an existing rule of the same name in place
    pub fn rule(mut self, name: impl Into<String>, param: impl Into<RuleParam>) -> Self {
        self.insert(name, param);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, param: impl Into<RuleParam>) {
        self.rules.insert(name.into(), param.into());
    }

    /// Merge newer declarations over this set.
    ///
    /// Rules in `newer` win and come first; rules only present here keep
    /// their relative order after them.
    pub fn merge(&mut self, newer: &FieldRuleSet) {
        let mut merged = newer.rules.clone();
        for (name, param) in self.rules.drain(..) {
            merged.entry(name).or_insert(param);
        }
        self.rules = merged;
    }

    pub fn get(&self, name: &str) -> Option<&RuleParam> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Whether the set declares `required`, with any parameter
    pub fn has_required(&self) -> bool {
        self.contains(REQUIRED)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleParam)> {
        self.rules.iter().map(|(name, param)| (name.as_str(), param))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<N: Into<String>, P: Into<RuleParam>> FromIterator<(N, P)> for FieldRuleSet {
    fn from_iter<I: IntoIterator<Item = (N, P)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, param) in iter {
            set.insert(name, param);
        }
        set
    }
}

impl<'de> Deserialize<'de> for FieldRuleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(name) => Ok(FieldRuleSet::single(name)),
            Value::Object(rules) => rules
                .into_iter()
                .map(|(name, param)| {
                    RuleParam::try_from(param)
                        .map(|param| (name.clone(), param))
                        .map_err(|reason| de::Error::custom(format!("rule '{}': {}", name, reason)))
                })
                .collect(),
            other => Err(de::Error::custom(format!(
                "expected a rule name or an object of rules, got {}",
                other
            ))),
        }
    }
}
