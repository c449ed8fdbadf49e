// Submitted field values and rule parameters

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use std::sync::Arc;

/// Submitted values keyed by field name, in submission order
pub type FieldValues = IndexMap<String, FieldValue>;

/// Zero-argument callback deciding whether a rule applies
pub type DependsFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// A single submitted value.
///
/// Lists model checkbox groups and multi-selects submitted under one name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Whether the value counts as "not filled in".
    ///
    /// Numbers are never empty, so a submitted `0` still runs the rule chain.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Bool(checked) => !checked,
            FieldValue::Number(_) => false,
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    /// Numeric interpretation of the value, if it has one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Whether the value is a number or numeric text
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }

    /// Textual form used by pattern-based rules
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(true) => "1".to_string(),
            FieldValue::Bool(false) => String::new(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Borrow the list items, if this is a list
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<bool> for FieldValue {
    fn from(checked: bool) -> Self {
        FieldValue::Bool(checked)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

macro_rules! field_value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FieldValue {
                fn from(n: $t) -> Self {
                    FieldValue::Number(n as f64)
                }
            }
        )*
    };
}

field_value_from_int!(i32, i64, u32, u64, usize);

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Parameter attached to one rule for one field.
#[derive(Clone, Default)]
pub enum RuleParam {
    /// No parameter (`{}` or `null` in JSON)
    #[default]
    None,
    /// A bare flag, e.g. `"email": true`
    Flag(bool),
    Number(f64),
    Text(String),
    /// Ordered parameters, e.g. the `[lo, hi]` of `rangelength`
    List(Vec<RuleParam>),
    /// Applicability callback
    Depends(DependsFn),
}

impl RuleParam {
    /// Wrap a zero-argument callback
    pub fn depends<F>(callback: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        RuleParam::Depends(Arc::new(callback))
    }

    /// Inclusive `[lo, hi]` pair
    pub fn pair(lo: impl Into<f64>, hi: impl Into<f64>) -> Self {
        RuleParam::List(vec![RuleParam::Number(lo.into()), RuleParam::Number(hi.into())])
    }

    /// Positional element of a list parameter
    pub fn get(&self, index: usize) -> Option<&RuleParam> {
        match self {
            RuleParam::List(items) => items.get(index),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            RuleParam::Number(n) => Some(*n),
            RuleParam::Text(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RuleParam::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric `(lo, hi)` for range-style rules
    pub fn as_bounds(&self) -> Option<(f64, f64)> {
        match self {
            RuleParam::List(items) if items.len() == 2 => {
                Some((items[0].as_number()?, items[1].as_number()?))
            }
            _ => None,
        }
    }
}

impl TryFrom<serde_json::Value> for RuleParam {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        Ok(match value {
            Value::Null => RuleParam::None,
            Value::Bool(flag) => RuleParam::Flag(flag),
            Value::Number(n) => n.as_f64().map_or(RuleParam::None, RuleParam::Number),
            Value::String(text) => RuleParam::Text(text),
            Value::Array(items) => RuleParam::List(
                items
                    .into_iter()
                    .map(RuleParam::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => object_param(map)?,
        })
    }
}

// jQuery's `{ param: ... }` and `{ depends: "#selector" }` forms
fn object_param(mut map: serde_json::Map<String, serde_json::Value>) -> Result<RuleParam, String> {
    use serde_json::Value;

    let param = map.remove("param");
    let depends = map.remove("depends");
    if let Some(key) = map.keys().next() {
        return Err(format!("unsupported key \"{}\" in rule parameter", key));
    }

    match (param, depends) {
        (None, None) => Ok(RuleParam::None),
        (Some(param), None) => RuleParam::try_from(param),
        (None, Some(Value::String(selector))) => Ok(RuleParam::Text(selector)),
        (None, Some(other)) => Err(format!("\"depends\" must be a selector string, got {}", other)),
        (Some(_), Some(_)) => {
            Err("\"param\" combined with \"depends\" is not supported".to_string())
        }
    }
}

impl<'de> Deserialize<'de> for RuleParam {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        RuleParam::try_from(value).map_err(de::Error::custom)
    }
}

impl From<&str> for RuleParam {
    fn from(text: &str) -> Self {
        RuleParam::Text(text.to_string())
    }
}

impl From<String> for RuleParam {
    fn from(text: String) -> Self {
        RuleParam::Text(text)
    }
}

impl From<bool> for RuleParam {
    fn from(flag: bool) -> Self {
        RuleParam::Flag(flag)
    }
}

impl From<f64> for RuleParam {
    fn from(n: f64) -> Self {
        RuleParam::Number(n)
    }
}

macro_rules! rule_param_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RuleParam {
                fn from(n: $t) -> Self {
                    RuleParam::Number(n as f64)
                }
            }
        )*
    };
}

rule_param_from_int!(i32, i64, u32, u64, usize);

impl<T: Into<RuleParam>> From<Vec<T>> for RuleParam {
    fn from(items: Vec<T>) -> Self {
        RuleParam::List(items.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<RuleParam>, B: Into<RuleParam>> From<(A, B)> for RuleParam {
    fn from((first, second): (A, B)) -> Self {
        RuleParam::List(vec![first.into(), second.into()])
    }
}

impl fmt::Debug for RuleParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleParam::None => f.write_str("None"),
            RuleParam::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            RuleParam::Number(n) => f.debug_tuple("Number").field(n).finish(),
            RuleParam::Text(text) => f.debug_tuple("Text").field(text).finish(),
            RuleParam::List(items) => f.debug_tuple("List").field(items).finish(),
            RuleParam::Depends(_) => f.write_str("Depends(<fn>)"),
        }
    }
}

impl PartialEq for RuleParam {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RuleParam::None, RuleParam::None) => true,
            (RuleParam::Flag(a), RuleParam::Flag(b)) => a == b,
            (RuleParam::Number(a), RuleParam::Number(b)) => a == b,
            (RuleParam::Text(a), RuleParam::Text(b)) => a == b,
            (RuleParam::List(a), RuleParam::List(b)) => a == b,
            (RuleParam::Depends(a), RuleParam::Depends(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for RuleParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleParam::None | RuleParam::Depends(_) => Ok(()),
            RuleParam::Flag(flag) => write!(f, "{}", flag),
            RuleParam::Number(n) => f.write_str(&format_number(*n)),
            RuleParam::Text(text) => f.write_str(text),
            RuleParam::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

/// Integral numbers print without a fractional part
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_emptiness() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::from(false).is_empty());
        assert!(FieldValue::List(vec![]).is_empty());

        assert!(!FieldValue::from(" ").is_empty());
        assert!(!FieldValue::from(0).is_empty());
        assert!(!FieldValue::from(vec!["aap"]).is_empty());
    }

    #[test]
    fn test_numeric_text() {
        assert_eq!(FieldValue::from("12").as_number(), Some(12.0));
        assert_eq!(FieldValue::from(" -3.5 ").as_number(), Some(-3.5));
        assert_eq!(FieldValue::from("twelve").as_number(), None);
        assert_eq!(FieldValue::from("NaN").as_number(), None);
        assert_eq!(FieldValue::from(true).as_number(), None);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(FieldValue::from(14).to_text(), "14");
        assert_eq!(FieldValue::from(2.5).to_text(), "2.5");
        assert_eq!(FieldValue::from(vec!["a", "b"]).to_text(), "a,b");
        assert_eq!(FieldValue::Null.to_text(), "");
    }

    #[test]
    fn test_field_values_from_json() {
        let values: FieldValues = serde_json::from_value(json!({
            "name": "aap",
            "age": 14,
            "agree": true,
            "colors": ["red", "blue"],
            "note": null
        }))
        .unwrap();

        assert_eq!(values["name"], FieldValue::from("aap"));
        assert_eq!(values["age"], FieldValue::Number(14.0));
        assert_eq!(values["agree"], FieldValue::Bool(true));
        assert_eq!(values["colors"], FieldValue::from(vec!["red", "blue"]));
        assert_eq!(values["note"], FieldValue::Null);
        assert_eq!(values.get_index(0).map(|(k, _)| k.as_str()), Some("name"));
    }

    fn param(value: serde_json::Value) -> RuleParam {
        RuleParam::try_from(value).unwrap()
    }

    #[test]
    fn test_rule_param_from_json() {
        assert_eq!(param(json!(null)), RuleParam::None);
        assert_eq!(param(json!({})), RuleParam::None);
        assert_eq!(param(json!(true)), RuleParam::Flag(true));
        assert_eq!(param(json!(5)), RuleParam::Number(5.0));
        assert_eq!(param(json!("#other")), RuleParam::from("#other"));
        assert_eq!(param(json!([1, 3])), RuleParam::pair(1, 3));
        assert_eq!(param(json!({ "param": 4 })), RuleParam::Number(4.0));
    }

    #[test]
    fn test_rule_param_depends_selector() {
        assert_eq!(
            param(json!({ "depends": "#newsletter:checked" })),
            RuleParam::Text("#newsletter:checked".to_string())
        );
    }

    #[test]
    fn test_rule_param_unsupported_objects() {
        assert!(RuleParam::try_from(json!({ "depends": true })).is_err());
        assert!(RuleParam::try_from(json!({ "param": 4, "depends": "#b" })).is_err());
        assert!(RuleParam::try_from(json!({ "when": "#b" })).is_err());
        assert!(RuleParam::try_from(json!([1, { "depends": 2 }])).is_err());
    }

    #[test]
    fn test_rule_param_bounds() {
        assert_eq!(RuleParam::pair(1, 3).as_bounds(), Some((1.0, 3.0)));
        assert_eq!(RuleParam::from(vec!["1", "3"]).as_bounds(), Some((1.0, 3.0)));
        assert_eq!(RuleParam::Number(3.0).as_bounds(), None);
        assert_eq!(RuleParam::from(vec![1, 2, 3]).as_bounds(), None);
    }

    #[test]
    fn test_rule_param_display() {
        assert_eq!(RuleParam::pair(1, 3).to_string(), "1, 3");
        assert_eq!(RuleParam::Number(0.5).to_string(), "0.5");
        assert_eq!(RuleParam::depends(|| true).to_string(), "");
    }

    #[test]
    fn test_depends_equality_is_identity() {
        let a = RuleParam::depends(|| true);
        let b = RuleParam::depends(|| true);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
