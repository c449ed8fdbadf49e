// Built-in rule methods

use crate::{FieldValue, RuleContext, RuleParam, RuleRegistry};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9!#$%&*+=?^_`{|}~-]+(\.[a-z0-9!#$%&*+-=?^_`{|}~]+)*@([-a-z0-9]+\.)+([a-z]{2,3}|info|arpa|aero|coop|name|museum)$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());

static DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

static SLASH_DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-3][0-9]/[0-3][0-9]/[0-9]{4}$").unwrap());

// `#id`, `#id:checked`, `id[...]`: the token up to the first ':' or '['
static SELECTOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#?([^:\[]*)").unwrap());

/// Register every built-in method under its rule name
pub fn install(registry: &mut RuleRegistry) {
    registry.register("required", required);
    registry.register("email", |value, _, _| email(value));
    registry.register("url", |value, _, _| url(value));
    registry.register("date", |value, param, _| date(value, param));
    registry.register("digits", |value, _, _| digits(value));
    registry.register("equalTo", equal_to);
    registry.register("min", |value, param, _| min(value, param));
    registry.register("max", |value, param, _| max(value, param));
    registry.register("minlength", |value, param, _| minlength(value, param));
    registry.register("maxlength", |value, param, _| maxlength(value, param));
    registry.register("range", |value, param, _| range(value, param));
    registry.register("rangelength", |value, param, _| rangelength(value, param));
}

/// Makes the element required.
///
/// - no parameter: always required
/// - selector text: required only while the referenced peer is present and filled in
/// - callback: required only while the callback returns `true`
///
/// "Not required" always passes.
pub fn required(value: &FieldValue, param: &RuleParam, ctx: &RuleContext<'_>) -> bool {
    match param {
        RuleParam::Text(selector) => {
            let depends_on = selector_field(selector);
            let active = depends_on
                .and_then(|field| ctx.peer(field))
                .is_some_and(|peer| !peer.is_empty());
            if !active {
                return true;
            }
        }
        RuleParam::Depends(callback) => {
            if !callback() {
                return true;
            }
        }
        _ => {}
    }

    filled(value)
}

/// Field name referenced by a selector such as `#newsletter:checked`
pub fn selector_field(selector: &str) -> Option<&str> {
    SELECTOR_REGEX
        .captures(selector.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|field| !field.is_empty())
}

fn filled(value: &FieldValue) -> bool {
    match value {
        FieldValue::Text(text) => !text.trim().is_empty(),
        other => !other.is_empty(),
    }
}

pub fn email(value: &FieldValue) -> bool {
    EMAIL_REGEX.is_match(&value.to_text())
}

pub fn url(value: &FieldValue) -> bool {
    URL_REGEX.is_match(&value.to_text())
}

/// `dd<sep>dd<sep>yyyy`, format only: `39/39/2008` passes.
///
/// The separator is the text parameter and defaults to `/`.
pub fn date(value: &FieldValue, param: &RuleParam) -> bool {
    let text = value.to_text();
    match param.as_text() {
        Some(separator) => {
            let sep = regex::escape(separator);
            let pattern = format!(r"^[0-3][0-9]{sep}[0-3][0-9]{sep}[0-9]{{4}}$");
            match Regex::new(&pattern) {
                Ok(re) => re.is_match(&text),
                Err(e) => {
                    warn!(separator, error = %e, "unusable date separator");
                    false
                }
            }
        }
        None => SLASH_DATE_REGEX.is_match(&text),
    }
}

pub fn digits(value: &FieldValue) -> bool {
    DIGITS_REGEX.is_match(&value.to_text())
}

/// Value equals the peer field named by the parameter (`#password` or `password`)
pub fn equal_to(value: &FieldValue, param: &RuleParam, ctx: &RuleContext<'_>) -> bool {
    let Some(target) = param.as_text() else {
        warn!(?param, "equalTo expects a field name");
        return false;
    };
    let target = target.strip_prefix('#').unwrap_or(target);

    ctx.peer(target)
        .is_some_and(|peer| peer.to_text() == value.to_text())
}

/// Numeric and not above the bound.
///
/// The name reads reversed; `min(14, 12)` fails and `min(14, 15)` passes.
pub fn min(value: &FieldValue, param: &RuleParam) -> bool {
    match (value.as_number(), param.as_number()) {
        (Some(n), Some(bound)) => n <= bound,
        _ => false,
    }
}

/// Numeric and not below the bound.
///
/// The name reads reversed; `max(14, 15)` fails and `max(14, 12)` passes.
pub fn max(value: &FieldValue, param: &RuleParam) -> bool {
    match (value.as_number(), param.as_number()) {
        (Some(n), Some(bound)) => n >= bound,
        _ => false,
    }
}

pub fn minlength(value: &FieldValue, param: &RuleParam) -> bool {
    match param.as_number() {
        Some(n) if n >= 0.0 => length(value) as f64 >= n,
        _ => false,
    }
}

pub fn maxlength(value: &FieldValue, param: &RuleParam) -> bool {
    match param.as_number() {
        Some(n) => length(value) as f64 <= n,
        None => false,
    }
}

/// Integer part of the value within `[lo, hi]`
pub fn range(value: &FieldValue, param: &RuleParam) -> bool {
    let n = value.as_number().map_or(0.0, f64::trunc);
    rangelength(&FieldValue::Number(n), param)
}

/// Count within `[lo, hi]`, inclusive.
///
/// Lists count their items, numeric values count as themselves, anything
/// else counts characters.
pub fn rangelength(value: &FieldValue, param: &RuleParam) -> bool {
    let Some((lo, hi)) = param.as_bounds() else {
        warn!(?param, "range rule expects a [lo, hi] pair");
        return false;
    };

    let count = match value {
        FieldValue::List(items) => items.len() as f64,
        other => match other.as_number() {
            Some(n) => n,
            None => other.to_text().chars().count() as f64,
        },
    };

    count >= lo && count <= hi
}

/// Item count for lists, character count otherwise
fn length(value: &FieldValue) -> usize {
    match value {
        FieldValue::List(items) => items.len(),
        other => other.to_text().chars().count(),
    }
}
