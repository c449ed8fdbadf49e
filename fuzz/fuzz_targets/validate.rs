//! Fuzz target for whole-form validation.
//!
//! Runs arbitrary submissions through every built-in rule and checks the
//! run-level invariants.

#![no_main]

use arbitrary::Arbitrary;
use formrules_validation::{FieldRuleSet, FieldValidator, RuleParam};
use libfuzzer_sys::fuzz_target;

/// Arbitrary form submission for fuzzing.
#[derive(Debug, Arbitrary)]
struct FuzzForm {
    /// Field name -> submitted text
    fields: Vec<(String, String)>,
    /// Free-form parameter for the text-parameter rules
    selector: String,
}

fn validator(selector: &str) -> FieldValidator {
    let mut validator = FieldValidator::new();
    validator.add_rules(["a"], FieldRuleSet::new().rule("required", selector).rule("email", true));
    validator.add_rules(["b"], FieldRuleSet::new().rule("url", true).rule("date", selector));
    validator.add_rules(["c"], FieldRuleSet::new().rule("digits", true).rule("range", RuleParam::pair(1, 99)));
    validator.add_rules(["d"], FieldRuleSet::new().rule("min", 10).rule("max", 5));
    validator.add_rules(["e"], FieldRuleSet::new().rule("equalTo", selector).rule("rangelength", RuleParam::pair(2, 4)));
    validator
}

fuzz_target!(|data: FuzzForm| {
    let validator = validator(&data.selector);

    let first = validator.check(data.fields.iter().cloned());
    let second = validator.check(data.fields.iter().cloned());
    assert_eq!(first, second);

    for error in first.errors() {
        assert!(validator.rules_for(&error.field).is_some());
        assert!(!error.message.is_empty());
    }
});
