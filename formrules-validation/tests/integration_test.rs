//! Integration tests for formrules-validation

use formrules_validation::*;
use std::sync::{Arc, Mutex};

fn signup_validator() -> FieldValidator {
    FieldValidator::from_json(
        r##"{
            "rules": {
                "username": { "required": true, "rangelength": [3, 12] },
                "email": { "required": true, "email": true },
                "age": { "digits": true, "range": [18, 120] },
                "website": "url",
                "password": { "required": true, "minlength": 8 },
                "confirm": { "required": true, "equalTo": "#password" },
                "birthday": { "date": true }
            },
            "messages": {
                "username": "Please choose a username",
                "email": {
                    "email": "Your email address must be in the format of name@domain.com"
                }
            }
        }"##,
    )
    .unwrap()
}

fn complete_signup() -> Vec<(&'static str, &'static str)> {
    vec![
        ("username", "johnd"),
        ("email", "john@example.com"),
        ("age", "42"),
        ("website", "https://john.example.com"),
        ("password", "correct horse"),
        ("confirm", "correct horse"),
        ("birthday", "12/31/1980"),
    ]
}

#[test]
fn test_complete_form_is_valid() {
    let mut validator = signup_validator();
    let run = validator.validate(complete_signup());
    assert!(run.is_valid(), "unexpected errors: {:?}", run.messages());
}

#[test]
fn test_empty_submission_reports_required_fields() {
    let mut validator = signup_validator();
    let run = validator.validate(Vec::<(String, String)>::new());

    let fields: Vec<&str> = run.errors().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, ["username", "email", "password", "confirm"]);
    assert_eq!(run.message("username"), Some("Please choose a username"));
    assert_eq!(run.message("email"), Some("This is a required field"));
}

#[test]
fn test_optional_fields_may_be_blank() {
    let mut validator = signup_validator();
    let values = complete_signup()
        .into_iter()
        .map(|(field, value)| match field {
            "age" | "website" | "birthday" => (field, ""),
            _ => (field, value),
        });

    assert!(validator.validate(values).is_valid());
}

#[test]
fn test_field_specific_messages() {
    let mut validator = signup_validator();
    let values = complete_signup().into_iter().map(|(field, value)| match field {
        "email" => (field, "john at example"),
        "username" => (field, "jo"),
        _ => (field, value),
    });

    let run = validator.validate(values);
    assert_eq!(run.number_of_invalids(), 2);
    assert_eq!(
        run.message("email"),
        Some("Your email address must be in the format of name@domain.com")
    );
    assert_eq!(run.message("username"), Some("Please choose a username"));
}

#[test]
fn test_range_message_is_formatted() {
    let mut validator = signup_validator();
    let values = complete_signup().into_iter().map(|(field, value)| match field {
        "age" => (field, "12"),
        _ => (field, value),
    });

    let run = validator.validate(values);
    assert_eq!(run.message("age"), Some("Please enter a value between 18 and 120."));
}

#[test]
fn test_password_confirmation() {
    let mut validator = signup_validator();
    let values = complete_signup().into_iter().map(|(field, value)| match field {
        "confirm" => (field, "correct horse battery"),
        _ => (field, value),
    });

    let run = validator.validate(values);
    assert_eq!(run.message("confirm"), Some("Please enter the same value again."));
    assert_eq!(run.valid_value("password"), Some(&FieldValue::from("correct horse")));
    assert_eq!(run.valid_value("confirm"), None);
}

#[test]
fn test_field_by_field_validation() {
    let mut validator = signup_validator();

    assert!(!validator.validate_field("email", "nope"));
    assert!(validator.validate_field("password", "long enough"));
    assert!(validator.validate_field("confirm", "long enough"));
    assert!(!validator.validate_field("confirm", "different"));

    assert_eq!(validator.number_of_invalids(), 2);
    assert!(validator.error_for("email").is_some());
    assert!(validator.error_for("password").is_none());
}

#[test]
fn test_invalid_handler_sees_finished_run() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut validator = signup_validator();
    {
        let seen = seen.clone();
        validator.set_invalid_handler(move |values, validator| {
            let mut seen = seen.lock().unwrap();
            seen.push((values.len(), validator.errors()));
        });
    }

    validator.validate([("username", "jo")]);
    validator.validate(complete_signup());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, 1);
    assert_eq!(seen[0].1.len(), 4);
    assert_eq!(seen[1].0, 7);
    assert!(seen[1].1.is_empty());
}

#[test]
fn test_options_builder() {
    let options = ValidatorOptions::new()
        .with_rules("zip", FieldRuleSet::new().rule("required", RuleParam::None).rule("digits", true))
        .with_message("zip", FieldMessage::Generic("Enter a postcode".to_string()))
        .with_error_class("is-invalid")
        .with_error_element("div");

    let mut validator = FieldValidator::from_options(options);
    assert_eq!(validator.error_class(), "is-invalid");
    assert_eq!(validator.error_element(), "div");

    let run = validator.validate([("zip", "12a4")]);
    assert_eq!(run.message("zip"), Some("Enter a postcode"));
}

#[test]
fn test_conditional_required() {
    let mut validator = FieldValidator::new();
    validator.add_rule("company", "required", "#account_type:checked");
    validator.add_rule("vat", "required", RuleParam::depends(|| true));

    let run = validator.validate([("account_type", "business"), ("company", ""), ("vat", "")]);
    assert_eq!(run.number_of_invalids(), 2);

    let run = validator.validate([("account_type", ""), ("company", ""), ("vat", "NL123")]);
    assert!(run.is_valid());
}

#[test]
fn test_shared_registry_custom_method() {
    let mut registry = RuleRegistry::with_defaults();
    registry.register("uppercase", |value: &FieldValue, _: &RuleParam, _: &RuleContext<'_>| {
        let text = value.to_text();
        text.chars().all(|c| !c.is_lowercase())
    });
    let registry = Arc::new(registry);

    let mut first = FieldValidator::with_registry(registry.clone());
    let mut second = FieldValidator::with_registry(registry);
    first.add_rule("code", "uppercase", RuleParam::None);
    second.add_rule("code", "uppercase", RuleParam::None);

    assert!(!first.validate([("code", "abc")]).is_valid());
    assert!(second.validate([("code", "ABC")]).is_valid());
    assert_eq!(first.errors()["code"], "Please fix this field.");
}

#[test]
fn test_run_to_json() {
    let mut validator = signup_validator();
    let json = validator.validate([("username", "jo")]).to_json();

    assert_eq!(json["valid"], false);
    assert_eq!(json["errors"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["errors"][0]["field"], "username");
    assert_eq!(json["errors"][0]["message"], "Please choose a username");
}

#[test]
fn test_handler_in_json_rejected() {
    let result = FieldValidator::from_json(r#"{ "rules": {}, "invalidHandler": "onError" }"#);
    assert!(matches!(result, Err(ConfigError::HandlerNotCallable)));
}
