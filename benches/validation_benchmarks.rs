use criterion::{Criterion, criterion_group, criterion_main};
use formrules::prelude::*;
use formrules::methods;
use std::hint::black_box;

fn signup_validator() -> FieldValidator {
    FieldValidator::from_json(
        r##"{
            "rules": {
                "username": { "required": true, "rangelength": [3, 12] },
                "email": { "required": true, "email": true },
                "age": { "digits": true, "range": [18, 120] },
                "password": { "required": true, "minlength": 8 },
                "confirm": { "required": true, "equalTo": "#password" }
            }
        }"##,
    )
    .unwrap()
}

fn bench_email_method(c: &mut Criterion) {
    let mut group = c.benchmark_group("email_method");

    let valid_emails = vec![
        FieldValue::from("user@example.com"),
        FieldValue::from("test.user+tag@domain.co.uk"),
        FieldValue::from("admin@subdomain.example.com"),
    ];

    let invalid_emails = vec![
        FieldValue::from("invalid-email"),
        FieldValue::from("@example.com"),
        FieldValue::from("user@"),
    ];

    group.bench_function("valid_emails", |b| {
        b.iter(|| {
            for email in &valid_emails {
                assert!(methods::email(black_box(email)));
            }
        })
    });

    group.bench_function("invalid_emails", |b| {
        b.iter(|| {
            for email in &invalid_emails {
                let _ = methods::email(black_box(email));
            }
        })
    });

    group.finish();
}

fn bench_length_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("length_methods");

    let text = FieldValue::from("Hello World 123");
    let bound = RuleParam::from(5);
    let pair = RuleParam::pair(3, 20);

    group.bench_function("minlength", |b| {
        b.iter(|| methods::minlength(black_box(&text), &bound))
    });

    group.bench_function("rangelength", |b| {
        b.iter(|| methods::rangelength(black_box(&text), &pair))
    });

    group.bench_function("digits", |b| {
        let digits = FieldValue::from("12345");
        b.iter(|| methods::digits(black_box(&digits)))
    });

    group.finish();
}

fn bench_whole_form(c: &mut Criterion) {
    let mut group = c.benchmark_group("whole_form");

    let validator = signup_validator();
    let valid = [
        ("username", "johnd"),
        ("email", "john@example.com"),
        ("age", "42"),
        ("password", "correct horse"),
        ("confirm", "correct horse"),
    ];
    let invalid = [("username", "jo"), ("email", "nope"), ("age", "twelve")];

    group.bench_function("check_valid", |b| {
        b.iter(|| validator.check(black_box(valid)))
    });

    group.bench_function("check_invalid", |b| {
        b.iter(|| validator.check(black_box(invalid)))
    });

    group.bench_function("validate_stored", |b| {
        let mut validator = signup_validator();
        b.iter(|| validator.validate(black_box(valid)).is_valid())
    });

    group.finish();
}

fn bench_configuration(c: &mut Criterion) {
    let mut group = c.benchmark_group("configuration");

    group.bench_function("from_json", |b| b.iter(signup_validator));

    group.bench_function("message_resolution", |b| {
        let catalog = MessageCatalog::new();
        let pair = RuleParam::pair(3, 12);
        b.iter(|| catalog.resolve(black_box("username"), "rangelength", &pair))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_email_method,
    bench_length_methods,
    bench_whole_form,
    bench_configuration,
);
criterion_main!(benches);
