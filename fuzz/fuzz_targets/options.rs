//! Fuzz target for validator option parsing.
//!
//! Feeds arbitrary text to the JSON options loader and validates an empty
//! submission with whatever configuration it accepts.

#![no_main]

use formrules_validation::{FieldValidator, ValidatorOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(options) = ValidatorOptions::from_json(text) {
        let validator = FieldValidator::from_options(options);
        let run = validator.check(Vec::<(String, String)>::new());

        // Only required fields can fail an empty submission
        for error in run.errors() {
            assert_eq!(error.rule, "required");
        }
    }
});
