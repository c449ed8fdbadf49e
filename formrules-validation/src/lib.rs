//! Declarative form validation for Formrules
//!
//! Each field gets an ordered set of named rules. Values are checked on the
//! server with the same rule and message declarations the jQuery validation
//! plugin uses in the browser.
//!
//! # Examples
//!
//! ## Rules and messages
//!
//! ```
//! use formrules_validation::{FieldMessage, FieldRuleSet, FieldValidator, RuleParam};
//!
//! let mut validator = FieldValidator::new();
//! validator.add_rules(["username"], FieldRuleSet::new()
//!     .rule("required", RuleParam::None)
//!     .rule("rangelength", RuleParam::pair(3, 12)));
//! validator.extend_messages([
//!     ("username", FieldMessage::Generic("Pick a username".to_string())),
//! ]);
//!
//! let run = validator.validate([("username", "")]);
//! assert_eq!(run.message("username"), Some("Pick a username"));
//!
//! let run = validator.validate([("username", "john")]);
//! assert!(run.is_valid());
//! ```
//!
//! ## JSON options
//!
//! ```
//! use formrules_validation::FieldValidator;
//!
//! let mut validator = FieldValidator::from_json(r##"{
//!     "rules": {
//!         "password": { "required": true, "minlength": 8 },
//!         "confirm": { "equalTo": "#password" }
//!     }
//! }"##).unwrap();
//!
//! let run = validator.validate([("password", "hunter22"), ("confirm", "hunter2")]);
//! assert_eq!(run.message("confirm"), Some("Please enter the same value again."));
//! ```
//!
//! ## Custom methods
//!
//! ```
//! use formrules_validation::{FieldValidator, RuleParam};
//!
//! let mut validator = FieldValidator::new();
//! validator.add_method(
//!     "postcode",
//!     |value, _, _| value.to_text().len() == 6,
//!     Some("Please enter a valid postcode."),
//! );
//! validator.add_rule("zip", "postcode", RuleParam::None);
//!
//! assert!(!validator.validate([("zip", "123")]).is_valid());
//! ```

mod errors;
pub mod messages;
pub mod methods;
mod options;
mod registry;
mod rules;
mod run;
mod validator;
mod value;

pub use errors::*;
pub use messages::{FieldMessage, MessageCatalog, Messages};
pub use options::*;
pub use registry::*;
pub use rules::*;
pub use run::*;
pub use validator::*;
pub use value::*;
