// Formrules - server-side form validation with jQuery validation plugin rules
//
// This library checks submitted form values against the same rule and message
// declarations the browser plugin uses, so both sides agree on what is valid.

// Re-export the validation engine
#[cfg(feature = "validation")]
pub use formrules_validation;

#[cfg(feature = "validation")]
pub use formrules_validation::*;

// Prelude for common imports
#[cfg(feature = "validation")]
pub mod prelude {
    pub use crate::{
        ConfigError,
        FieldError,
        FieldMessage,
        FieldRuleSet,
        FieldValidator,
        FieldValue,
        FieldValues,
        MessageCatalog,
        RuleContext,
        RuleParam,
        RuleRegistry,
        ValidationRun,
        ValidatorOptions,
    };
}
