//! `validator` crate compatible custom rules
//!
//! ```ignore
//! #[derive(Validate)]
//! struct Body {
//!     #[validate(custom(function = "input_validation::rules::email"))]
//!     email: String,
//! }
//! ```

use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

fn rule(ok: bool, code: &'static str, message: &'static str) -> Result<(), ValidationError> {
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new(code).with_message(Cow::Borrowed(message)))
    }
}

pub fn email(value: &str) -> Result<(), ValidationError> {
    rule(crate::validate_email(value), "invalid_email", "invalid email")
}

pub fn name(value: &str) -> Result<(), ValidationError> {
    rule(crate::validate_name(value), "invalid_name", "invalid name")
}

pub fn message(value: &str) -> Result<(), ValidationError> {
    rule(
        crate::validate_message(value),
        "invalid_message",
        "message must be non-empty, at most 500 characters and free of zalgo or control characters",
    )
}

pub fn event_type(value: &str) -> Result<(), ValidationError> {
    rule(
        crate::validate_event_type(value),
        "invalid_event_type",
        "unsupported event type",
    )
}

pub fn device_type(value: &str) -> Result<(), ValidationError> {
    rule(
        crate::validate_device_type(value),
        "invalid_device_type",
        "device type must be 'desktop' or 'mobile'",
    )
}

/// Flatten field errors into one line, e.g. `email: invalid email; name: invalid name`
///
/// Fields are sorted so the text is stable across runs.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let text = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                (field.clone(), text)
            })
        })
        .collect();
    parts.sort();

    parts
        .into_iter()
        .map(|(field, text)| format!("{field}: {text}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_carries_code_and_message() {
        let err = email("nope").unwrap_err();
        assert_eq!(err.code, "invalid_email");
        assert_eq!(err.message.as_deref(), Some("invalid email"));

        assert!(email("a@b.com").is_ok());
        assert!(name("Anna").is_ok());
        assert!(message("hello").is_ok());
        assert!(event_type("comment").is_ok());
        assert!(device_type("tablet").is_err());
    }

    #[test]
    fn test_describe_sorts_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("name", name("").unwrap_err());
        errors.add("email", email("x").unwrap_err());

        assert_eq!(describe(&errors), "email: invalid email; name: invalid name");
    }
}
