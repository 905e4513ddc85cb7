//! Field-level input validation helpers built on the [`validator`] crate.
//!
//! Request DTOs derive [`validator::Validate`]; [`field_errors`] flattens any
//! failures into a stable, serializable list of [`FieldError`]s that the HTTP
//! layer returns verbatim.

use std::borrow::Cow;

use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

/// A single failed validation rule on a named request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flatten [`ValidationErrors`] into field errors, ordered by field name.
///
/// Rules without an explicit message fall back to their rule code
/// (e.g. `"email"`, `"length"`).
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldError::new(field.clone(), message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Custom rule: the value must contain at least one non-whitespace character.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
        password: String,
        #[validate(custom(function = "not_blank"))]
        name: String,
    }

    fn signup(email: &str, password: &str, name: &str) -> Signup {
        Signup {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(signup("alice@example.com", "secret12", "Alice A").validate().is_ok());
    }

    #[test]
    fn every_failing_field_is_reported_in_field_order() {
        let errors = field_errors(&signup("not-an-email", "123", "   ").validate().unwrap_err());
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "name", "password"]);
        assert_eq!(errors[0].message, "Invalid email format");
        assert_eq!(errors[1].message, "must not be blank");
        assert_eq!(errors[2].message, "Password must be at least 6 characters long");
    }

    #[test]
    fn password_length_boundary() {
        assert!(signup("a@b.io", "12345", "A").validate().is_err());
        assert!(signup("a@b.io", "123456", "A").validate().is_ok());
    }

    #[test]
    fn not_blank_rejects_whitespace_only() {
        assert!(not_blank("").is_err());
        assert!(not_blank(" \t\n").is_err());
        assert!(not_blank(" x ").is_ok());
    }
}
