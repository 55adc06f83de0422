use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Invalid email format";
pub const PASSWORD_REQUIRED: &str = "Password is required";

/// Email and password for a single login attempt.
///
/// Serializes to the auth request body: `{"email": ..., "password": ...}`.
#[derive(Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(custom(function = "validate_email_field"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check the credentials before anything is sent.
    /// Returns the per-field messages when any field is invalid.
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(|errors| FieldErrors::from(&errors))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Empty is reported as missing rather than malformed
fn validate_email_field(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(EMAIL_REQUIRED)));
    }
    if !email.validate_email() {
        return Err(ValidationError::new("email").with_message(Cow::Borrowed(EMAIL_INVALID)));
    }
    Ok(())
}

/// Field-level validation messages shown under the form inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }

    fn first_message(errors: &ValidationErrors, field: &str) -> Option<String> {
        errors
            .field_errors()
            .get(field)
            .and_then(|list| list.first())
            .map(|error| match error.message {
                Some(ref message) => message.to_string(),
                None => error.code.to_string(),
            })
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        Self {
            email: Self::first_message(errors, "email"),
            password: Self::first_message(errors, "password"),
        }
    }
}
