//! Auth form validation.
//!
//! Everything here runs before a provider is contacted. A form that fails
//! validation never produces a network call.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

/// Validated sign-in credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// # Errors
    /// [`ValidationError::MissingField`] if either field is blank.
    pub fn validate(&self) -> Result<Credentials, ValidationError> {
        let email = required("email", &self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        Ok(Credentials {
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl SignUpForm {
    /// Checks run in order: required fields, matching confirmation,
    /// minimum length.
    ///
    /// # Errors
    /// The first [`ValidationError`] encountered.
    pub fn validate(&self, min_password_length: usize) -> Result<SignUpRequest, ValidationError> {
        let full_name = required("full_name", &self.full_name)?;
        let email = required("email", &self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        if self.confirm_password.is_empty() {
            return Err(ValidationError::MissingField("confirm_password"));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < min_password_length {
            return Err(ValidationError::WeakPassword {
                min: min_password_length,
            });
        }
        Ok(SignUpRequest {
            full_name,
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetForm {
    pub email: String,
}

impl PasswordResetForm {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// Returns the trimmed email.
    ///
    /// # Errors
    /// [`ValidationError::MissingField`] if blank.
    pub fn validate(&self) -> Result<String, ValidationError> {
        required("email", &self.email)
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(password: &str, confirm: &str) -> SignUpForm {
        SignUpForm {
            full_name: "Ada".into(),
            email: " ada@example.com ".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn sign_in_trims_email_and_requires_both_fields() {
        let creds = SignInForm::new("  me@example.com ", "secret").validate().unwrap();
        assert_eq!(creds.email, "me@example.com");
        assert_eq!(
            SignInForm::new("", "secret").validate().unwrap_err(),
            ValidationError::MissingField("email")
        );
        assert_eq!(
            SignInForm::new("me@example.com", "").validate().unwrap_err(),
            ValidationError::MissingField("password")
        );
    }

    #[test]
    fn sign_up_rejects_mismatch_before_length() {
        assert_eq!(
            sign_up("abc", "abd").validate(6).unwrap_err(),
            ValidationError::PasswordMismatch
        );
        assert_eq!(
            sign_up("abc", "abc").validate(6).unwrap_err(),
            ValidationError::WeakPassword { min: 6 }
        );
        let req = sign_up("abcdef", "abcdef").validate(6).unwrap();
        assert_eq!(req.email, "ada@example.com");
    }

    #[test]
    fn sign_up_requires_every_field() {
        let mut form = sign_up("abcdef", "abcdef");
        form.full_name = "   ".into();
        assert_eq!(
            form.validate(6).unwrap_err(),
            ValidationError::MissingField("full_name")
        );
    }

    #[test]
    fn reset_requires_email() {
        assert!(PasswordResetForm::new(" ").validate().is_err());
        assert_eq!(
            PasswordResetForm::new("x@y.z").validate().unwrap(),
            "x@y.z".to_string()
        );
    }
}
