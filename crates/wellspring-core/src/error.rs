//! Core error types for wellspring-core.
//!
//! Every failure a user action can produce falls into one of three kinds
//! (see [`ErrorKind`]): bad input caught before anything else runs, a
//! rejection reported by the auth provider, or an unexpected failure of a
//! collaborator. None of them are fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wellspring-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// The three error families user-facing code distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    Unexpected,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::Auth(AuthError::Unavailable(_)) | CoreError::Auth(AuthError::SessionStore(_)) => {
                ErrorKind::Unexpected
            }
            CoreError::Auth(_) => ErrorKind::Auth,
            CoreError::Config(_) => ErrorKind::Unexpected,
        }
    }
}

/// Input rejected before it reaches any state or collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Journal entry is empty or whitespace only
    #[error("Journal entry is empty")]
    EmptyJournalEntry,

    /// Mood log attempted without a selected mood
    #[error("No mood selected")]
    NoMoodSelected,

    /// One or more required form fields are blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Sign-up password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Sign-up password shorter than the configured minimum
    #[error("Password must be at least {min} characters long")]
    WeakPassword { min: usize },

    /// Countdown duration of zero seconds
    #[error("Invalid duration: {secs} seconds")]
    InvalidDuration { secs: u32 },

    /// Countdown reconfigured while it is running
    #[error("Cannot change the duration while the timer is running")]
    TimerRunning,

    /// Unknown value for an enumerated field
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Authentication failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider refused the request; `message` is shown verbatim.
    #[error("{message}")]
    Rejected { status: Option<u16>, message: String },

    /// Operation requires an authenticated session
    #[error("Not signed in")]
    NotSignedIn,

    /// Provider could not be reached or answered with garbage
    #[error("Auth provider unavailable: {0}")]
    Unavailable(String),

    /// Local session storage failed
    #[error("Session storage failed: {0}")]
    SessionStore(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/config directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Unavailable(err.to_string())
    }
}

impl From<keyring::Error> for AuthError {
    fn from(err: keyring::Error) -> Self {
        AuthError::SessionStore(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_displays_provider_message_verbatim() {
        let err = AuthError::Rejected {
            status: Some(400),
            message: "Invalid login credentials".into(),
        };
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            CoreError::from(ValidationError::EmptyJournalEntry).kind(),
            ErrorKind::Validation
        );
        assert_eq!(CoreError::from(AuthError::NotSignedIn).kind(), ErrorKind::Auth);
        assert_eq!(
            CoreError::from(AuthError::Unavailable("timeout".into())).kind(),
            ErrorKind::Unexpected
        );
        assert_eq!(
            CoreError::from(ConfigError::UnknownKey("ui.theme".into())).kind(),
            ErrorKind::Unexpected
        );
    }
}
