//! Authentication-related error types.
//!
//! This module defines errors raised by the auth provider during sign-up,
//! sign-in, sign-out and session lookup.

use thiserror::Error;

use super::category::ErrorCategory;

/// Authentication-specific error variants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    /// No user is signed in.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Email/password pair was rejected.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Sign-up was refused (address taken, weak password, signups disabled).
    #[error("Sign-up rejected: {message}")]
    SignUpRejected { message: String },

    /// The provider answered without a user record.
    #[error("No user data returned")]
    MissingUser,

    /// The provider could not be reached.
    #[error("Auth provider unreachable: {message}")]
    Connection { message: String },

    /// Any other non-success answer from the provider.
    #[error("Authentication API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl AuthError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuthError::Connection { .. } => ErrorCategory::Network,
            AuthError::SignUpRejected { .. } => ErrorCategory::User,
            AuthError::MissingUser => ErrorCategory::Client,
            AuthError::Api { status, .. } if *status >= 500 => ErrorCategory::Server,
            _ => ErrorCategory::Auth,
        }
    }

    /// Check if this error might be resolved by signing in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::NotAuthenticated | AuthError::Api { status: 401, .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::NotAuthenticated => {
                "You are not signed in. Please sign in to continue.".to_string()
            }
            AuthError::InvalidCredentials => "Invalid email or password.".to_string(),
            AuthError::SignUpRejected { message } => message.clone(),
            AuthError::MissingUser => "No user data returned".to_string(),
            AuthError::Connection { .. } => {
                "Unable to reach the sign-in service. Please check your internet connection."
                    .to_string()
            }
            AuthError::Api { status, message } => match *status {
                401 => "Your session has expired. Please sign in again.".to_string(),
                _ => format!("Authentication error: {}", message),
            },
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotAuthenticated => "E_AUTH_NOT_AUTH",
            AuthError::InvalidCredentials => "E_AUTH_INVALID",
            AuthError::SignUpRejected { .. } => "E_AUTH_SIGNUP",
            AuthError::MissingUser => "E_AUTH_NO_USER",
            AuthError::Connection { .. } => "E_AUTH_CONN",
            AuthError::Api { .. } => "E_AUTH_API",
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Connection {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Api {
            status: 0,
            message: format!("Invalid response format: {}", err),
        }
    }
}
