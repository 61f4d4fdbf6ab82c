//! Unified error type for the pokesocial client.
//!
//! `PokeError` consolidates the collaborator failures (query, auth, upload),
//! local validation and configuration errors into one enum so that every
//! operation boundary can convert a failure into a single display message.

use thiserror::Error;

use super::auth::AuthError;
use super::category::ErrorCategory;
use super::config::ConfigError;
use super::query::QueryError;
use super::upload::UploadError;
use super::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PokeError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The identity was created but its profile row was not.
    ///
    /// No compensating delete is attempted; the account exists without a
    /// profile until someone repairs it.
    #[error("Account {user_id} was created but its profile could not be saved: {source}")]
    RegistrationIncomplete {
        user_id: String,
        #[source]
        source: QueryError,
    },
}

impl PokeError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            PokeError::Query(err) => err.category(),
            PokeError::Auth(err) => err.category(),
            PokeError::Upload(err) => err.category(),
            PokeError::Validation(_) => ErrorCategory::User,
            PokeError::Config(_) => ErrorCategory::Configuration,
            PokeError::RegistrationIncomplete { source, .. } => source.category(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            PokeError::Query(err) => err.user_message(),
            PokeError::Auth(err) => err.user_message(),
            PokeError::Upload(err) => err.user_message(),
            PokeError::Validation(err) => err.user_message(),
            PokeError::Config(err) => err.to_string(),
            PokeError::RegistrationIncomplete { source, .. } => format!(
                "Your account was created, but saving your profile failed: {}",
                source.user_message()
            ),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            PokeError::Query(err) => err.error_code(),
            PokeError::Auth(err) => err.error_code(),
            PokeError::Upload(err) => err.error_code(),
            PokeError::Validation(err) => err.error_code(),
            PokeError::Config(err) => err.error_code(),
            PokeError::RegistrationIncomplete { .. } => "E_REGISTER_PARTIAL",
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }

    /// Check if this error requires signing in again.
    pub fn requires_reauth(&self) -> bool {
        match self {
            PokeError::Auth(err) => err.requires_reauth(),
            PokeError::Query(QueryError::Status { status: 401, .. }) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        let err: PokeError = QueryError::Connection {
            message: "refused".to_string(),
        }
        .into();
        assert!(matches!(err, PokeError::Query(_)));
        assert_eq!(err.category(), ErrorCategory::Network);

        let err: PokeError = ValidationError::Required { field: "Email" }.into();
        assert_eq!(err.category(), ErrorCategory::User);
        assert_eq!(err.user_message(), "Email is required.");
    }

    #[test]
    fn test_transparent_display() {
        let err: PokeError = AuthError::InvalidCredentials.into();
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[test]
    fn test_registration_incomplete() {
        let err = PokeError::RegistrationIncomplete {
            user_id: "u-1".to_string(),
            source: QueryError::Status {
                table: "profiles".to_string(),
                status: 409,
                message: "duplicate key".to_string(),
            },
        };
        assert_eq!(err.error_code(), "E_REGISTER_PARTIAL");
        assert!(err.user_message().starts_with("Your account was created"));
        assert!(err.to_string().contains("u-1"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_requires_reauth() {
        let expired: PokeError = QueryError::Status {
            table: "posts".to_string(),
            status: 401,
            message: "JWT expired".to_string(),
        }
        .into();
        assert!(expired.requires_reauth());

        let conflict: PokeError = QueryError::Conflict {
            table: "likes".to_string(),
            message: "duplicate".to_string(),
        }
        .into();
        assert!(!conflict.requires_reauth());
    }
}
