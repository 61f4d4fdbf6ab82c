//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Environment variable {var} is not set")]
    Missing { var: &'static str },

    /// An environment variable holds an unusable value.
    #[error("Invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Missing { .. } => "E_CONFIG_MISSING",
            ConfigError::Invalid { .. } => "E_CONFIG_INVALID",
        }
    }
}
