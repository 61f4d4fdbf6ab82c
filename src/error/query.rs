//! Remote read/write failures.

use thiserror::Error;

use super::category::ErrorCategory;

/// A row-store request failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The backend could not be reached.
    #[error("Connection to data store failed: {message}")]
    Connection { message: String },

    /// The backend rejected the request.
    #[error("Query on '{table}' failed ({status}): {message}")]
    Status {
        table: String,
        status: u16,
        message: String,
    },

    /// A uniqueness constraint was violated.
    #[error("Duplicate row in '{table}': {message}")]
    Conflict { table: String, message: String },

    /// A single-row query matched nothing.
    #[error("No row found in '{table}'")]
    NotFound { table: String },

    /// Rows came back in a shape the client could not decode.
    #[error("Could not decode rows: {message}")]
    Decode { message: String },
}

impl QueryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QueryError::Connection { .. } => ErrorCategory::Network,
            QueryError::Status { status: 401, .. } => ErrorCategory::Auth,
            QueryError::Status { .. } | QueryError::Conflict { .. } => ErrorCategory::Server,
            QueryError::NotFound { .. } | QueryError::Decode { .. } => ErrorCategory::Client,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            QueryError::Connection { .. } => {
                "Unable to reach the server. Please check your internet connection.".to_string()
            }
            QueryError::Status { status, message, .. } => match *status {
                401 => "Your session has expired. Please sign in again.".to_string(),
                403 => "You don't have permission to do that.".to_string(),
                500..=599 => {
                    "The server is experiencing issues. Please try again later.".to_string()
                }
                _ => message.clone(),
            },
            QueryError::Conflict { .. } => "That change was already made.".to_string(),
            QueryError::NotFound { .. } => "The requested record was not found.".to_string(),
            QueryError::Decode { .. } => {
                "Received an invalid response from the server.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::Connection { .. } => "E_QUERY_CONN",
            QueryError::Status { .. } => "E_QUERY_STATUS",
            QueryError::Conflict { .. } => "E_QUERY_CONFLICT",
            QueryError::NotFound { .. } => "E_QUERY_NOT_FOUND",
            QueryError::Decode { .. } => "E_QUERY_DECODE",
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Decode {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            QueryError::Decode {
                message: err.to_string(),
            }
        } else {
            QueryError::Connection {
                message: err.to_string(),
            }
        }
    }
}
