//! Local input validation failures, detected before any request is made.

use thiserror::Error;

/// A required field is missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("'{value}' is not a date (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    #[error("Unsupported image type '{content_type}'")]
    UnsupportedImageType { content_type: String },

    /// The referenced post is not in the loaded feed.
    #[error("Post '{post_id}' is not loaded")]
    UnknownPost { post_id: String },
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::UnsupportedImageType { .. } => {
                "Only JPEG and PNG images can be attached.".to_string()
            }
            ValidationError::InvalidDate { .. } => {
                "Date of birth must be a valid date (YYYY-MM-DD).".to_string()
            }
            ValidationError::UnknownPost { .. } => {
                "That post is no longer available. Refresh the feed and try again.".to_string()
            }
            other => format!("{}.", other),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::Required { .. } => "E_VALID_REQUIRED",
            ValidationError::PasswordTooShort { .. } => "E_VALID_PASSWORD",
            ValidationError::InvalidDate { .. } => "E_VALID_DATE",
            ValidationError::UnsupportedImageType { .. } => "E_VALID_IMAGE",
            ValidationError::UnknownPost { .. } => "E_VALID_POST",
        }
    }
}
