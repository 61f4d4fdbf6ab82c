//! Object storage failures.

use thiserror::Error;

use super::category::ErrorCategory;

/// An asset upload failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UploadError {
    /// The storage service could not be reached.
    #[error("Storage unreachable: {message}")]
    Connection { message: String },

    /// The storage service refused the object.
    #[error("Upload to '{bucket}/{path}' rejected ({status}): {message}")]
    Rejected {
        bucket: String,
        path: String,
        status: u16,
        message: String,
    },
}

impl UploadError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            UploadError::Connection { .. } => ErrorCategory::Network,
            UploadError::Rejected { status, .. } if *status == 401 || *status == 403 => {
                ErrorCategory::Auth
            }
            UploadError::Rejected { .. } => ErrorCategory::Server,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Connection { .. } => {
                "Could not upload the image. Please check your internet connection.".to_string()
            }
            UploadError::Rejected { status: 413, .. } => {
                "The image is too large to upload.".to_string()
            }
            UploadError::Rejected { message, .. } => {
                format!("The image could not be uploaded: {}", message)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::Connection { .. } => "E_UPLOAD_CONN",
            UploadError::Rejected { .. } => "E_UPLOAD_REJECTED",
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Connection {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_too_large() {
        let err = UploadError::Rejected {
            bucket: "post-images".to_string(),
            path: "a.png".to_string(),
            status: 413,
            message: "Payload too large".to_string(),
        };
        assert!(err.user_message().contains("too large"));
        assert_eq!(err.category(), ErrorCategory::Server);
    }

    #[test]
    fn test_forbidden_is_auth() {
        let err = UploadError::Rejected {
            bucket: "post-images".to_string(),
            path: "a.png".to_string(),
            status: 403,
            message: "new row violates row-level security policy".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert_eq!(err.error_code(), "E_UPLOAD_REJECTED");
    }
}
