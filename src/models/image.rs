use bytes::Bytes;
use uuid::Uuid;

use crate::error::ValidationError;

/// Content types the post composer accepts.
pub const ACCEPTED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// An image the user selected to attach to a post.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Result<Self, ValidationError> {
        let content_type = content_type.into();
        if !ACCEPTED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(ValidationError::UnsupportedImageType { content_type });
        }
        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes: bytes.into(),
        })
    }

    /// Text after the last dot, or the whole name when there is none.
    pub fn extension(&self) -> &str {
        self.file_name
            .rsplit('.')
            .next()
            .unwrap_or(self.file_name.as_str())
    }

    /// A fresh random object path that keeps the original extension.
    pub fn random_storage_path(&self) -> String {
        format!("{}.{}", Uuid::new_v4(), self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_png_and_jpeg() {
        assert!(ImageFile::new("a.png", "image/png", vec![1u8]).is_ok());
        assert!(ImageFile::new("a.jpg", "image/jpeg", vec![1u8]).is_ok());
    }

    #[test]
    fn test_rejects_other_types() {
        let err = ImageFile::new("anim.gif", "image/gif", vec![1u8]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedImageType {
                content_type: "image/gif".to_string()
            }
        );
    }

    #[test]
    fn test_extension() {
        let img = ImageFile::new("pikachu.final.PNG", "image/png", Vec::new()).unwrap();
        assert_eq!(img.extension(), "PNG");
        let img = ImageFile::new("noext", "image/png", Vec::new()).unwrap();
        assert_eq!(img.extension(), "noext");
    }

    #[test]
    fn test_random_storage_paths_differ() {
        let img = ImageFile::new("a.png", "image/png", Vec::new()).unwrap();
        let first = img.random_storage_path();
        let second = img.random_storage_path();
        assert!(first.ends_with(".png"));
        assert_ne!(first, second);
    }
}
