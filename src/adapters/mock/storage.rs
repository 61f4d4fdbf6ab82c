//! In-memory object store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::UploadError;
use crate::traits::ObjectStorage;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: String,
}

#[derive(Default)]
struct State {
    /// (bucket, path) -> object
    objects: HashMap<(String, String), StoredObject>,
    failure: Option<UploadError>,
    uploads: usize,
}

/// In-memory [`ObjectStorage`]. Public URLs use the `memory://` scheme.
#[derive(Default)]
pub struct InMemoryStorage {
    state: Mutex<State>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upload fail with `error` until [`recover`](Self::recover).
    pub fn fail(&self, error: UploadError) {
        self.lock().failure = Some(error);
    }

    pub fn recover(&self) {
        self.lock().failure = None;
    }

    /// Number of upload attempts, including failed ones.
    pub fn upload_count(&self) -> usize {
        self.lock().uploads
    }

    pub fn object(&self, bucket: &str, path: &str) -> Option<StoredObject> {
        self.lock()
            .objects
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
    }

    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), UploadError> {
        let mut state = self.lock();
        state.uploads += 1;
        if let Some(err) = &state.failure {
            return Err(err.clone());
        }
        let key = (bucket.to_string(), path.to_string());
        if state.objects.contains_key(&key) {
            return Err(UploadError::Rejected {
                bucket: bucket.to_string(),
                path: path.to_string(),
                status: 409,
                message: "The resource already exists".to_string(),
            });
        }
        state.objects.insert(
            key,
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{}/{}", bucket, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_and_url() {
        let storage = InMemoryStorage::new();
        storage
            .upload("post-images", "a.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();
        let stored = storage.object("post-images", "a.png").unwrap();
        assert_eq!(stored.content_type, "image/png");
        assert_eq!(
            storage.public_url("post-images", "a.png"),
            "memory://post-images/a.png"
        );
    }

    #[tokio::test]
    async fn test_same_path_twice_is_rejected() {
        let storage = InMemoryStorage::new();
        storage
            .upload("b", "x.png", Bytes::new(), "image/png")
            .await
            .unwrap();
        let err = storage
            .upload("b", "x.png", Bytes::new(), "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Rejected { status: 409, .. }));
        assert_eq!(storage.upload_count(), 2);
        assert_eq!(storage.object_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let storage = InMemoryStorage::new();
        storage.fail(UploadError::Connection {
            message: "reset".to_string(),
        });
        assert!(storage
            .upload("b", "x.png", Bytes::new(), "image/png")
            .await
            .is_err());
        assert_eq!(storage.object_count(), 0);
    }
}
