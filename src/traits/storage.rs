//! Object storage trait abstraction.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::UploadError;

/// Trait for the hosted object store that holds post images.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` at `bucket/path`.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), UploadError>;

    /// Publicly resolvable URL of an object. Pure string construction; never
    /// touches the network and never fails.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}
