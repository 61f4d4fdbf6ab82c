//! Object uploads over the backend's storage service (`/storage/v1`).

use async_trait::async_trait;
use bytes::Bytes;

use super::client::{read_error, BackendClient};
use crate::error::UploadError;
use crate::traits::ObjectStorage;

/// Percent-encode each path segment, keeping the separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl ObjectStorage for BackendClient {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), UploadError> {
        let url = self.url(&format!(
            "/storage/v1/object/{}/{}",
            urlencoding::encode(bucket),
            encode_path(path)
        ));
        tracing::debug!("Uploading {} bytes to {}", bytes.len(), url);

        let request = self
            .http()
            .post(&url)
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(bytes);
        let response = self.authorize(request).await.send().await?;

        if !response.status().is_success() {
            let (status, body) = read_error(response).await;
            return Err(UploadError::Rejected {
                bucket: bucket.to_string(),
                path: path.to_string(),
                status,
                message: body.text(),
            });
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.url(&format!(
            "/storage/v1/object/public/{}/{}",
            urlencoding::encode(bucket),
            encode_path(path)
        ))
    }
}
