//! Post composer: optional image upload, then the post insert.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::{PokeError, PokeResult};
use crate::models::{ImageFile, NewPost, Table, UserIdentity};
use crate::traits::{insert_row, DataGateway, ObjectStorage};
use crate::view_model::FeedViewModel;

/// Input held by the composer between submissions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostDraft {
    pub text: String,
    pub image: Option<ImageFile>,
    /// Message from the last failed submission.
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Posted,
    /// Blank text, no user, or a submission already running. Nothing was sent.
    Skipped,
}

pub struct PostComposer {
    gateway: Arc<dyn DataGateway>,
    storage: Arc<dyn ObjectStorage>,
    bucket: String,
    draft: RwLock<PostDraft>,
}

impl PostComposer {
    pub fn new(
        gateway: Arc<dyn DataGateway>,
        storage: Arc<dyn ObjectStorage>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            storage,
            bucket: bucket.into(),
            draft: RwLock::new(PostDraft::default()),
        }
    }

    pub async fn draft(&self) -> PostDraft {
        self.draft.read().await.clone()
    }

    pub async fn set_text(&self, text: impl Into<String>) {
        self.draft.write().await.text = text.into();
    }

    pub async fn attach_image(&self, image: ImageFile) {
        self.draft.write().await.image = Some(image);
    }

    pub async fn clear_image(&self) {
        self.draft.write().await.image = None;
    }

    /// Publish the draft as `user`.
    ///
    /// The image, if any, is uploaded first; a failed upload stops before
    /// the insert. On success the submitted text and image are cleared,
    /// leaving anything typed or attached meanwhile, and `feed` reloads. On
    /// failure the draft is kept for another try.
    pub async fn submit(
        &self,
        user: Option<&UserIdentity>,
        feed: &FeedViewModel,
    ) -> PokeResult<SubmitOutcome> {
        let Some(user) = user else {
            return Ok(SubmitOutcome::Skipped);
        };
        let (text, image) = {
            let mut draft = self.draft.write().await;
            if draft.text.trim().is_empty() || draft.submitting {
                return Ok(SubmitOutcome::Skipped);
            }
            draft.submitting = true;
            (draft.text.clone(), draft.image.clone())
        };

        match self.publish(user, text.clone(), image.clone()).await {
            Ok(()) => {
                {
                    let mut draft = self.draft.write().await;
                    if draft.text == text {
                        draft.text.clear();
                    }
                    if draft.image == image {
                        draft.image = None;
                    }
                    draft.error = None;
                    draft.submitting = false;
                }
                feed.load().await;
                Ok(SubmitOutcome::Posted)
            }
            Err(e) => {
                warn!("Posting as {} failed [{}]: {}", user.id, e.error_code(), e);
                let mut draft = self.draft.write().await;
                draft.submitting = false;
                draft.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    async fn publish(
        &self,
        user: &UserIdentity,
        text: String,
        image: Option<ImageFile>,
    ) -> Result<(), PokeError> {
        let image_url = match image {
            Some(image) => {
                let path = image.random_storage_path();
                self.storage
                    .upload(&self.bucket, &path, image.bytes.clone(), &image.content_type)
                    .await?;
                info!("Uploaded {} to {}/{}", image.file_name, self.bucket, path);
                Some(self.storage.public_url(&self.bucket, &path))
            }
            None => None,
        };

        let post = NewPost {
            user_id: user.id.clone(),
            content: text,
            image_url,
        };
        insert_row(self.gateway.as_ref(), Table::Posts, &post).await?;
        info!("Posted as {}", user.id);
        Ok(())
    }
}
