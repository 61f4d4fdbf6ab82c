//! The post feed and like toggling.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use super::list::{CollectionKind, ListState, ListViewModel};
use super::load_state::LoadState;
use crate::error::{PokeError, PokeResult, ValidationError};
use crate::models::{LikeKey, Post, Table, UserIdentity};
use crate::traits::{insert_row, DataGateway};

/// What a like toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Liked,
    Unliked,
    /// No user, or the same toggle is already in flight.
    Skipped,
}

pub struct FeedViewModel {
    list: ListViewModel<Post>,
    gateway: Arc<dyn DataGateway>,
    in_flight: Mutex<HashSet<LikeKey>>,
}

impl FeedViewModel {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            list: ListViewModel::new(gateway.clone(), CollectionKind::Posts),
            gateway,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Fetch posts, newest first.
    pub async fn load(&self) -> bool {
        self.list.load().await
    }

    pub async fn posts(&self) -> Vec<Post> {
        self.list.items().await
    }

    pub async fn snapshot(&self) -> ListState<Post> {
        self.list.snapshot().await
    }

    pub async fn load_state(&self) -> LoadState {
        self.list.load_state().await
    }

    /// Message from the last failed like toggle, cleared by the next success.
    pub async fn notice(&self) -> Option<String> {
        self.list.notice().await
    }

    pub fn detach(&self) {
        self.list.detach();
    }

    /// Like the post if `user` has not liked it, otherwise unlike it.
    ///
    /// The decision is made from the loaded list; nothing changes locally
    /// until the server answers. Whatever the answer, the feed is reloaded
    /// afterwards.
    pub async fn toggle_like(
        &self,
        post_id: &str,
        user: Option<&UserIdentity>,
    ) -> PokeResult<LikeAction> {
        let Some(user) = user else {
            return Ok(LikeAction::Skipped);
        };

        let liked = self
            .list
            .with_items(|posts| {
                posts
                    .iter()
                    .find(|post| post.id == post_id)
                    .map(|post| post.is_liked_by(&user.id))
            })
            .await;
        let Some(liked) = liked else {
            let err = PokeError::from(ValidationError::UnknownPost {
                post_id: post_id.to_string(),
            });
            self.list.set_notice(Some(err.user_message())).await;
            return Err(err);
        };

        let key = LikeKey::new(post_id, user.id.clone());
        if !self.begin(&key) {
            return Ok(LikeAction::Skipped);
        }

        let result = if liked {
            info!("Unliking post {} as {}", post_id, user.id);
            self.gateway
                .delete(Table::Likes, &key.match_filters())
                .await
                .map(|_| LikeAction::Unliked)
        } else {
            info!("Liking post {} as {}", post_id, user.id);
            insert_row(self.gateway.as_ref(), Table::Likes, &key)
                .await
                .map(|_| LikeAction::Liked)
        };
        self.finish(&key);

        let result = result.map_err(PokeError::from);
        match &result {
            Ok(_) => self.list.set_notice(None).await,
            Err(e) => {
                warn!("Like toggle on {} failed [{}]: {}", post_id, e.error_code(), e);
                self.list.set_notice(Some(e.user_message())).await;
            }
        }

        self.list.load().await;
        result
    }

    fn begin(&self, key: &LikeKey) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.clone())
    }

    fn finish(&self, key: &LikeKey) {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
    }
}
