use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::query::Filter;
use super::{deserialize_id, deserialize_nullable_string, deserialize_null_default};

/// Denormalized author fields embedded in posts and comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSnippet {
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub last_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub content: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub profiles: AuthorSnippet,
}

/// A feed post with its embedded author, likes and comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub profiles: AuthorSnippet,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub likes: Vec<Like>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|like| like.user_id == user_id)
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

/// Insert payload for the `posts` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPost {
    pub user_id: String,
    pub content: String,
    pub image_url: Option<String>,
}

/// The (post, user) pair identifying a like. Doubles as the insert payload
/// for the `likes` table and as the match filter for removing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LikeKey {
    pub post_id: String,
    pub user_id: String,
}

impl LikeKey {
    pub fn new(post_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn match_filters(&self) -> Vec<Filter> {
        vec![
            Filter::eq("post_id", &self.post_id),
            Filter::eq("user_id", &self.user_id),
        ]
    }
}
