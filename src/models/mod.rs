//! Data types exchanged with the hosted backend.
//!
//! Row types mirror the JSON the row store returns, including embedded
//! relations (a post carries its author snippet, likes and comments).

mod identity;
mod image;
mod pokemon;
mod post;
mod profile;
mod query;

pub use identity::UserIdentity;
pub use image::{ImageFile, ACCEPTED_IMAGE_TYPES};
pub use pokemon::{PokedexEntry, Region, KNOWN_REGIONS};
pub use post::{AuthorSnippet, Comment, Like, LikeKey, NewPost, Post};
pub use profile::{NewProfile, Profile};
pub use query::{Filter, Order, SelectQuery, Table};

use serde::{Deserialize, Deserializer};

/// Row ids are uuids in most tables and integers in `pokemon`; keep both as
/// text.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// Helper to deserialize nullable strings as empty string
/// Handles both missing fields and explicit null values
pub(crate) fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// Embedded relations come back as `null` when the join finds nothing;
/// treat that as the empty value (empty list, blank author).
pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}
