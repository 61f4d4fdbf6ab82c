//! Result type alias for pokesocial operations.

use super::poke_error::PokeError;

/// Type alias for Results using PokeError.
///
/// # Example
///
/// ```ignore
/// use pokesocial::error::PokeResult;
///
/// async fn like(feed: &FeedViewModel, user: &UserIdentity) -> PokeResult<bool> {
///     let action = feed.toggle_like("p-1", Some(user)).await?;
///     Ok(action == LikeAction::Liked)
/// }
/// ```
pub type PokeResult<T> = Result<T, PokeError>;
