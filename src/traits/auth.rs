//! Authentication provider trait abstraction.

use async_trait::async_trait;

use crate::error::AuthError;
use crate::models::UserIdentity;

/// Trait for the hosted authentication service.
///
/// Implementations include the REST client in `adapters::rest` and the
/// in-memory provider in `adapters::mock`.
///
/// # Example
///
/// ```ignore
/// use pokesocial::traits::AuthProvider;
///
/// async fn who_am_i<A: AuthProvider>(auth: &A) -> String {
///     match auth.current_user().await {
///         Ok(Some(user)) => user.email,
///         _ => "guest".to_string(),
///     }
/// }
/// ```
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create a new identity. Returns the identity the provider issued.
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError>;

    /// Start a session with an email/password pair.
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// The identity of the current session, if any.
    async fn current_user(&self) -> Result<Option<UserIdentity>, AuthError>;
}
