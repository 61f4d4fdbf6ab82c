//! Session provider: owns the current identity and publishes changes.
//!
//! Operations never read the session implicitly; callers take the identity
//! from [`SessionProvider::current`] and pass it down.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::AuthError;
use crate::models::UserIdentity;
use crate::traits::AuthProvider;

pub struct SessionProvider {
    auth: Arc<dyn AuthProvider>,
    current_tx: watch::Sender<Option<UserIdentity>>,
}

impl SessionProvider {
    /// Start signed out. Call [`restore`](Self::restore) to resume an
    /// existing session.
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        let (current_tx, _) = watch::channel(None);
        Self { auth, current_tx }
    }

    pub fn auth(&self) -> Arc<dyn AuthProvider> {
        self.auth.clone()
    }

    /// The identity of the current session, if any.
    pub fn current(&self) -> Option<UserIdentity> {
        self.current_tx.borrow().clone()
    }

    /// Subscribe to identity changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<UserIdentity>> {
        self.current_tx.subscribe()
    }

    /// Ask the provider for the current session. A failed lookup leaves the
    /// session signed out.
    pub async fn restore(&self) -> Result<Option<UserIdentity>, AuthError> {
        match self.auth.current_user().await {
            Ok(user) => {
                if let Some(user) = &user {
                    info!("Restored session for {}", user.id);
                }
                self.publish(user.clone());
                Ok(user)
            }
            Err(e) => {
                warn!("Session lookup failed: {}", e);
                self.publish(None);
                Err(e)
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let user = self.auth.sign_in(email, password).await?;
        self.publish(Some(user.clone()));
        Ok(user)
    }

    /// End the session. The local identity is cleared even if the provider
    /// reports an error.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let result = self.auth.sign_out().await;
        self.publish(None);
        result
    }

    fn publish(&self, user: Option<UserIdentity>) {
        self.current_tx.send_if_modified(|current| {
            if *current == user {
                false
            } else {
                *current = user;
                true
            }
        });
    }
}
