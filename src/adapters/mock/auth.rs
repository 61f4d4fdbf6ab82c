//! In-memory auth provider.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::AuthError;
use crate::models::UserIdentity;
use crate::traits::AuthProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthOp {
    SignUp,
    SignIn,
    SignOut,
    CurrentUser,
}

#[derive(Default)]
struct State {
    /// email -> (identity, password)
    accounts: HashMap<String, (UserIdentity, String)>,
    current: Option<UserIdentity>,
    failures: HashMap<AuthOp, AuthError>,
    counts: HashMap<AuthOp, usize>,
    next_id: u64,
}

/// In-memory [`AuthProvider`].
///
/// Sign-up creates an account but does not start a session, matching a
/// provider configured to require email confirmation.
#[derive(Default)]
pub struct InMemoryAuth {
    state: Mutex<State>,
}

impl InMemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account up front.
    pub fn with_account(self, id: &str, email: &str, password: &str) -> Self {
        self.lock().accounts.insert(
            email.to_string(),
            (UserIdentity::new(id, email), password.to_string()),
        );
        self
    }

    /// Start with `user` already signed in.
    pub fn signed_in_as(self, user: UserIdentity) -> Self {
        self.lock().current = Some(user);
        self
    }

    pub fn fail(&self, op: AuthOp, error: AuthError) {
        self.lock().failures.insert(op, error);
    }

    pub fn recover(&self, op: AuthOp) {
        self.lock().failures.remove(&op);
    }

    pub fn count(&self, op: AuthOp) -> usize {
        self.lock().counts.get(&op).copied().unwrap_or(0)
    }

    /// Identity registered under `email`, if any.
    pub fn account(&self, email: &str) -> Option<UserIdentity> {
        self.lock().accounts.get(email).map(|(user, _)| user.clone())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl State {
    fn enter(&mut self, op: AuthOp) -> Result<(), AuthError> {
        *self.counts.entry(op).or_insert(0) += 1;
        match self.failures.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let mut state = self.lock();
        state.enter(AuthOp::SignUp)?;
        if state.accounts.contains_key(email) {
            return Err(AuthError::SignUpRejected {
                message: "User already registered".to_string(),
            });
        }
        state.next_id += 1;
        let user = UserIdentity::new(format!("user-{}", state.next_id), email);
        state
            .accounts
            .insert(email.to_string(), (user.clone(), password.to_string()));
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let mut state = self.lock();
        state.enter(AuthOp::SignIn)?;
        let user = match state.accounts.get(email) {
            Some((user, stored)) if stored == password => user.clone(),
            _ => return Err(AuthError::InvalidCredentials),
        };
        state.current = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut state = self.lock();
        state.enter(AuthOp::SignOut)?;
        state.current = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<UserIdentity>, AuthError> {
        let mut state = self.lock();
        state.enter(AuthOp::CurrentUser)?;
        Ok(state.current.clone())
    }
}
