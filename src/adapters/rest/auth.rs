//! Email/password auth over the backend's auth service (`/auth/v1`).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::client::{read_error, ApiErrorBody, BackendClient};
use crate::error::AuthError;
use crate::models::UserIdentity;
use crate::traits::AuthProvider;

/// Response of the password grant, and of sign-up when the project starts a
/// session immediately.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: String,
    #[serde(default)]
    user: Option<UserIdentity>,
}

/// Sign-up answers either with a session or, when email confirmation is
/// required, with the bare user record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(SessionResponse),
    User(UserIdentity),
}

fn api_error(status: u16, body: ApiErrorBody) -> AuthError {
    AuthError::Api {
        status,
        message: body.text(),
    }
}

fn is_invalid_grant(body: &ApiErrorBody) -> bool {
    body.error.as_deref() == Some("invalid_grant")
        || body.error_code.as_deref() == Some("invalid_credentials")
}

#[async_trait]
impl AuthProvider for BackendClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let request = self
            .http()
            .post(self.url("/auth/v1/signup"))
            .json(&json!({ "email": email, "password": password }));
        let response = self.anonymous(request).send().await?;

        if !response.status().is_success() {
            let (status, body) = read_error(response).await;
            return Err(match status {
                400 | 422 => AuthError::SignUpRejected {
                    message: body.text(),
                },
                _ => api_error(status, body),
            });
        }

        let text = response.text().await?;
        match serde_json::from_str::<SignUpResponse>(&text) {
            Ok(SignUpResponse::Session(session)) => {
                let user = session.user.ok_or(AuthError::MissingUser)?;
                // An existing session stays current; the new account signs
                // in explicitly.
                if self.session_token().await.is_none() {
                    self.set_session_token(Some(session.access_token)).await;
                    tracing::info!("Signed up {} with an active session", user.id);
                } else {
                    tracing::info!("Signed up {}; keeping the current session", user.id);
                }
                Ok(user)
            }
            Ok(SignUpResponse::User(user)) => {
                tracing::info!("Signed up {}", user.id);
                Ok(user)
            }
            Err(_) => Err(AuthError::MissingUser),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let request = self
            .http()
            .post(self.url("/auth/v1/token?grant_type=password"))
            .json(&json!({ "email": email, "password": password }));
        // The stored token is replaced only once the grant succeeds.
        let response = self.anonymous(request).send().await?;

        if !response.status().is_success() {
            let (status, body) = read_error(response).await;
            if status == 400 && is_invalid_grant(&body) {
                return Err(AuthError::InvalidCredentials);
            }
            return Err(api_error(status, body));
        }

        let session: SessionResponse = serde_json::from_str(&response.text().await?)?;
        let user = session.user.ok_or(AuthError::MissingUser)?;
        self.set_session_token(Some(session.access_token)).await;
        tracing::info!("Signed in as {}", user.id);
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.session_token().await.is_none() {
            return Ok(());
        }
        let request = self.authorize(self.http().post(self.url("/auth/v1/logout"))).await;
        // The local session ends whatever the server says.
        self.set_session_token(None).await;
        let response = request.send().await?;

        let status = response.status().as_u16();
        if response.status().is_success() || status == 401 || status == 403 {
            tracing::info!("Signed out");
            return Ok(());
        }
        let (status, body) = read_error(response).await;
        Err(api_error(status, body))
    }

    async fn current_user(&self) -> Result<Option<UserIdentity>, AuthError> {
        if self.session_token().await.is_none() {
            return Ok(None);
        }
        let request = self.authorize(self.http().get(self.url("/auth/v1/user"))).await;
        let response = request.send().await?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            tracing::debug!("Session token rejected; treating as signed out");
            self.set_session_token(None).await;
            return Ok(None);
        }
        if !response.status().is_success() {
            let (status, body) = read_error(response).await;
            return Err(api_error(status, body));
        }

        let user: UserIdentity = serde_json::from_str(&response.text().await?)?;
        Ok(Some(user))
    }
}
