//! Shared HTTP plumbing for the hosted backend.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::BackendConfig;

/// HTTP client for the hosted backend.
///
/// One instance implements [`DataGateway`](crate::traits::DataGateway),
/// [`AuthProvider`](crate::traits::AuthProvider) and
/// [`ObjectStorage`](crate::traits::ObjectStorage); the session token obtained
/// by signing in is shared by all three.
#[derive(Clone)]
pub struct BackendClient {
    /// Base URL without a trailing slash
    pub base_url: String,
    client: Client,
    anon_key: String,
    session_token: Arc<RwLock<Option<String>>>,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            anon_key: anon_key.into(),
            session_token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.base_url.clone(), config.anon_key.clone())
    }

    /// Client without an API key, for tests against a local mock server.
    pub fn with_base_url(base_url: String) -> Self {
        Self::new(base_url, String::new())
    }

    pub fn with_anon_key(mut self, key: &str) -> Self {
        self.anon_key = key.to_string();
        self
    }

    /// Replace the session token, e.g. to resume a stored session.
    pub async fn set_session_token(&self, token: Option<String>) {
        *self.session_token.write().await = token;
    }

    pub async fn session_token(&self) -> Option<String> {
        self.session_token.read().await.clone()
    }

    pub(super) fn http(&self) -> &Client {
        &self.client
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the API key and the bearer token (session token, or the API
    /// key when signed out).
    pub(super) async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .session_token
            .read()
            .await
            .clone()
            .unwrap_or_else(|| self.anon_key.clone());
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    /// Attach only the API key, ignoring any session. Credential grants use
    /// this so a failed attempt leaves the current session untouched.
    pub(super) fn anonymous(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }
}

/// Error body as returned by the backend's services. Each service names
/// the human-readable field differently.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ApiErrorBody {
    pub fn text(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }

    /// The service-specific error code as text (`23505`, `PGRST116`, ...).
    pub fn code_str(&self) -> Option<String> {
        match &self.code {
            Some(serde_json::Value::String(code)) => Some(code.clone()),
            Some(serde_json::Value::Number(code)) => Some(code.to_string()),
            _ => self.error_code.clone(),
        }
    }
}

/// Read a failed response's status and error body.
pub(super) async fn read_error(response: Response) -> (u16, ApiErrorBody) {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ApiErrorBody>(&text).unwrap_or_else(|_| ApiErrorBody {
        message: if text.trim().is_empty() {
            None
        } else {
            Some(text.chars().take(200).collect())
        },
        ..ApiErrorBody::default()
    });
    (status, body)
}
