//! Backend and access-policy configuration.
//!
//! Built with `with_*` methods or read from the environment:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `POKESOCIAL_URL` | Backend base URL | required |
//! | `POKESOCIAL_ANON_KEY` | Public API key sent with every request | empty |
//! | `POKESOCIAL_IMAGE_BUCKET` | Bucket for post images | `post-images` |
//! | `POKESOCIAL_ELEVATED_EMAILS` | Comma-separated elevated-access allow-list | one reserved address |

use crate::error::ConfigError;

pub const ENV_URL: &str = "POKESOCIAL_URL";
pub const ENV_ANON_KEY: &str = "POKESOCIAL_ANON_KEY";
pub const ENV_IMAGE_BUCKET: &str = "POKESOCIAL_IMAGE_BUCKET";
pub const ENV_ELEVATED_EMAILS: &str = "POKESOCIAL_ELEVATED_EMAILS";

pub const DEFAULT_IMAGE_BUCKET: &str = "post-images";

/// The reserved address granted elevated access when no allow-list is configured.
pub const DEFAULT_ELEVATED_EMAIL: &str = "trainer@pokesocial.app";

/// Which registration emails receive the elevated-access flag.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevatedAccessPolicy {
    emails: Vec<String>,
}

impl Default for ElevatedAccessPolicy {
    fn default() -> Self {
        Self {
            emails: vec![DEFAULT_ELEVATED_EMAIL.to_string()],
        }
    }
}

impl ElevatedAccessPolicy {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            emails: emails.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list. Blank entries are skipped.
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|email| !email.is_empty()),
        )
    }

    pub fn grants(&self, email: &str) -> bool {
        self.emails.iter().any(|allowed| allowed == email)
    }

    pub fn emails(&self) -> &[String] {
        &self.emails
    }
}

/// Connection settings for the hosted backend.
///
/// # Example
///
/// ```ignore
/// use pokesocial::config::BackendConfig;
///
/// let config = BackendConfig::new("https://project.example.co")
///     .with_anon_key("public-anon-key")
///     .with_image_bucket("post-images");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL without a trailing slash
    pub base_url: String,
    pub anon_key: String,
    pub image_bucket: String,
    pub elevated_access: ElevatedAccessPolicy,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: String::new(),
            image_bucket: DEFAULT_IMAGE_BUCKET.to_string(),
            elevated_access: ElevatedAccessPolicy::default(),
        }
    }

    pub fn with_anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = key.into();
        self
    }

    pub fn with_image_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.image_bucket = bucket.into();
        self
    }

    pub fn with_elevated_access(mut self, policy: ElevatedAccessPolicy) -> Self {
        self.elevated_access = policy;
        self
    }

    /// Read the configuration from `POKESOCIAL_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let base_url = get(ENV_URL).ok_or(ConfigError::Missing { var: ENV_URL })?;
        let base_url = base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: ENV_URL,
                message: format!("expected an http(s) URL, got '{}'", base_url),
            });
        }

        let mut config = Self::new(base_url);
        if let Some(key) = get(ENV_ANON_KEY) {
            config = config.with_anon_key(key.trim());
        }
        if let Some(bucket) = get(ENV_IMAGE_BUCKET) {
            config = config.with_image_bucket(bucket.trim());
        }
        if let Some(list) = get(ENV_ELEVATED_EMAILS) {
            let policy = ElevatedAccessPolicy::parse(&list);
            if policy.emails().is_empty() {
                return Err(ConfigError::Invalid {
                    var: ENV_ELEVATED_EMAILS,
                    message: "no addresses listed".to_string(),
                });
            }
            config = config.with_elevated_access(policy);
        }
        Ok(config)
    }
}
