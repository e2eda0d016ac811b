//! Connection settings for `TrelloClient`.

use std::fmt;

use crate::error::ConfigError;

/// Public API root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

const ENV_API_KEY: &str = "TRELLO_API_KEY";
const ENV_TOKEN: &str = "TRELLO_TOKEN";
const ENV_BASE_URL: &str = "TRELLO_BASE_URL";

/// Base URL plus the application key and user token sent with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    key: String,
    token: String,
}

impl ClientConfig {
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            key: key.into(),
            token: token.into(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Load from `TRELLO_API_KEY`, `TRELLO_TOKEN` and, optionally,
    /// `TRELLO_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let key = lookup(ENV_API_KEY)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVar(ENV_API_KEY))?;
        let token = lookup(ENV_TOKEN)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVar(ENV_TOKEN))?;
        let config = Self::new(key, token);
        Ok(match lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            Some(url) => config.with_base_url(&url),
            None => config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("key", &self.key)
            .field("token", &"<redacted>")
            .finish()
    }
}
