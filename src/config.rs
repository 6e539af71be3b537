//! Client configuration.
//!
//! `ClientConfig` and its builder hold everything the interceptor and the
//! request adapter need that is not injected as a collaborator.

use crate::defaults;
use crate::error::HttpError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL prepended to relative paths
    pub base_url: String,
    /// Timeout stamped on every call by the interceptor
    #[serde(with = "duration_ms_serde")]
    pub timeout: Duration,
    /// Connection timeout for the underlying client
    #[serde(with = "duration_ms_serde")]
    pub connect_timeout: Duration,
    /// Value of the `source-client` header
    pub source_client: String,
    /// Page opened on 401
    pub login_url: String,
    /// Toast text for transport failures
    pub network_error_message: String,
    /// Toast text for other failures without a backend message
    pub fallback_error_message: String,
    /// User agent
    pub user_agent: Option<String>,
    /// Whether the logging interceptor is installed
    pub log_options: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::http::BASE_URL.to_string(),
            timeout: defaults::http::REQUEST_TIMEOUT,
            connect_timeout: defaults::http::CONNECT_TIMEOUT,
            source_client: defaults::http::SOURCE_CLIENT.to_string(),
            login_url: defaults::ui::LOGIN_URL.to_string(),
            network_error_message: defaults::ui::NETWORK_ERROR_MESSAGE.to_string(),
            fallback_error_message: defaults::ui::FALLBACK_ERROR_MESSAGE.to_string(),
            user_agent: Some(defaults::http::USER_AGENT.to_string()),
            log_options: true,
        }
    }
}

impl ClientConfig {
    /// Returns a builder for constructing `ClientConfig`
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Default configuration with `MINIAPP_HTTP_BASE_URL` and
    /// `MINIAPP_HTTP_TIMEOUT_MS` applied when set.
    pub fn from_env() -> Result<Self, HttpError> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, HttpError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(defaults::env::BASE_URL) {
            let base_url = base_url.trim();
            if !base_url.is_empty() {
                self.base_url = base_url.to_string();
            }
        }
        if let Some(raw) = lookup(defaults::env::TIMEOUT_MS) {
            let ms: u64 = raw.trim().parse().map_err(|e| {
                HttpError::Configuration(format!(
                    "{} must be milliseconds, got '{raw}': {e}",
                    defaults::env::TIMEOUT_MS
                ))
            })?;
            self.timeout = Duration::from_millis(ms);
        }
        Ok(self)
    }

    /// Check the values the interceptor relies on.
    pub fn validate(&self) -> Result<(), HttpError> {
        if !self
            .base_url
            .starts_with(defaults::http::ABSOLUTE_URL_PREFIX)
        {
            return Err(HttpError::Configuration(format!(
                "base_url must be absolute, got '{}'",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(HttpError::Configuration("timeout must be non-zero".into()));
        }
        Ok(())
    }
}

/// Builder for `ClientConfig`
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    source_client: Option<String>,
    login_url: Option<String>,
    network_error_message: Option<String>,
    fallback_error_message: Option<String>,
    user_agent: Option<Option<String>>,
    log_options: Option<bool>,
}

impl ClientConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }
    pub fn source_client<S: Into<String>>(mut self, source_client: S) -> Self {
        self.source_client = Some(source_client.into());
        self
    }
    pub fn login_url<S: Into<String>>(mut self, login_url: S) -> Self {
        self.login_url = Some(login_url.into());
        self
    }
    pub fn network_error_message<S: Into<String>>(mut self, message: S) -> Self {
        self.network_error_message = Some(message.into());
        self
    }
    pub fn fallback_error_message<S: Into<String>>(mut self, message: S) -> Self {
        self.fallback_error_message = Some(message.into());
        self
    }
    pub fn user_agent<S: Into<String>>(mut self, user_agent: Option<S>) -> Self {
        self.user_agent = Some(user_agent.map(|s| s.into()));
        self
    }
    pub fn log_options(mut self, enabled: bool) -> Self {
        self.log_options = Some(enabled);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        let d = ClientConfig::default();
        ClientConfig {
            base_url: self.base_url.unwrap_or(d.base_url),
            timeout: self.timeout.unwrap_or(d.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(d.connect_timeout),
            source_client: self.source_client.unwrap_or(d.source_client),
            login_url: self.login_url.unwrap_or(d.login_url),
            network_error_message: self
                .network_error_message
                .unwrap_or(d.network_error_message),
            fallback_error_message: self
                .fallback_error_message
                .unwrap_or(d.fallback_error_message),
            user_agent: self.user_agent.unwrap_or(d.user_agent),
            log_options: self.log_options.unwrap_or(d.log_options),
        }
    }
}

// Durations are written as integer milliseconds
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}
