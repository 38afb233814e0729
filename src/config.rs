//! Client configuration
//!
//! `ClientConfig` holds everything the request executor needs: base URL,
//! credentials, timeout and retry policy. It is passed explicitly to the
//! clients at construction and can be loaded from YAML/JSON files or
//! overlaid from the environment.

use crate::error::{Error, Result, ResultExt};
use crate::http::RateLimiterConfig;
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default API root
pub const DEFAULT_API_URL: &str = "https://api.semanticscholar.org";

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "SEMANTIC_SCHOLAR_API_KEY";

/// Environment variable overriding the API root
pub const ENV_API_URL: &str = "SEMANTIC_SCHOLAR_API_URL";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

// ============================================================================
// Client Config
// ============================================================================

/// Configuration shared by the async and blocking clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, without the `/graph/v1` style path
    pub api_url: String,

    /// Private API key sent as `x-api-key`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request deadline
    #[serde(with = "duration_secs")]
    pub timeout: Duration,

    /// Retry rate-limited (429) requests
    pub retry: bool,

    /// Total attempts for a rate-limited request, including the first
    pub max_attempts: u32,

    /// Fixed delay between rate-limited attempts
    #[serde(with = "duration_secs")]
    pub retry_delay: Duration,

    /// Emit request traces (method, URL, headers, body, curl command)
    pub debug: bool,

    /// User agent string
    pub user_agent: String,

    /// Optional client-side throttling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            retry: true,
            max_attempts: 10,
            retry_delay: Duration::from_secs(30),
            debug: false,
            user_agent: format!("semanticscholar-rs/{}", env!("CARGO_PKG_VERSION")),
            rate_limit: None,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse a config from YAML (JSON documents are accepted as well)
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: ClientConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Overlay values from the process environment
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable lookup
    #[must_use]
    pub fn apply_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.is_empty()) {
            self.api_url = url;
        }
        self
    }

    /// Check the config for values the client cannot work with
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api_url)?;
        if self.max_attempts == 0 {
            return Err(Error::config("max_attempts must be at least 1"));
        }
        Ok(())
    }

    /// Root URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Authentication headers for every request
    pub fn auth_headers(&self) -> StringMap {
        let mut headers = StringMap::new();
        if let Some(key) = &self.api_key {
            headers.insert(API_KEY_HEADER.to_string(), key.clone());
        }
        headers
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API root
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Enable or disable retrying rate-limited requests
    pub fn retry(mut self, retry: bool) -> Self {
        self.config.retry = retry;
        self
    }

    /// Set the retry policy
    pub fn retry_policy(mut self, max_attempts: u32, delay: Duration) -> Self {
        self.config.max_attempts = max_attempts;
        self.config.retry_delay = delay;
        self
    }

    /// Enable request traces
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set client-side rate limiting
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Durations as (fractional) seconds
mod duration_secs {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
