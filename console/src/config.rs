//! Transport configuration: base endpoint, default headers, timeout.

use std::time::Duration;

use thiserror::Error;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Environment variable naming the API base endpoint.
pub const BASE_URL_ENV: &str = "CONSOLE_API_BASE_URL";

/// Fatal configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No usable base URL was provided.
    #[error("api base URL is required; set CONSOLE_API_BASE_URL or pass one explicitly")]
    MissingBaseUrl,
}

/// Configuration consumed by the API client.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use console::config::ClientConfig;
///
/// let config = ClientConfig::new("https://api.example.test/api/v1")
///     .with_default_header("X-Requested-With", "XMLHttpRequest")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "https://api.example.test/api/v1");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    default_headers: Vec<(String, String)>,
    timeout: Duration,
}

impl ClientConfig {
    /// Configuration for the given base endpoint with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read the base endpoint from [`BASE_URL_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBaseUrl`] when the variable is unset or
    /// blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(Self::new)
            .ok_or(ConfigError::MissingBaseUrl)
    }

    /// Add a header sent on every request.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Override the default per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configured base endpoint.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Client-wide headers in insertion order.
    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
