//! Roster API client configuration.

use std::time::Duration;

use rosterview_core::FilterConfig;
use url::Url;

/// Path prefix of every API endpoint.
pub const API_PATH: &str = "/api/v1";

/// Configuration for the roster API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the roster site (scheme and host).
    pub base_url: Url,

    /// Request timeout.
    pub timeout: Duration,

    /// Pause between consecutive week requests.
    pub request_delay: Duration,

    /// Which staff assignments the aggregates count.
    pub filter: FilterConfig,
}

impl ApiConfig {
    /// Default roster site.
    pub const DEFAULT_BASE_URL: &str = "https://rch.weroster.com.au";

    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default pause between week requests, in milliseconds.
    pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;

    /// Creates a new configuration for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(base_url.as_ref())?;
        Ok(Self {
            base_url: parsed,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            request_delay: Duration::from_millis(Self::DEFAULT_REQUEST_DELAY_MS),
            filter: FilterConfig::default(),
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the pause between week requests.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Sets the aggregation filter.
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// The site origin without a trailing slash, e.g. `https://host`.
    pub fn origin(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }

    /// The API root, e.g. `https://host/api/v1`.
    pub fn api_root(&self) -> String {
        format!("{}{}", self.origin(), API_PATH)
    }

    /// Full URL of an API endpoint such as `/login`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_root(), path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(Self::DEFAULT_BASE_URL).expect("default base url is valid"),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            request_delay: Duration::from_millis(Self::DEFAULT_REQUEST_DELAY_MS),
            filter: FilterConfig::default(),
        }
    }
}
