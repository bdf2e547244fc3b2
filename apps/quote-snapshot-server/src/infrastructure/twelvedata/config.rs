//! Twelve Data adapter configuration.

use std::time::Duration;

/// Default REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com";

/// Configuration for the Twelve Data adapter.
#[derive(Clone)]
pub struct TwelveDataConfig {
    /// API key, sent as the `apikey` query parameter.
    pub api_key: String,
    /// REST base URL without a trailing slash.
    pub base_url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl TwelveDataConfig {
    /// Create a configuration against the public API.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Point the adapter at another base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for TwelveDataConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwelveDataConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
