//! Server Configuration Settings
//!
//! Configuration types for the quote server, loaded from environment
//! variables. Lookups go through a closure so tests can supply a map
//! instead of touching the process environment.

use std::time::Duration;

use crate::application::ports::{
    DEFAULT_INTERVAL, DEFAULT_OUTPUTSIZE, DEFAULT_SYMBOLS, DEFAULT_TIMEZONE, FetchRequest,
    SeriesOrder,
};
use crate::domain::query::MatchPolicy;
use crate::infrastructure::http::{MissStatus, ParseMissStatusError};
use crate::infrastructure::twelvedata::DEFAULT_BASE_URL;

/// Largest output size the provider accepts.
const MAX_OUTPUTSIZE: u32 = 5000;

/// Provider API credentials.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(api_key: String) -> Self {
        Self { api_key }
    }

    /// Get the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Market data provider connection settings.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// REST base URL.
    pub base_url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// HTTP server port.
    pub http_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { http_port: 8080 }
    }
}

/// Cross-origin settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsSettings {
    /// Allowed origins. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsSettings {
    /// Whether every origin is allowed.
    #[must_use]
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.is_empty()
    }

    fn parse(value: &str) -> Self {
        let origins: Vec<String> = split_list(value);
        if origins.iter().any(|o| o == "*") {
            Self::default()
        } else {
            Self {
                allowed_origins: origins,
            }
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Provider API credentials.
    pub credentials: Credentials,
    /// Provider connection settings.
    pub provider: ProviderSettings,
    /// The startup fetch.
    pub fetch: FetchRequest,
    /// Lookup policy for the `/data/...` routes.
    pub match_policy: MatchPolicy,
    /// Status sent with a `/data/...` miss.
    pub miss_status: MissStatus,
    /// HTTP listener settings.
    pub server: ServerSettings,
    /// Cross-origin settings.
    pub cors: CorsSettings,
}

impl ServerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `API_KEY` is missing or empty, or a value fails
    /// validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key =
            lookup("API_KEY").ok_or_else(|| ConfigError::MissingEnvVar("API_KEY".into()))?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::EmptyValue("API_KEY".into()));
        }

        let symbols = lookup("QUOTE_SYMBOLS").map_or_else(
            || DEFAULT_SYMBOLS.iter().map(ToString::to_string).collect(),
            |v| split_list(&v),
        );
        if symbols.is_empty() {
            return Err(ConfigError::EmptyValue("QUOTE_SYMBOLS".into()));
        }

        let outputsize = match lookup("QUOTE_OUTPUTSIZE") {
            None => DEFAULT_OUTPUTSIZE,
            Some(raw) => parse_outputsize(&raw)?,
        };

        let order = match lookup("QUOTE_ORDER") {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(SeriesOrder::from_str_case_insensitive(&raw).ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: "QUOTE_ORDER".into(),
                    reason: format!("'{raw}' is not 'asc' or 'desc'"),
                }
            })?),
        };

        let fetch = FetchRequest {
            symbols,
            interval: non_empty(lookup("QUOTE_INTERVAL"))
                .unwrap_or_else(|| DEFAULT_INTERVAL.to_string()),
            outputsize,
            timezone: non_empty(lookup("QUOTE_TIMEZONE"))
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            order,
        };

        let match_policy = match lookup("QUOTE_MATCH_POLICY") {
            None => MatchPolicy::default(),
            Some(raw) => raw.parse().map_err(|e: crate::domain::query::ParseMatchPolicyError| {
                ConfigError::InvalidValue {
                    key: "QUOTE_MATCH_POLICY".into(),
                    reason: e.to_string(),
                }
            })?,
        };

        let miss_status = match lookup("QUOTE_MISS_STATUS") {
            None => MissStatus::default(),
            Some(raw) => raw.parse().map_err(|e: ParseMissStatusError| {
                ConfigError::InvalidValue {
                    key: "QUOTE_MISS_STATUS".into(),
                    reason: e.to_string(),
                }
            })?,
        };

        let provider = ProviderSettings {
            base_url: non_empty(lookup("TWELVEDATA_BASE_URL"))
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| ProviderSettings::default().base_url),
            timeout: lookup("TWELVEDATA_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map_or(ProviderSettings::default().timeout, Duration::from_secs),
        };

        let server = ServerSettings {
            http_port: lookup("HTTP_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(ServerSettings::default().http_port),
        };

        let cors = lookup("CORS_ORIGINS")
            .map_or_else(CorsSettings::default, |v| CorsSettings::parse(&v));

        Ok(Self {
            credentials: Credentials::new(api_key.trim().to_string()),
            provider,
            fetch,
            match_policy,
            miss_status,
            server,
            cors,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Environment variable failed validation.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Why it was rejected.
        reason: String,
    },
}

fn parse_outputsize(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key: "QUOTE_OUTPUTSIZE".into(),
        reason,
    };
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(format!("'{raw}' is not a number")))?;
    if value == 0 || value > MAX_OUTPUTSIZE {
        return Err(invalid(format!("must be between 1 and {MAX_OUTPUTSIZE}")));
    }
    Ok(value)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use test_case::test_case;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_with_only_api_key() {
        let config = ServerConfig::from_lookup(lookup(&[("API_KEY", "key123")])).unwrap();

        assert_eq!(config.credentials.api_key(), "key123");
        assert_eq!(config.fetch, FetchRequest::default());
        assert_eq!(config.match_policy, MatchPolicy::FirstRecord);
        assert_eq!(config.miss_status, MissStatus::Ok);
        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.provider.base_url, "https://api.twelvedata.com");
        assert_eq!(config.provider.timeout, Duration::from_secs(30));
        assert!(config.cors.allows_any());
    }

    #[test]
    fn missing_api_key() {
        let err = ServerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "API_KEY"));
    }

    #[test]
    fn empty_api_key() {
        let err = ServerConfig::from_lookup(lookup(&[("API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(_)));
    }

    #[test]
    fn symbol_list_is_trimmed() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("API_KEY", "k"),
            ("QUOTE_SYMBOLS", "AAPL,MSFT,GOOGL,AMZN, NVDA,"),
        ]))
        .unwrap();

        assert_eq!(
            config.fetch.symbols,
            vec!["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA"]
        );
    }

    #[test]
    fn blank_symbol_list_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("API_KEY", "k"), ("QUOTE_SYMBOLS", " , ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(_)));
    }

    #[test_case("0" ; "zero")]
    #[test_case("5001" ; "above provider limit")]
    #[test_case("ten" ; "not a number")]
    fn invalid_outputsize(raw: &str) {
        let err = ServerConfig::from_lookup(lookup(&[("API_KEY", "k"), ("QUOTE_OUTPUTSIZE", raw)]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "QUOTE_OUTPUTSIZE"
        ));
    }

    #[test]
    fn overrides_are_applied() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("API_KEY", "k"),
            ("QUOTE_INTERVAL", "5min"),
            ("QUOTE_OUTPUTSIZE", "50"),
            ("QUOTE_TIMEZONE", "UTC"),
            ("QUOTE_ORDER", "ASC"),
            ("QUOTE_MATCH_POLICY", "full-scan"),
            ("QUOTE_MISS_STATUS", "not-found"),
            ("TWELVEDATA_BASE_URL", "http://localhost:9999/"),
            ("TWELVEDATA_TIMEOUT_SECS", "5"),
            ("HTTP_PORT", "9000"),
        ]))
        .unwrap();

        assert_eq!(config.fetch.interval, "5min");
        assert_eq!(config.fetch.outputsize, 50);
        assert_eq!(config.fetch.timezone, "UTC");
        assert_eq!(config.fetch.order, Some(SeriesOrder::Asc));
        assert_eq!(config.match_policy, MatchPolicy::FullScan);
        assert_eq!(config.miss_status, MissStatus::NotFound);
        assert_eq!(config.provider.base_url, "http://localhost:9999");
        assert_eq!(config.provider.timeout, Duration::from_secs(5));
        assert_eq!(config.server.http_port, 9000);
    }

    #[test]
    fn unknown_match_policy_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("API_KEY", "k"),
            ("QUOTE_MATCH_POLICY", "fuzzy"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("QUOTE_MATCH_POLICY"));
    }

    #[test]
    fn unknown_miss_status_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("API_KEY", "k"),
            ("QUOTE_MISS_STATUS", "teapot"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("QUOTE_MISS_STATUS"));
    }

    #[test]
    fn unparsable_port_falls_back_to_default() {
        let config =
            ServerConfig::from_lookup(lookup(&[("API_KEY", "k"), ("HTTP_PORT", "http")])).unwrap();
        assert_eq!(config.server.http_port, 8080);
    }

    #[test_case("*", &[] ; "wildcard")]
    #[test_case("http://localhost:8080, http://127.0.0.1:8080", &["http://localhost:8080", "http://127.0.0.1:8080"] ; "explicit list")]
    #[test_case("*, http://localhost:8080", &[] ; "wildcard wins")]
    fn cors_origins(raw: &str, expected: &[&str]) {
        let config =
            ServerConfig::from_lookup(lookup(&[("API_KEY", "k"), ("CORS_ORIGINS", raw)])).unwrap();
        assert_eq!(config.cors.allowed_origins, expected);
    }

    #[test]
    fn credentials_redacted_debug() {
        let creds = Credentials::new("key123".to_string());
        let debug = format!("{creds:?}");
        assert!(!debug.contains("key123"));
        assert!(debug.contains("[REDACTED]"));
    }
}
