//! Twelve Data error types.

use thiserror::Error;

use crate::application::ports::ProviderError;

/// Errors from the Twelve Data adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TwelveDataError {
    /// Transport failure or timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status without a more specific meaning.
    #[error("HTTP error {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// API returned `status: "error"`.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code from the API.
        code: i64,
        /// Error message from the API.
        message: String,
    },

    /// Missing or rejected API key.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// API credits exhausted.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Every requested symbol failed or the response was empty.
    #[error("No data returned for {symbols}")]
    NoData {
        /// Requested symbols.
        symbols: String,
    },
}

impl TwelveDataError {
    /// Map an API error code to the most specific variant.
    ///
    /// Twelve Data reports authentication and quota failures both as HTTP
    /// statuses and as `code` fields inside HTTP 200 bodies.
    #[must_use]
    pub fn from_api(code: i64, message: String) -> Self {
        match code {
            401 | 403 => Self::AuthenticationFailed,
            429 => Self::RateLimited(message),
            _ => Self::Api { code, message },
        }
    }
}

impl From<TwelveDataError> for ProviderError {
    fn from(err: TwelveDataError) -> Self {
        match err {
            TwelveDataError::Network(message) => Self::Connection { message },
            TwelveDataError::Status { status, body } => Self::Upstream {
                code: status.to_string(),
                message: body,
            },
            TwelveDataError::Api { code, message } => Self::Upstream {
                code: code.to_string(),
                message,
            },
            TwelveDataError::AuthenticationFailed => Self::Authentication,
            TwelveDataError::RateLimited(_) => Self::RateLimited,
            TwelveDataError::JsonParse(message) => Self::Decode { message },
            TwelveDataError::NoData { symbols } => Self::NoData { symbols },
        }
    }
}
