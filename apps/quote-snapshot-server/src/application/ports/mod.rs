//! Port Interfaces
//!
//! ## Driven Ports (Outbound)
//!
//! - `QuoteProviderPort`: one-shot time-series fetch from a market data
//!   provider, returning flattened quote records.

use async_trait::async_trait;

use crate::domain::quote::QuoteRecord;

/// Default symbols requested at startup.
pub const DEFAULT_SYMBOLS: [&str; 5] = ["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA"];

/// Default bar interval.
pub const DEFAULT_INTERVAL: &str = "1min";

/// Default number of bars per symbol.
pub const DEFAULT_OUTPUTSIZE: u32 = 10;

/// Default timezone for returned timestamps.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

// =============================================================================
// Fetch Request
// =============================================================================

/// Sort order of returned bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesOrder {
    /// Oldest first.
    Asc,
    /// Newest first (provider default).
    Desc,
}

impl SeriesOrder {
    /// Parse from string, case-insensitively.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    /// Wire name of the order.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Parameters of the single startup fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Symbols to request, in snapshot order.
    pub symbols: Vec<String>,
    /// Bar interval.
    pub interval: String,
    /// Bars per symbol.
    pub outputsize: u32,
    /// Timezone for returned timestamps.
    pub timezone: String,
    /// Optional sort order; the provider default applies when unset.
    pub order: Option<SeriesOrder>,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(ToString::to_string).collect(),
            interval: DEFAULT_INTERVAL.to_string(),
            outputsize: DEFAULT_OUTPUTSIZE,
            timezone: DEFAULT_TIMEZONE.to_string(),
            order: None,
        }
    }
}

impl FetchRequest {
    /// Comma-joined symbol list as sent upstream.
    #[must_use]
    pub fn symbol_param(&self) -> String {
        self.symbols.join(",")
    }
}

// =============================================================================
// Provider Port
// =============================================================================

/// Market data provider error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Transport failure or timeout.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error details.
        message: String,
    },

    /// Credentials missing or rejected.
    #[error("provider rejected credentials")]
    Authentication,

    /// Request quota exhausted.
    #[error("provider rate limit reached")]
    RateLimited,

    /// Provider reported an error.
    #[error("provider error {code}: {message}")]
    Upstream {
        /// Provider error code.
        code: String,
        /// Provider error message.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("provider response could not be decoded: {message}")]
    Decode {
        /// Error details.
        message: String,
    },

    /// No requested symbol produced data.
    #[error("provider returned no data for {symbols}")]
    NoData {
        /// Symbols that were requested.
        symbols: String,
    },
}

/// Port for fetching the quote snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteProviderPort: Send + Sync {
    /// Fetch all bars for `request`, flattened into records ordered by
    /// `request.symbols` and then by provider order.
    async fn fetch_snapshot(&self, request: &FetchRequest)
    -> Result<Vec<QuoteRecord>, ProviderError>;
}
