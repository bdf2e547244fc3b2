//! HTTP request DTOs.
//!
//! Path parameters of the `/data/...` routes, each convertible to a
//! [`QuoteQuery`], plus query strings of the dashboard endpoints.

use serde::Deserialize;

use crate::domain::query::{DatetimeRange, QuoteQuery};

/// `/data/{symbol}`
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolPath {
    /// Ticker symbol.
    pub symbol: String,
}

impl SymbolPath {
    /// Constraints for this route.
    #[must_use]
    pub fn into_query(self) -> QuoteQuery {
        QuoteQuery::for_symbol(self.symbol)
    }
}

/// `/data/{symbol}/{interval}`
#[derive(Debug, Clone, Deserialize)]
pub struct IntervalPath {
    /// Ticker symbol.
    pub symbol: String,
    /// Bar interval.
    pub interval: String,
}

impl IntervalPath {
    /// Constraints for this route.
    #[must_use]
    pub fn into_query(self) -> QuoteQuery {
        QuoteQuery::for_symbol(self.symbol).with_interval(self.interval)
    }
}

/// `/data/{symbol}/{interval}/{start_date}/{end_date}`
#[derive(Debug, Clone, Deserialize)]
pub struct RangePath {
    /// Ticker symbol.
    pub symbol: String,
    /// Bar interval.
    pub interval: String,
    /// Inclusive lower datetime bound.
    pub start_date: String,
    /// Inclusive upper datetime bound.
    pub end_date: String,
}

impl RangePath {
    /// Constraints for this route.
    #[must_use]
    pub fn into_query(self) -> QuoteQuery {
        QuoteQuery::for_symbol(self.symbol)
            .with_interval(self.interval)
            .with_range(DatetimeRange::new(self.start_date, self.end_date))
    }
}

/// `/data/{symbol}/{interval}/{start_date}/{end_date}/{outputsize}`
#[derive(Debug, Clone, Deserialize)]
pub struct OutputsizePath {
    /// Ticker symbol.
    pub symbol: String,
    /// Bar interval.
    pub interval: String,
    /// Inclusive lower datetime bound.
    pub start_date: String,
    /// Inclusive upper datetime bound.
    pub end_date: String,
    /// Output size, compared as text.
    pub outputsize: String,
}

impl OutputsizePath {
    /// Constraints for this route.
    #[must_use]
    pub fn into_query(self) -> QuoteQuery {
        QuoteQuery::for_symbol(self.symbol)
            .with_interval(self.interval)
            .with_range(DatetimeRange::new(self.start_date, self.end_date))
            .with_outputsize(self.outputsize)
    }
}

/// `/api/stocks?symbols=A,B`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StocksParams {
    /// Comma-separated symbols.
    #[serde(default)]
    pub symbols: Option<String>,
}

/// `/api/series?symbol=AAPL&interval=1min&outputsize=50`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriesParams {
    /// Ticker symbol.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Bar interval.
    #[serde(default)]
    pub interval: Option<String>,
    /// Keep only the newest this many points.
    #[serde(default)]
    pub outputsize: Option<usize>,
}
