//! Quote Records and Snapshot
//!
//! A [`QuoteRecord`] is one timestamped OHLCV observation for a single
//! symbol/interval. A [`QuoteSnapshot`] is the ordered list of records fetched
//! once at startup; it is never mutated after construction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::query::{MatchPolicy, QuoteQuery};

// =============================================================================
// Quote Record
// =============================================================================

/// A single market-data observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Ticker symbol as reported by the provider.
    pub symbol: String,
    /// Bar interval, e.g. `1min`.
    pub interval: String,
    /// Bar timestamp in the provider's `YYYY-MM-DD HH:MM:SS` form.
    pub datetime: String,
    /// Output size the snapshot was requested with.
    pub outputsize: u32,
    /// Open price.
    pub open: Decimal,
    /// High price.
    pub high: Decimal,
    /// Low price.
    pub low: Decimal,
    /// Close price.
    pub close: Decimal,
    /// Traded volume (not reported for every instrument type).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
    /// Listing exchange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    /// Quote currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Exchange timezone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_timezone: Option<String>,
    /// Instrument type, e.g. `Common Stock`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub instrument_type: Option<String>,
}

impl QuoteRecord {
    /// Create a record with zeroed prices and no metadata.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        interval: impl Into<String>,
        datetime: impl Into<String>,
        outputsize: u32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            datetime: datetime.into(),
            outputsize,
            open: Decimal::ZERO,
            high: Decimal::ZERO,
            low: Decimal::ZERO,
            close: Decimal::ZERO,
            volume: None,
            exchange: None,
            currency: None,
            exchange_timezone: None,
            instrument_type: None,
        }
    }

    /// Set open/high/low/close.
    #[must_use]
    pub const fn with_prices(
        mut self,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> Self {
        self.open = open;
        self.high = high;
        self.low = low;
        self.close = close;
        self
    }

    /// Set the traded volume.
    #[must_use]
    pub const fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = Some(volume);
        self
    }
}

// =============================================================================
// Quote Snapshot
// =============================================================================

/// Immutable, ordered list of quote records held for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteSnapshot {
    records: Vec<QuoteRecord>,
    fetched_at: DateTime<Utc>,
}

impl QuoteSnapshot {
    /// Create a snapshot stamped with the current time.
    #[must_use]
    pub fn new(records: Vec<QuoteRecord>) -> Self {
        Self::with_fetched_at(records, Utc::now())
    }

    /// Create a snapshot with an explicit fetch time.
    #[must_use]
    pub const fn with_fetched_at(records: Vec<QuoteRecord>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            records,
            fetched_at,
        }
    }

    /// All records, in snapshot order.
    #[must_use]
    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the provider returned nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When the snapshot was fetched.
    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Distinct symbols in first-seen order.
    #[must_use]
    pub fn symbols(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.symbol.as_str()) {
                seen.push(&record.symbol);
            }
        }
        seen
    }

    /// Find the first record satisfying `query` under `policy`.
    #[must_use]
    pub fn find(&self, query: &QuoteQuery, policy: MatchPolicy) -> Option<&QuoteRecord> {
        policy.find_first(&self.records, query)
    }

    /// Records for one symbol/interval pair, in snapshot order.
    pub fn series<'a>(
        &'a self,
        symbol: &'a str,
        interval: &'a str,
    ) -> impl Iterator<Item = &'a QuoteRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.symbol == symbol && r.interval == interval)
    }
}
