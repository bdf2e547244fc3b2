//! Twelve Data `time_series` response types.
//!
//! These types map directly to the REST payloads. Prices arrive as decimal
//! strings.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

// ============================================================================
// Series Types
// ============================================================================

/// Series metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesMeta {
    /// Symbol as reported by the provider.
    pub symbol: String,
    /// Bar interval.
    pub interval: String,
    /// Quote currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Exchange timezone.
    #[serde(default)]
    pub exchange_timezone: Option<String>,
    /// Listing exchange.
    #[serde(default)]
    pub exchange: Option<String>,
    /// Instrument type.
    #[serde(default, rename = "type")]
    pub instrument_type: Option<String>,
}

/// One OHLCV bar.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesValue {
    /// Bar timestamp.
    pub datetime: String,
    /// Open price.
    pub open: Decimal,
    /// High price.
    pub high: Decimal,
    /// Low price.
    pub low: Decimal,
    /// Close price.
    pub close: Decimal,
    /// Volume; not reported for forex and some indices.
    #[serde(default)]
    pub volume: Option<Decimal>,
}

/// A successful series for one symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeries {
    /// Series metadata.
    pub meta: TimeSeriesMeta,
    /// Bars in provider order.
    #[serde(default)]
    pub values: Vec<TimeSeriesValue>,
}

// ============================================================================
// Error Types
// ============================================================================

/// Error body, at the top level or per symbol in a batch.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Numeric error code, usually mirroring an HTTP status.
    pub code: i64,
    /// Error message.
    pub message: String,
}

// ============================================================================
// Envelopes
// ============================================================================

/// Entry of a multi-symbol response.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeriesEntry {
    /// Symbol resolved.
    Series(TimeSeries),
    /// Symbol failed.
    Error(ApiErrorBody),
}

/// Any `time_series` response body.
///
/// A single-symbol request returns the series directly; a comma-separated
/// request returns an object keyed by requested symbol.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimeSeriesResponse {
    /// Whole request failed.
    Error(ApiErrorBody),
    /// One symbol.
    Single(TimeSeries),
    /// Several symbols keyed by the requested symbol.
    Batch(HashMap<String, SeriesEntry>),
}
