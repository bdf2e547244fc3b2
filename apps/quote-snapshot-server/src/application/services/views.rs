//! Read-only views derived from the snapshot for the dashboard endpoints.
//!
//! These never reach the provider; everything is computed from the frozen
//! startup snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::quote::{QuoteRecord, QuoteSnapshot};

/// Upper bound on symbols accepted by a summary request.
pub const MAX_SUMMARY_SYMBOLS: usize = 20;

/// Decimal places kept on a percentage change.
const CHANGE_PERCENT_DP: u32 = 4;

/// Latest known price for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    /// Ticker symbol.
    pub symbol: String,
    /// Close of the symbol's latest bar.
    pub price: Decimal,
    /// Change from the previous bar's close, in percent. Zero with a single bar.
    pub change_percent: Decimal,
    /// Timestamp of the latest bar.
    pub updated: String,
}

/// One point of a close-price series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Bar timestamp.
    pub t: String,
    /// Close price.
    pub c: Decimal,
}

/// Parse a comma-separated symbol list: trimmed, upper-cased, empties
/// dropped, capped at [`MAX_SUMMARY_SYMBOLS`]. Falls back to `defaults` when
/// the parameter is absent or yields nothing.
#[must_use]
pub fn normalize_symbols(param: Option<&str>, defaults: &[String]) -> Vec<String> {
    let parsed: Vec<String> = param
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .take(MAX_SUMMARY_SYMBOLS)
        .collect();

    if parsed.is_empty() {
        defaults.iter().take(MAX_SUMMARY_SYMBOLS).cloned().collect()
    } else {
        parsed
    }
}

/// Percentage move from `previous` to `latest`, zero when `previous` is zero.
fn percent_change(previous: Decimal, latest: Decimal) -> Decimal {
    (latest - previous)
        .checked_div(previous)
        .map_or(Decimal::ZERO, |ratio| {
            (ratio * Decimal::ONE_HUNDRED).round_dp(CHANGE_PERCENT_DP)
        })
}

impl QuoteSnapshot {
    /// One summary per requested symbol that has at least one record.
    ///
    /// Bars are taken from the interval of the symbol's first record, so a
    /// snapshot mixing intervals never compares across them.
    #[must_use]
    pub fn summaries(&self, symbols: &[String]) -> Vec<StockSummary> {
        symbols
            .iter()
            .filter_map(|symbol| self.summary(symbol))
            .collect()
    }

    fn summary(&self, symbol: &str) -> Option<StockSummary> {
        let interval = &self.records().iter().find(|r| r.symbol == symbol)?.interval;

        let mut bars: Vec<&QuoteRecord> = self.series(symbol, interval).collect();
        bars.sort_by(|a, b| b.datetime.cmp(&a.datetime));

        let latest = bars.first()?;
        let change_percent = bars
            .get(1)
            .map_or(Decimal::ZERO, |previous| percent_change(previous.close, latest.close));

        Some(StockSummary {
            symbol: latest.symbol.clone(),
            price: latest.close,
            change_percent,
            updated: latest.datetime.clone(),
        })
    }

    /// Close prices for one symbol/interval, oldest first. With `limit`, only
    /// the newest `limit` points are kept.
    #[must_use]
    pub fn close_series(
        &self,
        symbol: &str,
        interval: &str,
        limit: Option<usize>,
    ) -> Vec<SeriesPoint> {
        let mut points: Vec<SeriesPoint> = self
            .series(symbol, interval)
            .map(|r| SeriesPoint {
                t: r.datetime.clone(),
                c: r.close,
            })
            .collect();
        points.sort_by(|a, b| a.t.cmp(&b.t));

        if let Some(limit) = limit {
            let excess = points.len().saturating_sub(limit);
            points.drain(..excess);
        }
        points
    }
}
