//! Twelve Data adapter implementing `QuoteProviderPort`.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::application::ports::{FetchRequest, ProviderError, QuoteProviderPort};
use crate::domain::quote::QuoteRecord;

use super::api_types::{SeriesEntry, TimeSeries, TimeSeriesResponse};
use super::config::TwelveDataConfig;
use super::error::TwelveDataError;
use super::http_client::TwelveDataHttpClient;

const TIME_SERIES_PATH: &str = "/time_series";

/// Twelve Data market data adapter.
#[derive(Debug, Clone)]
pub struct TwelveDataAdapter {
    client: TwelveDataHttpClient,
}

impl TwelveDataAdapter {
    /// Create a new adapter.
    ///
    /// Fails with [`TwelveDataError::AuthenticationFailed`] when the API key
    /// is empty.
    pub fn new(config: &TwelveDataConfig) -> Result<Self, TwelveDataError> {
        Ok(Self {
            client: TwelveDataHttpClient::new(config)?,
        })
    }

    /// Query parameters for `request`, without the API key.
    fn to_query(request: &FetchRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("symbol", request.symbol_param()),
            ("interval", request.interval.clone()),
            ("outputsize", request.outputsize.to_string()),
            ("timezone", request.timezone.clone()),
        ];
        if let Some(order) = request.order {
            query.push(("order", order.as_str().to_string()));
        }
        query
    }

    /// Issue the request and return the decoded records.
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<QuoteRecord>, TwelveDataError> {
        let response: TimeSeriesResponse = self
            .client
            .get(TIME_SERIES_PATH, &Self::to_query(request))
            .await?;
        flatten(response, request)
    }
}

#[async_trait]
impl QuoteProviderPort for TwelveDataAdapter {
    async fn fetch_snapshot(
        &self,
        request: &FetchRequest,
    ) -> Result<Vec<QuoteRecord>, ProviderError> {
        tracing::debug!(
            base_url = %self.client.base_url(),
            symbols = %request.symbol_param(),
            "Requesting time series"
        );

        let records = self.fetch(request).await.map_err(|e| {
            tracing::error!(error = %e, "Time series request failed");
            ProviderError::from(e)
        })?;

        tracing::info!(records = records.len(), "Time series received");
        Ok(records)
    }
}

// ============================================================================
// Response Flattening
// ============================================================================

/// Flatten a decoded response into records ordered by `request.symbols`,
/// then by provider order within each symbol.
fn flatten(
    response: TimeSeriesResponse,
    request: &FetchRequest,
) -> Result<Vec<QuoteRecord>, TwelveDataError> {
    match response {
        TimeSeriesResponse::Error(err) => Err(TwelveDataError::from_api(err.code, err.message)),
        TimeSeriesResponse::Single(series) => Ok(series_records(series, request.outputsize)),
        TimeSeriesResponse::Batch(entries) => flatten_batch(entries, request),
    }
}

fn flatten_batch(
    mut entries: HashMap<String, SeriesEntry>,
    request: &FetchRequest,
) -> Result<Vec<QuoteRecord>, TwelveDataError> {
    let mut records = Vec::new();
    let mut resolved = 0_usize;
    let mut first_error = None;

    for symbol in &request.symbols {
        let key = entries
            .keys()
            .find(|k| k.eq_ignore_ascii_case(symbol))
            .cloned();
        let Some(entry) = key.and_then(|k| entries.remove(&k)) else {
            tracing::warn!(symbol = %symbol, "Symbol missing from provider response");
            continue;
        };

        match entry {
            SeriesEntry::Series(series) => {
                resolved += 1;
                records.extend(series_records(series, request.outputsize));
            }
            SeriesEntry::Error(err) => {
                tracing::warn!(
                    symbol = %symbol,
                    code = err.code,
                    message = %err.message,
                    "Provider returned an error for symbol, skipping"
                );
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    if resolved == 0 {
        return Err(match first_error {
            Some(err) => TwelveDataError::from_api(err.code, err.message),
            None => TwelveDataError::NoData {
                symbols: request.symbol_param(),
            },
        });
    }

    Ok(records)
}

fn series_records(series: TimeSeries, outputsize: u32) -> Vec<QuoteRecord> {
    let meta = series.meta;
    series
        .values
        .into_iter()
        .map(|value| {
            let mut record = QuoteRecord::new(
                meta.symbol.clone(),
                meta.interval.clone(),
                value.datetime,
                outputsize,
            )
            .with_prices(value.open, value.high, value.low, value.close);
            record.volume = value.volume;
            record.exchange.clone_from(&meta.exchange);
            record.currency.clone_from(&meta.currency);
            record.exchange_timezone.clone_from(&meta.exchange_timezone);
            record.instrument_type.clone_from(&meta.instrument_type);
            record
        })
        .collect()
}
