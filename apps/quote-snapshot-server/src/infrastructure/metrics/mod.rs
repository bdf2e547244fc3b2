//! Prometheus Metrics Module
//!
//! # Metrics
//!
//! - `quote_api_requests_total{route,outcome}`: lookups served, by route and
//!   whether a record was found
//! - `quote_api_snapshot_records`: size of the startup snapshot
//! - `quote_api_provider_fetch_seconds`: duration of the startup fetch
//!
//! Metrics are exposed at `GET /metrics`.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<Result<PrometheusHandle, String>> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// Idempotent: later calls return the handle installed by the first one.
///
/// # Errors
///
/// Returns an error if another global recorder was already installed.
pub fn init_metrics() -> Result<PrometheusHandle, MetricsError> {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| e.to_string())?;
            register_metrics();
            Ok(handle)
        })
        .clone()
        .map_err(MetricsError::Install)
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE
        .get()
        .and_then(|result| result.as_ref().ok())
        .cloned()
}

/// Metrics setup error.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Recorder could not be installed.
    #[error("failed to install Prometheus recorder: {0}")]
    Install(String),
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        "quote_api_requests_total",
        "Total quote lookups served by route and outcome"
    );
    describe_gauge!(
        "quote_api_snapshot_records",
        "Number of records in the startup snapshot"
    );
    describe_histogram!(
        "quote_api_provider_fetch_seconds",
        "Duration of the startup provider fetch"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Metric labels for lookup routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/data`
    All,
    /// `/data/{symbol}`
    Symbol,
    /// `/data/{symbol}/{interval}`
    Interval,
    /// `/data/{symbol}/{interval}/{start}/{end}`
    Range,
    /// `/data/{symbol}/{interval}/{start}/{end}/{outputsize}`
    Outputsize,
    /// `/api/stocks`
    Stocks,
    /// `/api/series`
    Series,
}

impl Route {
    /// Label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Symbol => "symbol",
            Self::Interval => "interval",
            Self::Range => "range",
            Self::Outputsize => "outputsize",
            Self::Stocks => "stocks",
            Self::Series => "series",
        }
    }
}

/// Metric labels for lookup outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A record was found.
    Hit,
    /// No record matched.
    Miss,
    /// Unfiltered listing.
    All,
}

impl Outcome {
    /// Label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::All => "all",
        }
    }
}

/// Record a served lookup.
pub fn record_request(route: Route, outcome: Outcome) {
    counter!(
        "quote_api_requests_total",
        "route" => route.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record the snapshot size.
#[allow(clippy::cast_precision_loss)]
pub fn set_snapshot_records(count: usize) {
    gauge!("quote_api_snapshot_records").set(count as f64);
}

/// Record the startup fetch duration.
pub fn record_provider_fetch(duration: Duration) {
    histogram!("quote_api_provider_fetch_seconds").record(duration.as_secs_f64());
}

// =============================================================================
// Tests
// =============================================================================
