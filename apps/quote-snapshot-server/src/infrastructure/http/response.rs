//! HTTP response DTOs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::{SeriesPoint, StockSummary};
use crate::domain::quote::QuoteRecord;

/// Body returned when no record matches a lookup.
pub const NO_DATA_FOUND: &str = "No data found";

/// Status code sent with the [`NO_DATA_FOUND`] body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissStatus {
    /// `200 OK`, the body alone signals the miss.
    #[default]
    Ok,
    /// `404 Not Found`.
    NotFound,
}

impl MissStatus {
    /// Configuration name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotFound => "not-found",
        }
    }

    /// HTTP status code to send.
    #[must_use]
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::Ok => StatusCode::OK,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl fmt::Display for MissStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown miss status name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown miss status '{0}' (expected 'ok' or 'not-found')")]
pub struct ParseMissStatusError(String);

impl FromStr for MissStatus {
    type Err = ParseMissStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "ok" | "200" => Ok(Self::Ok),
            "not-found" | "404" => Ok(Self::NotFound),
            _ => Err(ParseMissStatusError(s.to_string())),
        }
    }
}

/// Result of a `/data/...` lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResponse<'a> {
    /// The matching record, as JSON.
    Found(&'a QuoteRecord),
    /// Plain-text [`NO_DATA_FOUND`] with the configured status.
    Miss(MissStatus),
}

impl IntoResponse for LookupResponse<'_> {
    fn into_response(self) -> Response {
        match self {
            Self::Found(record) => Json(record).into_response(),
            Self::Miss(status) => (status.status_code(), NO_DATA_FOUND).into_response(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" once serving.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Current time.
    pub current_time: DateTime<Utc>,
    /// Snapshot statistics.
    pub snapshot: SnapshotStatus,
}

/// Snapshot statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotStatus {
    /// Record count.
    pub records: usize,
    /// Distinct symbols, first-seen order.
    pub symbols: Vec<String>,
    /// When the snapshot was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// `/api/stocks` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StocksResponse {
    /// Symbols that were requested after normalization.
    pub symbols: Vec<String>,
    /// Summaries for requested symbols present in the snapshot.
    pub data: Vec<StockSummary>,
}

/// `/api/series` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesResponse {
    /// Ticker symbol.
    pub symbol: String,
    /// Bar interval.
    pub interval: String,
    /// Close prices, oldest first.
    pub series: Vec<SeriesPoint>,
}
