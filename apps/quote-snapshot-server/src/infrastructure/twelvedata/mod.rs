//! Twelve Data Provider Adapter
//!
//! Implementation of `QuoteProviderPort` over the Twelve Data
//! `time_series` REST endpoint:
//! - Single and multi-symbol response decoding
//! - API-level errors reported inside HTTP 200 bodies
//! - One request per fetch, no retries

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::TwelveDataAdapter;
pub use config::{DEFAULT_BASE_URL, TwelveDataConfig};
pub use error::TwelveDataError;
