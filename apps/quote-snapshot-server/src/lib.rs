#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::panic
    )
)]

//! Quote Snapshot Server - Cached Quote HTTP API
//!
//! Fetches a Twelve Data time-series snapshot once at startup and answers
//! point and range lookups against it from memory. The snapshot is never
//! refreshed.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Quote records, the snapshot and lookup rules
//!   - `quote`: `QuoteRecord` and the immutable `QuoteSnapshot`
//!   - `query`: constraints and the `MatchPolicy` used to apply them
//!
//! - **Application**: Ports and services
//!   - `ports`: `QuoteProviderPort` and the startup `FetchRequest`
//!   - `services`: `SnapshotLoader` and dashboard views
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `twelvedata`: REST client for the provider
//!   - `http`: axum router
//!   - `config`, `telemetry`, `metrics`: ambient setup
//!
//! # Data Flow
//!
//! ```text
//! Twelve Data ──(once)──► SnapshotLoader ──► Arc<QuoteSnapshot> ──► axum handlers ──► clients
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Quote records and lookup rules.
pub mod domain;

/// Application layer - Ports and services.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Startup errors.
pub mod error;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::query::{DatetimeRange, MatchPolicy, QuoteQuery};
pub use domain::quote::{QuoteRecord, QuoteSnapshot};

// Ports and services
pub use application::ports::{FetchRequest, ProviderError, QuoteProviderPort, SeriesOrder};
pub use application::services::SnapshotLoader;

// Infrastructure config
pub use infrastructure::config::{ConfigError, Credentials, ServerConfig};

// HTTP
pub use infrastructure::http::{AppState, MissStatus, NO_DATA_FOUND, cors_layer, create_router};

// Provider
pub use infrastructure::twelvedata::{TwelveDataAdapter, TwelveDataConfig, TwelveDataError};

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};

pub use error::StartupError;
