//! Startup error type for the server binary.

use thiserror::Error;

use crate::application::ports::ProviderError;
use crate::infrastructure::config::ConfigError;
use crate::infrastructure::metrics::MetricsError;
use crate::infrastructure::telemetry::TelemetryError;
use crate::infrastructure::twelvedata::TwelveDataError;

/// Anything that stops the server before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Environment configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// Metrics recorder could not be installed.
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// Provider client could not be built.
    #[error("provider client setup failed: {0}")]
    Client(#[from] TwelveDataError),

    /// The startup fetch failed.
    #[error("initial quote fetch failed: {0}")]
    Provider(#[from] ProviderError),

    /// The listener could not bind.
    #[error("failed to bind to port {port}: {source}")]
    Bind {
        /// Requested port.
        port: u16,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The server stopped with an error.
    #[error("server error: {0}")]
    Serve(std::io::Error),
}
