//! Tracing Setup
//!
//! Structured logging through `tracing-subscriber`. Spans are also exported
//! over OTLP when enabled.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: log filter; falls back to `LOG_LEVEL` (default: info)
//! - `OTEL_ENABLED`: Set to "true" to export spans (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: http://localhost:4318)
//! - `OTEL_SERVICE_NAME`: Service name for traces (default: quote-snapshot-server)

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Service name for OpenTelemetry traces.
const DEFAULT_SERVICE_NAME: &str = "quote-snapshot-server";

/// Default OTLP endpoint.
const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4318";

/// Level used when `RUST_LOG` is unset.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Per-target levels applied on top of the base filter.
const TARGET_DIRECTIVES: &[&str] = &[
    "quote_snapshot_server=info",
    "tower_http=info",
    "hyper=warn",
    "reqwest=warn",
];

/// Keeps the span exporter alive; flushes it on drop.
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether spans are being exported.
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.tracer_provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("span exporter shutdown failed: {e}");
        }
    }
}

/// Logging and span export settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Base level when `RUST_LOG` is unset.
    pub log_level: String,
    /// Whether OTLP export is enabled.
    pub enabled: bool,
    /// OTLP exporter endpoint.
    pub otlp_endpoint: String,
    /// Service name for traces.
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            enabled: false,
            otlp_endpoint: DEFAULT_OTLP_ENDPOINT.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            log_level: value("LOG_LEVEL", DEFAULT_LOG_LEVEL),
            enabled: lookup("OTEL_ENABLED").is_some_and(|v| {
                matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes")
            }),
            otlp_endpoint: value("OTEL_EXPORTER_OTLP_ENDPOINT", DEFAULT_OTLP_ENDPOINT),
            service_name: value("OTEL_SERVICE_NAME", DEFAULT_SERVICE_NAME),
        }
    }
}

/// Telemetry setup error.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// A log filter directive did not parse.
    #[error("invalid log directive '{directive}': {reason}")]
    Directive {
        /// The offending directive.
        directive: String,
        /// Parser message.
        reason: String,
    },
    /// OTLP exporter could not be built.
    #[error("failed to create OTLP exporter: {0}")]
    Exporter(String),
    /// A global subscriber was already installed.
    #[error("failed to install subscriber: {0}")]
    Subscriber(String),
}

/// Initialize telemetry with configuration from the environment.
///
/// The returned guard must be kept alive for the duration of the program.
pub fn init() -> Result<TelemetryGuard, TelemetryError> {
    init_with_config(&TelemetryConfig::from_env())
}

/// Initialize telemetry with custom configuration.
pub fn init_with_config(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let filter = env_filter(&config.log_level)?;
    let tracer_provider = span_exporter(config)?;

    let otel_layer = tracer_provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(config.service_name.clone()))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(otel_layer)
        .try_init()
        .map_err(|e| TelemetryError::Subscriber(e.to_string()))?;

    Ok(TelemetryGuard { tracer_provider })
}

/// `RUST_LOG` (or `fallback_level`) plus [`TARGET_DIRECTIVES`].
fn env_filter(fallback_level: &str) -> Result<EnvFilter, TelemetryError> {
    let base = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_level))
        .map_err(|e| directive_error(fallback_level, &e))?;

    TARGET_DIRECTIVES.iter().try_fold(base, |filter, raw| {
        let directive: Directive = raw.parse().map_err(|e| directive_error(raw, &e))?;
        Ok(filter.add_directive(directive))
    })
}

fn directive_error(directive: &str, err: &ParseError) -> TelemetryError {
    TelemetryError::Directive {
        directive: directive.to_string(),
        reason: err.to_string(),
    }
}

/// Tracer provider batching spans to the OTLP endpoint, if export is enabled.
fn span_exporter(config: &TelemetryConfig) -> Result<Option<SdkTracerProvider>, TelemetryError> {
    if !config.enabled {
        return Ok(None);
    }

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.otlp_endpoint)
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .build();

    Ok(Some(
        SdkTracerProvider::builder()
            .with_resource(resource)
            .with_batch_exporter(exporter)
            .build(),
    ))
}

// =============================================================================
// Tests
// =============================================================================
