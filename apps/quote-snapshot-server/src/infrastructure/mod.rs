//! Infrastructure Layer
//!
//! Adapters around the application core:
//! - `config`: environment configuration
//! - `http`: axum router serving the snapshot
//! - `metrics`: Prometheus recorder
//! - `telemetry`: tracing subscriber and OTLP export
//! - `twelvedata`: market data provider client

pub mod config;
pub mod http;
pub mod metrics;
pub mod telemetry;
pub mod twelvedata;
