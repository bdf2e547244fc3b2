//! Application Layer - Use cases and port definitions.
//!
//! Defines the port the market data provider must implement and the
//! services that turn a provider response into the startup snapshot and
//! the read-only views served over HTTP.

/// Port interfaces for external systems (market data provider).
pub mod ports;

/// Snapshot loading and snapshot-derived views.
pub mod services;
