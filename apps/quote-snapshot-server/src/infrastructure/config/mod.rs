//! Configuration Module
//!
//! Configuration loading for the quote server.

mod settings;

pub use settings::{
    ConfigError, CorsSettings, Credentials, ProviderSettings, ServerConfig, ServerSettings,
};
