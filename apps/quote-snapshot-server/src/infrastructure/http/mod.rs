//! HTTP/REST API adapter.
//!
//! Inbound adapter serving lookups over the startup snapshot.

mod controller;
mod request;
mod response;

pub use controller::{AppState, cors_layer, create_router};
pub use request::*;
pub use response::*;
