//! Application Services
//!
//! - `SnapshotLoader`: performs the single startup fetch
//! - `views`: summaries and price series derived from the snapshot

mod loader;
pub mod views;

pub use loader::SnapshotLoader;
pub use views::{MAX_SUMMARY_SYMBOLS, SeriesPoint, StockSummary, normalize_symbols};
