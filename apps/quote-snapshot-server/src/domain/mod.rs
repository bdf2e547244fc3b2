//! Domain Layer - Quote records and snapshot queries.
//!
//! Pure types with serialization support. Nothing in here performs I/O;
//! the snapshot is built by the application layer and only read afterwards.

/// Quote records and the immutable startup snapshot.
pub mod quote;

/// Query constraints and match policies over a snapshot.
pub mod query;
