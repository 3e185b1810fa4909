//! Persisted timestamp tracking for incremental rebuilds.
//!
//! This crate provides the [`TimestampStore`] snapshot that survives between
//! runs, the [`MarkerSource`] that observes a file's current modification
//! state, and the [`decide`] staleness policy that compares the two.

#![warn(missing_docs)]

pub mod error;
pub mod key;
pub mod marker;
pub mod staleness;
pub mod store;

pub use error::CacheError;
pub use key::normalize_key;
pub use marker::{Marker, MarkerKind, MarkerSource};
pub use staleness::{decide, Decision};
pub use store::{TimestampStore, STORE_FORMAT_VERSION};
