//! The staleness policy.

use crate::marker::Marker;
use crate::store::TimestampStore;

/// What to do with a unit whose current marker has been observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The stored marker equals the current one; the unit is up to date.
    Skip,
    /// The unit is unknown, invalidated, or its marker differs.
    Rebuild,
}

/// Decides whether the unit identified by `key` needs to be processed again.
///
/// Markers are compared for equality only. An invalidated entry never matches,
/// so a unit that failed last time is always retried.
pub fn decide(key: &str, current: &Marker, store: &TimestampStore) -> Decision {
    let decision = match store.marker(key) {
        Some(stored) if stored == current => Decision::Skip,
        _ => Decision::Rebuild,
    };
    tracing::trace!(key, marker = %current, ?decision, "staleness decision");
    decision
}
