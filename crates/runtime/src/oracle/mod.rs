//! Runtime implementations of the `bolt-core` stat oracle.
//!
//! The data is immutable once a region starts; dynamic state lives in each
//! region's [`bolt_core::RegionState`].
mod stats;

pub use stats::TableStatsOracle;
