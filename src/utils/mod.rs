//! Shared utilities: bandwidth parsing and formatting.

pub mod bandwidth;

pub use bandwidth::{parse_bandwidth_to_bps, Bandwidth};
