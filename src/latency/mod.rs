//! Latency estimation.
//!
//! Per-medium link profiles, the RTT model (medium-aware and the legacy
//! hop-count formula) and the XProbe estimator that samples RTTs along a
//! resolved path.

pub mod estimator;
pub mod model;
pub mod profile;

pub use estimator::{estimate, xprobe, ProbeReport, RttSummary};
pub use model::{LatencyFormula, LatencyModel};
pub use profile::{link_profile, LinkProfile};
