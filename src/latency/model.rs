//! RTT model.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::latency::profile::link_profile;
use crate::topology::types::Link;

/// One-way delay per hop of the legacy formula, in seconds
const LEGACY_HOP_DELAY_S: f64 = 0.05;

/// Jitter factor range of the legacy formula: 1 ± 10%
const LEGACY_JITTER: (f64, f64) = (0.9, 1.1);

/// Which RTT formula to apply to a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencyFormula {
    /// Transmission plus propagation delay of every traversed medium
    #[default]
    MediumAware,
    /// Flat 50 ms one-way per hop, regardless of medium, with its own
    /// fixed ±10% jitter; the configured jitter bounds do not apply
    HopCount,
}

/// Estimator settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencyModel {
    pub formula: LatencyFormula,
    pub packet_size_bits: u64,
    /// Lower bound of the medium-aware jitter factor
    pub jitter_min: f64,
    /// Upper bound of the medium-aware jitter factor
    pub jitter_max: f64,
}

impl Default for LatencyModel {
    fn default() -> Self {
        Self {
            formula: LatencyFormula::MediumAware,
            packet_size_bits: 8000,
            jitter_min: 0.95,
            jitter_max: 1.10,
        }
    }
}

impl LatencyModel {
    pub fn validate(&self) -> Result<(), String> {
        if self.packet_size_bits == 0 {
            return Err("packet_size_bits must be greater than zero".to_string());
        }
        if !self.jitter_min.is_finite() || !self.jitter_max.is_finite() {
            return Err("jitter bounds must be finite".to_string());
        }
        if self.jitter_min <= 0.0 {
            return Err(format!("jitter_min must be positive, got {}", self.jitter_min));
        }
        if self.jitter_min > self.jitter_max {
            return Err(format!(
                "jitter_min ({}) is greater than jitter_max ({})",
                self.jitter_min, self.jitter_max
            ));
        }
        Ok(())
    }

    /// Unjittered round-trip time over `links`, in milliseconds
    pub fn base_rtt_ms<'a>(&self, links: impl IntoIterator<Item = &'a Link>) -> f64 {
        let one_way_s: f64 = match self.formula {
            LatencyFormula::MediumAware => links
                .into_iter()
                .map(|link| link_profile(link.medium).one_way_delay_s(self.packet_size_bits))
                .sum(),
            LatencyFormula::HopCount => links.into_iter().count() as f64 * LEGACY_HOP_DELAY_S,
        };
        one_way_s * 2.0 * 1000.0
    }

    /// Inclusive jitter factor range applied by the selected formula
    pub fn jitter_bounds(&self) -> (f64, f64) {
        match self.formula {
            LatencyFormula::MediumAware => (self.jitter_min, self.jitter_max),
            LatencyFormula::HopCount => LEGACY_JITTER,
        }
    }

    /// Draw one jitter factor from [`jitter_bounds`](Self::jitter_bounds)
    pub fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let (min, max) = self.jitter_bounds();
        if min == max {
            return min;
        }
        rng.gen_range(min..=max)
    }
}
