//! Physical characteristics of each link medium.

use serde::Serialize;

use crate::config::Medium;

/// Link speed and one-way propagation delay of a medium
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkProfile {
    pub speed_bps: u64,
    pub propagation_delay_s: f64,
}

impl LinkProfile {
    /// One-way delay of a packet over this link, in seconds
    pub fn one_way_delay_s(&self, packet_size_bits: u64) -> f64 {
        packet_size_bits as f64 / self.speed_bps as f64 + self.propagation_delay_s
    }

    pub fn speed_mbps(&self) -> u64 {
        self.speed_bps / 1_000_000
    }
}

const TWISTED_PAIR: LinkProfile = LinkProfile {
    speed_bps: 1_000_000_000,
    propagation_delay_s: 5e-6,
};
const FIBER_OPTIC: LinkProfile = LinkProfile {
    speed_bps: 10_000_000_000,
    propagation_delay_s: 0.5e-6,
};
const COAXIAL: LinkProfile = LinkProfile {
    speed_bps: 500_000_000,
    propagation_delay_s: 6e-6,
};
const WIRELESS: LinkProfile = LinkProfile {
    speed_bps: 300_000_000,
    propagation_delay_s: 0.33e-6,
};

/// Profile for a link medium; unannotated links behave like twisted pair
pub fn link_profile(medium: Option<Medium>) -> LinkProfile {
    match medium {
        Some(Medium::TwistedPair) | None => TWISTED_PAIR,
        Some(Medium::FiberOptic) => FIBER_OPTIC,
        Some(Medium::Coaxial) => COAXIAL,
        Some(Medium::Wireless) => WIRELESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        assert_eq!(link_profile(Some(Medium::FiberOptic)).speed_mbps(), 10_000);
        assert_eq!(link_profile(Some(Medium::TwistedPair)).speed_mbps(), 1_000);
        assert_eq!(link_profile(Some(Medium::Coaxial)).speed_mbps(), 500);
        assert_eq!(link_profile(Some(Medium::Wireless)).speed_mbps(), 300);
        assert_eq!(link_profile(None), link_profile(Some(Medium::TwistedPair)));
    }

    #[test]
    fn test_one_way_delay() {
        // 8000 bits over 1 Gbps is 8 µs, plus 5 µs propagation
        let delay = link_profile(Some(Medium::TwistedPair)).one_way_delay_s(8000);
        assert!((delay - 13e-6).abs() < 1e-12);
    }
}
