//! Bandwidth parsing utilities.
//!
//! This module provides a bits-per-second [`Bandwidth`] value that can be
//! parsed from human strings (e.g., "10 Gbps", "500Mbps") and formatted back.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static BANDWIDTH_PATTERN: LazyLock<Regex> = LazyLock::new(||
    Regex::new(r"^(?i)(\d+(?:\.\d+)?)\s*(k|m|g|t)?(?:bps|bit/s|b/s)?$").unwrap()
);

const KILO: u64 = 1_000;
const MEGA: u64 = 1_000_000;
const GIGA: u64 = 1_000_000_000;
const TERA: u64 = 1_000_000_000_000;

/// Nominal link bandwidth in bits per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bandwidth(u64);

impl Bandwidth {
    pub const fn from_bps(bps: u64) -> Self {
        Self(bps)
    }

    pub const fn from_mbps(mbps: u64) -> Self {
        Self(mbps * MEGA)
    }

    pub const fn from_gbps(gbps: u64) -> Self {
        Self(gbps * GIGA)
    }

    pub fn bits_per_second(&self) -> u64 {
        self.0
    }
}

/// Parse bandwidth string (e.g., "10 Gbps", "500Mbps", "8000") to bits per second
///
/// Supports:
/// - Raw bits per second: "8000"
/// - Unit suffixes (case insensitive): "bps", "kbps", "Mbps", "Gbps", "Tbps"
/// - Fractional values: "1.5 Gbps"
///
/// # Arguments
/// * `bandwidth` - The bandwidth string to parse
///
/// # Returns
/// * `Ok(u64)` - The bandwidth in bits per second if parsing succeeds
/// * `Err(String)` - An error message if parsing fails
///
/// # Examples
/// ```
/// use xprobesim::utils::bandwidth::parse_bandwidth_to_bps;
///
/// assert_eq!(parse_bandwidth_to_bps("10 Gbps"), Ok(10_000_000_000));
/// assert_eq!(parse_bandwidth_to_bps("500Mbps"), Ok(500_000_000));
/// assert!(parse_bandwidth_to_bps("fast").is_err());
/// ```
pub fn parse_bandwidth_to_bps(bandwidth: &str) -> Result<u64, String> {
    let bandwidth = bandwidth.trim();
    let caps = BANDWIDTH_PATTERN
        .captures(bandwidth)
        .ok_or_else(|| format!("Invalid bandwidth format: {}", bandwidth))?;

    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        None => 1,
        Some(prefix) => match prefix.as_str() {
            "k" => KILO,
            "m" => MEGA,
            "g" => GIGA,
            "t" => TERA,
            _ => return Err(format!("Invalid bandwidth unit: {}", bandwidth)),
        },
    };

    let value: f64 = caps[1]
        .parse()
        .map_err(|_| format!("Invalid bandwidth value: {}", bandwidth))?;
    let bps = (value * multiplier as f64).round();

    if bps < 1.0 {
        return Err(format!("Bandwidth must be positive: {}", bandwidth));
    }
    if bps > u64::MAX as f64 {
        return Err(format!("Bandwidth out of range: {}", bandwidth));
    }

    Ok(bps as u64)
}

impl FromStr for Bandwidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_bandwidth_to_bps(s).map(Bandwidth)
    }
}

impl TryFrom<String> for Bandwidth {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Bandwidth> for String {
    fn from(value: Bandwidth) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bps = self.0;
        // Largest unit that divides evenly, so the text parses back to the same value
        for (unit, name) in [(TERA, "Tbps"), (GIGA, "Gbps"), (MEGA, "Mbps"), (KILO, "kbps")] {
            if bps >= unit && bps % unit == 0 {
                return write!(f, "{} {}", bps / unit, name);
            }
        }
        write!(f, "{} bps", bps)
    }
}
