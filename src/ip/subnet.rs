//! IPv4 subnet blocks in CIDR notation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Errors raised when parsing a CIDR block
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubnetError {
    #[error("missing '/' prefix length in '{0}'")]
    MissingPrefix(String),
    #[error("invalid network address in '{0}'")]
    InvalidAddress(String),
    #[error("invalid prefix length in '{0}' (expected 0-32)")]
    InvalidPrefix(String),
    #[error("'{0}' has host bits set; expected network address {1}")]
    Misaligned(String, Ipv4Addr),
}

/// An aligned IPv4 address block, e.g. `192.168.1.0/27`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subnet {
    network: Ipv4Addr,
    prefix: u8,
}

impl Subnet {
    /// Create a subnet from a network address and prefix length.
    /// The address must not have host bits set.
    pub fn new(network: Ipv4Addr, prefix: u8) -> Result<Self, SubnetError> {
        let text = format!("{}/{}", network, prefix);
        if prefix > 32 {
            return Err(SubnetError::InvalidPrefix(text));
        }
        let masked = Ipv4Addr::from(u32::from(network) & mask_bits(prefix));
        if masked != network {
            return Err(SubnetError::Misaligned(text, masked));
        }
        Ok(Self { network, prefix })
    }

    /// The `prefix`-length block that contains `addr`; host bits are cleared
    pub fn containing(addr: Ipv4Addr, prefix: u8) -> Self {
        let prefix = prefix.min(32);
        Self {
            network: Ipv4Addr::from(u32::from(addr) & mask_bits(prefix)),
            prefix,
        }
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix
    }

    /// Highest address of the block
    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.network) | !mask_bits(self.prefix))
    }

    /// Number of addresses in the block, including network and broadcast
    pub fn size(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & mask_bits(self.prefix) == u32::from(self.network)
    }

    pub fn overlaps(&self, other: &Subnet) -> bool {
        self.contains(other.network) || other.contains(self.network)
    }

    /// Address of host `ordinal` (1-based): the network address offset by `ordinal`.
    ///
    /// Returns `None` when the offset leaves the usable range, i.e. it would
    /// land on the broadcast address or past the end of the block.
    pub fn host(&self, ordinal: u32) -> Option<Ipv4Addr> {
        if ordinal == 0 || self.prefix > 30 {
            return None;
        }
        let candidate = u32::from(self.network).checked_add(ordinal)?;
        if candidate >= u32::from(self.broadcast()) {
            return None;
        }
        Some(Ipv4Addr::from(candidate))
    }

    /// Largest host ordinal that still fits in the block
    pub fn max_hosts(&self) -> u64 {
        self.size().saturating_sub(2)
    }
}

fn mask_bits(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix))
    }
}

impl FromStr for Subnet {
    type Err = SubnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| SubnetError::MissingPrefix(s.to_string()))?;
        let network: Ipv4Addr = addr
            .parse()
            .map_err(|_| SubnetError::InvalidAddress(s.to_string()))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| SubnetError::InvalidPrefix(s.to_string()))?;
        Subnet::new(network, prefix)
    }
}

impl TryFrom<String> for Subnet {
    type Error = SubnetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Subnet> for String {
    fn from(value: Subnet) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}
