//! IP address handling module.
//!
//! This module handles IPv4 subnet blocks owned by edge switches, host
//! address derivation inside a block, and the registry that keeps node
//! addresses unique across the whole network.

pub mod registry;
pub mod subnet;

// Re-export commonly used types
pub use registry::AddressRegistry;
pub use subnet::{Subnet, SubnetError};
