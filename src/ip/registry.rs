//! IP address registry.
//!
//! This file manages a registry of assigned IP addresses to ensure
//! uniqueness and track which address belongs to which node.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

/// Registry of node addresses for collision detection
#[derive(Debug, Default)]
pub struct AddressRegistry {
    /// Address -> node ID
    assigned: BTreeMap<Ipv4Addr, String>,
}

impl AddressRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an address for a node.
    ///
    /// Re-registering the same address for the same node is accepted. If the
    /// address already belongs to another node, that node's ID is returned as
    /// the error.
    pub fn register(&mut self, addr: Ipv4Addr, node_id: &str) -> Result<(), String> {
        match self.assigned.get(&addr) {
            Some(existing) if existing != node_id => Err(existing.clone()),
            Some(_) => Ok(()),
            None => {
                self.assigned.insert(addr, node_id.to_string());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_detects_conflicts() {
        let mut registry = AddressRegistry::new();
        let addr = Ipv4Addr::new(192, 168, 1, 30);

        assert!(registry.register(addr, "e1").is_ok());
        assert!(registry.register(addr, "e1").is_ok());
        assert_eq!(registry.register(addr, "H11"), Err("e1".to_string()));
        // The first owner keeps the address; other addresses stay free
        assert_eq!(registry.register(addr, "H12"), Err("e1".to_string()));
        assert!(registry.register(Ipv4Addr::new(192, 168, 1, 1), "H11").is_ok());
    }
}
