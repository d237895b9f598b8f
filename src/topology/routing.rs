//! Routing table synthesis.
//!
//! Core and aggregation switches keep a table mapping each descendant edge
//! subnet to the child that leads toward it. Edge switches need no table:
//! anything outside their attached hosts goes to their parent.

use serde::Serialize;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use crate::ip::Subnet;
use crate::topology::types::{NetworkGraph, Role};

/// Destination subnet -> next-hop table of one router
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingTable {
    pub router: String,
    pub address: Ipv4Addr,
    routes: BTreeMap<Subnet, String>,
}

impl RoutingTable {
    pub fn routes(&self) -> &BTreeMap<Subnet, String> {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Next hop for an exact destination subnet
    pub fn next_hop_for_subnet(&self, subnet: &Subnet) -> Option<&str> {
        self.routes.get(subnet).map(String::as_str)
    }

    /// Longest-prefix match of `destination` against the table
    pub fn next_hop(&self, destination: Ipv4Addr) -> Option<&str> {
        self.routes
            .iter()
            .filter(|(subnet, _)| subnet.contains(destination))
            .max_by_key(|(subnet, _)| subnet.prefix_len())
            .map(|(_, next_hop)| next_hop.as_str())
    }
}

/// Routing tables keyed by router ID
pub type RoutingTables = BTreeMap<String, RoutingTable>;

/// Build a routing table for every root and aggregation switch
///
/// Walks the tree below each router: every edge switch found under child
/// `c` contributes a route from its subnet to `c`.
///
/// # Arguments
/// * `graph` - The finished tree
/// * `edge_subnets` - Subnet owned by each edge switch
pub fn synthesize_routing_tables(
    graph: &NetworkGraph,
    edge_subnets: &BTreeMap<String, Subnet>,
) -> RoutingTables {
    let mut tables = RoutingTables::new();

    for router in graph.nodes().iter().filter(|node| node.role.is_router()) {
        let mut routes = BTreeMap::new();
        for child in graph.children(&router.id) {
            for edge_switch in edge_switches_below(graph, child) {
                if let Some(subnet) = edge_subnets.get(edge_switch) {
                    routes.insert(*subnet, child.to_string());
                } else {
                    log::warn!("Edge switch {} has no subnet; skipping route", edge_switch);
                }
            }
        }

        log::debug!("Routing table for {}: {} routes", router.id, routes.len());
        tables.insert(
            router.id.clone(),
            RoutingTable {
                router: router.id.clone(),
                address: router.address,
                routes,
            },
        );
    }

    tables
}

/// Edge switches in the subtree rooted at `id`, including `id` itself
fn edge_switches_below<'a>(graph: &'a NetworkGraph, id: &'a str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        match graph.node(current).map(|node| node.role) {
            Some(Role::Edge) => found.push(current),
            Some(Role::Host) | None => {}
            Some(_) => stack.extend(graph.children(current)),
        }
    }
    found
}
