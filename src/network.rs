//! Network state.
//!
//! A [`NetworkState`] is the immutable result of running a configuration
//! through the builder, the link classifier and the routing table
//! synthesizer. Reconfiguring means building a new state; nothing is
//! mutated after construction.

use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use crate::config::{ConfigError, Medium, NetworkConfig, RandomBounds};
use crate::ip::Subnet;
use crate::topology::{
    build_topology, classify_links, random_config, resolve, synthesize_routing_tables,
    NetworkGraph, NetworkPath, ResolveError, RoutingTable, RoutingTables,
};

/// A fully built network: classified graph, addresses, hosts and routing tables
#[derive(Debug, Clone, Serialize)]
pub struct NetworkState {
    config: NetworkConfig,
    graph: NetworkGraph,
    addresses: BTreeMap<String, Ipv4Addr>,
    hosts: Vec<String>,
    /// Medium chosen by each switch for its downlinks
    media: BTreeMap<String, Medium>,
    routing: RoutingTables,
}

/// Addresses of a source/destination pair and whether a path joins them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddressLookup {
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    pub reachable: bool,
}

impl NetworkState {
    /// Build a network from a configuration
    ///
    /// # Arguments
    /// * `config` - The configuration; validated before anything is built
    /// * `rng` - Source for `random` link policies
    ///
    /// # Returns
    /// * `Ok(NetworkState)` - The classified network with routing tables
    /// * `Err(ConfigError)` - If the configuration is invalid
    pub fn from_config<R: Rng + ?Sized>(config: NetworkConfig, rng: &mut R) -> Result<Self, ConfigError> {
        let topology = build_topology(&config)?;
        let mut graph = topology.graph;

        let media = classify_links(&mut graph, &config.link_settings(), rng);
        let routing = synthesize_routing_tables(&graph, &config.edge_subnets());

        log::info!(
            "Built network with {} nodes, {} links and {} hosts",
            graph.node_count(),
            graph.link_count(),
            topology.hosts.len()
        );

        Ok(Self {
            config,
            graph,
            addresses: topology.addresses,
            hosts: topology.hosts,
            media,
            routing,
        })
    }

    /// Build a network with randomly drawn host counts
    pub fn random<R: Rng + ?Sized>(bounds: &RandomBounds, rng: &mut R) -> Result<Self, ConfigError> {
        let config = random_config(bounds, rng)?;
        Self::from_config(config, rng)
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn addresses(&self) -> &BTreeMap<String, Ipv4Addr> {
        &self.addresses
    }

    pub fn address_of(&self, id: &str) -> Option<Ipv4Addr> {
        self.addresses.get(id).copied()
    }

    /// Host IDs ordered by edge switch, then ordinal
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn media(&self) -> &BTreeMap<String, Medium> {
        &self.media
    }

    pub fn routing_tables(&self) -> &RoutingTables {
        &self.routing
    }

    pub fn routing_table(&self, router: &str) -> Option<&RoutingTable> {
        self.routing.get(router)
    }

    pub fn edge_subnets(&self) -> BTreeMap<String, Subnet> {
        self.config.edge_subnets()
    }

    pub fn resolve(&self, src: &str, dst: &str) -> Result<NetworkPath, ResolveError> {
        resolve(&self.graph, src, dst)
    }

    /// Look up the addresses of `src` and `dst`
    ///
    /// Unknown IDs are an error; an unreachable pair is reported through
    /// [`AddressLookup::reachable`].
    pub fn host_addresses(&self, src: &str, dst: &str) -> Result<AddressLookup, ResolveError> {
        let lookup = |id: &str| {
            self.address_of(id)
                .ok_or_else(|| ResolveError::UnknownNode(id.to_string()))
        };
        let src_address = lookup(src)?;
        let dst_address = lookup(dst)?;

        let reachable = match self.resolve(src, dst) {
            Ok(_) => true,
            Err(ResolveError::Unreachable { .. }) => false,
            Err(e) => return Err(e),
        };

        Ok(AddressLookup {
            src: src_address,
            dst: dst_address,
            reachable,
        })
    }
}
