//! Topology construction.
//!
//! Builds the fixed root/aggregation/edge/host tree from a validated
//! configuration, deriving host identifiers and addresses from each edge
//! switch's subnet. Random mode draws host counts and reuses the same
//! wiring and addressing rules.

use rand::Rng;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use crate::config::{ConfigError, NetworkConfig, RandomBounds, SubnetConfig};
use crate::ip::Subnet;
use crate::topology::types::{
    host_id, Layer, NetworkGraph, Node, Role, AGGREGATION_SWITCHES, EDGE_SWITCHES, ROOT,
    SWITCH_WIRING,
};

/// Unclassified topology: graph, address map and ordered host list
#[derive(Debug, Clone)]
pub struct Topology {
    pub graph: NetworkGraph,
    pub addresses: BTreeMap<String, Ipv4Addr>,
    pub hosts: Vec<String>,
}

/// Build the tree described by `config`
///
/// The configuration is validated first; links are created without medium
/// or bandwidth annotations.
pub fn build_topology(config: &NetworkConfig) -> Result<Topology, ConfigError> {
    config.validate()?;

    let mut graph = NetworkGraph::new();

    graph.add_node(Node {
        id: ROOT.to_string(),
        role: Role::Root,
        address: config.core.root_address,
    })?;

    for switch in AGGREGATION_SWITCHES {
        let address = config
            .aggregation
            .get(switch)
            .copied()
            .ok_or_else(|| missing("aggregation", switch))?;
        graph.add_node(Node {
            id: switch.to_string(),
            role: Role::Aggregation,
            address,
        })?;
    }

    for switch in EDGE_SWITCHES {
        let subnet_config = config
            .subnets
            .get(switch)
            .ok_or_else(|| missing("subnets", switch))?;
        graph.add_node(Node {
            id: switch.to_string(),
            role: Role::Edge,
            address: subnet_config.switch_address,
        })?;
    }

    for (parent, child, layer) in SWITCH_WIRING {
        graph.add_link(parent, child, layer)?;
    }

    let mut hosts = Vec::new();
    for (index, switch) in EDGE_SWITCHES.iter().enumerate() {
        let subnet_config = config
            .subnets
            .get(*switch)
            .ok_or_else(|| missing("subnets", switch))?;

        for ordinal in 1..=subnet_config.host_count {
            let address = subnet_config
                .subnet
                .host(ordinal)
                .ok_or_else(|| ConfigError::HostOverflow {
                    switch: switch.to_string(),
                    subnet: subnet_config.subnet,
                    host_count: subnet_config.host_count,
                    capacity: subnet_config.subnet.max_hosts(),
                })?;
            let id = host_id(index + 1, ordinal);
            graph.add_node(Node {
                id: id.clone(),
                role: Role::Host,
                address,
            })?;
            graph.add_link(switch, &id, Layer::EdgeToHost)?;
            hosts.push(id);
        }

        log::debug!(
            "{} ({}) serves {} hosts in {}",
            switch,
            subnet_config.switch_address,
            subnet_config.host_count,
            subnet_config.subnet
        );
    }

    let addresses = graph
        .nodes()
        .iter()
        .map(|node| (node.id.clone(), node.address))
        .collect();

    log::info!(
        "Built topology with {} nodes, {} links and {} hosts",
        graph.node_count(),
        graph.link_count(),
        hosts.len()
    );

    Ok(Topology {
        graph,
        addresses,
        hosts,
    })
}

fn missing(section: &'static str, switch: &str) -> ConfigError {
    ConfigError::MissingSwitch {
        section,
        switch: switch.to_string(),
    }
}

/// First address of the random-mode layout used when the default blocks are too small
const SIZED_LAYOUT_BASE: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 0);

/// Generate a configuration with randomly drawn host counts
///
/// Starts from the default configuration when every default block can hold
/// `bounds.max_hosts`; otherwise lays out one block per edge switch sized for
/// `max_hosts`. Each edge switch's host count is then
/// drawn independently and uniformly from `bounds`, and the result is
/// validated.
pub fn random_config<R: Rng + ?Sized>(
    bounds: &RandomBounds,
    rng: &mut R,
) -> Result<NetworkConfig, ConfigError> {
    bounds.validate()?;

    let mut config = NetworkConfig::default();
    for subnet_config in config.subnets.values_mut() {
        subnet_config.host_count = bounds.max_hosts;
    }
    if config.validate().is_err() {
        log::debug!(
            "Default blocks cannot hold {} hosts; using a sized layout",
            bounds.max_hosts
        );
        config = sized_layout(bounds.max_hosts);
    }

    for switch in EDGE_SWITCHES {
        if let Some(subnet_config) = config.subnets.get_mut(switch) {
            subnet_config.host_count = rng.gen_range(bounds.min_hosts..=bounds.max_hosts);
            log::debug!("Random host count for {}: {}", switch, subnet_config.host_count);
        }
    }

    config.validate()?;
    Ok(config)
}

/// Default configuration with equal edge blocks large enough for `max_hosts`
///
/// Each block holds the hosts, the network and broadcast addresses and the
/// edge switch at the top usable address. Blocks are laid out back to back
/// from 192.168.0.0; the aggregation and root switches take the first
/// addresses after the last block.
fn sized_layout(max_hosts: u32) -> NetworkConfig {
    let block_size = (max_hosts + 3).next_power_of_two().max(4);
    let prefix = (32 - block_size.trailing_zeros()) as u8;
    let base = u32::from(SIZED_LAYOUT_BASE);

    let mut config = NetworkConfig::default();
    for (index, switch) in EDGE_SWITCHES.iter().enumerate() {
        let subnet = Subnet::containing(Ipv4Addr::from(base + index as u32 * block_size), prefix);
        let switch_address = Ipv4Addr::from(u32::from(subnet.broadcast()) - 1);
        config.subnets.insert(
            switch.to_string(),
            SubnetConfig {
                subnet,
                host_count: max_hosts,
                switch_address,
            },
        );
    }

    let routers = base + EDGE_SWITCHES.len() as u32 * block_size;
    for (offset, switch) in (1u32..).zip(AGGREGATION_SWITCHES) {
        config
            .aggregation
            .insert(switch.to_string(), Ipv4Addr::from(routers + offset));
    }
    config.core.root_address = Ipv4Addr::from(routers + AGGREGATION_SWITCHES.len() as u32 + 1);

    config
}
