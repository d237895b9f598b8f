//! Topology type definitions.
//!
//! This file contains the node, link and graph types of the simulated
//! network, along with the structural constants of the fixed four-level
//! tree (root -> aggregation -> edge -> hosts).

use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::net::Ipv4Addr;

use crate::utils::bandwidth::Bandwidth;

/// Re-export types from config to keep topology consumers self-contained
pub use crate::config::Medium;

/// The single core switch
pub const ROOT: &str = "root";

/// Aggregation switches, in wiring order
pub const AGGREGATION_SWITCHES: [&str; 2] = ["a1", "a2"];

/// Edge switches, in wiring order; `e<n>` owns the hosts `H<n><ordinal>`
pub const EDGE_SWITCHES: [&str; 4] = ["e1", "e2", "e3", "e4"];

/// Fixed inter-switch wiring as (parent, child, layer) triples
pub const SWITCH_WIRING: [(&str, &str, Layer); 6] = [
    ("root", "a1", Layer::CoreToAggregation),
    ("root", "a2", Layer::CoreToAggregation),
    ("a1", "e1", Layer::AggregationToEdge),
    ("a1", "e2", Layer::AggregationToEdge),
    ("a2", "e3", Layer::AggregationToEdge),
    ("a2", "e4", Layer::AggregationToEdge),
];

/// Identifier of host `ordinal` (1-based) under edge switch `e<subnet_index>`
pub fn host_id(subnet_index: usize, ordinal: u32) -> String {
    format!("H{}{}", subnet_index, ordinal)
}

/// Position of a node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Root,
    Aggregation,
    Edge,
    Host,
}

impl Role {
    /// Roles that keep an explicit routing table
    pub fn is_router(&self) -> bool {
        matches!(self, Role::Root | Role::Aggregation)
    }
}

/// Link layer between two adjacent tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    CoreToAggregation,
    AggregationToEdge,
    EdgeToHost,
}

impl Layer {
    pub fn name(&self) -> &'static str {
        match self {
            Layer::CoreToAggregation => "core_to_aggregation",
            Layer::AggregationToEdge => "aggregation_to_edge",
            Layer::EdgeToHost => "edge_to_host",
        }
    }

    /// Layer of the link from a node with role `upper` down to its child
    pub fn below(upper: Role) -> Option<Layer> {
        match upper {
            Role::Root => Some(Layer::CoreToAggregation),
            Role::Aggregation => Some(Layer::AggregationToEdge),
            Role::Edge => Some(Layer::EdgeToHost),
            Role::Host => None,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A switch or host in the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: String,
    pub role: Role,
    pub address: Ipv4Addr,
}

/// An undirected link, stored with its tree-parent endpoint first.
///
/// `medium` and `bandwidth` are `None` until the link classifier has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub upper: String,
    pub lower: String,
    pub layer: Layer,
    pub medium: Option<Medium>,
    pub bandwidth: Option<Bandwidth>,
}

impl Link {
    /// Returns true if this link joins `a` and `b`, in either order
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.upper == a && self.lower == b) || (self.upper == b && self.lower == a)
    }

    /// The endpoint opposite to `id`, if `id` is an endpoint
    pub fn other_end(&self, id: &str) -> Option<&str> {
        if self.upper == id {
            Some(&self.lower)
        } else if self.lower == id {
            Some(&self.upper)
        } else {
            None
        }
    }
}

/// Errors raised while assembling a graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("duplicate node ID '{0}'")]
    DuplicateNode(String),
    #[error("link references non-existent node '{0}'")]
    UnknownEndpoint(String),
    #[error("link from '{0}' to itself")]
    SelfLoop(String),
    #[error("duplicate link between '{0}' and '{1}'")]
    DuplicateLink(String, String),
}

/// Undirected network graph with per-node adjacency
#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkGraph {
    nodes: Vec<Node>,
    links: Vec<Link>,
    /// Node ID -> position in `nodes`
    #[serde(skip)]
    index: HashMap<String, usize>,
    /// Per node position: indices into `links`
    #[serde(skip)]
    adjacency: Vec<Vec<usize>>,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        Ok(())
    }

    /// Add an unannotated link from `upper` (tree parent) to `lower`
    pub fn add_link(&mut self, upper: &str, lower: &str, layer: Layer) -> Result<usize, GraphError> {
        if upper == lower {
            return Err(GraphError::SelfLoop(upper.to_string()));
        }
        let upper_pos = self.position(upper)?;
        let lower_pos = self.position(lower)?;
        if self.link_between(upper, lower).is_some() {
            return Err(GraphError::DuplicateLink(upper.to_string(), lower.to_string()));
        }

        let link_index = self.links.len();
        self.links.push(Link {
            upper: upper.to_string(),
            lower: lower.to_string(),
            layer,
            medium: None,
            bandwidth: None,
        });
        self.adjacency[upper_pos].push(link_index);
        self.adjacency[lower_pos].push(link_index);
        Ok(link_index)
    }

    /// Remove the link between `a` and `b`, returning it if it existed
    pub fn remove_link(&mut self, a: &str, b: &str) -> Option<Link> {
        let link_index = self.links.iter().position(|link| link.connects(a, b))?;
        let removed = self.links.remove(link_index);
        self.rebuild_adjacency();
        Some(removed)
    }

    fn rebuild_adjacency(&mut self) {
        self.adjacency = vec![Vec::new(); self.nodes.len()];
        for (link_index, link) in self.links.iter().enumerate() {
            for endpoint in [&link.upper, &link.lower] {
                if let Some(&pos) = self.index.get(endpoint) {
                    self.adjacency[pos].push(link_index);
                }
            }
        }
    }

    fn position(&self, id: &str) -> Result<usize, GraphError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownEndpoint(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut [Link] {
        &mut self.links
    }

    pub fn link(&self, link_index: usize) -> Option<&Link> {
        self.links.get(link_index)
    }

    pub fn link_between(&self, a: &str, b: &str) -> Option<&Link> {
        let pos = *self.index.get(a)?;
        self.adjacency[pos]
            .iter()
            .map(|&link_index| &self.links[link_index])
            .find(|link| link.other_end(a) == Some(b))
    }

    /// Neighbors of `id` with the index of the link that reaches each one
    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = (&'a str, usize)> + 'a {
        let incident: &[usize] = match self.index.get(id) {
            Some(&pos) => &self.adjacency[pos],
            None => &[],
        };
        let id = id.to_string();
        incident.iter().filter_map(move |&link_index| {
            self.links[link_index]
                .other_end(&id)
                .map(|other| (other, link_index))
        })
    }

    /// Nodes directly below `id` in the tree
    pub fn children<'a>(&'a self, id: &str) -> Vec<&'a str> {
        self.neighbors(id)
            .filter(|&(_, link_index)| self.links[link_index].upper == id)
            .map(|(child, _)| child)
            .collect()
    }

    /// Nodes with the given role, in insertion order
    pub fn nodes_with_role(&self, role: Role) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| node.role == role)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Returns true if every node is reachable from the first one
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.nodes.first() else {
            return true;
        };
        let mut seen: HashSet<&str> = HashSet::from([start.id.as_str()]);
        let mut queue = VecDeque::from([start.id.as_str()]);
        while let Some(current) = queue.pop_front() {
            for (neighbor, _) in self.neighbors(current) {
                if seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        seen.len() == self.nodes.len()
    }

    /// Tree invariant: connected with exactly `node_count - 1` links
    pub fn is_tree(&self) -> bool {
        self.links.len() + 1 == self.nodes.len() && self.is_connected()
    }
}
