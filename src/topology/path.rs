//! Path resolution.
//!
//! Finds the unique path between two nodes of the tree with a breadth-first
//! search that records parent pointers.

use serde::Serialize;
use std::collections::{HashMap, VecDeque};

use crate::topology::types::{Link, NetworkGraph};

/// Path lookup failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("node '{0}' does not exist in the network")]
    UnknownNode(String),
    /// Only possible if the graph is no longer a tree
    #[error("'{dst}' is unreachable from '{src}'")]
    Unreachable { src: String, dst: String },
}

/// A resolved path: the visited nodes and the links between them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkPath {
    nodes: Vec<String>,
    links: Vec<usize>,
}

impl NetworkPath {
    /// Node IDs from source to destination, both included
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Indices of the traversed links, in path order
    pub fn link_indices(&self) -> &[usize] {
        &self.links
    }

    pub fn hop_count(&self) -> usize {
        self.links.len()
    }

    /// True for the zero-hop path from a node to itself
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Traversed links, resolved against the graph the path came from
    pub fn links<'g>(&'g self, graph: &'g NetworkGraph) -> impl Iterator<Item = &'g Link> + 'g {
        self.links.iter().filter_map(move |&index| graph.link(index))
    }
}

/// Resolve the path from `src` to `dst`
///
/// # Returns
/// * `Ok(path)` - The unique path (empty when `src == dst`)
/// * `Err(ResolveError::UnknownNode)` - Either ID is not in the graph
/// * `Err(ResolveError::Unreachable)` - No path exists (forest)
pub fn resolve(graph: &NetworkGraph, src: &str, dst: &str) -> Result<NetworkPath, ResolveError> {
    for id in [src, dst] {
        if !graph.contains(id) {
            return Err(ResolveError::UnknownNode(id.to_string()));
        }
    }

    if src == dst {
        return Ok(NetworkPath {
            nodes: vec![src.to_string()],
            links: Vec::new(),
        });
    }

    // Node -> (previous node, link used to reach it)
    let mut parents: HashMap<&str, (&str, usize)> = HashMap::new();
    let mut queue = VecDeque::from([src]);

    while let Some(current) = queue.pop_front() {
        if current == dst {
            break;
        }
        for (neighbor, link_index) in graph.neighbors(current) {
            if neighbor != src && !parents.contains_key(neighbor) {
                parents.insert(neighbor, (current, link_index));
                queue.push_back(neighbor);
            }
        }
    }

    if !parents.contains_key(dst) {
        log::warn!("No path from {} to {}; the topology is not a tree", src, dst);
        return Err(ResolveError::Unreachable {
            src: src.to_string(),
            dst: dst.to_string(),
        });
    }

    let mut nodes = vec![dst.to_string()];
    let mut links = Vec::new();
    let mut current = dst;
    while let Some(&(previous, link_index)) = parents.get(current) {
        links.push(link_index);
        nodes.push(previous.to_string());
        current = previous;
    }
    nodes.reverse();
    links.reverse();

    Ok(NetworkPath { nodes, links })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use crate::topology::builder::build_topology;

    fn default_graph() -> NetworkGraph {
        build_topology(&NetworkConfig::default()).unwrap().graph
    }

    #[test]
    fn test_path_across_the_root() {
        let graph = default_graph();
        let path = resolve(&graph, "H11", "H41").unwrap();
        assert_eq!(
            path.nodes(),
            &["H11", "e1", "a1", "root", "a2", "e4", "H41"]
        );
        assert_eq!(path.hop_count(), 6);

        let endpoints: Vec<(&str, &str)> = path
            .links(&graph)
            .map(|link| (link.upper.as_str(), link.lower.as_str()))
            .collect();
        assert_eq!(endpoints[0], ("e1", "H11"));
        assert_eq!(endpoints[3], ("root", "a2"));
    }

    #[test]
    fn test_path_within_one_edge_switch() {
        let graph = default_graph();
        let path = resolve(&graph, "H31", "H33").unwrap();
        assert_eq!(path.nodes(), &["H31", "e3", "H33"]);
    }

    #[test]
    fn test_zero_hop_path() {
        let graph = default_graph();
        let path = resolve(&graph, "H22", "H22").unwrap();
        assert!(path.is_empty());
        assert_eq!(path.nodes(), &["H22"]);
    }

    #[test]
    fn test_unknown_node() {
        let graph = default_graph();
        assert_eq!(
            resolve(&graph, "H11", "H99"),
            Err(ResolveError::UnknownNode("H99".to_string()))
        );
        assert_eq!(
            resolve(&graph, "nope", "H11"),
            Err(ResolveError::UnknownNode("nope".to_string()))
        );
    }

    #[test]
    fn test_unreachable_in_forest() {
        let mut graph = default_graph();
        graph.remove_link("root", "a2").unwrap();
        assert_eq!(
            resolve(&graph, "H11", "H31"),
            Err(ResolveError::Unreachable {
                src: "H11".to_string(),
                dst: "H31".to_string()
            })
        );
        // Same-side queries still work
        assert!(resolve(&graph, "H31", "H42").is_ok());
    }
}
