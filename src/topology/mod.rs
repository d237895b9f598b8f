//! Network topology module.
//!
//! This module contains the graph types of the simulated tree and the
//! components that derive everything else from it: the builder, the link
//! classifier, the routing table synthesizer and the path resolver.

pub mod builder;
pub mod links;
pub mod path;
pub mod routing;
pub mod types;

// Re-export key types and functions for easier access
pub use builder::{build_topology, random_config, Topology};
pub use links::classify_links;
pub use path::{resolve, NetworkPath, ResolveError};
pub use routing::{synthesize_routing_tables, RoutingTable, RoutingTables};
pub use types::{Layer, Link, Medium, NetworkGraph, Node, Role};
