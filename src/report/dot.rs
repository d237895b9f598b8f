//! GraphViz DOT export of the topology.

use crate::config::Medium;
use crate::network::NetworkState;
use crate::topology::types::Role;

/// Edge color used for a link medium
pub fn medium_color(medium: Option<Medium>) -> &'static str {
    match medium {
        Some(Medium::TwistedPair) => "#FFA500",
        Some(Medium::FiberOptic) => "#00FF00",
        Some(Medium::Wireless) => "#FF1493",
        Some(Medium::Coaxial) => "#0000FF",
        None => "#808080",
    }
}

fn role_fill(role: Role) -> &'static str {
    match role {
        Role::Root => "gold",
        Role::Aggregation => "orange",
        Role::Edge => "lightgreen",
        Role::Host => "lightblue",
    }
}

/// Generate an undirected DOT graph with one rank per tier
///
/// Nodes are labelled with their ID and address; links are colored by
/// medium and labelled with the medium name.
pub fn generate_dot(state: &NetworkState) -> String {
    let graph = state.graph();
    let mut dot = String::new();
    dot.push_str("graph Network {\n");
    dot.push_str("    rankdir=TB;\n");
    dot.push_str("    node [shape=box, style=filled];\n");
    dot.push_str(&format!(
        "    label=\"Hierarchical network ({} hosts)\";\n",
        state.hosts().len()
    ));
    dot.push_str("    labelloc=t;\n\n");

    for role in [Role::Root, Role::Aggregation, Role::Edge, Role::Host] {
        let members: Vec<String> = graph
            .nodes_with_role(role)
            .map(|node| format!("\"{}\";", node.id))
            .collect();
        dot.push_str(&format!("    {{ rank=same; {} }}\n", members.join(" ")));
    }
    dot.push('\n');

    for node in graph.nodes() {
        dot.push_str(&format!(
            "    \"{}\" [label=\"{}\\n{}\", fillcolor={}];\n",
            node.id,
            node.id,
            node.address,
            role_fill(node.role)
        ));
    }
    dot.push('\n');

    for link in graph.links() {
        let label = link.medium.map(|medium| medium.display_name()).unwrap_or("unclassified");
        dot.push_str(&format!(
            "    \"{}\" -- \"{}\" [color=\"{}\", label=\"{}\"];\n",
            link.upper,
            link.lower,
            medium_color(link.medium),
            label
        ));
    }

    dot.push_str("}\n");
    dot
}
