//! Link classification.
//!
//! This file annotates every link with a transmission medium and a nominal
//! bandwidth, following the layering rules of the tree:
//! core links use one fixed high-capacity medium, each aggregation switch
//! picks one medium for all of its edge links, and each edge switch picks
//! one medium for all of its host links.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

use crate::config::{LinkPolicy, LinkSettings};
use crate::topology::types::{Layer, Medium, NetworkGraph, Role};

/// Media an aggregation switch may draw for its edge links
pub const AGGREGATION_MEDIA: [Medium; 2] = [Medium::FiberOptic, Medium::TwistedPair];

/// Candidate media for a randomly chosen layer
pub fn candidate_media(layer: Layer) -> &'static [Medium] {
    match layer {
        Layer::CoreToAggregation => &[Medium::FiberOptic],
        Layer::AggregationToEdge => &AGGREGATION_MEDIA,
        Layer::EdgeToHost => &Medium::ALL,
    }
}

/// Pick the medium for one switch's downlinks
fn choose_medium<R: Rng + ?Sized>(policy: LinkPolicy, layer: Layer, rng: &mut R) -> Medium {
    match policy {
        LinkPolicy::Fixed(medium) => medium,
        LinkPolicy::Random => candidate_media(layer)
            .choose(rng)
            .copied()
            .unwrap_or(Medium::FiberOptic),
    }
}

/// Assign a medium and bandwidth to every link of the graph
///
/// One medium is chosen per owning (upper) switch and applied to all of its
/// downlinks in that layer. Switches are visited in graph order, so a seeded
/// generator always produces the same assignment.
///
/// # Arguments
/// * `graph` - The graph whose links are annotated in place
/// * `settings` - Resolved per-layer policy and bandwidth
/// * `rng` - Source for `random` policies
///
/// # Returns
/// The medium chosen for each switch, keyed by switch ID
pub fn classify_links<R: Rng + ?Sized>(
    graph: &mut NetworkGraph,
    settings: &LinkSettings,
    rng: &mut R,
) -> BTreeMap<String, Medium> {
    let mut chosen = BTreeMap::new();

    let switches: Vec<(String, Layer)> = graph
        .nodes()
        .iter()
        .filter_map(|node| Layer::below(node.role).map(|layer| (node.id.clone(), layer)))
        .collect();

    for (switch, layer) in switches {
        let layer_link = settings.for_layer(layer);
        let medium = choose_medium(layer_link.policy, layer, rng);

        let mut annotated = 0;
        for link in graph.links_mut() {
            if link.upper == switch && link.layer == layer {
                link.medium = Some(medium);
                link.bandwidth = Some(layer_link.bandwidth);
                annotated += 1;
            }
        }

        log::debug!(
            "{} -> {} links of {} use {} at {}",
            layer,
            annotated,
            switch,
            medium.display_name(),
            layer_link.bandwidth
        );
        chosen.insert(switch, medium);
    }

    let edges = graph.nodes_with_role(Role::Edge).count();
    log::info!(
        "Classified {} links ({} aggregation and {} edge switch media choices)",
        graph.link_count(),
        graph.nodes_with_role(Role::Aggregation).count(),
        edges
    );

    chosen
}
