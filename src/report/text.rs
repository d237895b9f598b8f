//! Text renderings of a built network and of XProbe results.

use std::collections::BTreeMap;

use crate::latency::{link_profile, ProbeReport};
use crate::network::NetworkState;

fn header(lines: &mut Vec<String>, title: &str) {
    lines.push("=".repeat(80));
    lines.push(format!("{:^80}", title));
    lines.push("=".repeat(80));
    lines.push(String::new());
}

/// Host IDs with their addresses and edge switch
pub fn render_hosts(state: &NetworkState) -> String {
    let mut lines: Vec<String> = Vec::new();
    header(&mut lines, "HOSTS");

    lines.push(format!("{:<8} {:<16} {}", "Host", "Address", "Switch"));
    for host in state.hosts() {
        let address = state
            .address_of(host)
            .map(|address| address.to_string())
            .unwrap_or_default();
        let switch = state
            .graph()
            .neighbors(host)
            .next()
            .map(|(switch, _)| switch)
            .unwrap_or("-");
        lines.push(format!("{:<8} {:<16} {}", host, address, switch));
    }
    lines.push(String::new());
    lines.push(format!("Total hosts: {}", state.hosts().len()));

    lines.join("\n")
}

/// Routing tables of the root and aggregation switches
pub fn render_routing_tables(state: &NetworkState) -> String {
    let mut lines: Vec<String> = Vec::new();
    header(&mut lines, "ROUTING TABLES");

    for table in state.routing_tables().values() {
        lines.push(format!("Routing table for {} ({}):", table.router, table.address));
        lines.push(format!("  {:<20} {}", "Destination", "Next Hop"));
        for (subnet, next_hop) in table.routes() {
            lines.push(format!("  {:<20} {}", subnet.to_string(), next_hop));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Connection types grouped by medium, followed by per-link capacities
pub fn render_link_inventory(state: &NetworkState) -> String {
    let graph = state.graph();
    let mut lines: Vec<String> = Vec::new();
    header(&mut lines, "CONNECTION TYPES");

    let mut by_medium: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for link in graph.links() {
        let name = link.medium.map(|medium| medium.display_name()).unwrap_or("Unclassified");
        by_medium
            .entry(name)
            .or_default()
            .push(format!("{} <-> {}", link.upper, link.lower));
    }

    for (name, mut connections) in by_medium {
        connections.sort();
        lines.push(format!("{} ({} links):", name, connections.len()));
        for connection in connections {
            lines.push(format!("  {}", connection));
        }
        lines.push(String::new());
    }

    header(&mut lines, "LINK CAPACITIES");
    lines.push(format!(
        "  {:<16} {:<14} {:>12} {:>12}",
        "Link", "Medium", "Bandwidth", "Line Rate"
    ));
    for link in graph.links() {
        let medium = link.medium.map(|medium| medium.display_name()).unwrap_or("-");
        let bandwidth = link
            .bandwidth
            .map(|bandwidth| bandwidth.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "  {:<16} {:<14} {:>12} {:>7} Mbps",
            format!("{} <-> {}", link.upper, link.lower),
            medium,
            bandwidth,
            link_profile(link.medium).speed_mbps()
        ));
    }

    lines.join("\n")
}

/// Probe header: endpoints, path and media
pub fn render_probe_summary(report: &ProbeReport) -> String {
    let mut lines: Vec<String> = Vec::new();
    header(&mut lines, "XPROBE");

    lines.push(format!(
        "Probing {} ({}) -> {} ({})",
        report.src, report.src_address, report.dst, report.dst_address
    ));
    lines.push(format!("Path: {}", report.path.join(" -> ")));
    let media: Vec<&str> = report
        .media
        .iter()
        .map(|medium| medium.map(|medium| medium.display_name()).unwrap_or("-"))
        .collect();
    if !media.is_empty() {
        lines.push(format!("Media: {}", media.join(", ")));
    }
    lines.push(format!("Hops: {}", report.hop_count()));

    if let Some(summary) = &report.summary {
        lines.push(format!(
            "RTT min/avg/max: {:.3}/{:.3}/{:.3} ms over {} samples",
            summary.min,
            summary.mean,
            summary.max,
            report.samples.len()
        ));
    }

    lines.join("\n")
}

/// One probe sample line, numbered from 1
pub fn render_probe_sample(report: &ProbeReport, index: usize, rtt_ms: f64) -> String {
    format!(
        "Reply from {} ({}): seq={} rtt={:.3} ms",
        report.dst,
        report.dst_address,
        index + 1,
        rtt_ms
    )
}
