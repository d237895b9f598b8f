//! Reporting for built networks.
//!
//! Human-readable text renderings, GraphViz DOT export and JSON export.

pub mod dot;
pub mod text;

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use crate::network::NetworkState;

pub use dot::generate_dot;
pub use text::{
    render_hosts, render_link_inventory, render_probe_sample, render_probe_summary,
    render_routing_tables,
};

/// Write the full network state as pretty-printed JSON
pub fn write_json_report(state: &NetworkState, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("Failed to serialize network to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Write the topology as a GraphViz DOT file
pub fn write_dot(state: &NetworkState, output_path: &Path) -> Result<()> {
    fs::write(output_path, generate_dot(state))
        .with_context(|| format!("Failed to write DOT file to {}", output_path.display()))?;

    log::info!("DOT topology written to {}", output_path.display());
    Ok(())
}
