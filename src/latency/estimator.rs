//! XProbe RTT estimation along a resolved path.

use rand::Rng;
use serde::Serialize;
use std::net::Ipv4Addr;

use crate::config::Medium;
use crate::latency::model::{LatencyFormula, LatencyModel};
use crate::network::NetworkState;
use crate::topology::path::{resolve, NetworkPath, ResolveError};
use crate::topology::types::NetworkGraph;

/// Minimum, maximum and mean of a set of RTT samples, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RttSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl RttSummary {
    /// Summarize `samples`; `None` when there are none
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        Some(Self { min, max, mean })
    }
}

/// Result of one XProbe run between two nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeReport {
    pub src: String,
    pub dst: String,
    pub src_address: Ipv4Addr,
    pub dst_address: Ipv4Addr,
    /// Node IDs from source to destination
    pub path: Vec<String>,
    /// Medium of each traversed link, in path order
    pub media: Vec<Option<Medium>>,
    pub formula: LatencyFormula,
    /// RTT samples in milliseconds
    pub samples: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RttSummary>,
}

impl ProbeReport {
    pub fn hop_count(&self) -> usize {
        self.media.len()
    }
}

/// Sample `samples` RTTs between `src` and `dst`
///
/// The path is resolved first; nothing is sampled if that fails. Each sample
/// is the path's base RTT scaled by its own jitter draw. A node probed
/// against itself yields zeros.
///
/// # Returns
/// RTT samples in milliseconds, or the path resolution error
pub fn estimate<R: Rng + ?Sized>(
    graph: &NetworkGraph,
    src: &str,
    dst: &str,
    samples: usize,
    model: &LatencyModel,
    rng: &mut R,
) -> Result<Vec<f64>, ResolveError> {
    let path = resolve(graph, src, dst)?;
    Ok(sample_path(graph, &path, samples, model, rng))
}

fn sample_path<R: Rng + ?Sized>(
    graph: &NetworkGraph,
    path: &NetworkPath,
    samples: usize,
    model: &LatencyModel,
    rng: &mut R,
) -> Vec<f64> {
    if path.is_empty() {
        return vec![0.0; samples];
    }
    let base = model.base_rtt_ms(path.links(graph));
    (0..samples).map(|_| base * model.jitter(rng)).collect()
}

/// Run XProbe between two nodes of `state`
///
/// # Arguments
/// * `state` - The built network
/// * `src` / `dst` - Node IDs, usually hosts
/// * `samples` - Number of independent RTT samples
/// * `model` - Estimator settings
/// * `rng` - Source for jitter draws
pub fn xprobe<R: Rng + ?Sized>(
    state: &NetworkState,
    src: &str,
    dst: &str,
    samples: usize,
    model: &LatencyModel,
    rng: &mut R,
) -> Result<ProbeReport, ResolveError> {
    let addresses = state.host_addresses(src, dst)?;
    let graph = state.graph();
    let path = state.resolve(src, dst)?;

    let rtts = sample_path(graph, &path, samples, model, rng);
    let summary = RttSummary::from_samples(&rtts);

    if let Some(summary) = &summary {
        log::info!(
            "XProbe {} -> {}: {} hops, min/avg/max = {:.3}/{:.3}/{:.3} ms",
            src,
            dst,
            path.hop_count(),
            summary.min,
            summary.mean,
            summary.max
        );
    }

    Ok(ProbeReport {
        src: src.to_string(),
        dst: dst.to_string(),
        src_address: addresses.src,
        dst_address: addresses.dst,
        path: path.nodes().to_vec(),
        media: path.links(graph).map(|link| link.medium).collect(),
        formula: model.formula,
        samples: rtts,
        summary,
    })
}
