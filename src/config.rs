use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::ip::{AddressRegistry, Subnet};
use crate::latency::{LatencyFormula, LatencyModel};
use crate::topology::types::{host_id, Layer, GraphError, AGGREGATION_SWITCHES, EDGE_SWITCHES, ROOT};
use crate::utils::bandwidth::Bandwidth;

/// Physical transmission medium of a link
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Medium {
    TwistedPair,
    FiberOptic,
    Wireless,
    Coaxial,
}

impl Medium {
    /// Every medium, in a stable order
    pub const ALL: [Medium; 4] = [
        Medium::TwistedPair,
        Medium::FiberOptic,
        Medium::Wireless,
        Medium::Coaxial,
    ];

    /// Configuration name, e.g. `fiber_optic`
    pub fn name(&self) -> &'static str {
        match self {
            Medium::TwistedPair => "twisted_pair",
            Medium::FiberOptic => "fiber_optic",
            Medium::Wireless => "wireless",
            Medium::Coaxial => "coaxial",
        }
    }

    /// Human-readable name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Medium::TwistedPair => "Twisted Pair",
            Medium::FiberOptic => "Fiber Optic",
            Medium::Wireless => "Wireless",
            Medium::Coaxial => "Coaxial Cable",
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Medium {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Medium::ALL
            .into_iter()
            .find(|medium| medium.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown medium '{}' (expected one of: twisted_pair, fiber_optic, wireless, coaxial)",
                    s
                )
            })
    }
}

/// How the medium of a link layer is chosen
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum LinkPolicy {
    /// Every link of the layer uses this medium
    Fixed(Medium),
    /// One medium is drawn per owning switch
    Random,
}

impl FromStr for LinkPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("random") {
            Ok(LinkPolicy::Random)
        } else {
            s.parse().map(LinkPolicy::Fixed)
        }
    }
}

impl TryFrom<String> for LinkPolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LinkPolicy> for String {
    fn from(value: LinkPolicy) -> Self {
        match value {
            LinkPolicy::Fixed(medium) => medium.name().to_string(),
            LinkPolicy::Random => "random".to_string(),
        }
    }
}

/// Network configuration for the fixed core/aggregation/edge/host tree
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NetworkConfig {
    /// Edge switch ID -> owned subnet
    pub subnets: BTreeMap<String, SubnetConfig>,
    /// Aggregation switch ID -> address
    pub aggregation: BTreeMap<String, Ipv4Addr>,
    pub core: CoreConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<ConnectionOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<BandwidthOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencyOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeOverrides>,
}

/// Subnet owned by one edge switch
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubnetConfig {
    pub subnet: Subnet,
    #[serde(alias = "num_hosts")]
    pub host_count: u32,
    #[serde(alias = "switch_ip")]
    pub switch_address: Ipv4Addr,
}

/// Core (root) switch settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CoreConfig {
    #[serde(alias = "root")]
    pub root_address: Ipv4Addr,
}

/// Per-layer medium overrides
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ConnectionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_to_aggregation: Option<LinkPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_to_edge: Option<LinkPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_to_host: Option<LinkPolicy>,
}

/// Per-layer nominal bandwidth overrides
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct BandwidthOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_to_aggregation: Option<Bandwidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_to_edge: Option<Bandwidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_to_host: Option<Bandwidth>,
}

/// Latency estimator overrides
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct LatencyOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<LatencyFormula>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet_size_bits: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jitter_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jitter_max: Option<f64>,
}

/// XProbe defaults
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ProbeOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<usize>,
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub interval: Option<Duration>,
}

/// Resolved medium policy and bandwidth for one layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerLink {
    pub policy: LinkPolicy,
    pub bandwidth: Bandwidth,
}

/// Resolved link settings for all three layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSettings {
    pub core_to_aggregation: LayerLink,
    pub aggregation_to_edge: LayerLink,
    pub edge_to_host: LayerLink,
}

impl LinkSettings {
    pub fn for_layer(&self, layer: Layer) -> &LayerLink {
        match layer {
            Layer::CoreToAggregation => &self.core_to_aggregation,
            Layer::AggregationToEdge => &self.aggregation_to_edge,
            Layer::EdgeToHost => &self.edge_to_host,
        }
    }
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            core_to_aggregation: LayerLink {
                policy: LinkPolicy::Fixed(Medium::FiberOptic),
                bandwidth: Bandwidth::from_gbps(10),
            },
            aggregation_to_edge: LayerLink {
                policy: LinkPolicy::Random,
                bandwidth: Bandwidth::from_gbps(1),
            },
            edge_to_host: LayerLink {
                policy: LinkPolicy::Random,
                bandwidth: Bandwidth::from_gbps(1),
            },
        }
    }
}

/// Resolved XProbe settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    pub samples: usize,
    /// Display pacing between printed samples
    pub interval: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            samples: 3,
            interval: Duration::ZERO,
        }
    }
}

/// Largest per-switch host count random mode can lay out
pub const MAX_RANDOM_HOSTS: u32 = 250;

/// Host count range for randomly generated networks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomBounds {
    pub min_hosts: u32,
    pub max_hosts: u32,
}

impl RandomBounds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_hosts == 0 {
            return Err(ConfigError::InvalidRandomBounds(
                "min_hosts must be at least 1".to_string(),
            ));
        }
        if self.min_hosts > self.max_hosts {
            return Err(ConfigError::InvalidRandomBounds(format!(
                "min_hosts ({}) is greater than max_hosts ({})",
                self.min_hosts, self.max_hosts
            )));
        }
        if self.max_hosts > MAX_RANDOM_HOSTS {
            return Err(ConfigError::InvalidRandomBounds(format!(
                "max_hosts ({}) exceeds the limit of {}",
                self.max_hosts, MAX_RANDOM_HOSTS
            )));
        }
        Ok(())
    }
}

impl Default for RandomBounds {
    fn default() -> Self {
        Self {
            min_hosts: 1,
            max_hosts: 3,
        }
    }
}

impl NetworkConfig {
    /// Validate the configuration
    ///
    /// Checks that every switch of the fixed wiring is configured (and nothing
    /// else), that each subnet can hold its hosts, that subnets do not overlap,
    /// that estimator settings are sane, and that no two nodes share an address.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_switch_ids("subnets", self.subnets.keys(), &EDGE_SWITCHES)?;
        Self::validate_switch_ids("aggregation", self.aggregation.keys(), &AGGREGATION_SWITCHES)?;

        for (switch, subnet_config) in &self.subnets {
            if subnet_config.host_count == 0 {
                return Err(ConfigError::NoHosts {
                    switch: switch.clone(),
                });
            }
            if subnet_config.subnet.host(subnet_config.host_count).is_none() {
                return Err(ConfigError::HostOverflow {
                    switch: switch.clone(),
                    subnet: subnet_config.subnet,
                    host_count: subnet_config.host_count,
                    capacity: subnet_config.subnet.max_hosts(),
                });
            }
            if !subnet_config.subnet.contains(subnet_config.switch_address) {
                log::warn!(
                    "Switch {} address {} lies outside its subnet {}",
                    switch,
                    subnet_config.switch_address,
                    subnet_config.subnet
                );
            }
        }

        let subnets: Vec<(&String, &SubnetConfig)> = self.subnets.iter().collect();
        for (i, (first, first_config)) in subnets.iter().enumerate() {
            for (second, second_config) in &subnets[i + 1..] {
                if first_config.subnet.overlaps(&second_config.subnet) {
                    return Err(ConfigError::OverlappingSubnets {
                        first: (*first).clone(),
                        first_subnet: first_config.subnet,
                        second: (*second).clone(),
                        second_subnet: second_config.subnet,
                    });
                }
            }
        }

        if let Some(LinkPolicy::Random) = self
            .connections
            .as_ref()
            .and_then(|c| c.core_to_aggregation)
        {
            return Err(ConfigError::InvalidLinkPolicy {
                layer: Layer::CoreToAggregation,
                reason: "core links always use a fixed high-capacity medium".to_string(),
            });
        }

        self.latency_model()
            .validate()
            .map_err(ConfigError::InvalidLatency)?;

        self.validate_addresses()?;

        Ok(())
    }

    fn validate_switch_ids<'a>(
        section: &'static str,
        configured: impl Iterator<Item = &'a String>,
        expected: &[&str],
    ) -> Result<(), ConfigError> {
        let configured: Vec<&String> = configured.collect();
        for switch in expected {
            if !configured.iter().any(|id| id.as_str() == *switch) {
                return Err(ConfigError::MissingSwitch {
                    section,
                    switch: switch.to_string(),
                });
            }
        }
        for id in configured {
            if !expected.contains(&id.as_str()) {
                return Err(ConfigError::UnknownSwitch {
                    section,
                    switch: id.clone(),
                    expected: expected.join(", "),
                });
            }
        }
        Ok(())
    }

    /// Register every node address, switches first, then hosts in tree order
    fn validate_addresses(&self) -> Result<(), ConfigError> {
        let mut registry = AddressRegistry::new();
        let mut register = |address: Ipv4Addr, node: String| {
            registry
                .register(address, &node)
                .map_err(|other| ConfigError::AddressCollision {
                    address,
                    node,
                    other,
                })
        };

        register(self.core.root_address, ROOT.to_string())?;
        for (switch, address) in &self.aggregation {
            register(*address, switch.clone())?;
        }
        for (switch, subnet_config) in &self.subnets {
            register(subnet_config.switch_address, switch.clone())?;
        }
        for (index, switch) in EDGE_SWITCHES.iter().enumerate() {
            let Some(subnet_config) = self.subnets.get(*switch) else {
                continue;
            };
            for ordinal in 1..=subnet_config.host_count {
                if let Some(address) = subnet_config.subnet.host(ordinal) {
                    register(address, host_id(index + 1, ordinal))?;
                }
            }
        }
        Ok(())
    }

    /// Apply layer defaults to the optional `connections` and `bandwidth` sections
    pub fn link_settings(&self) -> LinkSettings {
        let defaults = LinkSettings::default();
        let connections = self.connections.clone().unwrap_or_default();
        let bandwidth = self.bandwidth.clone().unwrap_or_default();

        let layer = |default: LayerLink, policy: Option<LinkPolicy>, bw: Option<Bandwidth>| LayerLink {
            policy: policy.unwrap_or(default.policy),
            bandwidth: bw.unwrap_or(default.bandwidth),
        };

        LinkSettings {
            core_to_aggregation: layer(
                defaults.core_to_aggregation,
                connections.core_to_aggregation,
                bandwidth.core_to_aggregation,
            ),
            aggregation_to_edge: layer(
                defaults.aggregation_to_edge,
                connections.aggregation_to_edge,
                bandwidth.aggregation_to_edge,
            ),
            edge_to_host: layer(
                defaults.edge_to_host,
                connections.edge_to_host,
                bandwidth.edge_to_host,
            ),
        }
    }

    /// Apply estimator defaults to the optional `latency` section
    pub fn latency_model(&self) -> LatencyModel {
        let defaults = LatencyModel::default();
        let Some(overrides) = &self.latency else {
            return defaults;
        };
        LatencyModel {
            formula: overrides.formula.unwrap_or(defaults.formula),
            packet_size_bits: overrides.packet_size_bits.unwrap_or(defaults.packet_size_bits),
            jitter_min: overrides.jitter_min.unwrap_or(defaults.jitter_min),
            jitter_max: overrides.jitter_max.unwrap_or(defaults.jitter_max),
        }
    }

    /// Apply XProbe defaults to the optional `probe` section
    pub fn probe_settings(&self) -> ProbeSettings {
        let defaults = ProbeSettings::default();
        let Some(overrides) = &self.probe else {
            return defaults;
        };
        ProbeSettings {
            samples: overrides.samples.unwrap_or(defaults.samples),
            interval: overrides.interval.unwrap_or(defaults.interval),
        }
    }

    /// Subnet of each edge switch
    pub fn edge_subnets(&self) -> BTreeMap<String, Subnet> {
        self.subnets
            .iter()
            .map(|(switch, subnet_config)| (switch.clone(), subnet_config.subnet))
            .collect()
    }
}

/// Default configuration: four edge blocks carved out of 192.168.1.0/24 with
/// each edge switch at the top usable address of its block.
impl Default for NetworkConfig {
    fn default() -> Self {
        let subnet = |last_octet: u8, prefix: u8, host_count: u32, switch_octet: u8| SubnetConfig {
            subnet: Subnet::containing(Ipv4Addr::new(192, 168, 1, last_octet), prefix),
            host_count,
            switch_address: Ipv4Addr::new(192, 168, 1, switch_octet),
        };

        let mut subnets = BTreeMap::new();
        subnets.insert("e1".to_string(), subnet(0, 27, 2, 30));
        subnets.insert("e2".to_string(), subnet(32, 27, 2, 62));
        subnets.insert("e3".to_string(), subnet(64, 28, 3, 78));
        subnets.insert("e4".to_string(), subnet(80, 28, 3, 94));

        let mut aggregation = BTreeMap::new();
        aggregation.insert("a1".to_string(), Ipv4Addr::new(192, 168, 1, 97));
        aggregation.insert("a2".to_string(), Ipv4Addr::new(192, 168, 1, 109));

        let links = LinkSettings::default();
        let latency = LatencyModel::default();
        let probe = ProbeSettings::default();

        Self {
            subnets,
            aggregation,
            core: CoreConfig {
                root_address: Ipv4Addr::new(192, 168, 1, 254),
            },
            connections: Some(ConnectionOverrides {
                core_to_aggregation: Some(links.core_to_aggregation.policy),
                aggregation_to_edge: Some(links.aggregation_to_edge.policy),
                edge_to_host: Some(links.edge_to_host.policy),
            }),
            bandwidth: Some(BandwidthOverrides {
                core_to_aggregation: Some(links.core_to_aggregation.bandwidth),
                aggregation_to_edge: Some(links.aggregation_to_edge.bandwidth),
                edge_to_host: Some(links.edge_to_host.bandwidth),
            }),
            latency: Some(LatencyOverrides {
                formula: Some(latency.formula),
                packet_size_bits: Some(latency.packet_size_bits),
                jitter_min: Some(latency.jitter_min),
                jitter_max: Some(latency.jitter_max),
            }),
            probe: Some(ProbeOverrides {
                samples: Some(probe.samples),
                interval: Some(probe.interval),
            }),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access configuration file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing {section} entry for switch '{switch}'")]
    MissingSwitch { section: &'static str, switch: String },
    #[error("Unknown {section} entry '{switch}' (expected only: {expected})")]
    UnknownSwitch {
        section: &'static str,
        switch: String,
        expected: String,
    },
    #[error("Edge switch '{switch}' must have at least one host")]
    NoHosts { switch: String },
    #[error("Subnet {subnet} of '{switch}' cannot hold {host_count} hosts (at most {capacity})")]
    HostOverflow {
        switch: String,
        subnet: Subnet,
        host_count: u32,
        capacity: u64,
    },
    #[error("Address {address} of '{node}' is already assigned to '{other}'")]
    AddressCollision {
        address: Ipv4Addr,
        node: String,
        other: String,
    },
    #[error("Subnet {first_subnet} of '{first}' overlaps subnet {second_subnet} of '{second}'")]
    OverlappingSubnets {
        first: String,
        first_subnet: Subnet,
        second: String,
        second_subnet: Subnet,
    },
    #[error("Invalid link policy for {layer}: {reason}")]
    InvalidLinkPolicy { layer: Layer, reason: String },
    #[error("Invalid random bounds: {0}")]
    InvalidRandomBounds(String),
    #[error("Invalid latency settings: {0}")]
    InvalidLatency(String),
    #[error("Invalid topology: {0}")]
    Topology(#[from] GraphError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_yaml() -> &'static str {
        r#"
subnets:
  e1: { subnet: 192.168.1.0/28, host_count: 2, switch_address: 192.168.1.30 }
  e2: { subnet: 192.168.1.32/28, host_count: 2, switch_address: 192.168.1.62 }
  e3: { subnet: 192.168.1.64/28, host_count: 3, switch_address: 192.168.1.78 }
  e4: { subnet: 192.168.1.80/28, host_count: 3, switch_address: 192.168.1.94 }
aggregation:
  a1: 192.168.1.97
  a2: 192.168.1.109
core:
  root_address: 192.168.1.254
"#
    }

    #[test]
    fn test_config_parsing() {
        let config: NetworkConfig = serde_yaml::from_str(base_yaml()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.subnets["e1"].host_count, 2);
        assert_eq!(config.subnets["e1"].subnet.to_string(), "192.168.1.0/28");
        assert_eq!(config.aggregation["a2"], Ipv4Addr::new(192, 168, 1, 109));
        assert!(config.connections.is_none());

        // Optional sections fall back to the documented defaults
        assert_eq!(config.link_settings(), LinkSettings::default());
        assert_eq!(config.latency_model(), LatencyModel::default());
        assert_eq!(config.probe_settings(), ProbeSettings::default());
    }

    #[test]
    fn test_legacy_field_names() {
        let json = r#"{
            "subnets": {
                "e1": {"subnet": "192.168.1.0/27", "num_hosts": 2, "switch_ip": "192.168.1.30"},
                "e2": {"subnet": "192.168.1.32/27", "num_hosts": 2, "switch_ip": "192.168.1.62"},
                "e3": {"subnet": "192.168.1.64/28", "num_hosts": 3, "switch_ip": "192.168.1.78"},
                "e4": {"subnet": "192.168.1.80/28", "num_hosts": 3, "switch_ip": "192.168.1.94"}
            },
            "aggregation": {"a1": "192.168.1.97", "a2": "192.168.1.109"},
            "core": {"root": "192.168.1.254"},
            "bandwidth": {"core_to_aggregation": "10 Gbps", "aggregation_to_edge": "1 Gbps", "edge_to_host": "100 Mbps"}
        }"#;

        let config: NetworkConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.core.root_address, Ipv4Addr::new(192, 168, 1, 254));
        assert_eq!(
            config.link_settings().edge_to_host.bandwidth,
            Bandwidth::from_mbps(100)
        );
    }

    #[test]
    fn test_overrides() {
        let yaml = format!(
            "{}{}",
            base_yaml(),
            r#"
connections:
  aggregation_to_edge: twisted_pair
  edge_to_host: wireless
latency:
  formula: hop_count
  jitter_min: 0.9
probe:
  samples: 5
  interval: 500ms
"#
        );
        let config: NetworkConfig = serde_yaml::from_str(&yaml).unwrap();
        assert!(config.validate().is_ok());

        let links = config.link_settings();
        assert_eq!(links.core_to_aggregation.policy, LinkPolicy::Fixed(Medium::FiberOptic));
        assert_eq!(links.aggregation_to_edge.policy, LinkPolicy::Fixed(Medium::TwistedPair));
        assert_eq!(links.edge_to_host.policy, LinkPolicy::Fixed(Medium::Wireless));
        assert_eq!(links.edge_to_host.bandwidth, Bandwidth::from_gbps(1));

        let latency = config.latency_model();
        assert_eq!(latency.formula, LatencyFormula::HopCount);
        assert_eq!(latency.jitter_min, 0.9);
        assert_eq!(latency.jitter_max, LatencyModel::default().jitter_max);

        let probe = config.probe_settings();
        assert_eq!(probe.samples, 5);
        assert_eq!(probe.interval, Duration::from_millis(500));
    }

    #[test]
    fn test_missing_sections_fail_to_parse() {
        let yaml = r#"
subnets:
  e1: { subnet: 192.168.1.0/28, host_count: 2, switch_address: 192.168.1.30 }
aggregation:
  a1: 192.168.1.97
"#;
        let parsed: Result<NetworkConfig, _> = serde_yaml::from_str(yaml);
        assert!(parsed.is_err(), "missing core section must not be defaulted");

        let bad_medium = format!("{}connections:\n  edge_to_host: carrier_pigeon\n", base_yaml());
        let parsed: Result<NetworkConfig, _> = serde_yaml::from_str(&bad_medium);
        assert!(parsed.is_err());

        let bad_subnet = base_yaml().replace("192.168.1.0/28", "192.168.1.0/99");
        let parsed: Result<NetworkConfig, _> = serde_yaml::from_str(&bad_subnet);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_validation_errors() {
        let config: NetworkConfig = serde_yaml::from_str(base_yaml()).unwrap();

        let mut missing = config.clone();
        missing.subnets.remove("e3");
        assert!(matches!(
            missing.validate(),
            Err(ConfigError::MissingSwitch { switch, .. }) if switch == "e3"
        ));

        let mut unknown = config.clone();
        unknown.aggregation.insert("a3".to_string(), Ipv4Addr::new(10, 0, 0, 3));
        assert!(matches!(
            unknown.validate(),
            Err(ConfigError::UnknownSwitch { switch, .. }) if switch == "a3"
        ));

        let mut empty = config.clone();
        empty.subnets.get_mut("e2").unwrap().host_count = 0;
        assert!(matches!(empty.validate(), Err(ConfigError::NoHosts { .. })));

        // A /28 has 14 usable host offsets
        let mut overflow = config.clone();
        overflow.subnets.get_mut("e1").unwrap().host_count = 15;
        assert!(matches!(
            overflow.validate(),
            Err(ConfigError::HostOverflow { capacity: 14, .. })
        ));

        let mut overlapping = config.clone();
        overlapping.subnets.get_mut("e2").unwrap().subnet = "192.168.1.0/26".parse().unwrap();
        assert!(matches!(
            overlapping.validate(),
            Err(ConfigError::OverlappingSubnets { .. })
        ));

        let mut random_core = config.clone();
        random_core.connections = Some(ConnectionOverrides {
            core_to_aggregation: Some(LinkPolicy::Random),
            ..Default::default()
        });
        assert!(matches!(
            random_core.validate(),
            Err(ConfigError::InvalidLinkPolicy { layer: Layer::CoreToAggregation, .. })
        ));

        let mut bad_jitter = config.clone();
        bad_jitter.latency = Some(LatencyOverrides {
            jitter_min: Some(1.2),
            jitter_max: Some(1.1),
            ..Default::default()
        });
        assert!(matches!(bad_jitter.validate(), Err(ConfigError::InvalidLatency(_))));
    }

    #[test]
    fn test_switch_address_collision() {
        let mut config: NetworkConfig = serde_yaml::from_str(base_yaml()).unwrap();
        // e1 sits on the address reserved for its second host
        config.subnets.get_mut("e1").unwrap().switch_address = Ipv4Addr::new(192, 168, 1, 2);

        match config.validate() {
            Err(ConfigError::AddressCollision { address, node, other }) => {
                assert_eq!(address, Ipv4Addr::new(192, 168, 1, 2));
                assert_eq!(node, "H12");
                assert_eq!(other, "e1");
            }
            other => panic!("expected address collision, got {:?}", other),
        }

        let mut shared = serde_yaml::from_str::<NetworkConfig>(base_yaml()).unwrap();
        shared.aggregation.insert("a2".to_string(), Ipv4Addr::new(192, 168, 1, 97));
        assert!(matches!(shared.validate(), Err(ConfigError::AddressCollision { .. })));
    }

    #[test]
    fn test_random_bounds() {
        assert!(RandomBounds::default().validate().is_ok());
        assert!(RandomBounds { min_hosts: 0, max_hosts: 3 }.validate().is_err());
        assert!(RandomBounds { min_hosts: 4, max_hosts: 3 }.validate().is_err());
        assert!(RandomBounds { min_hosts: 1, max_hosts: 20 }.validate().is_ok());
        assert!(RandomBounds { min_hosts: 1, max_hosts: MAX_RANDOM_HOSTS }.validate().is_ok());
        assert!(RandomBounds { min_hosts: 1, max_hosts: MAX_RANDOM_HOSTS + 1 }.validate().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = NetworkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.link_settings(), LinkSettings::default());
        assert_eq!(config.subnets["e1"].subnet.to_string(), "192.168.1.0/27");
        assert_eq!(config.subnets["e4"].subnet.to_string(), "192.168.1.80/28");
        assert!(config.subnets["e4"].subnet.contains(config.subnets["e4"].switch_address));

        // Written defaults parse back to the same configuration
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: NetworkConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_medium_and_policy_names() {
        assert_eq!("fiber_optic".parse::<Medium>(), Ok(Medium::FiberOptic));
        assert_eq!("Coaxial".parse::<Medium>(), Ok(Medium::Coaxial));
        assert!("copper".parse::<Medium>().is_err());
        assert_eq!("random".parse::<LinkPolicy>(), Ok(LinkPolicy::Random));
        assert_eq!(
            "wireless".parse::<LinkPolicy>(),
            Ok(LinkPolicy::Fixed(Medium::Wireless))
        );
        assert_eq!(String::from(LinkPolicy::Fixed(Medium::TwistedPair)), "twisted_pair");
    }
}
