use std::io::Write;
use std::net::Ipv4Addr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::NamedTempFile;

use xprobesim::config::{NetworkConfig, RandomBounds};
use xprobesim::config_loader::load_config;
use xprobesim::ip::Subnet;
use xprobesim::latency::{estimate, LatencyModel};
use xprobesim::network::NetworkState;
use xprobesim::topology::{resolve, ResolveError};

fn scenario_config() -> NetworkConfig {
    let yaml = r#"
subnets:
  e1: { subnet: 192.168.1.0/28, host_count: 2, switch_address: 192.168.1.30 }
  e2: { subnet: 192.168.1.32/27, host_count: 2, switch_address: 192.168.1.62 }
  e3: { subnet: 192.168.1.64/28, host_count: 3, switch_address: 192.168.1.78 }
  e4: { subnet: 192.168.1.80/28, host_count: 3, switch_address: 192.168.1.94 }
aggregation:
  a1: 192.168.1.97
  a2: 192.168.1.109
core:
  root_address: 192.168.1.254
connections:
  aggregation_to_edge: twisted_pair
  edge_to_host: coaxial
"#;
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", yaml).unwrap();
    load_config(temp_file.path()).unwrap()
}

fn random_states() -> Vec<NetworkState> {
    let bounds = RandomBounds {
        min_hosts: 1,
        max_hosts: 6,
    };
    (0..20)
        .map(|seed| NetworkState::random(&bounds, &mut StdRng::seed_from_u64(seed)).unwrap())
        .collect()
}

#[test]
fn test_every_built_network_is_a_tree() {
    for state in random_states() {
        let graph = state.graph();
        assert_eq!(graph.link_count(), graph.node_count() - 1);
        assert!(graph.is_connected());
        assert!(graph.links().iter().all(|link| link.medium.is_some() && link.bandwidth.is_some()));
    }
}

#[test]
fn test_addresses_are_unique() {
    for state in random_states() {
        let mut addresses: Vec<Ipv4Addr> = state.addresses().values().copied().collect();
        let total = addresses.len();
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), total);
        assert_eq!(total, state.graph().node_count());
    }
}

#[test]
fn test_self_paths_are_empty_with_zero_rtt() {
    let state = NetworkState::from_config(scenario_config(), &mut StdRng::seed_from_u64(0)).unwrap();
    let model = LatencyModel::default();
    let mut rng = StdRng::seed_from_u64(1);

    for host in state.hosts() {
        let path = resolve(state.graph(), host, host).unwrap();
        assert_eq!(path.hop_count(), 0);

        let samples = estimate(state.graph(), host, host, 4, &model, &mut rng).unwrap();
        assert!(samples.iter().all(|&rtt| rtt == 0.0));
    }
}

#[test]
fn test_paths_are_symmetric() {
    let state = NetworkState::from_config(scenario_config(), &mut StdRng::seed_from_u64(0)).unwrap();
    let graph = state.graph();
    let ids: Vec<&str> = graph.nodes().iter().map(|node| node.id.as_str()).collect();

    for &u in &ids {
        for &v in &ids {
            let forward = resolve(graph, u, v).unwrap();
            let backward = resolve(graph, v, u).unwrap();
            assert_eq!(forward.hop_count(), backward.hop_count());

            let mut forward_links = forward.link_indices().to_vec();
            let mut backward_links = backward.link_indices().to_vec();
            forward_links.sort_unstable();
            backward_links.sort_unstable();
            assert_eq!(forward_links, backward_links, "{} <-> {}", u, v);
        }
    }
}

#[test]
fn test_build_is_idempotent_for_fixed_media() {
    let first = NetworkState::from_config(scenario_config(), &mut StdRng::seed_from_u64(3)).unwrap();
    let second = NetworkState::from_config(scenario_config(), &mut StdRng::seed_from_u64(4)).unwrap();

    assert_eq!(first.graph().nodes(), second.graph().nodes());
    assert_eq!(first.graph().links(), second.graph().links());
    assert_eq!(first.routing_tables(), second.routing_tables());
}

#[test]
fn test_jitter_bound_over_many_samples() {
    let state = NetworkState::random(&RandomBounds::default(), &mut StdRng::seed_from_u64(8)).unwrap();
    let model = LatencyModel::default();
    let src = state.hosts().first().unwrap().clone();
    let dst = state.hosts().last().unwrap().clone();

    let path = state.resolve(&src, &dst).unwrap();
    let base = model.base_rtt_ms(path.links(state.graph()));

    let mut rng = StdRng::seed_from_u64(9);
    let samples = estimate(state.graph(), &src, &dst, 10_000, &model, &mut rng).unwrap();
    let (jitter_min, jitter_max) = model.jitter_bounds();
    assert!(samples
        .iter()
        .all(|&rtt| rtt >= base * jitter_min && rtt <= base * jitter_max));
}

#[test]
fn test_random_mode_holds_twenty_hosts_per_switch() {
    let bounds = RandomBounds {
        min_hosts: 1,
        max_hosts: 20,
    };
    for seed in 0..100 {
        let state = NetworkState::random(&bounds, &mut StdRng::seed_from_u64(seed)).unwrap();
        assert!(state.graph().is_tree());
        assert!(state.hosts().len() >= 4 && state.hosts().len() <= 80);
    }
}

#[test]
fn test_scenario_addresses() {
    let state = NetworkState::from_config(scenario_config(), &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(state.address_of("H11"), Some(Ipv4Addr::new(192, 168, 1, 1)));
    assert_eq!(state.address_of("H12"), Some(Ipv4Addr::new(192, 168, 1, 2)));
    assert_eq!(state.address_of("e1"), Some(Ipv4Addr::new(192, 168, 1, 30)));
}

#[test]
fn test_unknown_host_is_reported() {
    let state = NetworkState::from_config(scenario_config(), &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(
        resolve(state.graph(), "H11", "H99"),
        Err(ResolveError::UnknownNode("H99".to_string()))
    );
}

#[test]
fn test_root_routes_first_subnet_to_a1() {
    let state = NetworkState::from_config(scenario_config(), &mut StdRng::seed_from_u64(0)).unwrap();
    let subnet: Subnet = "192.168.1.0/28".parse().unwrap();
    let root = state.routing_table("root").unwrap();
    assert_eq!(root.next_hop_for_subnet(&subnet), Some("a1"));
    assert_eq!(root.next_hop(Ipv4Addr::new(192, 168, 1, 2)), Some("a1"));
}
