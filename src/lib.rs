//! # XProbeSim - Hierarchical tree network simulator
//!
//! This library models a small core/aggregation/edge/host network as a tree,
//! derives routing tables for its switches and estimates round-trip latency
//! between any two hosts.
//!
//! ## Overview
//!
//! A network is built once from a validated configuration (or from random
//! host counts) and is immutable afterwards. Reconfiguring produces a new
//! [`network::NetworkState`] that replaces the old one.
//!
//! ## Key Features
//!
//! - **Fixed Wiring**: root to two aggregation switches, each serving two edge switches
//! - **Subnet Addressing**: hosts numbered from each edge switch's CIDR block
//! - **Link Media**: twisted pair, fiber optic, wireless and coaxial, fixed or drawn per switch
//! - **Routing Tables**: destination subnet to next hop for root and aggregation switches
//! - **XProbe**: RTT sampling from per-medium transmission and propagation delay
//! - **Reproducible**: every random choice goes through a caller-supplied RNG
//!
//! ## Architecture
//!
//! - `config`: Configuration schema, defaults and validation
//! - `config_loader`: YAML/JSON loading and default file creation
//! - `ip`: CIDR subnets and address collision tracking
//! - `topology`: Graph types, builder, link classifier, routing tables, path resolver
//! - `latency`: Link profiles, RTT model and the XProbe estimator
//! - `network`: The build pipeline and its immutable result
//! - `report`: Text, DOT and JSON output
//! - `utils`: Bandwidth parsing
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use xprobesim::{config_loader, latency, network::NetworkState};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("network_config.yaml"))?;
//! let model = config.latency_model();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let state = NetworkState::from_config(config, &mut rng)?;
//!
//! let report = latency::xprobe(&state, "H11", "H41", 3, &model, &mut rng)?;
//! println!("{:?}", report.summary);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Library errors are typed: [`config::ConfigError`] for anything wrong with
//! a configuration and [`topology::ResolveError`] for path lookups. The
//! binary wraps them with `color_eyre` for reporting.

pub mod config;
pub mod config_loader;
pub mod ip;
pub mod latency;
pub mod network;
pub mod report;
pub mod topology;
pub mod utils;
